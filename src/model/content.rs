//! Browsable content: trending, playlists, search, radio and artists

use super::track::{Playlist, Track};

pub const TRENDING_QUERY: &str = "top hits";
pub const PLAYLIST_AUTHOR: &str = "Music App";
pub const MAX_ARTISTS: usize = 15;

pub const HOME_GENRES: [&str; 6] = ["Pop", "Hip-Hop", "Alternative", "Rock", "Electronic", "R&B"];
pub const SEARCH_GENRES: [&str; 6] = ["Pop", "Hip-Hop", "Dance", "Country", "Rock", "R&B"];

/// A radio station is a canned search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Station {
    pub id: &'static str,
    pub title: &'static str,
    pub query: &'static str,
}

pub const STATIONS: [Station; 6] = [
    Station { id: "lofi", title: "Lo-Fi Station", query: "lofi study" },
    Station { id: "pop", title: "Pop Hits Radio", query: "top pop hits" },
    Station { id: "rock", title: "Classic Rock", query: "classic rock" },
    Station { id: "jazz", title: "Jazz Lounge", query: "jazz instrumental" },
    Station { id: "workout", title: "Workout Energy", query: "workout gym" },
    Station { id: "sleep", title: "Sleep & Relax", query: "ambient sleep" },
];

/// Playlist created when the public collection is empty
#[derive(Clone, Copy, Debug)]
pub struct SeedPlaylist {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub query: &'static str,
}

pub const SEED_PLAYLISTS: [SeedPlaylist; 2] = [
    SeedPlaylist {
        title: "Anime Hits",
        description: "Top openings and endings.",
        category: "J-Pop",
        query: "anime opening",
    },
    SeedPlaylist {
        title: "Lofi Beats",
        description: "Chill vibes for studying.",
        category: "Chill",
        query: "ghibli jazz",
    },
];

impl SeedPlaylist {
    /// Build the playlist document body; the store assigns id and timestamp.
    pub fn build(&self, songs: Vec<Track>) -> Playlist {
        Playlist {
            id: String::new(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            cover: songs.first().and_then(|t| t.cover.clone()),
            author: PLAYLIST_AUTHOR.to_string(),
            category: self.category.to_string(),
            songs,
            created_at: None,
        }
    }
}

pub fn public_playlists_collection(app_id: &str) -> String {
    format!("artifacts/{}/public/data/playlists", app_id)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistSummary {
    pub name: String,
    pub cover: Option<String>,
}

/// Unique artists across all playlists in encounter order, capped.
pub fn aggregate_artists(playlists: &[Playlist]) -> Vec<ArtistSummary> {
    let mut artists: Vec<ArtistSummary> = Vec::new();
    for song in playlists.iter().flat_map(|p| p.songs.iter()) {
        if artists.len() == MAX_ARTISTS {
            break;
        }
        if song.artist.is_empty() || artists.iter().any(|a| a.name == song.artist) {
            continue;
        }
        artists.push(ArtistSummary {
            name: song.artist.clone(),
            cover: song.cover.clone(),
        });
    }
    artists
}

/// Search input plus results, guarded against out-of-order responses
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Track>,
    pub searching: bool,
    latest_request: u64,
    /// Term of the latest request, as sent
    pending_term: String,
}

impl SearchState {
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn backspace(&mut self) {
        self.query.pop();
    }

    /// Start a request for the current query. Returns the request id and
    /// term, or `None` when the query is blank (results are cleared).
    pub fn begin(&mut self) -> Option<(u64, String)> {
        self.latest_request += 1;
        let term = self.query.trim().to_string();
        if term.is_empty() {
            self.results.clear();
            self.searching = false;
            return None;
        }
        self.searching = true;
        self.pending_term = term.clone();
        Some((self.latest_request, term))
    }

    /// Clear the query; anything in flight becomes stale.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.searching = false;
        self.latest_request += 1;
    }

    /// Apply a response. Returns false if it was stale: a newer request
    /// was started, or the query no longer reads as the term that was sent.
    pub fn accept(&mut self, request_id: u64, results: Vec<Track>) -> bool {
        if request_id != self.latest_request {
            return false;
        }
        if self.query.trim() != self.pending_term {
            self.searching = false;
            return false;
        }
        self.results = results;
        self.searching = false;
        true
    }
}

#[derive(Clone, Debug, Default)]
pub struct RadioState {
    pub active_station: Option<&'static str>,
    pub loading: bool,
    latest_request: u64,
}

impl RadioState {
    pub fn begin(&mut self, station: &Station) -> u64 {
        self.latest_request += 1;
        self.active_station = Some(station.id);
        self.loading = true;
        self.latest_request
    }

    pub fn accept(&mut self, request_id: u64) -> bool {
        if request_id != self.latest_request {
            return false;
        }
        self.loading = false;
        true
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub trending: Vec<Track>,
    pub trending_loading: bool,
    pub playlists: Vec<Playlist>,
    /// Set once the empty-collection seed has been started
    pub seed_started: bool,
    pub search: SearchState,
    pub radio: RadioState,
}

impl ContentState {
    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn artists(&self) -> Vec<ArtistSummary> {
        aggregate_artists(&self.playlists)
    }

    /// Replace playlists from a store snapshot. Returns true when the
    /// collection is empty and has not been seeded yet.
    pub fn set_playlists(&mut self, playlists: Vec<Playlist>) -> bool {
        self.playlists = playlists;
        if self.playlists.is_empty() && !self.seed_started {
            self.seed_started = true;
            return true;
        }
        false
    }
}
