//! Tab navigation, search, radio and list activation

use rand::Rng;

use crate::error::Result;
use crate::model::{ListEntry, Station, Track, ViewState, TRENDING_QUERY};

use super::{AppController, AppEvent};

impl AppController {
    pub(crate) fn navigate(&mut self, view: ViewState) {
        let is_guest = self.model.is_guest();
        if self.model.views.navigate(view.clone(), is_guest) {
            tracing::debug!(view = ?view, "Navigated");
        }
    }

    /// Act on the highlighted row of the current view.
    pub(crate) fn activate_selected(&mut self) {
        let Some(entry) = self.model.selected_entry() else {
            return;
        };

        match entry {
            ListEntry::Genre(genre) => self.search_for(genre),
            ListEntry::Playlist { id, .. } => self.model.views.open_playlist(&id),
            ListEntry::Track(track) => {
                let context = self.model.visible_tracks();
                self.play_track(&track, Some(context));
            }
            ListEntry::Station(station) => self.start_radio(station),
            ListEntry::Artist { name } => self.search_for(&name),
        }
    }

    /// Start the open playlist from its first song.
    pub(crate) fn play_all(&mut self) {
        if !matches!(self.model.views.view, ViewState::PlaylistDetail(_)) {
            return;
        }
        let tracks = self.model.visible_tracks();
        if let Some(first) = tracks.first().cloned() {
            self.play_track(&first, Some(tracks));
        }
    }

    /// Esc: close an overlay, leave fullscreen or a playlist, or blur search.
    pub(crate) fn go_back(&mut self) {
        if self.model.views.close_overlay() {
            return;
        }
        if self.model.views.fullscreen {
            self.toggle_fullscreen();
            return;
        }
        if self.model.views.search_focused {
            self.model.views.search_focused = false;
            return;
        }
        if matches!(self.model.views.view, ViewState::PlaylistDetail(_)) {
            self.navigate(ViewState::Home);
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub(crate) fn search_for(&mut self, term: &str) {
        self.navigate(ViewState::Search);
        self.model.views.search_focused = false;
        self.model.content.search.query = term.to_string();
        self.submit_search();
    }

    pub(crate) fn submit_search(&mut self) {
        let Some((request_id, term)) = self.model.content.search.begin() else {
            return;
        };
        self.model.views.selected = 0;
        tracing::info!(request_id, term = %term, "Searching");

        let search = self.search.clone();
        let events = self.events.clone();
        let limit = self.config.search.search_limit;
        tokio::spawn(async move {
            let result = search.search(&term, limit).await;
            Self::send(&events, AppEvent::SearchCompleted { request_id, result });
        });
    }

    pub(crate) fn clear_search(&mut self) {
        self.model.content.search.clear();
        self.model.views.selected = 0;
    }

    pub(crate) fn on_search_completed(&mut self, request_id: u64, result: Result<Vec<Track>>) {
        // Failures show as an empty result list
        let tracks = result.unwrap_or_default();
        if !self.model.content.search.accept(request_id, tracks) {
            tracing::debug!(request_id, "Discarding stale search response");
            return;
        }
        self.model.clamp_selection();
    }

    pub(crate) fn load_trending(&mut self) {
        self.model.content.trending_loading = true;
        let search = self.search.clone();
        let events = self.events.clone();
        let limit = self.config.search.trending_limit;
        tokio::spawn(async move {
            let result = search.search(TRENDING_QUERY, limit).await;
            Self::send(&events, AppEvent::TrendingLoaded(result));
        });
    }

    pub(crate) fn on_trending_loaded(&mut self, result: Result<Vec<Track>>) {
        self.model.content.trending_loading = false;
        match result {
            Ok(tracks) => self.model.content.trending = tracks,
            Err(e) => tracing::warn!(error = %e, "Trending unavailable"),
        }
    }

    // ========================================================================
    // Radio
    // ========================================================================

    pub(crate) fn start_radio(&mut self, station: Station) {
        let request_id = self.model.content.radio.begin(&station);
        tracing::info!(station = station.id, request_id, "Tuning radio");

        let search = self.search.clone();
        let events = self.events.clone();
        let limit = self.config.search.radio_limit;
        tokio::spawn(async move {
            let result = search.search(station.query, limit).await;
            Self::send(&events, AppEvent::RadioLoaded { request_id, result });
        });
    }

    /// Play a random track of the station with all results as the queue.
    pub(crate) fn on_radio_loaded(&mut self, request_id: u64, result: Result<Vec<Track>>) {
        if !self.model.content.radio.accept(request_id) {
            tracing::debug!(request_id, "Discarding stale radio response");
            return;
        }

        let tracks = match result {
            Ok(tracks) if !tracks.is_empty() => tracks,
            Ok(_) => {
                self.model.notify_error("No tracks found for this station");
                return;
            }
            Err(e) => {
                self.report_error(&e);
                return;
            }
        };

        let index = self.rng.random_range(0..tracks.len());
        let start = tracks[index].clone();
        self.play_track(&start, Some(tracks));
    }
}
