//! Canonical track and playlist records

use serde::{Deserialize, Serialize};

/// A playable song with display metadata and a preview reference.
///
/// Serialized with the same field names used for liked-song and playlist
/// documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub cover: Option<String>,
    /// Display string, "M:SS"
    #[serde(default = "zero_duration")]
    pub duration: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

fn zero_duration() -> String {
    "0:00".to_string()
}

/// A public playlist document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Assigned by the document store; not part of the stored body
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub songs: Vec<Track>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Format milliseconds as "M:SS". Unknown durations render as "0:00".
pub fn format_duration(millis: Option<u64>) -> String {
    let Some(millis) = millis else {
        return zero_duration();
    };
    let total_seconds = millis / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
pub(crate) fn sample_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Song {}", id),
        artist: "Artist".to_string(),
        album: "Album".to_string(),
        cover: None,
        duration: "0:30".to_string(),
        preview_url: Some(format!("https://audio.example/{}.m4a", id)),
        release_date: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_duration_examples() {
        assert_eq!(format_duration(Some(65_000)), "1:05");
        assert_eq!(format_duration(Some(5_000)), "0:05");
        assert_eq!(format_duration(None), "0:00");
        assert_eq!(format_duration(Some(0)), "0:00");
        assert_eq!(format_duration(Some(3_600_000)), "60:00");
    }

    #[test]
    fn test_track_document_shape() {
        let json = serde_json::to_value(sample_track("42")).unwrap();
        assert_eq!(json["previewUrl"], "https://audio.example/42.m4a");
        assert!(json.get("preview_url").is_none());
        assert!(json.get("releaseDate").is_some());
    }

    #[test]
    fn test_playlist_document_ignores_unknown_fields() {
        let json = serde_json::json!({
            "title": "Lofi Beats",
            "author": "Music App",
            "songs": [{ "id": "1", "title": "A" }],
            "likes": 3
        });
        let playlist: Playlist = serde_json::from_value(json).unwrap();
        assert_eq!(playlist.title, "Lofi Beats");
        assert_eq!(playlist.songs.len(), 1);
        assert_eq!(playlist.songs[0].duration, "0:00");
    }

    proptest! {
        #[test]
        fn prop_seconds_are_zero_padded(ms in 0u64..10_000_000) {
            let s = format_duration(Some(ms));
            let (_, secs) = s.split_once(':').unwrap();
            prop_assert_eq!(secs.len(), 2);
            prop_assert!(secs.parse::<u64>().unwrap() < 60);
        }
    }
}
