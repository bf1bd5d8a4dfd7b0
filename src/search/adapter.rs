//! Converts search records into canonical `Track`s.
//!
//! This is the only place that knows the service's field names; nothing
//! untyped travels past it.

use super::dto::SearchRecord;
use crate::model::{format_duration, Track};

const SMALL_ARTWORK: &str = "100x100";
const LARGE_ARTWORK: &str = "600x600";

/// Swap the 100px artwork variant for the 600px one.
pub fn upgrade_artwork(url: &str) -> String {
    url.replace(SMALL_ARTWORK, LARGE_ARTWORK)
}

/// Build a `Track` from one record. Records without a track id are dropped.
pub fn to_track(record: SearchRecord) -> Option<Track> {
    let Some(track_id) = record.track_id else {
        tracing::debug!(title = ?record.track_name, "Dropping search record without track id");
        return None;
    };

    Some(Track {
        id: track_id.to_string(),
        title: record.track_name.unwrap_or_default(),
        artist: record.artist_name.unwrap_or_default(),
        album: record.collection_name.unwrap_or_default(),
        cover: record.artwork_url100.as_deref().map(upgrade_artwork),
        duration: format_duration(record.track_time_millis),
        preview_url: record.preview_url,
        release_date: record.release_date,
    })
}

pub fn to_tracks(records: Vec<SearchRecord>) -> Vec<Track> {
    records.into_iter().filter_map(to_track).collect()
}
