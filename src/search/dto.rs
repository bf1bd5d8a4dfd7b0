//! Wire types for the song search service.
//!
//! Every field is optional; the service omits fields freely depending on
//! the kind of result. Conversion into `Track` lives in `adapter`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<SearchRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub track_id: Option<u64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub artwork_url100: Option<String>,
    pub track_time_millis: Option<u64>,
    pub preview_url: Option<String>,
    pub release_date: Option<String>,
}
