//! Catalog search against the iTunes Search API
//!
//! - `dto`: Wire records as returned by the service
//! - `adapter`: Conversion into `Track`s
//! - `client`: The HTTP client

mod adapter;
mod client;
mod dto;

pub use client::ItunesClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Track;

/// Song search used for trending, the search tab and radio stations
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, term: &str, limit: u32) -> Result<Vec<Track>>;
}
