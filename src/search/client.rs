//! HTTP client for the public song search service

use std::time::Duration;

use super::{adapter, dto, SearchApi};
use crate::config::SearchConfig;
use crate::error::{AppError, Result};
use crate::model::Track;
use crate::{log_request, log_request_result};

const USER_AGENT: &str = concat!("music-app-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ItunesClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    async fn send_search_request(&self, term: &str, limit: u32) -> Result<dto::SearchResponse> {
        let limit = limit.to_string();
        let response = self
            .http_client
            .get(self.search_url())
            .query(&[
                ("term", term),
                ("media", "music"),
                ("entity", "song"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::NetworkFailure(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| AppError::NetworkFailure(format!("invalid response: {}", e)))
    }
}

#[async_trait::async_trait]
impl SearchApi for ItunesClient {
    async fn search(&self, term: &str, limit: u32) -> Result<Vec<Track>> {
        log_request!("search", term, limit);
        let result = self.send_search_request(term, limit).await;
        log_request_result!("search", result);
        let response = result?;
        tracing::debug!(term, result_count = response.result_count, "Search response received");
        Ok(adapter::to_tracks(response.results))
    }
}
