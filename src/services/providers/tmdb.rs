//! TMDB (The Movie Database) provider
//!
//! Only the top-rated listings are used:
//! - movies: /movie/top_rated → `title`, `release_date`
//! - shows:  /tv/top_rated    → `original_name`, `first_air_date`

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::CatalogKind,
    services::providers::{CatalogProvider, ProviderTitle},
};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TopRatedPage {
    results: Vec<TmdbResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    original_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    #[serde(default)]
    vote_count: i64,
}

impl TmdbResult {
    fn into_title(self, kind: CatalogKind) -> Option<ProviderTitle> {
        let (title, release_date) = match kind {
            CatalogKind::Movie => (self.title, self.release_date),
            CatalogKind::Show => (self.original_name.or(self.name), self.first_air_date),
        };

        Some(ProviderTitle {
            title: title?,
            overview: self.overview.unwrap_or_default(),
            release_date: release_date.unwrap_or_default(),
            genre_ids: self.genre_ids,
            vote_count: self.vote_count,
        })
    }
}

fn listing_path(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Movie => "movie/top_rated",
        CatalogKind::Show => "tv/top_rated",
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Internal("TMDB API key cannot be empty".to_string()));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn fetch_top_rated(&self, kind: CatalogKind, page: u32) -> AppResult<Vec<ProviderTitle>> {
        let url = format!("{}/{}", self.api_url, listing_path(kind));
        let page_param = page.to_string();

        tracing::debug!(kind = %kind, page, "Fetching top-rated listing from TMDB");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("page", page_param.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let listing: TopRatedPage = response.json().await?;
        let received = listing.results.len();
        let titles: Vec<ProviderTitle> = listing
            .results
            .into_iter()
            .filter_map(|result| result.into_title(kind))
            .collect();

        if titles.len() < received {
            tracing::warn!(
                kind = %kind,
                skipped = received - titles.len(),
                "Skipped TMDB results without a title"
            );
        }

        tracing::info!(kind = %kind, page, count = titles.len(), "Fetched TMDB listing");

        Ok(titles)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
