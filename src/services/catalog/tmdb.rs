/// TMDB catalog client
///
/// API Flow:
/// 1. Listing: /movie/popular?page=N → ids of the popular movies on that page
/// 2. Details: /movie/{id} → title and overview
///
/// Both calls carry the API key and language as query parameters. Every request is
/// bounded by the client timeout; timeouts and connection failures, whether while
/// sending or while reading the body, are retried a few times. HTTP error statuses
/// are not.
use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord, TmdbMovieDetails, TmdbPage},
    services::catalog::MovieCatalog,
};

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    max_retries: u32,
}

impl TmdbCatalog {
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        timeout: Duration,
        max_retries: u32,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            max_retries,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            config.request_timeout(),
            config.max_retries,
        )
    }

    /// Sends a GET request and reads its body, retrying transient transport failures
    ///
    /// Errors are stripped of their URL, which carries the API key.
    async fn get(
        &self,
        path: &str,
        extra_query: &[(&str, String)],
    ) -> AppResult<(StatusCode, String)> {
        let url = format!("{}{}", self.api_url, path);
        let mut attempt = 0;

        loop {
            match self.send_once(&url, extra_query).await {
                Ok(reply) => return Ok(reply),
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    let e = e.without_url();
                    tracing::warn!(
                        error = %e,
                        path = %path,
                        attempt,
                        "Transient TMDB failure, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e.without_url().into()),
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        extra_query: &[(&str, String)],
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let response = self
            .http_client
            .get(url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(extra_query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Checks the status and parses the JSON body
    fn parse<T: DeserializeOwned>((status, body): (StatusCode, String)) -> AppResult<T> {
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(response = %body, "Unparseable TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn popular_page(&self, page: u32) -> AppResult<Vec<MovieId>> {
        let response = self
            .get("/movie/popular", &[("page", page.to_string())])
            .await?;
        let page_body: TmdbPage = Self::parse(response)?;

        Ok(page_body.results.into_iter().map(|r| r.id).collect())
    }

    async fn movie_details(&self, id: MovieId) -> AppResult<MovieRecord> {
        let response = self.get(&format!("/movie/{}", id), &[]).await?;
        let details: TmdbMovieDetails = Self::parse(response)?;

        Ok(details.into())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
