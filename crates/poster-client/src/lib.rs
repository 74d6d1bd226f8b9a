//! Poster client for the TMDB movie metadata API.
//!
//! This crate resolves a catalog id to a poster image URL:
//! - `GET {api_url}/movie/{id}?api_key=...&language=en-US`
//! - read the optional `poster_path` field of the JSON body
//! - prefix it with the fixed image base
//!
//! Poster art is decoration. Every failure (network, HTTP status, bad JSON,
//! missing field) degrades to an empty URL instead of an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const LANGUAGE: &str = "en-US";

/// Errors that can occur while looking up a poster
///
/// These never leave `poster_url`; they exist so failures can be logged
/// with their cause.
#[derive(Error, Debug)]
pub enum PosterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Poster service returned status {0}")]
    Status(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, PosterError>;

/// Anything that can turn a catalog id into a poster URL.
///
/// Returns `""` when there is no poster to show.
#[async_trait]
pub trait PosterSource: Send + Sync {
    async fn poster_url(&self, movie_id: &str) -> String;
}

/// Poster source used when no API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosters;

#[async_trait]
impl PosterSource for NoPosters {
    async fn poster_url(&self, _movie_id: &str) -> String {
        String::new()
    }
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

/// Client for the TMDB movie endpoint.
#[derive(Clone)]
pub struct PosterClient {
    http_client: reqwest::Client,
    api_key: String,
    api_url: String,
    image_base: String,
}

impl PosterClient {
    /// Create a client for the public TMDB API.
    ///
    /// Without a `timeout`, reqwest's default (none) applies.
    pub fn new(api_key: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
        })
    }

    /// Point the client at a different API root (e.g. a local stand-in)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into();
        self
    }

    fn movie_url(&self, movie_id: &str) -> String {
        format!("{}/movie/{}", self.api_url, urlencoding::encode(movie_id.trim()))
    }

    fn image_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base, poster_path)
    }

    /// Look up the poster, surfacing failures.
    ///
    /// `Ok(None)` means the movie exists but has no poster.
    pub async fn try_poster_url(&self, movie_id: &str) -> Result<Option<String>> {
        let response = self
            .http_client
            .get(self.movie_url(movie_id))
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PosterError::Status(response.status()));
        }

        let details: MovieDetails = response.json().await?;
        Ok(details
            .poster_path
            .filter(|path| !path.is_empty())
            .map(|path| self.image_url(&path)))
    }
}

#[async_trait]
impl PosterSource for PosterClient {
    async fn poster_url(&self, movie_id: &str) -> String {
        match self.try_poster_url(movie_id).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!(movie_id, "No poster_path for movie");
                String::new()
            }
            Err(e) => {
                warn!(movie_id, error = %e, "Poster lookup failed");
                String::new()
            }
        }
    }
}
