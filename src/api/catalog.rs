//! Catalog API client
//!
//! Fetches the movie list, details, search results, suggestion strings,
//! the curated home rows, and stream URLs. Every response deserializes
//! tolerantly into the shared [`Movie`] contract; movies are immutable
//! once fetched and re-requested on demand.

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use super::ApiError;
use crate::models::{Genre, Movie};

/// Curated catalog rows served by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Featured,
    Trending,
    Popular,
    TopRated,
}

impl Category {
    /// Endpoint path segment for this category
    pub fn path(&self) -> &'static str {
        match self {
            Category::Featured => "featured",
            Category::Trending => "trending",
            Category::Popular => "popular",
            Category::TopRated => "top-rated",
        }
    }

    /// Row heading shown in the UI
    pub fn label(&self) -> &'static str {
        match self {
            Category::Featured => "Featured",
            Category::Trending => "Trending Now",
            Category::Popular => "Popular",
            Category::TopRated => "Top Rated",
        }
    }
}

/// Catalog API client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

impl CatalogClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            token: None,
        }
    }

    /// Attach a bearer token for authenticated endpoints
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Make a GET request and deserialize the JSON body
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(ApiError::RequestFailed)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(ApiError::RequestFailed)?;
                let parsed: T = serde_json::from_str(&body)
                    .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))?;
                Ok(parsed)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound.into()),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            status => Err(ApiError::ServerError(status.as_u16()).into()),
        }
    }

    /// Fetch the full movie list
    pub async fn list(&self) -> Result<Vec<Movie>> {
        let raw: Vec<MovieRaw> = self.get("/movies/list").await?;
        Ok(raw.into_iter().map(MovieRaw::into_movie).collect())
    }

    /// Fetch a single movie by id. 404 maps to [`ApiError::NotFound`].
    pub async fn detail(&self, id: u64) -> Result<Movie> {
        let raw: MovieRaw = self.get(&format!("/movies/{}", id)).await?;
        Ok(raw.into_movie())
    }

    /// Search the catalog by title query
    pub async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let endpoint = format!("/movies/search?q={}", urlencoding::encode(query));
        let raw: Vec<MovieRaw> = self.get(&endpoint).await?;
        Ok(raw.into_iter().map(MovieRaw::into_movie).collect())
    }

    /// Fetch completion suggestions for a query prefix
    pub async fn suggestions(&self, query: &str) -> Result<Vec<String>> {
        let endpoint = format!("/movies/suggestions?q={}", urlencoding::encode(query));
        self.get(&endpoint).await
    }

    /// Fetch one of the curated home rows
    pub async fn category(&self, category: Category) -> Result<Vec<Movie>> {
        let raw: Vec<MovieRaw> = self.get(&format!("/movies/{}", category.path())).await?;
        Ok(raw.into_iter().map(MovieRaw::into_movie).collect())
    }

    /// Resolve the playable stream URL for a movie
    pub async fn stream_url(&self, id: u64) -> Result<String> {
        let response: StreamResponse = self.get(&format!("/stream/{}", id)).await?;
        Ok(response.url)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: u64,
    title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    release_date: Option<String>,
    runtime: Option<u32>,
    genres: Option<Vec<GenreRaw>>,
}

impl MovieRaw {
    fn into_movie(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average.unwrap_or(0.0),
            release_date: self.release_date.filter(|d| !d.is_empty()),
            runtime: self.runtime,
            genres: self
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    #[serde(default)]
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    url: String,
}
