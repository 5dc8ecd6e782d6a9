//! `TmdbClient` - TMDB API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::images::ImageConfiguration;
use super::response_cache::{DEFAULT_TTL, ResponseCache};
use super::types::{
    MovieListKind, TmdbConfiguration, TmdbErrorResponse, TmdbGenreList, TmdbMovieDetails,
    TmdbMovieListResponse,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Cache lifetime of the `configuration` response.
pub const CONFIGURATION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// TMDB API client.
///
/// Every request carries the API key as the `api_key` query parameter.
/// Successful response bodies are cached per request signature.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key (v3 auth).
    api_key: String,
    /// Response language sent with every request, if any.
    language: Option<String>,
    /// Lifetime of cached responses unless overridden per endpoint.
    default_ttl: Duration,
    /// Response cache.
    cache: ResponseCache,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    default_ttl: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            language: None,
            default_ttl: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (e.g. "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the default response cache lifetime (default: 1h, zero disables).
    #[must_use]
    pub const fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
            language: self.language,
            default_ttl: self.default_ttl.unwrap_or(DEFAULT_TTL),
            cache: ResponseCache::new(),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the request query with the shared parameters appended.
    fn with_common_query<'a>(&self, query: &[(&'a str, String)]) -> Vec<(&'a str, String)> {
        let mut full = query.to_vec();
        if let Some(ref language) = self.language {
            full.push(("language", language.clone()));
        }
        full
    }

    /// Sends a GET request through the response cache and decodes the JSON body.
    ///
    /// A fetched body is cached only after it decodes and `accept` approves
    /// the decoded value.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        ttl: Duration,
        accept: fn(&T) -> Result<()>,
    ) -> Result<T> {
        let query = self.with_common_query(query);
        let key = ResponseCache::cache_key(path, &query);

        if let Some(body) = self.cache.get(&key).await {
            tracing::debug!(cache_hit = true, "TMDB API lookup");
            return decode_json(path, &body);
        }
        tracing::debug!(cache_hit = false, "TMDB API lookup");

        let mut decoded: Option<T> = None;
        let body = self
            .cache
            .get_or_try_insert(key, ttl, async {
                let body = self.fetch_body(path, &query).await?;
                let value = decode_json(path, &body)?;
                accept(&value)?;
                decoded = Some(value);
                Ok(body)
            })
            .await?;
        tracing::trace!(entries = self.cache.entry_count(), "response cache size");

        // A concurrent caller may have fetched the body, leaving `decoded` empty.
        match decoded {
            Some(value) => Ok(value),
            None => decode_json(path, &body),
        }
    }

    /// Performs the HTTP request. Non-2xx responses are errors.
    ///
    /// Transport errors are stripped of their URL, which carries the API key.
    async fn fetch_body(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .build()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(path = path, query = ?query, "TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to read response body: {path}"))
    }
}

/// Decodes a JSON response body.
fn decode_json<T: serde::de::DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).with_context(|| format!("failed to decode JSON response: {path}"))
}

/// Accepts any decoded value.
const fn accept_any<T>(_value: &T) -> Result<()> {
    Ok(())
}

/// Accepts a configuration only if its image section is usable.
fn accept_configuration(config: &TmdbConfiguration) -> Result<()> {
    ImageConfiguration::try_from(config.images.clone())
        .map(drop)
        .context("invalid TMDB image configuration")
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn configuration(&self) -> Result<TmdbConfiguration> {
        self.get_json("configuration", &[], CONFIGURATION_TTL, accept_configuration)
            .await
    }

    #[instrument(skip_all)]
    async fn movie_genres(&self) -> Result<TmdbGenreList> {
        self.get_json("genre/movie/list", &[], self.default_ttl, accept_any)
            .await
    }

    #[instrument(skip_all, fields(kind = %kind, page = page))]
    async fn movie_list(&self, kind: MovieListKind, page: u32) -> Result<TmdbMovieListResponse> {
        let path = format!("movie/{}", kind.as_path_segment());
        let query = [("page", page.to_string())];
        self.get_json(&path, &query, self.default_ttl, accept_any)
            .await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails> {
        let path = format!("movie/{movie_id}");
        let query = [("append_to_response", String::from("credits"))];
        self.get_json(&path, &query, self.default_ttl, accept_any)
            .await
    }
}
