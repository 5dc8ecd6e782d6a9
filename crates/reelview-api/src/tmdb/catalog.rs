//! `MovieCatalog` - movie listings and details with resolved images.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::configuration::ConfigurationCache;
use super::genres::{GenreMap, fetch_genres};
use super::images::ImageConfiguration;
use super::models::{MovieDetail, MoviePage, MovieSummary};
use super::types::MovieListKind;

/// Movie catalog over a TMDB API implementation.
///
/// Owns the image configuration cache, so one catalog fetches the
/// configuration at most once. Every operation fans its sub-requests out
/// concurrently and fails as a whole on the first error; no partial results
/// are returned. Pagination state belongs to the caller.
#[derive(Debug)]
pub struct MovieCatalog<A> {
    api: A,
    configuration: ConfigurationCache,
}

impl<A: LocalTmdbApi> MovieCatalog<A> {
    /// Creates a catalog with an empty configuration cache.
    pub fn new(api: A) -> Self {
        Self {
            api,
            configuration: ConfigurationCache::new(),
        }
    }

    /// Underlying API.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Returns the image configuration, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fetch fails.
    pub async fn image_configuration(&self) -> Result<Arc<ImageConfiguration>> {
        self.configuration.get_or_fetch(&self.api).await
    }

    /// Returns the image configuration if it has already been fetched.
    #[must_use]
    pub fn cached_image_configuration(&self) -> Option<Arc<ImageConfiguration>> {
        self.configuration.cached()
    }

    /// Fetches the movie genre map.
    ///
    /// # Errors
    ///
    /// Returns an error if the genre fetch fails.
    pub async fn genres(&self) -> Result<GenreMap> {
        fetch_genres(&self.api).await
    }

    /// Fetches one page (1-based) of a movie list.
    ///
    /// Configuration, genres and the page itself are requested concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if `page` is 0 or any of the three requests fails.
    pub async fn list_movies(&self, kind: MovieListKind, page: u32) -> Result<Vec<MovieSummary>> {
        self.list_movies_page(kind, page)
            .await
            .map(|listing| listing.movies)
    }

    /// Same as [`Self::list_movies`], keeping the provider's page total.
    ///
    /// # Errors
    ///
    /// Returns an error if `page` is 0 or any of the three requests fails.
    #[instrument(skip(self))]
    pub async fn list_movies_page(&self, kind: MovieListKind, page: u32) -> Result<MoviePage> {
        if page == 0 {
            bail!("page must be 1 or greater");
        }

        let (config, genres, listing) = tokio::try_join!(
            self.configuration.get_or_fetch(&self.api),
            fetch_genres(&self.api),
            async {
                self.api
                    .movie_list(kind, page)
                    .await
                    .with_context(|| format!("failed to fetch {kind} movies (page {page})"))
            },
        )?;

        let movies: Vec<MovieSummary> = listing
            .results
            .into_iter()
            .map(|item| MovieSummary::from_list_item(item, &genres, &config))
            .collect();

        tracing::debug!(
            count = movies.len(),
            total_pages = listing.total_pages,
            "movie list page loaded"
        );

        Ok(MoviePage {
            page,
            total_pages: listing.total_pages,
            movies,
        })
    }

    /// Fetches a single movie with credits.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or detail request fails.
    #[instrument(skip(self))]
    pub async fn movie_detail(&self, movie_id: u64) -> Result<MovieDetail> {
        let (config, details) = tokio::try_join!(
            self.configuration.get_or_fetch(&self.api),
            async {
                self.api
                    .movie_details(movie_id)
                    .await
                    .with_context(|| format!("failed to fetch movie {movie_id}"))
            },
        )?;

        Ok(MovieDetail::from_details(details, &config))
    }
}
