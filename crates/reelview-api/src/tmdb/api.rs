//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    MovieListKind, TmdbConfiguration, TmdbGenreList, TmdbMovieDetails, TmdbMovieListResponse,
};

/// TMDB API trait.
///
/// Abstracts the raw provider endpoints for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the API configuration (image base URL and size tables).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn configuration(&self) -> Result<TmdbConfiguration>;

    /// Fetches the movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_genres(&self) -> Result<TmdbGenreList>;

    /// Fetches one page of a movie list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_list(&self, kind: MovieListKind, page: u32) -> Result<TmdbMovieListResponse>;

    /// Fetches movie details with credits inlined.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails>;
}
