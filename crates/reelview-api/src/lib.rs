//! API client library for reelview.
//!
//! Provides a cached TMDB API client and the movie catalog built on it.

/// TMDB API client.
pub mod tmdb;
