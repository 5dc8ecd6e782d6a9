//! TMDB API client module.
//!
//! Fetches movie lists, movie details, genres and the image configuration
//! from TMDB v3, caching responses in memory and resolving image paths to
//! sized URLs.

mod api;
mod catalog;
mod client;
mod configuration;
#[cfg(test)]
mod fake;
mod genres;
mod images;
mod models;
mod pager;
mod response_cache;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
pub use catalog::MovieCatalog;
#[allow(clippy::module_name_repetitions)]
pub use client::{CONFIGURATION_TTL, TmdbClient, TmdbClientBuilder};
pub use configuration::ConfigurationCache;
pub use genres::{GenreMap, fetch_genres};
pub use images::{ImageConfiguration, ImageUrlFactory, LARGEST, SizeCategory, resolve_index};
pub use models::{CreditEntry, Credits, MovieDetail, MoviePage, MovieSummary};
pub use pager::{MAX_PAGE, MoviePager};
pub use response_cache::DEFAULT_TTL;
#[allow(clippy::module_name_repetitions)]
pub use types::{
    MovieListKind, TmdbCastMember, TmdbConfiguration, TmdbCredits, TmdbCrewMember, TmdbDateRange,
    TmdbErrorResponse, TmdbGenre, TmdbGenreList, TmdbImagesConfiguration, TmdbMovieDetails,
    TmdbMovieListItem, TmdbMovieListResponse,
};
