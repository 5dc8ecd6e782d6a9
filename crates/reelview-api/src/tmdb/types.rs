//! TMDB API response types and request parameters.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::Deserialize;

// --- Configuration ---

/// Response from `configuration` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfiguration {
    /// Image hosting configuration.
    pub images: TmdbImagesConfiguration,
    /// Keys whose change marks a cached entity as stale.
    #[serde(default)]
    pub change_keys: Vec<String>,
}

/// The `images` section of the configuration response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbImagesConfiguration {
    /// Plain HTTP image base URL.
    #[serde(default)]
    pub base_url: String,
    /// HTTPS image base URL.
    pub secure_base_url: String,
    /// Backdrop size descriptors, smallest first.
    pub backdrop_sizes: Vec<String>,
    /// Logo size descriptors, smallest first.
    pub logo_sizes: Vec<String>,
    /// Poster size descriptors, smallest first.
    pub poster_sizes: Vec<String>,
    /// Profile size descriptors, smallest first.
    pub profile_sizes: Vec<String>,
    /// Still size descriptors, smallest first.
    pub still_sizes: Vec<String>,
}

// --- Genres ---

/// Response from `genre/movie/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    /// All movie genres.
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Movie lists ---

/// Response from `movie/{upcoming,popular,top_rated}` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieListResponse {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<TmdbMovieListItem>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
    /// Release window (only sent by `movie/upcoming`).
    #[serde(default)]
    pub dates: Option<TmdbDateRange>,
}

/// Release window attached to the upcoming list.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDateRange {
    /// Latest release date (YYYY-MM-DD).
    pub maximum: String,
    /// Earliest release date (YYYY-MM-DD).
    pub minimum: String,
}

/// A single movie within a list page.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieListItem {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

// --- Movie details ---

/// Response from `movie/{movie_id}?append_to_response=credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Status (e.g., "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Named genres.
    pub genres: Vec<TmdbGenre>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Inlined credits sub-resource.
    pub credits: TmdbCredits,
}

/// Credits sub-resource.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    /// Cast members in billing order.
    pub cast: Vec<TmdbCastMember>,
    /// Crew members.
    pub crew: Vec<TmdbCrewMember>,
}

/// A cast credit.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: Option<u32>,
    /// Profile image path.
    pub profile_path: Option<String>,
}

/// A crew credit.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g., "Director").
    #[serde(default)]
    pub job: Option<String>,
    /// Department (e.g., "Directing").
    #[serde(default)]
    pub department: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- List kinds ---

/// Fixed catalog partitions served by `movie/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieListKind {
    /// Movies releasing soon.
    Upcoming,
    /// Currently popular movies.
    Popular,
    /// Highest rated movies.
    TopRated,
}

impl MovieListKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Upcoming, Self::Popular, Self::TopRated];

    /// Path segment used by the provider.
    #[must_use]
    pub const fn as_path_segment(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
        }
    }
}

impl fmt::Display for MovieListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path_segment())
    }
}

impl FromStr for MovieListKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "popular" => Ok(Self::Popular),
            "top_rated" | "top-rated" => Ok(Self::TopRated),
            other => bail!("unknown movie list kind: {other}"),
        }
    }
}
