//! Domain records built from raw TMDB responses.

use std::sync::Arc;

use chrono::NaiveDate;

use super::genres::GenreMap;
use super::images::{ImageConfiguration, ImageUrlFactory, SizeCategory};
use super::types::{TmdbCastMember, TmdbMovieDetails, TmdbMovieListItem};

/// A movie as shown in a list.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Release date, `None` when missing or unparsable.
    pub release_date: Option<NaiveDate>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Genre names in provider order. An ID the genre map does not know stays
    /// in place as `None`.
    pub genres: Vec<Option<String>>,
    /// Poster URL builder, `None` when the movie has no poster.
    pub poster: Option<ImageUrlFactory>,
    /// Backdrop URL builder, `None` when the movie has no backdrop.
    pub backdrop: Option<ImageUrlFactory>,
}

impl MovieSummary {
    /// Builds a summary from a list item, resolving genre IDs through `genres`.
    #[must_use]
    pub fn from_list_item(
        item: TmdbMovieListItem,
        genres: &GenreMap,
        config: &Arc<ImageConfiguration>,
    ) -> Self {
        Self {
            id: item.id,
            genres: genres.names_for(&item.genre_ids),
            release_date: parse_release_date(item.release_date.as_deref()),
            poster: image_factory(config, SizeCategory::Poster, item.poster_path),
            backdrop: image_factory(config, SizeCategory::Backdrop, item.backdrop_path),
            title: item.title,
            popularity: item.popularity,
            vote_average: item.vote_average,
        }
    }

    /// Vote average as a rounded percentage (e.g. 8.43 -> 84).
    #[must_use]
    #[allow(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn rating_percent(&self) -> u8 {
        (self.vote_average.clamp(0.0, 10.0) * 10.0).round() as u8
    }
}

/// One page of a movie list.
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    /// Page number (1-based).
    pub page: u32,
    /// Number of pages the provider reports for the list.
    pub total_pages: u32,
    /// Movies on this page.
    pub movies: Vec<MovieSummary>,
}

impl MoviePage {
    /// Returns `true` if the provider has no page after this one.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// A single movie with overview and credits.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    /// Fields shared with list entries.
    pub summary: MovieSummary,
    /// Overview text (empty when the provider has none).
    pub overview: String,
    /// Cast and crew.
    pub credits: Credits,
}

impl MovieDetail {
    /// Builds a detail record. Genres arrive already named.
    ///
    /// `crew` is populated from the provider's cast list, same as `cast`.
    #[must_use]
    pub fn from_details(details: TmdbMovieDetails, config: &Arc<ImageConfiguration>) -> Self {
        let cast: Vec<CreditEntry> = details
            .credits
            .cast
            .iter()
            .map(|member| CreditEntry::from_cast(member, config))
            .collect();
        let crew = cast.clone();

        let summary = MovieSummary {
            id: details.id,
            title: details.title,
            release_date: parse_release_date(details.release_date.as_deref()),
            popularity: details.popularity,
            vote_average: details.vote_average,
            genres: details
                .genres
                .into_iter()
                .map(|genre| Some(genre.name))
                .collect(),
            poster: image_factory(config, SizeCategory::Poster, details.poster_path),
            backdrop: image_factory(config, SizeCategory::Backdrop, details.backdrop_path),
        };

        Self {
            summary,
            overview: details.overview.unwrap_or_default(),
            credits: Credits { cast, crew },
        }
    }
}

/// Cast and crew of a movie.
#[derive(Debug, Clone, PartialEq)]
pub struct Credits {
    /// Cast in billing order.
    pub cast: Vec<CreditEntry>,
    /// Crew. Currently mirrors `cast`.
    pub crew: Vec<CreditEntry>,
}

/// A credited person.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditEntry {
    /// TMDB person ID.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Profile picture URL builder, `None` when the person has no picture.
    pub profile: Option<ImageUrlFactory>,
}

impl CreditEntry {
    /// Builds an entry from a cast credit.
    #[must_use]
    pub fn from_cast(member: &TmdbCastMember, config: &Arc<ImageConfiguration>) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            profile: image_factory(config, SizeCategory::Profile, member.profile_path.clone()),
        }
    }
}

fn image_factory(
    config: &Arc<ImageConfiguration>,
    category: SizeCategory,
    path: Option<String>,
) -> Option<ImageUrlFactory> {
    path.filter(|p| !p.is_empty())
        .map(|p| config.url_factory(category, p))
}

fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
