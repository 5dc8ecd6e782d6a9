//! Caller-side pagination over movie lists.

use std::collections::HashSet;

use anyhow::Result;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::catalog::MovieCatalog;
use super::models::MovieSummary;
use super::types::MovieListKind;

/// Highest page number TMDB serves for list endpoints.
pub const MAX_PAGE: u32 = 500;

/// Accumulates pages of one movie list, one page per `load_next` call.
///
/// Movies already seen on an earlier page are skipped, since list ordering
/// can shift between requests. The pager is exhausted after an empty page,
/// after the provider's last page, or once `MAX_PAGE` has been loaded.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MoviePager {
    kind: MovieListKind,
    next_page: u32,
    items: Vec<MovieSummary>,
    seen: HashSet<u64>,
    exhausted: bool,
}

impl MoviePager {
    /// Creates a pager starting at page 1.
    #[must_use]
    pub fn new(kind: MovieListKind) -> Self {
        Self::starting_at(kind, 1)
    }

    /// Creates a pager starting at `page` (0 is treated as 1).
    #[must_use]
    pub fn starting_at(kind: MovieListKind, page: u32) -> Self {
        Self {
            kind,
            next_page: page.max(1),
            items: Vec::new(),
            seen: HashSet::new(),
            exhausted: false,
        }
    }

    /// Loads the next page and returns the number of movies added.
    ///
    /// Returns `Ok(0)` without a request once the pager is exhausted.
    /// A failed request leaves the pager unchanged, so the call can be repeated.
    ///
    /// # Errors
    ///
    /// Returns an error if the page request fails.
    #[instrument(skip_all, fields(kind = %self.kind, page = self.next_page))]
    pub async fn load_next<A: LocalTmdbApi>(&mut self, catalog: &MovieCatalog<A>) -> Result<usize> {
        if self.is_exhausted() {
            return Ok(0);
        }

        let page = self.next_page;
        let listing = catalog.list_movies_page(self.kind, page).await?;
        let last = listing.is_last();
        let movies = listing.movies;

        if movies.is_empty() {
            tracing::debug!(page = page, "empty page, list exhausted");
            self.exhausted = true;
            return Ok(0);
        }

        let fetched = movies.len();
        let before = self.items.len();
        for movie in movies {
            if self.seen.insert(movie.id) {
                self.items.push(movie);
            }
        }
        let added = self.items.len().saturating_sub(before);

        let skipped = fetched.saturating_sub(added);
        if skipped > 0 {
            tracing::debug!(page = page, skipped = skipped, "duplicates removed");
        }

        match page.checked_add(1) {
            Some(next) if next <= MAX_PAGE => self.next_page = next,
            _ => self.exhausted = true,
        }
        if last {
            tracing::debug!(page = page, "last page reached");
            self.exhausted = true;
        }

        Ok(added)
    }

    /// Movie list being paged.
    #[must_use]
    pub const fn kind(&self) -> MovieListKind {
        self.kind
    }

    /// Page the next `load_next` call requests.
    #[must_use]
    pub const fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Returns `true` once no further pages will be requested.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted || self.next_page > MAX_PAGE
    }

    /// Movies accumulated so far.
    #[must_use]
    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    /// Consumes the pager, returning the accumulated movies.
    #[must_use]
    pub fn into_items(self) -> Vec<MovieSummary> {
        self.items
    }
}
