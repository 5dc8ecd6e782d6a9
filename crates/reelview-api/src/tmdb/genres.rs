//! Movie genre lookup.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::types::TmdbGenreList;

/// Mapping from genre ID to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreMap(HashMap<u32, String>);

impl GenreMap {
    /// Looks up a genre name.
    #[must_use]
    pub fn name(&self, id: u32) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Resolves IDs to names in order. Unknown IDs stay in place as `None`.
    #[must_use]
    pub fn names_for(&self, ids: &[u32]) -> Vec<Option<String>> {
        ids.iter()
            .map(|id| self.name(*id).map(String::from))
            .collect()
    }

    /// Number of genres.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no genres are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Genres sorted by ID.
    #[must_use]
    pub fn sorted(&self) -> Vec<(u32, &str)> {
        let mut entries: Vec<(u32, &str)> = self
            .0
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }
}

impl FromIterator<(u32, String)> for GenreMap {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Later entries win when the provider repeats an ID.
impl From<TmdbGenreList> for GenreMap {
    fn from(list: TmdbGenreList) -> Self {
        list.genres
            .into_iter()
            .map(|genre| (genre.id, genre.name))
            .collect()
    }
}

/// Fetches the movie genre map. Each call issues one API request.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
pub async fn fetch_genres(api: &impl LocalTmdbApi) -> Result<GenreMap> {
    let list = api
        .movie_genres()
        .await
        .context("failed to fetch movie genres")?;
    let genres = GenreMap::from(list);
    tracing::debug!(count = genres.len(), "movie genres loaded");
    Ok(genres)
}
