//! Process-lifetime image configuration cache.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::OnceCell;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::images::ImageConfiguration;

/// Memoized image configuration.
///
/// The first successful fetch is kept for the lifetime of the cache.
/// Concurrent first callers wait on a single fetch. A failed fetch leaves
/// the cache empty, so the next caller fetches again.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct ConfigurationCache {
    cell: OnceCell<Arc<ImageConfiguration>>,
}

impl ConfigurationCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached configuration, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or the configuration is invalid.
    #[instrument(skip_all)]
    pub async fn get_or_fetch(&self, api: &impl LocalTmdbApi) -> Result<Arc<ImageConfiguration>> {
        let config = self
            .cell
            .get_or_try_init(|| async {
                tracing::debug!("fetching image configuration");
                let response = api
                    .configuration()
                    .await
                    .context("failed to fetch TMDB configuration")?;
                let images = ImageConfiguration::try_from(response.images)
                    .context("invalid TMDB image configuration")?;
                tracing::info!(base_url = %images.base_url(), "image configuration loaded");
                Ok::<_, anyhow::Error>(Arc::new(images))
            })
            .await?;
        Ok(Arc::clone(config))
    }

    /// Returns the configuration if it has already been fetched.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<ImageConfiguration>> {
        self.cell.get().map(Arc::clone)
    }
}
