//! Image size resolution and URL construction.
//!
//! TMDB serves every image at a fixed set of sizes per category. Callers pick a
//! size by logical index into that list: `0` is the smallest, `-1` the largest,
//! `-2` the second largest and so on. Out-of-range indices saturate to the
//! nearest valid size instead of failing.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use url::Url;

use super::types::TmdbImagesConfiguration;

/// Size index selecting the largest available size.
pub const LARGEST: i32 = -1;

/// Image categories with their own size lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeCategory {
    /// Movie posters.
    Poster,
    /// Backdrops.
    Backdrop,
    /// Company logos.
    Logo,
    /// Person profile pictures.
    Profile,
    /// Episode stills.
    Still,
}

impl SizeCategory {
    /// All categories.
    pub const ALL: [Self; 5] = [
        Self::Poster,
        Self::Backdrop,
        Self::Logo,
        Self::Profile,
        Self::Still,
    ];

    /// Field name of this category's size list in the configuration response.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Poster => "poster_sizes",
            Self::Backdrop => "backdrop_sizes",
            Self::Logo => "logo_sizes",
            Self::Profile => "profile_sizes",
            Self::Still => "still_sizes",
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Translates a logical size index into a position within a list of `len`.
///
/// Negative indices count from the end. The translated position is clamped
/// into `[0, len - 1]`. Returns `None` only when `len` is zero.
#[must_use]
pub fn resolve_index(len: usize, index: i32) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let position = if index < 0 {
        let from_end = usize::try_from(index.unsigned_abs()).unwrap_or(usize::MAX);
        len.saturating_sub(from_end)
    } else {
        usize::try_from(index).unwrap_or(usize::MAX)
    };
    Some(position.min(last))
}

/// Validated image configuration.
///
/// Every size list holds at least one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfiguration {
    /// Base URL all image URLs are built on.
    base_url: Url,
    poster_sizes: Vec<String>,
    backdrop_sizes: Vec<String>,
    logo_sizes: Vec<String>,
    profile_sizes: Vec<String>,
    still_sizes: Vec<String>,
}

impl TryFrom<TmdbImagesConfiguration> for ImageConfiguration {
    type Error = anyhow::Error;

    fn try_from(raw: TmdbImagesConfiguration) -> Result<Self> {
        let base_url = Url::parse(&raw.secure_base_url)
            .with_context(|| format!("invalid image base URL: {}", raw.secure_base_url))?;

        let config = Self {
            base_url,
            poster_sizes: raw.poster_sizes,
            backdrop_sizes: raw.backdrop_sizes,
            logo_sizes: raw.logo_sizes,
            profile_sizes: raw.profile_sizes,
            still_sizes: raw.still_sizes,
        };

        for category in SizeCategory::ALL {
            if config.sizes(category).is_empty() {
                bail!("image configuration has no {category}");
            }
        }

        Ok(config)
    }
}

impl ImageConfiguration {
    /// Base URL all image URLs are built on.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Size descriptors of a category, smallest first.
    #[must_use]
    pub fn sizes(&self, category: SizeCategory) -> &[String] {
        match category {
            SizeCategory::Poster => &self.poster_sizes,
            SizeCategory::Backdrop => &self.backdrop_sizes,
            SizeCategory::Logo => &self.logo_sizes,
            SizeCategory::Profile => &self.profile_sizes,
            SizeCategory::Still => &self.still_sizes,
        }
    }

    /// Resolves a size index into a size descriptor (e.g. `"w185"`).
    #[must_use]
    pub fn resolve_size(&self, category: SizeCategory, index: i32) -> Option<&str> {
        let sizes = self.sizes(category);
        let position = resolve_index(sizes.len(), index)?;
        sizes.get(position).map(String::as_str)
    }

    /// Builds the URL of an image at the given size index.
    ///
    /// # Errors
    ///
    /// Returns an error if the category has no sizes or the joined URL is invalid.
    pub fn resolve_url(&self, category: SizeCategory, path: &str, index: i32) -> Result<Url> {
        let size = self
            .resolve_size(category, index)
            .with_context(|| format!("no {category} configured"))?;
        let relative = format!("{size}{path}");
        self.base_url
            .join(&relative)
            .with_context(|| format!("failed to build image URL: {relative}"))
    }

    /// Binds a category and image path into a deferred URL builder.
    #[must_use]
    pub fn url_factory(
        self: &Arc<Self>,
        category: SizeCategory,
        path: impl Into<String>,
    ) -> ImageUrlFactory {
        ImageUrlFactory {
            config: Arc::clone(self),
            category,
            path: path.into(),
        }
    }
}

/// Deferred image URL builder.
///
/// Holds the configuration in effect when it was created; picking a size
/// never performs I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlFactory {
    config: Arc<ImageConfiguration>,
    category: SizeCategory,
    path: String,
}

impl ImageUrlFactory {
    /// Builds the URL at the given size index.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn url(&self, index: i32) -> Result<Url> {
        self.config.resolve_url(self.category, &self.path, index)
    }

    /// Builds the URL of the largest available size.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn largest(&self) -> Result<Url> {
        self.url(LARGEST)
    }

    /// Image category.
    #[must_use]
    pub const fn category(&self) -> SizeCategory {
        self.category
    }

    /// Raw image path as sent by the provider.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
pub(crate) fn sample_images(base_url: &str) -> TmdbImagesConfiguration {
    let sizes = |list: &[&str]| list.iter().map(|s| String::from(*s)).collect::<Vec<_>>();
    TmdbImagesConfiguration {
        base_url: String::from(base_url),
        secure_base_url: String::from(base_url),
        backdrop_sizes: sizes(&["w300", "w780", "w1280", "original"]),
        logo_sizes: sizes(&["w45", "w92", "original"]),
        poster_sizes: sizes(&["w92", "w154", "w185", "original"]),
        profile_sizes: sizes(&["w45", "w185", "h632", "original"]),
        still_sizes: sizes(&["w92", "original"]),
    }
}
