//! In-process `LocalTmdbApi` for unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use anyhow::{Result, bail};
use tokio::sync::Barrier;

use super::api::LocalTmdbApi;
use super::images::{ImageConfiguration, sample_images};
use super::types::{
    MovieListKind, TmdbCastMember, TmdbConfiguration, TmdbCredits, TmdbGenre, TmdbGenreList,
    TmdbMovieDetails, TmdbMovieListItem, TmdbMovieListResponse,
};

/// Base URL of the sample image configuration.
pub const SAMPLE_IMAGE_BASE: &str = "https://image.example/";

/// Fake API serving canned pages with per-endpoint call counters and
/// switchable failures.
///
/// With a gate set, every call waits until the gate's party count of calls
/// are in flight at once.
pub struct FakeTmdbApi {
    pub pages: HashMap<(MovieListKind, u32), Vec<TmdbMovieListItem>>,
    pub gate: Option<Barrier>,
    pub stall_configuration: AtomicBool,
    pub configuration_calls: AtomicU32,
    pub genre_calls: AtomicU32,
    pub list_calls: AtomicU32,
    pub detail_calls: AtomicU32,
    pub fail_configuration: AtomicBool,
    pub fail_genres: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_details: AtomicBool,
}

impl FakeTmdbApi {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            gate: None,
            stall_configuration: AtomicBool::new(false),
            configuration_calls: AtomicU32::new(0),
            genre_calls: AtomicU32::new(0),
            list_calls: AtomicU32::new(0),
            detail_calls: AtomicU32::new(0),
            fail_configuration: AtomicBool::new(false),
            fail_genres: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            fail_details: AtomicBool::new(false),
        }
    }

    pub fn with_page(
        mut self,
        kind: MovieListKind,
        page: u32,
        items: Vec<TmdbMovieListItem>,
    ) -> Self {
        self.pages.insert((kind, page), items);
        self
    }

    pub fn with_gate(mut self, parties: usize) -> Self {
        self.gate = Some(Barrier::new(parties));
        self
    }

    async fn enter(&self) {
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        tokio::task::yield_now().await;
    }

    /// Highest registered page of `kind`, reported as the page total.
    fn total_pages(&self, kind: MovieListKind) -> u32 {
        self.pages
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, page)| *page)
            .max()
            .unwrap_or(0)
    }
}

impl LocalTmdbApi for FakeTmdbApi {
    async fn configuration(&self) -> Result<TmdbConfiguration> {
        self.configuration_calls.fetch_add(1, Ordering::SeqCst);
        if self.stall_configuration.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.enter().await;
        if self.fail_configuration.load(Ordering::SeqCst) {
            bail!("configuration unavailable");
        }
        Ok(TmdbConfiguration {
            images: sample_images(SAMPLE_IMAGE_BASE),
            change_keys: vec![],
        })
    }

    async fn movie_genres(&self) -> Result<TmdbGenreList> {
        self.genre_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await;
        if self.fail_genres.load(Ordering::SeqCst) {
            bail!("genres unavailable");
        }
        Ok(TmdbGenreList {
            genres: vec![
                TmdbGenre {
                    id: 18,
                    name: String::from("Drama"),
                },
                TmdbGenre {
                    id: 28,
                    name: String::from("Action"),
                },
            ],
        })
    }

    async fn movie_list(&self, kind: MovieListKind, page: u32) -> Result<TmdbMovieListResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await;
        if self.fail_list.load(Ordering::SeqCst) {
            bail!("list unavailable");
        }
        let results = self.pages.get(&(kind, page)).cloned().unwrap_or_default();
        #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
        let total_results = results.len() as u32;
        Ok(TmdbMovieListResponse {
            page,
            results,
            total_pages: self.total_pages(kind),
            total_results,
            dates: None,
        })
    }

    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await;
        if self.fail_details.load(Ordering::SeqCst) {
            bail!("details unavailable");
        }
        Ok(movie_details(movie_id))
    }
}

/// Validated sample image configuration.
#[allow(clippy::unwrap_used)]
pub fn sample_config() -> Arc<ImageConfiguration> {
    Arc::new(ImageConfiguration::try_from(sample_images(SAMPLE_IMAGE_BASE)).unwrap())
}

/// List item with a poster and no backdrop.
pub fn list_item(id: u64, genre_ids: &[u32]) -> TmdbMovieListItem {
    TmdbMovieListItem {
        id,
        title: format!("Movie {id}"),
        original_title: None,
        original_language: Some(String::from("en")),
        release_date: Some(String::from("2024-06-11")),
        overview: None,
        popularity: 10.0,
        vote_average: 7.5,
        vote_count: 100,
        genre_ids: genre_ids.to_vec(),
        adult: false,
        poster_path: Some(format!("/poster-{id}.jpg")),
        backdrop_path: None,
    }
}

/// Cast credit.
pub fn cast_member(id: u64, name: &str, profile_path: Option<&str>) -> TmdbCastMember {
    TmdbCastMember {
        id,
        name: String::from(name),
        character: None,
        order: None,
        profile_path: profile_path.map(String::from),
    }
}

/// Movie details with one genre and two cast members.
pub fn movie_details(id: u64) -> TmdbMovieDetails {
    TmdbMovieDetails {
        id,
        title: format!("Movie {id}"),
        original_title: None,
        overview: Some(String::from("An overview.")),
        tagline: None,
        release_date: Some(String::from("1999-10-15")),
        runtime: Some(139),
        status: Some(String::from("Released")),
        popularity: 61.4,
        vote_average: 8.4,
        vote_count: 26_280,
        genres: vec![TmdbGenre {
            id: 18,
            name: String::from("Drama"),
        }],
        poster_path: Some(String::from("/poster.jpg")),
        backdrop_path: Some(String::from("/backdrop.jpg")),
        credits: TmdbCredits {
            cast: vec![
                cast_member(819, "Edward Norton", Some("/norton.jpg")),
                cast_member(287, "Brad Pitt", None),
            ],
            crew: vec![],
        },
    }
}
