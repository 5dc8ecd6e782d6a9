//! reelview - movie listings from TMDB on the command line.

/// Application configuration (TOML).
mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_KEY_ENV, AppConfig};
use reelview_api::tmdb::{
    ImageUrlFactory, LARGEST, MAX_PAGE, MovieCatalog, MovieListKind, MoviePager, MovieSummary,
    SizeCategory, TmdbClient,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List movies (upcoming, popular, top rated).
    List(ListArgs),
    /// Show a single movie with its cast.
    Detail(DetailArgs),
    /// List movie genres.
    Genres,
    /// Show the image base URL and size tables.
    ImageConfig,
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// List kind: upcoming, popular or top-rated. All three when omitted.
    #[arg(long)]
    kind: Option<MovieListKind>,

    /// First page to fetch (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
    page: u32,

    /// Number of consecutive pages to fetch.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
    pages: u32,

    /// Poster size index; negative values count from the largest (-1).
    #[arg(long, default_value_t = LARGEST, allow_negative_numbers = true)]
    size: i32,
}

/// Arguments for the `detail` subcommand.
#[derive(clap::Args)]
struct DetailArgs {
    /// TMDB movie ID (e.g. 550).
    #[arg(long, required = true)]
    id: u64,

    /// Poster and profile size index; negative values count from the largest (-1).
    #[arg(long, default_value_t = LARGEST, allow_negative_numbers = true)]
    size: i32,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Store the TMDB API key (and optionally the response language).
    SetKey(SetKeyArgs),
    /// Show the current configuration.
    Show,
}

/// Arguments for the `config set-key` subcommand.
#[derive(clap::Args)]
struct SetKeyArgs {
    /// TMDB v3 API key.
    #[arg(long, required = true)]
    api_key: String,

    /// Response language (e.g. "en-US").
    #[arg(long)]
    language: Option<String>,
}

/// Builds a movie catalog from the config file and environment.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, no API key is configured,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_catalog(dir: Option<&Path>) -> Result<MovieCatalog<TmdbClient>> {
    let config_path = AppConfig::path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;

    let mut builder = TmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(language) = config.tmdb.language {
        builder = builder.language(language);
    }
    let client = builder.build().context("failed to build TMDB client")?;

    Ok(MovieCatalog::new(client))
}

/// Formats an image URL at `size`, or `-` when there is no image.
fn image_cell(factory: Option<&ImageUrlFactory>, size: i32) -> Result<String> {
    factory.map_or_else(
        || Ok(String::from("-")),
        |f| f.url(size).map(String::from),
    )
}

/// Logs one movie as a tab-separated row.
fn log_movie(movie: &MovieSummary, size: i32) -> Result<()> {
    let genres: Vec<&str> = movie
        .genres
        .iter()
        .map(|genre| genre.as_deref().unwrap_or("?"))
        .collect();
    tracing::info!(
        "{}\t{}\t{}\t{}%\t{}\t{}",
        movie.id,
        movie.title,
        movie
            .release_date
            .map_or_else(|| String::from("-"), |d| d.to_string()),
        movie.rating_percent(),
        if genres.is_empty() {
            String::from("-")
        } else {
            genres.join(", ")
        },
        image_cell(movie.poster.as_ref(), size)?,
    );
    Ok(())
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or a page request fails.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, dir: Option<&Path>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let kinds = args.kind.map_or_else(|| MovieListKind::ALL.to_vec(), |k| vec![k]);

    for kind in kinds {
        let mut pager = MoviePager::starting_at(kind, args.page);
        for _ in 0..args.pages {
            if pager.is_exhausted() {
                break;
            }
            pager.load_next(&catalog).await?;
        }

        tracing::info!("== {} ==", kind);
        tracing::info!("ID\tTitle\tRelease\tRating\tGenres\tPoster");
        for movie in pager.items() {
            log_movie(movie, args.size)?;
        }
        tracing::info!("Total: {} movies", pager.items().len());
    }

    Ok(())
}

/// Runs the `detail` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or the request fails.
#[instrument(skip_all)]
async fn run_detail(args: &DetailArgs, dir: Option<&Path>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let detail = catalog.movie_detail(args.id).await?;

    tracing::info!("ID\tTitle\tRelease\tRating\tGenres\tPoster");
    log_movie(&detail.summary, args.size)?;
    tracing::info!(
        "Backdrop: {}",
        image_cell(detail.summary.backdrop.as_ref(), args.size)?
    );
    tracing::info!(
        "Overview: {}",
        if detail.overview.is_empty() {
            "-"
        } else {
            detail.overview.as_str()
        }
    );

    tracing::info!("Cast ({}):", detail.credits.cast.len());
    for entry in &detail.credits.cast {
        tracing::info!(
            "  {}\t{}\t{}",
            entry.id,
            entry.name,
            image_cell(entry.profile.as_ref(), args.size)?
        );
    }

    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or the request fails.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&Path>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let genres = catalog.genres().await?;

    tracing::info!("ID\tName");
    for (id, name) in genres.sorted() {
        tracing::info!("{}\t{}", id, name);
    }
    tracing::info!("Total: {} genres", genres.len());

    Ok(())
}

/// Runs the `image-config` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or the request fails.
#[instrument(skip_all)]
async fn run_image_config(dir: Option<&Path>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let config = catalog.image_configuration().await?;

    tracing::info!("Base URL: {}", config.base_url());
    for category in SizeCategory::ALL {
        tracing::info!("{}\t{}", category, config.sizes(category).join(", "));
    }

    Ok(())
}

/// Runs the `config set-key` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved.
#[instrument(skip_all)]
fn run_config_set_key(args: &SetKeyArgs, dir: Option<&Path>) -> Result<()> {
    let config_path = AppConfig::path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;

    config.tmdb.api_key = Some(args.api_key.clone());
    if args.language.is_some() {
        config.tmdb.language.clone_from(&args.language);
    }
    config.save(&config_path).context("failed to save config")?;

    tracing::info!("Saved TMDB API key to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&Path>) -> Result<()> {
    let config_path = AppConfig::path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    tracing::info!("Config file: {}", config_path.display());
    tracing::info!(
        "api_key: {}",
        if config.tmdb.api_key.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    tracing::info!(
        "language: {}",
        config.tmdb.language.as_deref().unwrap_or("(provider default)")
    );

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::List(args) => run_list(&args, dir).await,
        Commands::Detail(args) => run_detail(&args, dir).await,
        Commands::Genres => run_genres(dir).await,
        Commands::ImageConfig => run_image_config(dir).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::SetKey(args) => run_config_set_key(&args, dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
    }
}
