use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use trailhead_core::trails::cache::{MemoryStore, OfflineCache};
use trailhead_core::trails::models::{ActiveFilters, Coordinate, TrailRecord, TrailType};
use trailhead_core::trails::network::{FixedConnectivity, KeyValueStore};
use trailhead_core::trails::overpass::{process, OverpassResponse};
use trailhead_core::trails::spatial::dedupe_similar;
use trailhead_core::{FetchConfig, SqliteStore, TrailFetcher, TrailSource};

mod output;

use output::{write_trails, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "trail-fetch",
    author,
    version,
    about = "Fetch, process and inspect cached OpenStreetMap trail data",
    long_about = "Queries the Overpass API for footpaths, cycleways, bridleways and paths \
                  around a point, classifies them and prints the normalized trail list.\n\n\
                  Results can be written through to a SQLite offline cache; when the network \
                  is unavailable the nearest cached area is served instead."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch trails around a point, falling back to the offline cache
    Fetch {
        #[command(flatten)]
        location: Location,

        /// Search radius in meters
        #[arg(long)]
        radius: Option<f64>,

        /// SQLite offline cache (in-memory when omitted)
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Treat the network as unavailable and read only from the cache
        #[arg(long)]
        offline: bool,

        /// Overpass interpreter endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Network deadline in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Process a saved Overpass JSON response
    Process {
        /// Overpass `[out:json]` response file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the cached trails nearest a point
    Cached {
        #[command(flatten)]
        location: Location,

        /// SQLite offline cache
        #[arg(long)]
        cache: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct Location {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

impl Location {
    fn coordinate(&self) -> Result<Coordinate> {
        let coordinate = Coordinate::new(self.lat, self.lon);
        if !coordinate.is_valid() {
            bail!("Coordinate out of range: {}, {}", self.lat, self.lon);
        }
        Ok(coordinate)
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Hide a trail category (bridleway, cycleway, footpath, path); repeatable
    #[arg(long = "hide", value_name = "TYPE")]
    hide: Vec<TrailType>,

    /// Drop trails whose endpoints match an earlier trail within this many km
    #[arg(long, value_name = "KM")]
    dedupe: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl OutputArgs {
    fn filters(&self) -> ActiveFilters {
        self.hide
            .iter()
            .fold(ActiveFilters::all(), |filters, t| filters.with(*t, false))
    }

    fn emit(&self, trails: Vec<TrailRecord>) -> Result<()> {
        let mut trails = self.filters().retain_visible(trails);

        if let Some(threshold_km) = self.dedupe {
            let before = trails.len();
            trails = dedupe_similar(trails, threshold_km);
            log::info!("Dedupe removed {} trails", before - trails.len());
        }

        write_trails(&trails, self.format, self.output.as_deref())
    }
}

fn open_store(path: Option<&Path>) -> Result<Arc<dyn KeyValueStore>> {
    Ok(match path {
        Some(path) => {
            log::info!("Cache: {}", path.display());
            Arc::new(SqliteStore::open(path).context("Failed to open cache database")?)
        }
        None => Arc::new(MemoryStore::new()),
    })
}

async fn run_fetch(
    location: &Location,
    radius: Option<f64>,
    cache: Option<&Path>,
    offline: bool,
    endpoint: Option<&str>,
    timeout_secs: u64,
    output: &OutputArgs,
) -> Result<()> {
    let center = location.coordinate()?;

    let mut config = FetchConfig::default()
        .with_timeout(Duration::from_secs(timeout_secs))
        .with_await_cache_write(true);
    if let Some(endpoint) = endpoint {
        config = config.with_overpass_url(endpoint);
    }

    let fetcher = TrailFetcher::with_http(
        Arc::new(FixedConnectivity::new(!offline)),
        OfflineCache::new(open_store(cache)?),
        config,
    )?;

    let filters = output.filters();
    let report = fetcher.fetch_with_source(center, radius, Some(&filters)).await;

    match &report.source {
        TrailSource::Network => log::info!("Fetched {} trails from Overpass", report.trails.len()),
        TrailSource::Cache { reason: None } => {
            log::info!("Offline: {} trails from cache", report.trails.len())
        }
        TrailSource::Cache {
            reason: Some(reason),
        } => log::warn!(
            "Fetch failed ({reason}), {} trails from cache",
            report.trails.len()
        ),
    }

    output.emit(report.trails)
}

fn run_process(input: &Path, output: &OutputArgs) -> Result<()> {
    if !input.exists() {
        bail!("Input file does not exist: {}", input.display());
    }

    let body = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let response = OverpassResponse::from_slice(&body)?;
    log::info!("Parsed {} elements", response.elements.len());

    let filters = output.filters();
    let trails = process(&response, Some(&filters));
    log::info!("Extracted {} trails", trails.len());

    output.emit(trails)
}

async fn run_cached(location: &Location, cache: &Path, output: &OutputArgs) -> Result<()> {
    if !cache.exists() {
        bail!("Cache database does not exist: {}", cache.display());
    }

    let center = location.coordinate()?;
    let cache = OfflineCache::new(open_store(Some(cache))?);

    let Some(key) = cache.nearest_key(center).await? else {
        log::warn!("Cache is empty");
        return output.emit(Vec::new());
    };

    let entry = cache
        .read_entry(&key)
        .await?
        .with_context(|| format!("Cache entry {key} disappeared"))?;

    match entry.age() {
        Some(age) => log::info!(
            "Nearest cache cell {key}, written {} minutes ago",
            age.num_minutes()
        ),
        None => log::info!("Nearest cache cell {key}"),
    }

    output.emit(entry.data)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    match &cli.command {
        Command::Fetch {
            location,
            radius,
            cache,
            offline,
            endpoint,
            timeout_secs,
            output,
        } => {
            run_fetch(
                location,
                *radius,
                cache.as_deref(),
                *offline,
                endpoint.as_deref(),
                *timeout_secs,
                output,
            )
            .await
        }
        Command::Process { input, output } => run_process(input, output),
        Command::Cached {
            location,
            cache,
            output,
        } => run_cached(location, cache, output).await,
    }
}
