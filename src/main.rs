use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use azure_maps_search::{FileConfig, QueryBuilder, SearchService, Transport};

/// Search Azure Maps for addresses and points of interest
///
/// Examples:
///   # Plain address search
///   azure-maps-search address "123 Main Street"
///
///   # Schools in South Africa or Namibia, at most 10
///   azure-maps-search schools "High School" -C ZA -C NA -l 10
///
///   # Bias results around Cape Town within 5 km
///   azure-maps-search address "Long Street" --lat -33.925 --lon 18.424 -r 5000
#[derive(Parser, Debug)]
#[command(name = "azure-maps-search")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches azure-maps.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API key (overrides config file and AZURE_MAPS_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Search endpoint (overrides config file and AZURE_MAPS_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Free-text address search
    Address(SearchArgs),
    /// Search restricted to schools
    Schools(SearchArgs),
}

#[derive(ClapArgs, Debug)]
struct SearchArgs {
    /// Text to search for
    query: String,

    /// Maximum number of results
    #[arg(short = 'l', long, allow_hyphen_values = true)]
    limit: Option<i64>,

    /// Country code filter, repeat for several countries
    #[arg(short = 'C', long = "country")]
    countries: Vec<String>,

    /// Latitude to bias results around (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude to bias results around (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Bias radius in meters
    #[arg(short = 'r', long, requires = "lat")]
    radius: Option<i64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let file_config = match args.config {
        Some(ref path) => FileConfig::from_path(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let mut file_config = file_config.with_env();
    if let Some(ref key) = args.api_key {
        file_config.api_key = Some(key.clone());
    }
    if let Some(ref url) = args.base_url {
        file_config.base_url = url.clone();
    }
    let config = file_config.resolve()?;
    tracing::debug!(?config, "Resolved configuration");

    let mut service = SearchService::from_config(&config)?;
    let (builder, search) = match args.command {
        Command::Address(ref search) => (service.search_address(&search.query), search),
        Command::Schools(ref search) => (service.search_schools(&search.query), search),
    };
    apply_filters(builder, search);

    let spinner = create_spinner("Searching Azure Maps...");
    let outcome = if args.pretty {
        builder.fetch_results().and_then(|results| {
            serde_json::to_string_pretty(&results)
                .map_err(|e| azure_maps_search::SearchError::Serialize(e.to_string()))
        })
    } else {
        builder.fetch()
    };
    spinner.finish_and_clear();

    let json = outcome.context("Azure Maps search failed")?;
    println!("{}", json);
    Ok(())
}

fn apply_filters<T: Transport>(builder: &mut QueryBuilder<T>, search: &SearchArgs) {
    if let Some(limit) = search.limit {
        builder.limit(limit);
    }
    if !search.countries.is_empty() {
        builder.country(&search.countries);
    }
    if let (Some(lat), Some(lon)) = (search.lat, search.lon) {
        match search.radius {
            Some(radius) => builder.location_with_radius(lat, lon, radius),
            None => builder.location(lat, lon),
        };
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
