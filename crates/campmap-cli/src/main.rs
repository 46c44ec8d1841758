mod output;

use std::path::PathBuf;

use anyhow::Context;
use campmap_core::{campsites_within, load_campsites, AppConfig, ConfigError};
use campmap_geocode::{popular_locations, LocationResult, LocationSearch, SearchConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Half-width in degrees of the box used when a located place has no bbox.
const POINT_RADIUS_DEG: f64 = 0.25;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "campmap")]
#[command(about = "Find New York State campsites and the places around them")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for a city, park, or natural landmark
    Search {
        /// Free-text place name
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Look up the place at a coordinate
    Reverse {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// List the default suggested locations
    Popular,
    /// List campsites from the dataset
    Campsites {
        /// Only campsites inside the area of this place
        #[arg(long)]
        near: Option<String>,
        /// Dataset path (defaults to `CAMPMAP_CAMPSITES_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `popular` runs without configuration, so a bad value only fails the
    // commands that read it.
    let config = campmap_core::load_app_config();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level(&config)))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search { query } => {
            let config = config.context("loading configuration")?;
            let search = LocationSearch::new(SearchConfig::from_app_config(&config))?;
            let query = query.join(" ");
            match search.search_location(&query).await {
                Ok(results) => output::print_locations(&results, cli.json)?,
                Err(e) => {
                    if cli.json {
                        output::print_error_json(&e)?;
                    }
                    anyhow::bail!("search failed: {} ({})", e.message(), e.code());
                }
            }
        }
        Commands::Reverse { lat, lon } => {
            let config = config.context("loading configuration")?;
            let search = LocationSearch::new(SearchConfig::from_app_config(&config))?;
            let result = search.reverse_geocode(lat, lon).await;
            output::print_reverse(result.as_ref(), cli.json)?;
        }
        Commands::Popular => output::print_locations(&popular_locations(), cli.json)?,
        Commands::Campsites { near, path } => {
            let config = config.context("loading configuration")?;
            tracing::debug!(env = %config.env, "loaded configuration");
            let path = path.unwrap_or_else(|| config.campsites_path.clone());
            let sites = load_campsites(&path)
                .with_context(|| format!("loading campsites from {}", path.display()))?;

            match near {
                None => output::print_campsites(&sites.iter().collect::<Vec<_>>(), cli.json)?,
                Some(place) => {
                    let search = LocationSearch::new(SearchConfig::from_app_config(&config))?;
                    let located = search
                        .search_location(&place)
                        .await
                        .map_err(|e| anyhow::anyhow!("{} ({})", e.message(), e.code()))?;
                    let Some(anchor) = located.first() else {
                        anyhow::bail!("no location found for \"{place}\"");
                    };
                    tracing::info!(place = %anchor.display_name, "listing campsites near location");
                    let nearby = campsites_within(&sites, area_of(anchor));
                    output::print_campsites(&nearby, cli.json)?;
                }
            }
        }
    }

    Ok(())
}

/// The configured log level, or the default when configuration failed to load.
fn log_level(config: &Result<AppConfig, ConfigError>) -> &str {
    config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |c| c.log_level.as_str())
}

/// The bbox of a result, or a small box around its point when it has none.
fn area_of(result: &LocationResult) -> [f64; 4] {
    result.bbox.unwrap_or([
        result.longitude - POINT_RADIUS_DEG,
        result.latitude - POINT_RADIUS_DEG,
        result.longitude + POINT_RADIUS_DEG,
        result.latitude + POINT_RADIUS_DEG,
    ])
}
