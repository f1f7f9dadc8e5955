//! Trip-finder: round-trip travel recommender.
//!
//! Single-binary Tokio application that:
//! 1. Validates the search parameters
//! 2. Loads scored flights and hotels through the entity cache
//! 3. Combines them into budget-feasible trips
//! 4. Prints the best trips as JSON

mod config;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use tracing::{error, info, warn};

use common::{AppConfig, Error, Trip};
use inventory::{JsonFileStore, JsonWeightFile};
use recommender::{EntityCache, SearchRequest, TripCombiner};

/// Round-trip travel recommender
#[derive(Parser)]
#[command(name = "trip-finder", about = "Find the best-scoring round trip within a budget")]
struct Cli {
    /// Departure city (e.g., "New York City").
    #[arg(long)]
    origin: Option<String>,

    /// Number of nights at the destination.
    #[arg(long)]
    nights: Option<String>,

    /// Total budget for flights and hotel.
    #[arg(long)]
    budget: Option<String>,

    /// Traveller profile: balanced, luxury or affordable.
    #[arg(long, alias = "type")]
    profile: Option<String>,

    /// Return this many trips instead of the configured count.
    #[arg(long)]
    top_n: Option<usize>,

    /// Config file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

const EXIT_SYSTEM_FAILURE: u8 = 1;
const EXIT_CLIENT_ERROR: u8 = 2;
const EXIT_NO_TRIP: u8 = 3;

fn exit_status(e: &Error) -> u8 {
    if e.is_client_error() {
        EXIT_CLIENT_ERROR
    } else {
        EXIT_SYSTEM_FAILURE
    }
}

fn exit_code_for(e: &Error) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn build_combiner(cfg: &AppConfig) -> TripCombiner {
    let provider = Arc::new(JsonFileStore::new(
        &cfg.data.flights_path,
        &cfg.data.hotels_path,
    ));
    let weights = Arc::new(JsonWeightFile::new(&cfg.data.weights_path));
    let cache = Arc::new(EntityCache::new(provider, weights, &cfg.cache));
    TripCombiner::new(cache, cfg)
}

async fn search(cli: &Cli, cfg: &AppConfig) -> Result<Vec<Trip>, Error> {
    let request = SearchRequest::from_params(
        cli.origin.as_deref(),
        cli.nights.as_deref(),
        cli.budget.as_deref(),
        cli.profile.as_deref(),
    )?;
    info!("Searching for {}", request.describe());

    let mut combiner = build_combiner(cfg);
    if let Some(n) = cli.top_n {
        if n == 0 {
            return Err(Error::InvalidParameter {
                name: "top_n".into(),
                reason: "must be > 0".into(),
            });
        }
        combiner = combiner.with_top_n(n);
    }

    let (trips, stats) = combiner.recommend_with_stats(&request).await?;
    info!(
        "Searched {} destinations ({} skipped), {} triples evaluated, {} within budget",
        stats.destinations_searched,
        stats.destinations_skipped,
        stats.triples_evaluated,
        stats.feasible
    );
    Ok(trips)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "trip_finder=info,recommender=info,inventory=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::from(EXIT_SYSTEM_FAILURE);
        }
    };
    info!(
        "Cities: {:?}",
        cfg.cities.iter().map(|c| &c.name).collect::<Vec<_>>()
    );

    let trips = match search(&cli, &cfg).await {
        Ok(t) => t,
        Err(e) => {
            error!("Search failed: {}", e);
            return exit_code_for(&e);
        }
    };

    if trips.is_empty() {
        warn!("No trip fits the budget");
        return ExitCode::from(EXIT_NO_TRIP);
    }

    match render(&trips) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize trips: {}", e);
            exit_code_for(&e)
        }
    }
}

fn render(trips: &[Trip]) -> Result<String, Error> {
    serde_json::to_string_pretty(trips).map_err(|e| Error::json("search results", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_separate_client_and_system_errors() {
        let client = Error::UnsupportedProfile("backpacker".into());
        assert_eq!(exit_status(&client), EXIT_CLIENT_ERROR);

        let system = Error::io("data/flights.json", std::io::ErrorKind::NotFound.into());
        assert_eq!(exit_status(&system), EXIT_SYSTEM_FAILURE);
    }

    #[test]
    fn test_render_empty_result() {
        assert_eq!(render(&[]).unwrap(), "[]");
    }
}
