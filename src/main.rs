mod cli;
mod report;

use std::process::ExitCode;

use clap::Parser;
use efficient_core::{
    Error,
    loading::{NetworkConfig, load_network},
    routing::{Query, route},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

fn run(args: &Args) -> Result<(), Error> {
    let config = match &args.config {
        Some(path) => {
            info!("Reading configuration from {}", path.display());
            NetworkConfig::from_path(path)?
        }
        None => NetworkConfig::default(),
    };

    let (network, _) = load_network(&config, &args.feeds())?;

    let mut query = Query::new(args.from, args.to, args.objective);
    if let Some(departure) = args.depart {
        query = query.departing_at(departure);
    }
    let journey = route(&network, &query)?;

    print!("{}", report::render(&journey, args.objective));

    if let Some(path) = &args.geojson {
        std::fs::write(path, journey.itinerary.to_geojson_string()?)?;
        info!("GeoJSON written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NoPathFound) => {
            error!("No path found between the selected points");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
