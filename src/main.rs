use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tripcast_core::Config;
use tripcast_services::{SubmissionPipeline, TripSummary};

/// Weather and a photo for an upcoming trip.
#[derive(Debug, Parser)]
#[command(name = "tripcast", version)]
struct Args {
    /// Destination name, e.g. "Paris"
    destination: String,

    /// Arrival date (YYYY-MM-DD), today or up to six days ahead
    arrival_date: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize core
    tripcast_core::init()?;

    let (config, _) = Config::load_validated()?;
    let pipeline = SubmissionPipeline::from_config(&config)?;

    tracing::info!("Tripcast started (backend {})", config.backend.base_url);

    match pipeline.submit(&args.destination, &args.arrival_date).await {
        Ok(trip) => {
            println!("{}", TripSummary::from(&trip));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("Submission failed at {}: {}", e.stage(), e);
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
