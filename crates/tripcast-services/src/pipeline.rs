//! The trip submission pipeline.
//!
//! validate -> geocode -> weather & photo -> store -> read back.
//! Every stage waits for the previous one and the first failure ends the run.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use reqwest::Client;
use thiserror::Error;
use tripcast_core::{validate, Config, SecretProvider, ValidationError};
use tripcast_weather::{Aggregator, GeoError, GeoResolver, TripResult, WeatherError};

use crate::backend::{BackendClient, PersistError, RetrieveError};

const USER_AGENT: &str = concat!("Tripcast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Geo,
    Weather,
    Persist,
    Retrieve,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validation => "input validation",
            Stage::Geo => "destination lookup",
            Stage::Weather => "weather lookup",
            Stage::Persist => "saving trip",
            Stage::Retrieve => "loading trip",
        };
        f.write_str(name)
    }
}

/// Failure of one pipeline stage, carrying that stage's own error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Destination lookup failed: {0}")]
    Geo(#[from] GeoError),

    #[error("Weather lookup failed: {0}")]
    Weather(#[from] WeatherError),

    #[error("Saving trip failed: {0}")]
    Persist(#[from] PersistError),

    #[error("Loading trip failed: {0}")]
    Retrieve(#[from] RetrieveError),

    #[error("Stage '{0}' timed out")]
    TimedOut(Stage),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Validation(_) => Stage::Validation,
            PipelineError::Geo(_) => Stage::Geo,
            PipelineError::Weather(_) => Stage::Weather,
            PipelineError::Persist(_) => Stage::Persist,
            PipelineError::Retrieve(_) => Stage::Retrieve,
            PipelineError::TimedOut(stage) => *stage,
        }
    }

    /// Standalone notification text for the UI: what was being done and why it failed.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(e) => e.user_message().to_string(),
            PipelineError::Geo(e) => e.user_message(),
            PipelineError::Weather(e) => e.user_message(),
            PipelineError::Persist(e) => e.user_message(),
            PipelineError::Retrieve(e) => e.user_message(),
            PipelineError::TimedOut(stage) => format!(
                "The {} step took too long to respond. Please try again.",
                stage
            ),
        }
    }
}

/// Runs one trip submission end to end.
pub struct SubmissionPipeline {
    backend: BackendClient,
    resolver: GeoResolver,
    aggregator: Aggregator,
    stage_timeout: Duration,
}

impl SubmissionPipeline {
    pub fn new(
        backend: BackendClient,
        resolver: GeoResolver,
        aggregator: Aggregator,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            resolver,
            aggregator,
            stage_timeout,
        }
    }

    /// Build every client from configuration, sharing one HTTP connection pool.
    /// Provider keys are fetched from the backend.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeouts.request())
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        let backend = BackendClient::new(&config.backend.base_url, client.clone());
        let secrets: Arc<dyn SecretProvider> = Arc::new(backend.clone());

        let resolver = GeoResolver::new(&config.providers.geocoding, client.clone(), secrets.clone());
        let aggregator = Aggregator::from_config(config, client, secrets);

        Ok(Self::new(backend, resolver, aggregator, config.timeouts.stage()))
    }

    /// Submit a trip using today's local date.
    pub async fn submit(
        &self,
        raw_destination: &str,
        raw_arrival_date: &str,
    ) -> Result<TripResult, PipelineError> {
        self.submit_on(raw_destination, raw_arrival_date, Local::now().date_naive())
            .await
    }

    /// Submit a trip as if `today` were the current date.
    pub async fn submit_on(
        &self,
        raw_destination: &str,
        raw_arrival_date: &str,
        today: NaiveDate,
    ) -> Result<TripResult, PipelineError> {
        let query = validate(raw_destination, raw_arrival_date, today).map_err(|e| {
            tracing::info!("Rejected trip input: {}", e);
            e
        })?;

        let place = self
            .run_stage(Stage::Geo, self.resolver.resolve(&query))
            .await?;

        let trip = self
            .run_stage(Stage::Weather, self.aggregator.aggregate(place))
            .await?;

        self.run_stage(Stage::Persist, self.backend.store(&trip))
            .await?;

        let stored = self
            .run_stage(Stage::Retrieve, self.backend.retrieve())
            .await?;

        tracing::info!(
            "Trip to {}, {} ready (arrival in {} days)",
            stored.place.destination_name,
            stored.place.country_name,
            stored.place.arrival_day_offset
        );
        Ok(stored)
    }

    async fn run_stage<T, E, F>(&self, stage: Stage, fut: F) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<PipelineError>,
    {
        tracing::debug!("Starting stage: {}", stage);

        match tokio::time::timeout(self.stage_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let err: PipelineError = e.into();
                tracing::warn!("Stage '{}' failed: {}", stage, err);
                Err(err)
            }
            Err(_) => {
                tracing::warn!("Stage '{}' exceeded {:?}", stage, self.stage_timeout);
                Err(PipelineError::TimedOut(stage))
            }
        }
    }
}
