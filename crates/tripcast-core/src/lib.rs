pub mod config;
pub mod error;
pub mod query;
pub mod secrets;

pub use config::{
    BackendConfig, Config, ImageSearchConfig, ProviderConfig, ProvidersConfig, TimeoutConfig,
};
pub use error::{error_body, NetworkError, ReqwestErrorExt, SecretError};
pub use query::{day_offset, parse_arrival_date, validate, TripQuery, ValidationError, MAX_DAY_OFFSET};
pub use secrets::SecretProvider;

use anyhow::Result;

/// Initialize the core library
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Tripcast core initialized");
    Ok(())
}
