//! Client for the Tripcast backend.
//!
//! The backend does two jobs: it hands out provider API keys by name so
//! they never ship with the client, and it keeps the last submitted trip.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::instrument;
use tripcast_core::{error_body, NetworkError, ReqwestErrorExt, SecretError, SecretProvider};
use tripcast_weather::TripResult;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Could not send trip data to the server: {0}")]
    Network(#[from] NetworkError),

    #[error("Server rejected trip data: {status} - {message}")]
    Rejected { status: u16, message: String },
}

impl PersistError {
    pub fn user_message(&self) -> String {
        match self {
            PersistError::Network(e) => format!(
                "The following error occurred while sending data to the server: {}",
                e.user_message_with_details()
            ),
            PersistError::Rejected { status, message } => format!(
                "The following error occurred while sending data to the server: {} {}",
                status, message
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("Could not fetch trip data from the server: {0}")]
    Network(#[from] NetworkError),

    #[error("Server refused trip data request: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Stored trip data is unreadable: {0}")]
    InvalidDocument(String),
}

impl RetrieveError {
    pub fn user_message(&self) -> String {
        match self {
            RetrieveError::Network(e) => format!(
                "The following error occurred while getting data from the server: {}",
                e.user_message_with_details()
            ),
            RetrieveError::Rejected { status, message } => format!(
                "The following error occurred while getting data from the server: {} {}",
                status, message
            ),
            RetrieveError::InvalidDocument(detail) => format!(
                "The server returned trip data that could not be read: {}",
                detail
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store a finished trip; the backend keeps only the latest one.
    #[instrument(skip(self, trip), fields(destination = %trip.place.destination_name), level = "info")]
    pub async fn store(&self, trip: &TripResult) -> Result<(), PersistError> {
        let url = format!("{}/postdata", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(trip)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response).await;
            return Err(PersistError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        // The acknowledgement body is JSON but carries nothing we use.
        let ack: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PersistError::Network(e.into_network_error()))?;
        tracing::debug!("Backend acknowledged trip: {}", ack);

        Ok(())
    }

    /// Read back the most recently stored trip.
    #[instrument(skip(self), level = "info")]
    pub async fn retrieve(&self) -> Result<TripResult, RetrieveError> {
        let url = format!("{}/getdata", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response).await;
            return Err(RetrieveError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| e.into_network_error())?;

        serde_json::from_str(&body).map_err(|e| RetrieveError::InvalidDocument(e.to_string()))
    }
}

#[async_trait]
impl SecretProvider for BackendClient {
    #[instrument(skip(self), level = "debug")]
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        let url = format!("{}/getapikey", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("dotenv", name)])
            .send()
            .await
            .map_err(|e| SecretError::unavailable(name, e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SecretError::unavailable(name, status));
        }

        let secret = response
            .text()
            .await
            .map_err(|e| SecretError::unavailable(name, e.into_network_error()))?;

        let secret = secret.trim();
        if secret.is_empty() {
            return Err(SecretError::unavailable(name, "empty secret"));
        }

        Ok(secret.to_string())
    }
}
