//! Forward geocoding: destination name to a single place.
//! Uses the GeoNames full-text search; only the top hit is ever read.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use tripcast_core::{error_body, ProviderConfig, ReqwestErrorExt, SecretProvider, TripQuery};

use crate::types::{GeoError, PlaceRecord};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "totalResultsCount", default)]
    total_results_count: u64,
    #[serde(default)]
    geonames: Vec<GeoName>,
    /// Present instead of results when GeoNames rejects the request
    status: Option<SearchStatus>,
}

#[derive(Debug, Deserialize)]
struct SearchStatus {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeoName {
    name: String,
    #[serde(rename = "adminName1")]
    admin_name1: Option<String>,
    #[serde(rename = "countryName")]
    country_name: Option<String>,
    lat: Coordinate,
    lng: Coordinate,
    population: Option<u64>,
}

/// GeoNames sends coordinates as decimal strings; accept numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Resolves free-text destinations to [`PlaceRecord`]s.
pub struct GeoResolver {
    client: Client,
    base_url: String,
    secret_name: String,
    secrets: Arc<dyn SecretProvider>,
}

impl GeoResolver {
    pub fn new(provider: &ProviderConfig, client: Client, secrets: Arc<dyn SecretProvider>) -> Self {
        Self {
            client,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            secret_name: provider.secret_name.clone(),
            secrets,
        }
    }

    /// Look up the destination and build the place record for this trip.
    #[instrument(skip(self, query), fields(destination = %query.destination_name), level = "info")]
    pub async fn resolve(&self, query: &TripQuery) -> Result<PlaceRecord, GeoError> {
        let username = self.secrets.get_secret(&self.secret_name).await?;

        let url = format!("{}/searchJSON", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.destination_name.as_str()),
                ("maxRows", "1"),
                ("username", username.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            let text = error_body(response).await;
            return Err(GeoError::InvalidResponse(format!("{}: {}", status, text)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| GeoError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        if let Some(status) = body.status {
            return Err(GeoError::InvalidResponse(status.message));
        }

        let top = match body.geonames.into_iter().next() {
            Some(top) if body.total_results_count > 0 => top,
            _ => {
                tracing::info!("No GeoNames match for {:?}", query.destination_name);
                return Err(GeoError::DestinationNotFound(query.destination_name.clone()));
            }
        };

        let (latitude, longitude) = match (top.lat.value(), top.lng.value()) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return Err(GeoError::InvalidResponse(format!(
                    "unreadable coordinates for {}",
                    top.name
                )))
            }
        };

        let place = PlaceRecord {
            destination_name: top.name,
            arrival_date: query.arrival_date,
            region_name: top.admin_name1.filter(|r| !r.trim().is_empty()),
            country_name: top.country_name.unwrap_or_default(),
            latitude,
            longitude,
            population: top.population.filter(|p| *p > 0),
            arrival_day_offset: query.day_offset,
        };

        tracing::info!(
            "Resolved {:?} to {}, {} ({}, {})",
            query.destination_name,
            place.destination_name,
            place.country_name,
            place.latitude,
            place.longitude
        );
        Ok(place)
    }
}
