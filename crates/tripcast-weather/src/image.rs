//! Destination photo lookup via Pixabay.
//! Best effort: every failure is logged and reported as "no image".

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tripcast_core::{ImageSearchConfig, ProviderConfig, SecretProvider};

use crate::types::PlaceRecord;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "largeImageURL")]
    large_image_url: Option<String>,
}

pub struct ImageSearch {
    client: Client,
    base_url: String,
    secret_name: String,
    secrets: Arc<dyn SecretProvider>,
    max_results: u32,
    safe_search: bool,
}

impl ImageSearch {
    pub fn new(
        provider: &ProviderConfig,
        options: &ImageSearchConfig,
        client: Client,
        secrets: Arc<dyn SecretProvider>,
    ) -> Self {
        Self {
            client,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            secret_name: provider.secret_name.clone(),
            secrets,
            max_results: options.max_results,
            safe_search: options.safe_search,
        }
    }

    /// Search text for a place, e.g. "Paris Île-de-France" or "Monaco Monaco".
    pub fn search_query(place: &PlaceRecord) -> String {
        format!("{} {}", place.destination_name, place.locality())
    }

    /// URL of the top photo for `place`, or `None` if there is none to be had.
    pub async fn find_destination_image(&self, place: &PlaceRecord) -> Option<String> {
        let key = match self.secrets.get_secret(&self.secret_name).await {
            Ok(k) => k,
            Err(e) => {
                tracing::warn!("Skipping destination image: {}", e);
                return None;
            }
        };

        let url = format!("{}/", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("safesearch", self.safe_search)])
            .query(&[("per_page", self.max_results)])
            .query(&[("q", Self::search_query(place)), ("key", key)]);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Image search request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Image search returned status {}", response.status());
            return None;
        }

        let body: SearchResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Image search parse error: {}", e);
                return None;
            }
        };

        if body.total == 0 {
            tracing::debug!("No images found for {:?}", Self::search_query(place));
            return None;
        }

        body.hits
            .into_iter()
            .next()
            .and_then(|hit| hit.large_image_url)
            .filter(|u| !u.is_empty())
    }
}
