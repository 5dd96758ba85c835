use std::sync::Arc;

use reqwest::Client;
use tracing::instrument;
use tripcast_core::{Config, SecretProvider};

use crate::format::unix_timestamp_to_time;
use crate::image::ImageSearch;
use crate::provider::{CurrentConditions, ForecastDay, WeatherProvider};
use crate::types::{PlaceRecord, TripResult, WeatherError, WeatherSnapshot};

/// Gathers weather and a photo for a resolved place into a [`TripResult`].
///
/// Calls run one after another: weather key, current conditions, forecast,
/// then the image lookup.
pub struct Aggregator {
    secrets: Arc<dyn SecretProvider>,
    weather: WeatherProvider,
    weather_secret: String,
    images: ImageSearch,
}

impl Aggregator {
    pub fn new(
        secrets: Arc<dyn SecretProvider>,
        weather: WeatherProvider,
        weather_secret: impl Into<String>,
        images: ImageSearch,
    ) -> Self {
        Self {
            secrets,
            weather,
            weather_secret: weather_secret.into(),
            images,
        }
    }

    /// Wire up the Weatherbit and Pixabay clients described by `config`.
    pub fn from_config(config: &Config, client: Client, secrets: Arc<dyn SecretProvider>) -> Self {
        let providers = &config.providers;
        let weather = WeatherProvider::new(&providers.weather.base_url, client.clone());
        let images = ImageSearch::new(&providers.images, &config.images, client, secrets.clone());
        Self::new(secrets, weather, providers.weather.secret_name.clone(), images)
    }

    #[instrument(skip(self, place), fields(destination = %place.destination_name), level = "info")]
    pub async fn aggregate(&self, place: PlaceRecord) -> Result<TripResult, WeatherError> {
        let key = self.secrets.get_secret(&self.weather_secret).await?;

        let current = self
            .weather
            .current(place.latitude, place.longitude, &key)
            .await?;

        let days = place.arrival_day_offset + 1;
        let forecast = self
            .weather
            .forecast(place.latitude, place.longitude, days, &key)
            .await?;

        let destination_image_url = self
            .images
            .find_destination_image(&place)
            .await
            .unwrap_or_default();

        let weather_data = build_snapshots(&current, &forecast, place.arrival_day_offset as usize)?;

        tracing::info!(
            "Aggregated weather for {} (arrival in {} days, image: {})",
            place.destination_name,
            place.arrival_day_offset,
            !destination_image_url.is_empty()
        );

        Ok(TripResult {
            place,
            weather_data,
            destination_image_url,
        })
    }
}

/// Today's snapshot mixes live readings with forecast day 0, which carries the
/// daily extremes, rain chance and sun times the live endpoint lacks.
fn build_snapshots(
    current: &CurrentConditions,
    forecast: &[ForecastDay],
    arrival_index: usize,
) -> Result<[WeatherSnapshot; 2], WeatherError> {
    let (today, arrival) = match (forecast.first(), forecast.get(arrival_index)) {
        (Some(today), Some(arrival)) => (today, arrival),
        _ => {
            return Err(WeatherError::ForecastUnavailable(format!(
                "forecast has no entry for day {}",
                arrival_index
            )))
        }
    };

    let now = WeatherSnapshot {
        icon: current.weather.icon.clone(),
        description: current.weather.description.clone(),
        temp: current.temp,
        feels_like_temp: current.app_temp,
        max_temp: today.max_temp,
        min_temp: today.min_temp,
        chance_of_rain: today.pop,
        wind_speed: current.wind_spd,
        wind_gust_speed: current.gust.unwrap_or(0.0),
        wind_direction: current.wind_cdir.clone(),
        cloud_coverage: current.clouds,
        uv_index: current.uv,
        humidity: current.rh,
        sunrise_time: unix_timestamp_to_time(today.sunrise_ts),
        sunset_time: unix_timestamp_to_time(today.sunset_ts),
    };

    Ok([now, forecast_snapshot(arrival)])
}

fn forecast_snapshot(day: &ForecastDay) -> WeatherSnapshot {
    WeatherSnapshot {
        icon: day.weather.icon.clone(),
        description: day.weather.description.clone(),
        temp: day.temp,
        feels_like_temp: None,
        max_temp: day.max_temp,
        min_temp: day.min_temp,
        chance_of_rain: day.pop,
        wind_speed: day.wind_spd,
        wind_gust_speed: day.wind_gust_spd,
        wind_direction: day.wind_cdir.clone(),
        cloud_coverage: day.clouds,
        uv_index: day.uv,
        humidity: day.rh,
        sunrise_time: unix_timestamp_to_time(day.sunrise_ts),
        sunset_time: unix_timestamp_to_time(day.sunset_ts),
    }
}
