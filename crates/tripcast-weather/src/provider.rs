//! Weatherbit client: current conditions and the daily forecast.
//!
//! Both endpoints answer with either `{"data": [...]}` or `{"error": "..."}`,
//! sometimes with a non-2xx status. The provider's error text is passed
//! through untouched so callers can show it.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;
use tripcast_core::ReqwestErrorExt;

use crate::types::WeatherError;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<Vec<T>>,
    error: Option<String>,
}

/// Icon code and text description, e.g. `c02d` / "Few clouds"
#[derive(Debug, Clone, Deserialize)]
pub struct Conditions {
    pub icon: String,
    pub description: String,
}

/// One row of `/current`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub weather: Conditions,
    pub temp: f64,
    /// Apparent temperature
    pub app_temp: Option<f64>,
    pub wind_spd: f64,
    pub gust: Option<f64>,
    pub wind_cdir: String,
    pub clouds: f64,
    pub uv: f64,
    pub rh: f64,
}

/// One day of `/forecast/daily`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDay {
    pub weather: Conditions,
    pub temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    /// Probability of precipitation, percent
    pub pop: f64,
    pub wind_spd: f64,
    pub wind_gust_spd: f64,
    pub wind_cdir: String,
    pub clouds: f64,
    pub uv: f64,
    pub rh: f64,
    pub sunrise_ts: i64,
    pub sunset_ts: i64,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Current conditions at a coordinate.
    #[instrument(skip(self, key), level = "info")]
    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
        key: &str,
    ) -> Result<CurrentConditions, WeatherError> {
        let request = self
            .client
            .get(format!("{}/current", self.base_url))
            .query(&[("lat", latitude), ("lon", longitude)])
            .query(&[("key", key)]);

        self.fetch::<CurrentConditions>(request)
            .await
            .and_then(|rows| {
                rows.into_iter()
                    .next()
                    .ok_or_else(|| "response contained no weather data".to_string())
            })
            .map_err(WeatherError::CurrentUnavailable)
    }

    /// Daily forecast starting today; always returns at least `days` entries.
    #[instrument(skip(self, key), level = "info")]
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u32,
        key: &str,
    ) -> Result<Vec<ForecastDay>, WeatherError> {
        let request = self
            .client
            .get(format!("{}/forecast/daily", self.base_url))
            .query(&[("lat", latitude), ("lon", longitude)])
            .query(&[("days", days)])
            .query(&[("key", key)]);

        let forecast = self
            .fetch::<ForecastDay>(request)
            .await
            .map_err(WeatherError::ForecastUnavailable)?;

        if forecast.len() < days as usize {
            return Err(WeatherError::ForecastUnavailable(format!(
                "forecast covers {} days, expected at least {}",
                forecast.len(),
                days
            )));
        }

        Ok(forecast)
    }

    /// Fetch a Weatherbit endpoint; errors are the text to surface to the user.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>, String> {
        let response = request
            .send()
            .await
            .map_err(|e| e.into_network_error().to_string())?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| e.into_network_error().to_string())?;

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(Envelope {
                error: Some(error), ..
            }) => {
                tracing::warn!("Weatherbit returned an error ({}): {}", status, error);
                Err(error)
            }
            Ok(Envelope {
                data: Some(rows), ..
            }) if status.is_success() && !rows.is_empty() => Ok(rows),
            Ok(_) if status.is_success() => Err("response contained no weather data".to_string()),
            Ok(_) => Err(status.to_string()),
            Err(e) if status.is_success() => {
                tracing::debug!("Weatherbit payload did not parse: {}", e);
                Err(format!("unexpected response from the weather service: {}", e))
            }
            Err(_) => Err(status.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_day(day: i64) -> serde_json::Value {
        serde_json::json!({
            "weather": { "icon": "r01d", "code": 500, "description": "Light rain" },
            "temp": 12.5 + day as f64,
            "max_temp": 15.0,
            "min_temp": 9.0,
            "pop": 60,
            "wind_spd": 4.0,
            "wind_gust_spd": 9.5,
            "wind_cdir": "WSW",
            "clouds": 80,
            "uv": 2.1,
            "rh": 84,
            "sunrise_ts": 1_710_050_700 + day * 86_400,
            "sunset_ts": 1_710_093_600 + day * 86_400
        })
    }

    #[tokio::test]
    async fn test_current_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 1,
                "data": [{
                    "weather": { "icon": "c02d", "code": 801, "description": "Few clouds" },
                    "temp": 14.2,
                    "app_temp": 13.1,
                    "wind_spd": 3.1,
                    "gust": null,
                    "wind_cdir": "SW",
                    "clouds": 25,
                    "uv": 3.4,
                    "rh": 71
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(&mock_server.uri(), Client::new());
        let current = provider.current(48.85, 2.35, "secret").await.unwrap();

        assert_eq!(current.weather.icon, "c02d");
        assert_eq!(current.app_temp, Some(13.1));
        assert_eq!(current.gust, None);
        assert_eq!(current.wind_cdir, "SW");
    }

    #[tokio::test]
    async fn test_current_error_field_is_surfaced() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": "exceeded daily quota"
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(&mock_server.uri(), Client::new());
        let result = provider.current(48.85, 2.35, "secret").await;

        match result {
            Err(WeatherError::CurrentUnavailable(msg)) => assert_eq!(msg, "exceeded daily quota"),
            other => panic!("expected CurrentUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_current_missing_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 0
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(&mock_server.uri(), Client::new());
        let result = provider.current(0.0, 0.0, "secret").await;

        assert!(matches!(result, Err(WeatherError::CurrentUnavailable(_))));
    }

    #[tokio::test]
    async fn test_forecast_requests_days() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .and(query_param("days", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [forecast_day(0), forecast_day(1), forecast_day(2)]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(&mock_server.uri(), Client::new());
        let forecast = provider.forecast(48.85, 2.35, 3, "secret").await.unwrap();

        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[2].temp, 14.5);
        assert_eq!(forecast[0].pop, 60.0);
    }

    #[tokio::test]
    async fn test_forecast_too_short() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [forecast_day(0)]
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(&mock_server.uri(), Client::new());
        let result = provider.forecast(48.85, 2.35, 4, "secret").await;

        match result {
            Err(WeatherError::ForecastUnavailable(msg)) => assert!(msg.contains("expected at least 4")),
            other => panic!("expected ForecastUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forecast_server_error_without_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(&mock_server.uri(), Client::new());
        let result = provider.forecast(48.85, 2.35, 1, "secret").await;

        match result {
            Err(WeatherError::ForecastUnavailable(msg)) => assert!(msg.contains("503")),
            other => panic!("expected ForecastUnavailable, got {:?}", other),
        }
    }
}
