use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tripcast_core::{NetworkError, SecretError};

/// A destination resolved to a single place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub destination_name: String,
    pub arrival_date: NaiveDate,
    pub region_name: Option<String>,
    pub country_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: Option<u64>,
    /// Days until arrival, 0 = today. Always within 0..=6.
    #[serde(rename = "arrivalCountdown")]
    pub arrival_day_offset: u32,
}

impl PlaceRecord {
    /// Region if the geocoder returned one, otherwise the country.
    pub fn locality(&self) -> &str {
        self.region_name
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.country_name)
    }
}

/// One normalized weather reading. Wind speeds are in m/s, temperatures in °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub icon: String,
    pub description: String,
    pub temp: f64,
    #[serde(rename = "feelslikeTemp")]
    pub feels_like_temp: Option<f64>,
    pub max_temp: f64,
    pub min_temp: f64,
    /// Probability of precipitation, percent
    pub chance_of_rain: f64,
    pub wind_speed: f64,
    pub wind_gust_speed: f64,
    /// Cardinal direction, e.g. "NNE"
    pub wind_direction: String,
    /// Percent
    pub cloud_coverage: f64,
    pub uv_index: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// "HH:MM"
    pub sunrise_time: String,
    /// "HH:MM"
    pub sunset_time: String,
}

/// Everything gathered for one trip: place, current and arrival-day weather, photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResult {
    #[serde(flatten)]
    pub place: PlaceRecord,
    /// `[current, arrival day]`
    pub weather_data: [WeatherSnapshot; 2],
    /// Empty when no image was found.
    #[serde(rename = "destinationImageURL")]
    pub destination_image_url: String,
}

impl TripResult {
    pub fn current(&self) -> &WeatherSnapshot {
        &self.weather_data[0]
    }

    pub fn arrival(&self) -> &WeatherSnapshot {
        &self.weather_data[1]
    }

    pub fn has_image(&self) -> bool {
        !self.destination_image_url.is_empty()
    }
}

/// Geocoding errors
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Could not retrieve the GeoNames credential: {0}")]
    CredentialUnavailable(#[from] SecretError),
    #[error("Could not find a destination matching {0:?}")]
    DestinationNotFound(String),
    #[error("Geocoding request failed: {0}")]
    Request(#[from] NetworkError),
    #[error("Unexpected geocoding response: {0}")]
    InvalidResponse(String),
}

impl GeoError {
    pub fn user_message(&self) -> String {
        match self {
            GeoError::CredentialUnavailable(e) => format!(
                "Could not retrieve the GeoNames API key from the server. Please ensure that the server is running and then try again.\n\nError details:\n{}",
                e
            ),
            GeoError::DestinationNotFound(_) => {
                "Could not find a destination matching the name you entered. Please ensure that you have entered a valid destination name and then try again.".to_string()
            }
            GeoError::Request(e) => format!(
                "Could not reach the GeoNames API. {}",
                e.user_message_with_details()
            ),
            GeoError::InvalidResponse(detail) => {
                format!("The GeoNames API returned an unexpected response: {}", detail)
            }
        }
    }
}

/// Weather provider errors. Image lookups never produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Could not retrieve the Weatherbit credential: {0}")]
    CredentialUnavailable(#[from] SecretError),
    #[error("Could not retrieve current weather data: {0}")]
    CurrentUnavailable(String),
    #[error("Could not retrieve forecast weather data: {0}")]
    ForecastUnavailable(String),
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::CredentialUnavailable(e) => format!(
                "Could not retrieve the Weatherbit API key from the server. Please ensure that the server is running and then try again.\n\nError details:\n{}",
                e
            ),
            WeatherError::CurrentUnavailable(detail) => format!(
                "Could not retrieve current weather data for the destination you entered.\n\nError details:\n{}",
                detail
            ),
            WeatherError::ForecastUnavailable(detail) => format!(
                "Could not retrieve forecast weather data for the destination you entered.\n\nError details:\n{}",
                detail
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(region: Option<&str>) -> PlaceRecord {
        PlaceRecord {
            destination_name: "Paris".into(),
            arrival_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            region_name: region.map(str::to_string),
            country_name: "France".into(),
            latitude: 48.85341,
            longitude: 2.3488,
            population: Some(2_138_551),
            arrival_day_offset: 0,
        }
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            icon: "c02d".into(),
            description: "Few clouds".into(),
            temp: 14.2,
            feels_like_temp: None,
            max_temp: 16.0,
            min_temp: 8.5,
            chance_of_rain: 20.0,
            wind_speed: 3.1,
            wind_gust_speed: 6.0,
            wind_direction: "SW".into(),
            cloud_coverage: 25.0,
            uv_index: 3.4,
            humidity: 71.0,
            sunrise_time: "07:05".into(),
            sunset_time: "18:44".into(),
        }
    }

    #[test]
    fn test_locality_prefers_region() {
        assert_eq!(place(Some("Île-de-France")).locality(), "Île-de-France");
        assert_eq!(place(None).locality(), "France");
        assert_eq!(place(Some("")).locality(), "France");
    }

    #[test]
    fn test_trip_result_wire_names() {
        let result = TripResult {
            place: place(Some("Île-de-France")),
            weather_data: [snapshot(), snapshot()],
            destination_image_url: String::new(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["destinationName"], "Paris");
        assert_eq!(json["arrivalDate"], "2024-03-10");
        assert_eq!(json["regionName"], "Île-de-France");
        assert_eq!(json["arrivalCountdown"], 0);
        assert_eq!(json["destinationImageURL"], "");
        assert_eq!(json["weatherData"][0]["windGustSpeed"], 6.0);
        assert!(json["weatherData"][1]["feelslikeTemp"].is_null());

        let back: TripResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_credential_messages_keep_reason() {
        let geo = GeoError::from(SecretError::unavailable("GEONAMES_API_USERNAME", "connection refused"));
        assert!(geo.user_message().contains("GeoNames API key"));
        assert!(geo.user_message().contains("connection refused"));

        let weather = WeatherError::from(SecretError::unavailable("WEATHERBIT_API_KEY", "500 Internal Server Error"));
        assert!(weather.user_message().contains("Weatherbit API key"));
        assert!(weather.user_message().contains("500 Internal Server Error"));
    }

    #[test]
    fn test_geo_request_message_keeps_transport_text() {
        let err = GeoError::from(NetworkError::ConnectionFailed("dns error: no such host".into()));
        let message = err.user_message();
        assert!(message.starts_with("Could not reach the GeoNames API."));
        assert!(message.contains("dns error: no such host"));
    }

    #[test]
    fn test_weather_error_message_carries_provider_text() {
        let err = WeatherError::CurrentUnavailable("API key not valid".into());
        assert!(err.user_message().contains("API key not valid"));
        assert!(err.to_string().contains("API key not valid"));
    }
}
