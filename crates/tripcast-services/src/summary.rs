//! Display-ready view of a stored trip.
//!
//! Everything a page needs as plain text: countdown, place lines, rounded
//! temperatures, km/h wind speeds and icon URLs. The arrival card only
//! exists when the trip starts after today.

use std::fmt;

use tripcast_weather::format::{mps_to_kmph, number_formatter};
use tripcast_weather::{TripResult, WeatherSnapshot};

const ICON_BASE_URL: &str = "https://www.weatherbit.io/static/img/icons";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSummary {
    pub image_url: Option<String>,
    pub destination_name: String,
    pub region_name: Option<String>,
    pub country_name: String,
    /// e.g. "Population: 2 million"
    pub population: Option<String>,
    /// e.g. "You will arrive in Paris, France tomorrow."
    pub countdown: String,
    pub current: WeatherCard,
    pub arrival: Option<WeatherCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCard {
    pub title: String,
    /// "Max 16° Min 8°"
    pub min_max: String,
    /// "14°C"
    pub temperature: String,
    pub feels_like: String,
    pub icon_url: Option<String>,
    pub description: String,
    pub chance_of_rain: String,
    pub wind_speed: String,
    pub wind_gust_speed: String,
    pub wind_direction: String,
    pub cloud_coverage: String,
    pub uv_index: String,
    pub humidity: String,
    pub sunrise: String,
    pub sunset: String,
}

/// "today", "tomorrow" or "in N days"
pub fn countdown_phrase(days: u32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {} days", n),
    }
}

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl WeatherCard {
    fn new(title: String, snapshot: &WeatherSnapshot, feels_like: String) -> Self {
        Self {
            title,
            min_max: format!(
                "Max {}° Min {}°",
                round_half_up(snapshot.max_temp),
                round_half_up(snapshot.min_temp)
            ),
            temperature: format!("{}°C", round_half_up(snapshot.temp)),
            feels_like,
            icon_url: Some(&snapshot.icon)
                .filter(|icon| !icon.is_empty())
                .map(|icon| format!("{}/{}.png", ICON_BASE_URL, icon)),
            description: snapshot.description.clone(),
            chance_of_rain: format!("{}%", snapshot.chance_of_rain),
            wind_speed: format!("{} km/h", mps_to_kmph(snapshot.wind_speed, 0)),
            wind_gust_speed: format!("{} km/h", mps_to_kmph(snapshot.wind_gust_speed, 0)),
            wind_direction: snapshot.wind_direction.clone(),
            cloud_coverage: format!("{}%", snapshot.cloud_coverage),
            uv_index: round_half_up(snapshot.uv_index).to_string(),
            humidity: format!("{}%", snapshot.humidity),
            sunrise: snapshot.sunrise_time.clone(),
            sunset: snapshot.sunset_time.clone(),
        }
    }
}

impl From<&TripResult> for TripSummary {
    fn from(trip: &TripResult) -> Self {
        let place = &trip.place;

        let current = WeatherCard::new(
            format!("Current weather in {}", place.destination_name),
            trip.current(),
            match trip.current().feels_like_temp {
                Some(t) => format!("Feels like {}°", round_half_up(t)),
                None => String::new(),
            },
        );

        let arrival = (place.arrival_day_offset > 0).then(|| {
            WeatherCard::new(
                format!("Weather on arrival in {}", place.destination_name),
                trip.arrival(),
                "(Average temperature)".to_string(),
            )
        });

        Self {
            image_url: trip.has_image().then(|| trip.destination_image_url.clone()),
            destination_name: place.destination_name.clone(),
            region_name: place.region_name.clone().filter(|r| !r.is_empty()),
            country_name: place.country_name.clone(),
            population: place
                .population
                .map(|p| format!("Population: {}", number_formatter(p as f64, 0))),
            countdown: format!(
                "You will arrive in {}, {} {}.",
                place.destination_name,
                place.country_name,
                countdown_phrase(place.arrival_day_offset)
            ),
            current,
            arrival,
        }
    }
}

impl fmt::Display for WeatherCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {}  {}  {}", self.description, self.temperature, self.min_max)?;
        if !self.feels_like.is_empty() {
            writeln!(f, "  {}", self.feels_like)?;
        }
        writeln!(f, "  Chance of rain {}  Humidity {}  Clouds {}", self.chance_of_rain, self.humidity, self.cloud_coverage)?;
        writeln!(
            f,
            "  Wind {} {} (gusts {})  UV {}",
            self.wind_speed, self.wind_direction, self.wind_gust_speed, self.uv_index
        )?;
        write!(f, "  Sunrise {}  Sunset {}", self.sunrise, self.sunset)
    }
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.destination_name)?;
        if let Some(region) = &self.region_name {
            writeln!(f, "{}", region)?;
        }
        writeln!(f, "{}", self.country_name)?;
        if let Some(population) = &self.population {
            writeln!(f, "{}", population)?;
        }
        if let Some(url) = &self.image_url {
            writeln!(f, "{}", url)?;
        }
        writeln!(f, "{}", self.countdown)?;
        writeln!(f)?;
        write!(f, "{}", self.current)?;
        if let Some(arrival) = &self.arrival {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "{}", arrival)?;
        }
        Ok(())
    }
}
