//! Weather and destination data for Tripcast
//!
//! Resolves destinations through GeoNames, reads current conditions and
//! daily forecasts from Weatherbit, and looks up a destination photo on
//! Pixabay. Provider credentials are requested by name from a
//! [`tripcast_core::SecretProvider`].

pub mod aggregate;
pub mod format;
pub mod geocode;
pub mod image;
pub mod provider;
pub mod types;

#[cfg(test)]
mod testing;

pub use aggregate::Aggregator;
pub use geocode::GeoResolver;
pub use image::ImageSearch;
pub use provider::WeatherProvider;
pub use types::*;
