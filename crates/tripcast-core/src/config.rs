use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend service (API-key proxy and trip storage)
    pub backend: BackendConfig,

    /// External data providers
    pub providers: ProvidersConfig,

    /// Image search preferences
    #[serde(default)]
    pub images: ImageSearchConfig,

    /// Network timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:3000`
    pub base_url: String,
}

/// One external provider: where it lives and which backend secret unlocks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub secret_name: String,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secret_name: secret_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// GeoNames place search
    pub geocoding: ProviderConfig,

    /// Weatherbit current conditions and daily forecast
    pub weather: ProviderConfig,

    /// Pixabay image search
    pub images: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding: ProviderConfig::new("https://secure.geonames.org", "GEONAMES_API_USERNAME"),
            weather: ProviderConfig::new("https://api.weatherbit.io/v2.0", "WEATHERBIT_API_KEY"),
            images: ProviderConfig::new("https://pixabay.com/api", "PIXABAY_API_KEY"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSearchConfig {
    /// Results requested per search (Pixabay accepts 3..=200)
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Ask the provider to filter unsafe images
    #[serde(default = "default_safe_search")]
    pub safe_search: bool,
}

fn default_max_results() -> u32 {
    3
}

fn default_safe_search() -> bool {
    true
}

impl Default for ImageSearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            safe_search: default_safe_search(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Per-HTTP-request timeout in seconds
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,

    /// Upper bound for one whole pipeline stage in seconds
    #[serde(default = "default_stage_secs")]
    pub stage_secs: u64,
}

fn default_request_secs() -> u64 {
    10
}

fn default_stage_secs() -> u64 {
    30
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: default_request_secs(),
            stage_secs: default_stage_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn stage(&self) -> Duration {
        Duration::from_secs(self.stage_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:3000".to_string(),
            },
            providers: ProvidersConfig::default(),
            images: ImageSearchConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.backend.base_url, "backend.base_url", &mut result);

        let providers = [
            ("providers.geocoding", &self.providers.geocoding),
            ("providers.weather", &self.providers.weather),
            ("providers.images", &self.providers.images),
        ];
        for (field, provider) in providers {
            self.validate_url(&provider.base_url, &format!("{field}.base_url"), &mut result);
            if provider.secret_name.trim().is_empty() {
                result.add_error(
                    format!("{field}.secret_name"),
                    "Secret name must not be empty",
                );
            }
        }

        if !(3..=200).contains(&self.images.max_results) {
            result.add_error(
                "images.max_results",
                format!(
                    "Image search accepts 3 to 200 results, got {}",
                    self.images.max_results
                ),
            );
        }

        if self.timeouts.request_secs == 0 {
            result.add_error("timeouts.request_secs", "Request timeout must be greater than 0");
        }
        if self.timeouts.stage_secs == 0 {
            result.add_error("timeouts.stage_secs", "Stage timeout must be greater than 0");
        } else if self.timeouts.stage_secs < self.timeouts.request_secs {
            result.add_warning(
                "timeouts.stage_secs",
                "Stage timeout is shorter than a single request timeout",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                // Check scheme
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                // Check host
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tripcast");

        Ok(config_dir.join("config.toml"))
    }
}
