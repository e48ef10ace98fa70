use crate::error::Result;
use crate::utils::constants::{
    CONFIG_FILE_STEM, DEFAULT_API_BASE_URL, DEFAULT_CONGESTION_THRESHOLD_KMH,
    DEFAULT_RENTAL_REGION, DEFAULT_REQUEST_TIMEOUT_SECS, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use validator::Validate;

/// Runtime settings, layered: built-in defaults, then `edge-dashboard.toml`
/// in the working directory (or an explicit file), then `EDGE_DASHBOARD_*`
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(url)]
    pub api_base_url: String,

    #[validate(range(min = 1.0, max = 200.0))]
    pub congestion_threshold_kmh: f64,

    /// Registration region whose short stays count as rentals
    #[validate(length(min = 1))]
    pub rental_region: String,

    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("congestion_threshold_kmh", DEFAULT_CONGESTION_THRESHOLD_KMH)?
            .set_default("rental_region", DEFAULT_RENTAL_REGION)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(CONFIG_FILE_STEM).required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            congestion_threshold_kmh: DEFAULT_CONGESTION_THRESHOLD_KMH,
            rental_region: DEFAULT_RENTAL_REGION.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::io::Write;
    use tempfile::Builder;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file("rental_region = \"Osaka\"\ncongestion_threshold_kmh = 25.0\n");
        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.rental_region, "Osaka");
        assert_eq!(settings.congestion_threshold_kmh, 25.0);
        assert_eq!(settings.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = toml_file("api_base_url = \"not a url\"\n");
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/edge-dashboard.toml"))).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
