//! Server Configuration
//!
//! Layered: optional TOML file, then `BUILDING_TWIN__*` environment
//! variables (`BUILDING_TWIN__MODELS__HVAC__MODEL=...`).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use inference_engine::BundleManifest;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "building-twin.toml";

/// Overrides [`DEFAULT_CONFIG_FILE`]
pub const CONFIG_PATH_ENV: &str = "BUILDING_TWIN_CONFIG";

const ENV_PREFIX: &str = "BUILDING_TWIN";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Telemetry CSV export
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Model and scaler artifacts
    pub models: BundleManifest,
    /// Reject unknown scenario keys instead of falling back to baseline
    #[serde(default)]
    pub strict_scenarios: bool,
    /// Catalog rule whose breakdown `/api/optimize` reports
    #[serde(default = "default_capture_index")]
    pub capture_index: Option<usize>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/Building_Energy_Twin_Sequential_3Years.csv")
}

fn default_capture_index() -> Option<usize> {
    Some(1)
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ApiConfig {
    /// Load from [`CONFIG_PATH_ENV`] or [`DEFAULT_CONFIG_FILE`], then the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_path(path)
    }

    /// Load from `path` (may be absent), then the environment
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from(path.as_ref()).required(false));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const MODELS: &str = r#"
[models.hvac]
model = "models/hvac.onnx"
scaler = "models/hvac_scaler.json"

[models.lighting]
model = "models/lighting.onnx"
scaler = "models/lighting_scaler.json"

[models.plug]
model = "models/plug.onnx"
scaler = "models/plug_scaler.json"

[models.meta]
model = "models/meta.json"
scaler = "models/meta_scaler.json"
"#;

    fn parse(toml: &str) -> Result<ApiConfig, ConfigError> {
        ApiConfig::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_defaults() {
        let config = parse(MODELS).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert!(!config.strict_scenarios);
        assert_eq!(config.capture_index, Some(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.models.meta.model, PathBuf::from("models/meta.json"));
    }

    #[test]
    fn test_overrides() {
        let toml = format!(
            "bind_addr = \"127.0.0.1:9000\"\nstrict_scenarios = true\ncapture_index = 4\nlog_json = true\n{MODELS}"
        );
        let config = parse(&toml).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert!(config.strict_scenarios);
        assert_eq!(config.capture_index, Some(4));
        assert!(config.log_json);
    }

    #[test]
    fn test_models_required() {
        assert!(parse("bind_addr = \"127.0.0.1:9000\"").is_err());
    }

    #[test]
    fn test_missing_file_is_not_an_error_by_itself() {
        // Fails on the missing model table, not on the absent file
        let err = ApiConfig::from_path("does-not-exist.toml").unwrap_err();
        assert!(err.to_string().contains("models"));
    }
}
