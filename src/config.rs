/// Service configuration loader - parses climo.toml
///
/// Separates serving tunables from code, making it easy to move the bind
/// address, resize the worker pool, or pin the reporting windows to a fixed
/// dataset without recompiling the service. The file is optional; every
/// field has a default.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default configuration file location (working directory).
pub const DEFAULT_CONFIG_PATH: &str = "climo.toml";

/// Root configuration structure for TOML parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub window: WindowConfig,
}

/// HTTP serving tunables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    pub bind: String,
    /// Listen port. Overridable on the command line with --port.
    pub port: u16,
    /// Request worker pool size.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            workers: 4,
        }
    }
}

/// Reporting window overrides.
///
/// Both windows default to dates derived from the latest observation in the
/// store at request time. Pinning them here reproduces figures published
/// against a frozen dataset. Dates are quoted ISO strings in the TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Anchor for the precipitation window; the window covers the 365 days
    /// up to this date. Unset: the latest measurement date in the store.
    pub precipitation_anchor: Option<NaiveDate>,
    /// Earliest date included in the temperature-observation listing.
    /// Unset: one year before the latest measurement date.
    pub tobs_threshold: Option<NaiveDate>,
}

/// Loads service configuration from the given path, falling back to
/// defaults when the file does not exist.
///
/// # Panics
/// Panics if the file exists but cannot be read or parsed. This is
/// intentional — the service must not come up behind a half-applied
/// configuration.
pub fn load_config(path: &str) -> ServiceConfig {
    if !Path::new(path).exists() {
        return ServiceConfig::default();
    }

    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));

    toml::from_str(&contents).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}
