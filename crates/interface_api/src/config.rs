//! API configuration

use std::path::PathBuf;

use serde::Deserialize;

/// API configuration
///
/// Every field has a default, so a partially set environment still loads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Static bearer token required on protected routes
    pub auth_token: String,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Pharmacy catalog CSV
    pub pharmacies_csv_path: PathBuf,
    /// Directory of claim batch files
    pub claims_data_path: PathBuf,
    /// Directory of revert batch files
    pub reverts_data_path: PathBuf,
    /// Log level
    pub log_level: String,
    /// Directory for the JSON log file
    pub log_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            auth_token: String::new(),
            database_path: PathBuf::from("./data/pharmacy.db"),
            pharmacies_csv_path: PathBuf::from("pharmacies.csv"),
            claims_data_path: PathBuf::from("./data/claims"),
            reverts_data_path: PathBuf::from("./data/reverts"),
            log_level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when protected routes can be reached at all
    pub fn auth_enabled(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_path, PathBuf::from("./data/pharmacy.db"));
        assert!(!config.auth_enabled());
    }

    #[test]
    fn test_partial_source_keeps_other_defaults() {
        let config: ApiConfig = config::Config::builder()
            .set_override("port", 9090)
            .unwrap()
            .set_override("auth_token", "secret")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 9090);
        assert!(config.auth_enabled());
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }
}
