//! Configuration for the latent driver and CLI
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `latent.toml` in the working directory (optional), or an explicit path (required)
//! 3. Environment variables, e.g. `LATENT__DRIVER__TICK_MS=250` (`.env` files honoured)
//! 4. Builder overrides (CLI flags)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "LATENT";

const DEFAULT_CONFIG_NAME: &str = "latent";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub driver: DriverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Wall-clock milliseconds between steps; 0 steps as fast as possible
    pub tick_ms: u64,

    /// Fail the drive if the call is not done after this many steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            max_steps: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load from the default sources with no overrides
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    /// Render as TOML, in the shape `latent.toml` expects
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration as TOML")
    }

    fn validate(&self) -> Result<()> {
        if self.driver.max_steps == Some(0) {
            bail!("driver.max_steps must be at least 1");
        }
        if self.logging.filter.trim().is_empty() {
            bail!("logging.filter must not be empty");
        }
        Ok(())
    }
}

/// Builder for loading a Config with explicit overrides
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    tick_ms: Option<u64>,
    max_steps: Option<u64>,
    log_filter: Option<String>,
}

impl ConfigBuilder {
    /// Set the config file path (overrides default search)
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn tick_ms(mut self, tick_ms: Option<u64>) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn log_filter(mut self, filter: Option<String>) -> Self {
        self.log_filter = filter;
        self
    }

    pub fn build(self) -> Result<Config> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let file = match &self.config_path {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let loaded = config::Config::builder()
            .set_default("driver.tick_ms", defaults.driver.tick_ms)?
            .set_default("logging.filter", defaults.logging.filter)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("driver.tick_ms", self.tick_ms)?
            .set_override_option("driver.max_steps", self.max_steps)?
            .set_override_option("logging.filter", self.log_filter)?
            .build()
            .context("Failed to load configuration")?;

        let config: Config = loaded
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("latent-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.driver.tick_ms, 100);
        assert_eq!(config.driver.max_steps, None);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::builder()
            .tick_ms(Some(5))
            .max_steps(Some(60))
            .log_filter(Some("debug".to_string()))
            .build()
            .unwrap();

        assert_eq!(config.driver.tick_ms, 5);
        assert_eq!(config.driver.max_steps, Some(60));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_explicit_config_file() {
        let path = write_temp_config(
            r#"
            [driver]
            tick_ms = 20
            max_steps = 500

            [logging]
            filter = "latent_core=trace"
            "#,
        );

        let config = Config::builder()
            .config_path(Some(path.clone()))
            .build()
            .unwrap();
        assert_eq!(config.driver.tick_ms, 20);
        assert_eq!(config.driver.max_steps, Some(500));
        assert_eq!(config.logging.filter, "latent_core=trace");

        // Overrides beat the file
        let config = Config::builder()
            .config_path(Some(path.clone()))
            .tick_ms(Some(1))
            .build()
            .unwrap();
        assert_eq!(config.driver.tick_ms, 1);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("latent-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(Config::builder().config_path(Some(path)).build().is_err());
    }

    #[test]
    fn test_zero_max_steps_rejected() {
        let err = Config::builder().max_steps(Some(0)).build().unwrap_err();
        assert!(err.to_string().contains("max_steps"));
    }

    #[test]
    fn test_to_toml_round_trip() {
        let config = Config {
            driver: DriverConfig {
                tick_ms: 42,
                max_steps: Some(7),
            },
            logging: LoggingConfig::default(),
        };

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("tick_ms = 42"));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
