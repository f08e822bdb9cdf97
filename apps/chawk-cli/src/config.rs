use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chawk_users::ChawkConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variables with this prefix override file values;
/// `__` separates nested keys (`CHAWK__HTTP__REQUEST_TIMEOUT=30s`).
pub const ENV_PREFIX: &str = "CHAWK__";

/// Everything the binary reads from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub learn: ChawkConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for chawk crates when neither `RUST_LOG` nor `-v` is given
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl AppConfig {
    /// Layered load: defaults, then the YAML file, then `CHAWK__*` variables.
    ///
    /// # Errors
    /// Fails when the file is missing or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            anyhow::ensure!(
                path.is_file(),
                "config file does not exist: {}",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.learn.base_url = base_url;
        }
        if let Some(token_file) = overrides.token_file {
            self.learn.token_file = Some(token_file);
        }
    }

    /// YAML rendering with the client secret masked.
    ///
    /// # Errors
    /// Fails only if serialization fails.
    pub fn to_redacted_yaml(&self) -> Result<String> {
        let redacted = Self {
            learn: self.learn.redacted(),
            logging: self.logging.clone(),
        };
        serde_saphyr::to_string(&redacted).context("failed to render configuration")
    }
}
