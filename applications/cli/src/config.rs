//! Shell configuration
use crate::error::{CliError, Result};
use encore_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read when no `--config` is given, if present
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default = "default_sink")]
    pub sink: SinkSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SinkSettings {
    /// Simulated playback runs this many times faster than real time
    #[serde(default = "default_speed")]
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Session used by commands without an `@session` prefix
    #[serde(default = "default_session_name")]
    pub default: String,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `encore.toml` in the working
    /// directory is used when present. `ENCORE_`-prefixed variables override
    /// both, with `__` between nested keys (`ENCORE_SINK__SPEED=4`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.sink.speed.is_finite() && self.sink.speed > 0.0) {
            return Err(CliError::Config(format!(
                "sink speed must be a positive number, got {}",
                self.sink.speed
            )));
        }

        if self.player.page_size == 0 {
            return Err(CliError::Config(
                "player page_size must be at least 1".to_string(),
            ));
        }

        if self.player.event_capacity == 0 {
            return Err(CliError::Config(
                "player event_capacity must be at least 1".to_string(),
            ));
        }

        let session = &self.session.default;
        if session.is_empty() || session.chars().any(char::is_whitespace) {
            return Err(CliError::Config(format!(
                "invalid default session name {:?}",
                session
            )));
        }

        Ok(())
    }
}

// Default values
fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        path: default_catalog_path(),
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.toml")
}

fn default_sink() -> SinkSettings {
    SinkSettings {
        speed: default_speed(),
    }
}

fn default_speed() -> f64 {
    1.0
}

fn default_session() -> SessionSettings {
    SessionSettings {
        default: default_session_name(),
    }
}

fn default_session_name() -> String {
    "main".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            player: PlayerConfig::default(),
            sink: default_sink(),
            session: default_session(),
        }
    }
}
