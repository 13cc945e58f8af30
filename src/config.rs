use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "expense-tracker.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Api {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Log {
    pub file: PathBuf,
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            file: PathBuf::from("expense-tracker.log"),
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Settings {
    pub api: Api,
    pub log: Log,
}

impl Settings {
    /// Defaults, then the optional TOML file, then `EXPENSE__SECTION__KEY` variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let file = match path {
            Some(path) => File::from(Path::new(path)).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let config = Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("log.file", defaults.log.file.to_string_lossy().into_owned())?
            .set_default("log.level", defaults.log.level)?
            .add_source(file.format(FileFormat::Toml))
            .add_source(Environment::with_prefix("EXPENSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
