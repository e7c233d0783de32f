use crate::db::initialize::DEFAULT_TIME_BOXES;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Minutes east of UTC used to read `HH:MM` input. Unset means the
    /// system's local offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    /// Default filter for diagnostics; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Time boxes created when the database has none.
    #[serde(default = "default_time_boxes")]
    pub default_time_boxes: Vec<String>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_time_boxes() -> Vec<String> {
    DEFAULT_TIME_BOXES.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            utc_offset_minutes: None,
            log_level: default_log_level(),
            default_time_boxes: default_time_boxes(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("clockblocks")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".clockblocks")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("clockblocks.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("clockblocks.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse YAML; missing keys fall back to their defaults.
    pub fn parse(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let cfg: Config = serde_yaml::from_str(content)?;
        if let Some(m) = cfg.utc_offset_minutes
            && !(-24 * 60 < m && m < 24 * 60)
        {
            return Err(AppError::Config(format!(
                "utc_offset_minutes out of range: {m}"
            )));
        }
        Ok(cfg)
    }

    /// Write the configuration file (unless `is_test`) and make sure the
    /// database directory exists. Returns the database path.
    pub fn init_all(&self, is_test: bool) -> AppResult<PathBuf> {
        let db_path = PathBuf::from(&self.database);

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
            let yaml = serde_yaml::to_string(self)?;
            fs::write(Self::config_file(), yaml)?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
