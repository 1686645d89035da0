//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix `ACTON_DATA_`, nested keys separated by `__`,
//!    e.g. `ACTON_DATA_PAGINATION__MAX_PAGE_SIZE=100`)
//! 2. Current working directory: `./acton-data.toml`
//! 3. XDG config directory: `~/.config/acton-data/acton-data.toml`
//! 4. System directory: `/etc/acton-data/acton-data.toml`
//! 5. Default values
//!
//! ```toml
//! [pagination]
//! default_page_size = 25
//! max_page_size = 200
//!
//! [logging]
//! log_level = "debug"
//! json = false
//! ```

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::{PageRequest, PageRequestValidator};

const CONFIG_FILE: &str = "acton-data.toml";
const ENV_PREFIX: &str = "ACTON_DATA_";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Paging defaults and limits
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Paging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when a caller does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Largest page a caller may request; unlimited when unset
    #[serde(default)]
    pub max_page_size: Option<i64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: None,
        }
    }
}

impl PaginationConfig {
    /// Validator enforcing these limits
    #[must_use]
    pub fn validator(&self) -> PageRequestValidator {
        match self.max_page_size {
            Some(max) => PageRequestValidator::new().with_max_page_size(max),
            None => PageRequestValidator::new(),
        }
    }

    /// Page request, falling back to the default page size
    #[must_use]
    pub fn request(&self, page_index: i64, page_size: Option<i64>) -> PageRequest {
        PageRequest::new(page_index, page_size.unwrap_or(self.default_page_size))
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"acton_data=debug"`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of human-readable text
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_page_size() -> i64 {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    true
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Every config file found is merged, nearer files overriding farther
    /// ones; environment variables override all files.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Candidate config files, highest priority first
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("acton-data");
        if let Some(path) = xdg_dirs.find_config_file(CONFIG_FILE) {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc/acton-data").join(CONFIG_FILE));
        paths
    }
}
