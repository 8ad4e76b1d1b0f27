//! Helper configuration.
//!
//! Loaded from `~/.orochi-helper/config.toml`. A missing file yields the
//! defaults; a malformed one is an error so typos don't silently fall back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HelperError, Result};
use crate::poll::PollOptions;

const CONFIG_DIR: &str = ".orochi-helper";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    pub poll: PollConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            timeout_ms: 5_000,
        }
    }
}

impl PollConfig {
    pub fn options(&self) -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(self.interval_ms),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Alignment scores below this need a rework verdict.
    pub alignment_threshold: i32,
    pub max_line_length: usize,
    /// Lines quoted in messages are cut to this many characters.
    pub truncate_length: usize,
    /// Responses with this many lines or fewer are flagged.
    pub min_line_count: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            alignment_threshold: 85,
            max_line_length: 240,
            truncate_length: 32,
            min_line_count: 3,
        }
    }
}

/// Returns the helper's home directory (~/.orochi-helper).
pub fn helper_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR))
        .ok_or(HelperError::HomeDirNotFound)
}

pub fn default_config_path() -> Result<PathBuf> {
    helper_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from `path`, or from the default location.
pub fn load_config(path: Option<PathBuf>) -> Result<HelperConfig> {
    let config_path = match path {
        Some(path) => path,
        None => default_config_path()?,
    };

    if !config_path.exists() {
        return Ok(HelperConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| HelperError::Io {
        context: format!("reading {}", config_path.display()),
        source,
    })?;
    parse_config(&config_path, &content)
}

fn parse_config(path: &Path, content: &str) -> Result<HelperConfig> {
    toml::from_str::<HelperConfig>(content).map_err(|err| HelperError::ConfigMalformed {
        path: path.to_path_buf(),
        details: err.to_string(),
    })
}
