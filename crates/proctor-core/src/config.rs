//! proctor configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::session::SessionOptions;
use crate::swot::SwotThresholds;

/// Top-level proctor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProctorConfig {
    /// Default countdown hours when none are given on the command line.
    #[serde(default = "default_timer_hours")]
    pub default_timer_hours: u64,
    /// Default countdown minutes when none are given on the command line.
    #[serde(default = "default_timer_minutes")]
    pub default_timer_minutes: u64,
    /// Where results are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// SWOT classification margins.
    #[serde(default)]
    pub swot: SwotThresholds,
}

fn default_timer_hours() -> u64 {
    1
}
fn default_timer_minutes() -> u64 {
    30
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./proctor-results")
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            default_timer_hours: default_timer_hours(),
            default_timer_minutes: default_timer_minutes(),
            output_dir: default_output_dir(),
            swot: SwotThresholds::default(),
        }
    }
}

impl ProctorConfig {
    /// Session options for the given timer, falling back to the configured
    /// defaults for whichever part is missing.
    pub fn session_options(
        &self,
        hours: Option<u64>,
        minutes: Option<u64>,
    ) -> Result<SessionOptions, SessionError> {
        let (hours, minutes) = match (hours, minutes) {
            (None, None) => (self.default_timer_hours, self.default_timer_minutes),
            (h, m) => (h.unwrap_or(0), m.unwrap_or(0)),
        };
        Ok(SessionOptions::from_hours_minutes(hours, minutes)?.with_thresholds(self.swot))
    }
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order without a path:
/// 1. `proctor.toml` in the current directory
/// 2. `~/.config/proctor/config.toml`
///
/// Environment variable override: `PROCTOR_OUTPUT_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<ProctorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("proctor.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => ProctorConfig::default(),
    };

    if let Ok(dir) = std::env::var("PROCTOR_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a TOML string into a config.
pub fn parse_config_str(content: &str) -> Result<ProctorConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("proctor"))
}
