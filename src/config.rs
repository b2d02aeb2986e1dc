//! Pacing configuration for generated scripts.
//!
//! Defaults are embedded from `config.default.toml`. A user file overrides
//! individual keys: the one passed with `--config`, otherwise
//! `~/.config/demoer/config.toml` when it exists.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub pacing: Pacing,
}

/// The shell snippets and timings woven around every statement.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pacing {
    /// Characters per second for the typed preview.
    pub typing_rate: u32,
    /// Command the preview is piped through, before the rate argument.
    pub pacer: String,
    /// Seconds to wait after each statement.
    pub delay: f64,
    /// Command that blocks for one keystroke.
    pub pause: String,
    pub delimiter_prefix: String,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    pacing: PacingOverlay,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PacingOverlay {
    typing_rate: Option<u32>,
    pacer: Option<String>,
    delay: Option<f64>,
    pause: Option<String>,
    delimiter_prefix: Option<String>,
}

impl Default for Pacing {
    fn default() -> Self {
        Config::default_config().pacing
    }
}

impl Config {
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load the defaults and apply the user overlay, if any.
    ///
    /// An explicitly requested file must exist; the per-user file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default_config();
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => user_config_path().filter(|path| path.is_file()),
        };
        if let Some(path) = path {
            log::debug!("loading config overlay from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            config
                .apply_overlay_str(&content)
                .with_context(|| format!("Invalid config file: {}", path.display()))?;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_overlay_str(&mut self, toml_str: &str) -> Result<()> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        self.apply_overlay(overlay);
        Ok(())
    }

    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let p = overlay.pacing;
        if let Some(v) = p.typing_rate {
            self.pacing.typing_rate = v;
        }
        if let Some(v) = p.pacer {
            self.pacing.pacer = v;
        }
        if let Some(v) = p.delay {
            self.pacing.delay = v;
        }
        if let Some(v) = p.pause {
            self.pacing.pause = v;
        }
        if let Some(v) = p.delimiter_prefix {
            self.pacing.delimiter_prefix = v;
        }
    }

    fn validate(&self) -> Result<()> {
        let p = &self.pacing;
        anyhow::ensure!(p.typing_rate > 0, "pacing.typing_rate must be positive");
        anyhow::ensure!(
            p.delay.is_finite() && p.delay >= 0.0,
            "pacing.delay must be a non-negative number of seconds"
        );
        anyhow::ensure!(
            !p.delimiter_prefix.is_empty()
                && p
                    .delimiter_prefix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "pacing.delimiter_prefix must be a non-empty word of letters, digits and '_'"
        );
        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(Path::new(&home).join(".config/demoer/config.toml"))
}
