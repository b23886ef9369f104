//! Configuration resolution for Sealpost.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/sealpost/settings.json)
//! 3. Explicit config file passed by the caller
//! 4. Environment variables (highest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Complete Sealpost configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub psk: PskConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How PSK envelopes turn a passphrase into key bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PskDerivation {
    /// MD5 hex digest, byte-narrowed. Wire compatible with deployed peers.
    #[default]
    Legacy,
    /// HKDF-SHA256 over the passphrase. Not readable by legacy peers.
    HkdfSha256,
}

impl FromStr for PskDerivation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "hkdf-sha256" | "hkdf" => Ok(Self::HkdfSha256),
            other => Err(Error::Config(format!("unknown PSK derivation: {other}"))),
        }
    }
}

/// PSK envelope configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PskConfig {
    #[serde(default)]
    pub derivation: PskDerivation,
}

/// Logging configuration consumed by [`crate::tracing_init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `RUST_LOG` filter when the env-var is not set.
    pub level: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "sealpost_crypto=info".to_string(),
            json: false,
        }
    }
}

/// Load configuration with hierarchical resolution.
///
/// A missing global file is skipped; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let global = global_config_path().filter(|path| path.exists());
    let layers: Vec<&Path> = global.as_deref().into_iter().chain(explicit).collect();
    resolve_config(&layers, |key| std::env::var(key).ok())
}

/// Merge config files in order over the defaults, then apply overrides.
///
/// Each file only replaces the values it mentions.
fn resolve_config(layers: &[&Path], lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let mut config = Config::default();
    for path in layers {
        let overlay = load_config_file(path)?;
        merge_config(&mut config, overlay);
    }
    apply_overrides(&mut config, lookup);
    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".sealpost").join("settings.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/sealpost/settings.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("sealpost").join("settings.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

/// A config file as written: every section and value is optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    psk: Option<PskOverlay>,
    logging: Option<LoggingOverlay>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PskOverlay {
    derivation: Option<PskDerivation>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingOverlay {
    level: Option<String>,
    json: Option<bool>,
}

fn load_config_file(path: &Path) -> Result<ConfigOverlay> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: ConfigOverlay) {
    if let Some(psk) = overlay.psk {
        if let Some(derivation) = psk.derivation {
            base.psk.derivation = derivation;
        }
    }
    if let Some(logging) = overlay.logging {
        if let Some(level) = logging.level {
            base.logging.level = level;
        }
        if let Some(json) = logging.json {
            base.logging.json = json;
        }
    }
}

/// Apply `SEALPOST_*` overrides read through `lookup`.
///
/// Unparseable values are logged and ignored.
fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("SEALPOST_PSK_DERIVATION") {
        match val.parse() {
            Ok(derivation) => config.psk.derivation = derivation,
            Err(e) => tracing::warn!(error = %e, "ignoring SEALPOST_PSK_DERIVATION"),
        }
    }
    if let Some(val) = lookup("SEALPOST_LOG_LEVEL") {
        config.logging.level = val;
    }
    if let Some(val) = lookup("SEALPOST_LOG_JSON") {
        match val.parse() {
            Ok(json) => config.logging.json = json,
            Err(e) => tracing::warn!(error = %e, "ignoring SEALPOST_LOG_JSON"),
        }
    }
}
