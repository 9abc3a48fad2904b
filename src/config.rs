//! Appliance configuration, read from a TOML file.
//!
//! Lookup order: `$PODBOX_CONFIG`, then `<config_dir>/podbox/config.toml`.
//! A missing file falls back to the built-in catalog and defaults.

use crate::{CatalogEntry, expand_tilde, input::parse_key};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

const CONFIG_ENV: &str = "PODBOX_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: Vec<CatalogEntry>,
    pub playback: PlaybackConfig,
    pub display: DisplayConfig,
    pub feed: FeedConfig,
    pub keys: KeysConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub default_volume: u8,
    pub volume_step: u8,
    pub seek_secs: u32,
    pub poll_interval_ms: u64,
    pub startup_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub refresh_ms: u64,
    pub marquee_step: usize,
    pub marquee_gap: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    pub selection: KeyBindingConfig,
    pub volume: KeyBindingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyBindingConfig {
    pub cw: String,
    pub ccw: String,
    pub button: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            catalog: default_catalog(),
            playback: PlaybackConfig::default(),
            display: DisplayConfig::default(),
            feed: FeedConfig::default(),
            keys: KeysConfig::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            default_volume: 50,
            volume_step: 5,
            seek_secs: 30,
            poll_interval_ms: 100,
            startup_timeout_ms: 15_000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            refresh_ms: crate::REFRESH_RATE.as_millis() as u64,
            marquee_step: 1,
            marquee_gap: 4,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            connect_timeout_secs: 5,
            read_timeout_secs: 20,
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            selection: KeyBindingConfig::new("Right", "Left", "Enter"),
            volume: KeyBindingConfig::new("Up", "Down", "m"),
        }
    }
}

impl KeyBindingConfig {
    fn new(cw: &str, ccw: &str, button: &str) -> Self {
        KeyBindingConfig {
            cw: cw.to_string(),
            ccw: ccw.to_string(),
            button: button.to_string(),
        }
    }
}

fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(
            "Marketplace",
            "https://www.marketplace.org/feed/podcast/marketplace/",
        ),
        CatalogEntry::new("Wait Wait...", "https://feeds.npr.org/344098539/podcast.xml"),
        CatalogEntry::new("No Stupid ?s", "https://feeds.simplecast.com/dfh_verV"),
        CatalogEntry::new("Freakanomics", "https://feeds.simplecast.com/Y8lFbOT4"),
    ]
}

impl AppConfig {
    /// Resolve the config location and load it, or fall back to defaults
    /// when no file exists there.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => Some(expand_tilde(PathBuf::from(p))?),
            None => dirs::config_dir().map(|dir| dir.join("podbox").join("config.toml")),
        };

        match path {
            Some(p) if p.exists() => Self::load_from_file(&p),
            Some(p) => {
                tracing::info!(path = %p.display(), "No config file found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_str = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config at {}", path.display()))?;
        let config = Self::from_toml(&file_str)
            .with_context(|| format!("Invalid config at {}", path.display()))?;

        tracing::info!(path = %path.display(), entries = config.catalog.len(), "Config loaded");
        Ok(config)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let config = toml::from_str::<AppConfig>(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.is_empty() {
            bail!("Catalog is empty, at least one [[catalog]] entry is required");
        }
        if self.playback.default_volume > 100 {
            bail!(
                "default_volume must be within 0..=100, got {}",
                self.playback.default_volume
            );
        }
        if self.playback.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.display.refresh_ms == 0 {
            bail!("refresh_ms must be greater than zero");
        }
        for binding in [&self.keys.selection, &self.keys.volume] {
            for key in [&binding.cw, &binding.ccw, &binding.button] {
                parse_key(key)?;
            }
        }
        Ok(())
    }
}

impl PlaybackConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

impl DisplayConfig {
    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}

impl FeedConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
