use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::ensure_ledgerlens_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Origin serving `/api/getbalance`
    pub base_url: String,
    /// Per-request timeout. Unset means wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// IANA zone used for transaction dates
    pub timezone: String,
    pub mode: DisplayMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Tui,
    Plain,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            mode: DisplayMode::Tui,
        }
    }
}

impl ServerSection {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl DisplaySection {
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {name}"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ledgerlens_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Defaults when `path` does not exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))
}

/// Write the default config unless one is already there. Returns whether a file was written.
pub fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config_to(path, &Config::default())?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_config_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}
