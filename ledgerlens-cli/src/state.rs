use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn ledgerlens_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ledgerlens"))
}

pub fn ensure_ledgerlens_home() -> Result<PathBuf> {
    let dir = ledgerlens_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Log file used while the TUI owns the terminal
pub fn tui_log_path() -> Result<PathBuf> {
    Ok(ensure_ledgerlens_home()?.join("ledgerlens.log"))
}
