//! User configuration and on-disk locations.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::ProductionCostFormula;
use crate::models::DEFAULT_CONTINGENCY_PERCENT;
use crate::workbook::WorkbookOptions;

/// Overrides the SQLite file location.
pub const DB_PATH_ENV: &str = "VFXBUDGET_DB";
const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "vfxbudget.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Contingency for scenarios created from scratch.
    pub default_contingency_percent: Decimal,
    pub production_cost_formula: ProductionCostFormula,
    /// Budget tab opened when `--tab` is not given.
    pub default_tab: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_contingency_percent: Decimal::from(DEFAULT_CONTINGENCY_PERCENT),
            production_cost_formula: ProductionCostFormula::default(),
            default_tab: None,
        }
    }
}

impl From<&Config> for WorkbookOptions {
    fn from(config: &Config) -> Self {
        Self {
            default_contingency_percent: config.default_contingency_percent,
            production_cost_formula: config.production_cost_formula,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "vfxbudget", "VfxBudget")
}

pub fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// `$VFXBUDGET_DB` if set, otherwise `vfxbudget.db` in the platform data
/// directory. The parent directory is created if needed.
pub fn data_file_path() -> Result<PathBuf> {
    let path = match std::env::var_os(DB_PATH_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => {
            let dirs = project_dirs()
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
            dirs.data_dir().join(DB_FILE)
        }
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    }
    Ok(path)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).context("Failed to parse config")?;
    if config.default_contingency_percent < Decimal::ZERO {
        bail!(
            "default_contingency_percent must not be negative, got {}",
            config.default_contingency_percent
        );
    }
    if config.default_tab.as_deref().is_some_and(|t| t.trim().is_empty()) {
        bail!("default_tab must not be empty");
    }
    Ok(config)
}

/// Read a config file. A missing file gives defaults silently; anything
/// unreadable or invalid is logged and also gives defaults.
pub fn load_config_from(path: &Path) -> Config {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Config::default(),
        Err(e) => {
            log::warn!("Failed to read config file {}: {e}", path.display());
            return Config::default();
        }
    };
    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{}: {e:#}. Using defaults.", path.display());
            Config::default()
        }
    }
}

pub fn load_config() -> Config {
    match config_file_path() {
        Some(path) => load_config_from(&path),
        None => {
            log::debug!("No config directory available. Using default config.");
            Config::default()
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
