use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use discovery::search::{
    DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE_WINDOW, pagination::validate_items_per_page, validate_page_window,
};

/// Config file looked up in the current directory when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "discovery.toml";

/// Configuration stored in discovery.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Catalog JSON file, relative paths resolve against the config file's directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    /// Pages listed on each side of the current page in the page strip
    #[serde(default = "default_page_window")]
    pub page_window: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            page_window: default_page_window(),
        }
    }
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_page_window() -> usize {
    DEFAULT_PAGE_WINDOW
}

/// Loaded configuration plus where it came from
#[derive(Debug)]
pub struct RunContext {
    pub config: DiscoveryConfig,
    pub config_path: Option<PathBuf>,
}

impl RunContext {
    /// Load the explicit config file, or `discovery.toml` from the current
    /// directory if present, or fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from_dir(&current_dir)
    }

    /// Look for the default config file inside `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            Self::from_file(&candidate)
        } else {
            Ok(Self {
                config: DiscoveryConfig::default(),
                config_path: None,
            })
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DiscoveryConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        validate_items_per_page(config.display.items_per_page)
            .and_then(|()| validate_page_window(config.display.page_window))
            .with_context(|| format!("Invalid [display] section in {}", path.display()))?;

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Resolve the catalog path: CLI argument (or `DISCOVERY_CATALOG`) first,
    /// then the configured path
    pub fn catalog_path(&self, cli_value: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = cli_value {
            return Ok(path);
        }

        let configured = self.config.catalog.path.clone().context(
            "No catalog given. Pass a catalog path, set DISCOVERY_CATALOG, or set [catalog] path in discovery.toml.",
        )?;

        if configured.is_absolute() {
            return Ok(configured);
        }
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(base.join(configured))
    }
}
