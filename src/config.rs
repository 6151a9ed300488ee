use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::DEFAULT_TOP_N;
use crate::data::loader::{CachePolicy, DatasetLoader};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "recovery-panel.json";
/// Overrides [`CONFIG_FILE`] when set.
pub const CONFIG_ENV: &str = "RECOVERY_PANEL_CONFIG";

/// Panel settings. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub source_path: PathBuf,
    pub cache_path: PathBuf,
    pub cache_policy: CachePolicy,
    pub username: String,
    pub password: String,
    pub top_n: usize,
    /// Show the judicial balance column in the table.
    pub show_balance: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("palermo-planilhas-analisado_v3.xlsx"),
            cache_path: PathBuf::from("palermo-planilhas-analisado_v3.parquet"),
            cache_policy: CachePolicy::default(),
            username: "palermo".to_string(),
            password: "palermo".to_string(),
            top_n: DEFAULT_TOP_N,
            show_balance: false,
        }
    }
}

impl PanelConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config path from the environment, falling back to [`CONFIG_FILE`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    pub fn loader(&self) -> DatasetLoader {
        DatasetLoader::new(&self.source_path, &self.cache_path, self.cache_policy)
    }
}
