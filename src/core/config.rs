use crate::core::dirs::get_data_directory;
use crate::core::error::Result;
use crate::core::store::read_json;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const REGISTRY_FILE: &str = "repositories.json";
pub const SETTINGS_FILE: &str = "settings.json";
pub const LOCK_DIR: &str = "locks";

/// Tunables read from `config.json`; the data directory itself is never part
/// of the document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub git_binary: String,
    pub default_remote: String,
    pub protected_branches: Vec<String>,
    pub default_log_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            git_binary: "git".to_string(),
            default_remote: "origin".to_string(),
            protected_branches: ["main", "master", "develop", "dev"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_log_limit: 100,
        }
    }
}

impl ServiceConfig {
    /// Load the config for `data_dir`, falling back to defaults for a missing
    /// file or missing fields.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config: ServiceConfig =
            read_json(&data_dir.join(CONFIG_FILE))?.unwrap_or_default();
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    /// Load the config from the default data directory.
    pub fn load_default() -> Result<Self> {
        Self::load(&get_data_directory()?)
    }

    /// Defaults rooted at `data_dir`, without reading anything from disk.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(REGISTRY_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    /// Directory of per-repository lock files shared by every process using
    /// this data directory.
    pub fn lock_dir(&self) -> PathBuf {
        self.data_dir.join(LOCK_DIR)
    }

    /// Case-insensitive membership in the protected branch set.
    pub fn is_protected(&self, branch: &str) -> bool {
        self.protected_branches
            .iter()
            .any(|p| p.eq_ignore_ascii_case(branch))
    }
}
