//! User preferences, persisted as TOML in the XDG config directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{compat::CompatFilter, fs::config_dir, sync::SyncMode};

const CURRENT_CONFIG_VERSION: u16 = 1;
const FILE_NAME: &str = "core.toml";

/// Shared handle to the core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    version: u16,
    pub sync: SyncConfig,
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Mode used for the automatic sync before launching
    pub prelaunch_mode: SyncMode,
    /// Mode preselected when the user syncs by hand
    pub default_mode: SyncMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub filter: CompatFilter,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            sync: SyncConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            prelaunch_mode: SyncMode::NewOnly,
            default_mode: SyncMode::Overwrite,
        }
    }
}

impl CoreConfig {
    /// Load the configuration from the XDG config directory, writing the
    /// defaults there if no file exists yet.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            debug!("No configuration at {}, writing defaults", path.display());
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<(), Error> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn into_handle(self) -> Cfg {
        Arc::new(RwLock::new(self))
    }

    fn path() -> Result<PathBuf, Error> {
        Ok(config_dir()?.join(FILE_NAME))
    }
}
