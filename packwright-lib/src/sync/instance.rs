use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::{backend::ModpackId, compat::ContentType};

/// Suffix the instance manager appends to a file name to disable it.
pub const DISABLED_SUFFIX: &str = ".disabled";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct InstanceId(String);

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A game instance created from a modpack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub name: String,
    pub modpack_id: ModpackId,
}

/// One file found in an instance directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceFile {
    /// File name with any disabling suffix removed
    pub filename: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub enabled: bool,
}

impl InstanceFile {
    /// Builds an entry from a raw on-disk name, inferring the enabled state
    /// from the [`DISABLED_SUFFIX`] convention.
    pub fn from_filename(raw: &str, content_type: ContentType) -> Self {
        let (filename, enabled) = match raw.strip_suffix(DISABLED_SUFFIX) {
            Some(stripped) if !stripped.is_empty() => (stripped, false),
            _ => (raw, true),
        };

        Self {
            filename: filename.to_string(),
            content_type,
            enabled,
        }
    }
}

/// Point-in-time view of an instance directory, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    #[serde(default)]
    pub files: Vec<InstanceFile>,
    /// Raw loader build name installed in the instance
    #[serde(default)]
    pub loader_version: Option<String>,
    /// Config files modified in the instance relative to the modpack
    #[serde(default)]
    pub config_differences: usize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_filename() {
        let enabled = InstanceFile::from_filename("jei-1.20.1.jar", ContentType::Mod);
        assert!(enabled.enabled);
        assert_eq!(enabled.filename, "jei-1.20.1.jar");

        let disabled = InstanceFile::from_filename("jei-1.20.1.jar.disabled", ContentType::Mod);
        assert!(!disabled.enabled);
        assert_eq!(disabled.filename, "jei-1.20.1.jar");

        let odd = InstanceFile::from_filename(".disabled", ContentType::ResourcePack);
        assert!(odd.enabled);
        assert_eq!(odd.filename, ".disabled");
    }
}
