use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::compat::{Loader, ModpackTarget, ResourceId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct ModpackId(String);

impl From<&str> for ModpackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A persisted modpack. Having an id means its target is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modpack {
    pub id: ModpackId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub minecraft_version: String,
    pub loader: Loader,
    /// Raw loader build name, e.g. `forge-47.2.0`
    #[serde(default)]
    pub loader_version: Option<String>,
}

impl Modpack {
    pub fn target(&self) -> ModpackTarget {
        ModpackTarget {
            minecraft_version: self.minecraft_version.clone(),
            loader: self.loader.clone(),
        }
    }

    pub fn settings(&self) -> ModpackSettings {
        ModpackSettings {
            name: self.name.clone(),
            description: self.description.clone(),
            minecraft_version: self.minecraft_version.clone(),
            loader: self.loader.clone(),
            loader_version: self.loader_version.clone(),
        }
    }
}

/// The editable fields of a modpack, as submitted from a settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModpackSettings {
    pub name: String,
    pub description: Option<String>,
    pub minecraft_version: String,
    pub loader: Loader,
    pub loader_version: Option<String>,
}

impl ModpackSettings {
    pub(crate) fn apply_to(&self, modpack: &mut Modpack) {
        modpack.name = self.name.trim().to_string();
        modpack.description = self.description.clone();
        modpack.minecraft_version = self.minecraft_version.clone();
        modpack.loader = self.loader.clone();
        modpack.loader_version = self.loader_version.clone();
    }
}

/// Mods that would break if a mod were removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalImpact {
    pub dependents: Vec<ResourceId>,
}

impl RemovalImpact {
    pub fn is_safe(&self) -> bool {
        self.dependents.is_empty()
    }
}

/// A newer file available for a mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModUpdate {
    pub mod_id: ResourceId,
    pub current_version: String,
    pub latest_version: String,
    pub file_id: u64,
}
