//! TOML documents describing a modpack and an instance directory listing.

use std::{collections::HashSet, fs, path::Path};

use colored::Colorize;
use packwright_lib::{
    ContentType, Resource, ResourceId,
    backend::Modpack,
    sync::{InstanceFile, InstanceSnapshot, SyncManifest},
};
use serde::{Deserialize, de::DeserializeOwned};
use sysexits::ExitCode;
use tracing::debug;

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct PackEntry {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub locked: bool,
}

/// ```toml
/// [modpack]
/// id = "atm9"
/// name = "All the Mods 9"
/// minecraft_version = "1.20.1"
/// loader = "forge"
/// loader_version = "forge-47.2.0"
///
/// [[resources]]
/// id = "jei"
/// name = "Just Enough Items"
/// game_versions = ["1.20.1"]
/// loader = "forge"
/// filename = "jei-1.20.1.jar"
/// enabled = true
/// ```
#[derive(Debug, Deserialize)]
pub struct PackDocument {
    pub modpack: Modpack,
    #[serde(default)]
    pub resources: Vec<PackEntry>,
}

impl PackDocument {
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().map(|entry| &entry.resource)
    }

    pub fn locked(&self) -> HashSet<ResourceId> {
        self.ids_where(|entry| entry.locked)
    }

    pub fn disabled(&self) -> HashSet<ResourceId> {
        self.ids_where(|entry| !entry.enabled)
    }

    pub fn manifest(&self) -> SyncManifest {
        SyncManifest::from_resources(
            self.resources(),
            &self.disabled(),
            self.modpack.loader_version.as_deref(),
        )
    }

    fn ids_where(&self, predicate: impl Fn(&PackEntry) -> bool) -> HashSet<ResourceId> {
        self.resources
            .iter()
            .filter(|entry| predicate(entry))
            .map(|entry| entry.resource.id.clone())
            .collect()
    }
}

/// Raw file names per instance folder, disabled files keep their suffix.
#[derive(Debug, Default, Deserialize)]
pub struct InstanceDocument {
    #[serde(default)]
    pub loader_version: Option<String>,
    #[serde(default)]
    pub config_differences: usize,
    #[serde(default)]
    pub mods: Vec<String>,
    #[serde(default)]
    pub resourcepacks: Vec<String>,
    #[serde(default)]
    pub shaders: Vec<String>,
}

impl InstanceDocument {
    pub fn snapshot(&self) -> InstanceSnapshot {
        let folders = [
            (&self.mods, ContentType::Mod),
            (&self.resourcepacks, ContentType::ResourcePack),
            (&self.shaders, ContentType::Shader),
        ];

        InstanceSnapshot {
            files: folders
                .into_iter()
                .flat_map(|(names, content_type)| {
                    names
                        .iter()
                        .map(move |name| InstanceFile::from_filename(name, content_type))
                })
                .collect(),
            loader_version: self.loader_version.clone(),
            config_differences: self.config_differences,
        }
    }
}

pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T, ExitCode> {
    debug!("Reading {}", path.display());

    let contents = fs::read_to_string(path).map_err(|err| {
        eprintln!("{} {}: {err}", "error:".red().bold(), path.display());
        ExitCode::NoInput
    })?;

    toml::from_str(&contents).map_err(|err| {
        eprintln!("{} {}: {err}", "error:".red().bold(), path.display());
        ExitCode::DataErr
    })
}

pub fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::Ok
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::Software
        }
    }
}
