use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use derive_more::{Deref, Display as DisplayDerive, From};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Opaque identifier of a resource, as handed out by the backend.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    DisplayDerive,
    From,
    Deref,
)]
#[serde(transparent)]
pub struct ResourceId(String);

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContentType {
    #[default]
    Mod,
    ResourcePack,
    Shader,
}

/// The mod loading runtime a modpack or mod targets.
///
/// Parsing never fails: names are compared lower-cased, blank names and
/// `unknown` become [`Loader::Unknown`], and unrecognised names are kept
/// verbatim in [`Loader::Other`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Loader {
    Forge,
    NeoForge,
    Fabric,
    Quilt,
    #[default]
    Unknown,
    Other(String),
}

impl Loader {
    /// Whether this loader carries enough information to compare against.
    pub fn is_known(&self) -> bool {
        !matches!(self, Loader::Unknown)
    }

    /// Forge and NeoForge run each other's mods; every other pairing has to
    /// match exactly.
    pub fn runs_mods_for(&self, other: &Loader) -> bool {
        use Loader::*;

        self == other || matches!((self, other), (Forge, NeoForge) | (NeoForge, Forge))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Loader::Forge => "forge",
            Loader::NeoForge => "neoforge",
            Loader::Fabric => "fabric",
            Loader::Quilt => "quilt",
            Loader::Unknown => "unknown",
            Loader::Other(name) => name,
        }
    }
}

impl FromStr for Loader {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Ok(match name.as_str() {
            "" | "unknown" => Loader::Unknown,
            "forge" => Loader::Forge,
            "neoforge" => Loader::NeoForge,
            "fabric" => Loader::Fabric,
            "quilt" => Loader::Quilt,
            _ => Loader::Other(name),
        })
    }
}

impl From<String> for Loader {
    fn from(value: String) -> Self {
        let Ok(loader) = value.parse::<Loader>();
        loader
    }
}

impl From<&str> for Loader {
    fn from(value: &str) -> Self {
        Loader::from(value.to_string())
    }
}

impl From<Loader> for String {
    fn from(value: Loader) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Loader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog identifiers used to ask the backend for richer data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSource {
    pub project_id: u64,
    #[serde(default)]
    pub file_id: Option<u64>,
}

/// A mod, resource pack or shader as reported by the backend.
///
/// Resources are immutable snapshots. Changing one means asking the backend
/// to do it and reloading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub content_type: ContentType,
    /// Single declared Minecraft version, used when `game_versions` is empty
    #[serde(default)]
    pub game_version: Option<String>,
    /// Every Minecraft version the file declares support for
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loader: Loader,
    /// Human readable version label of the file itself
    #[serde(default)]
    pub version: String,
    /// File name on disk, used to match against instance contents
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub source: Option<ExternalSource>,
}

impl Resource {
    pub fn new(id: impl Into<ResourceId>, name: &str, content_type: ContentType) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            content_type,
            game_version: None,
            game_versions: Vec::new(),
            loader: Loader::Unknown,
            version: String::new(),
            filename: String::new(),
            source: None,
        }
    }

    pub fn with_game_version(mut self, version: &str) -> Self {
        self.game_version = Some(version.to_string());
        self
    }

    pub fn with_game_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.game_versions = versions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_loader(mut self, loader: impl Into<Loader>) -> Self {
        self.loader = loader.into();
        self
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        self
    }
}

/// The environment a modpack declares.
///
/// Once the modpack has a persisted identity these two fields are frozen,
/// see [`crate::validation::validate_update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModpackTarget {
    pub minecraft_version: String,
    pub loader: Loader,
}

impl ModpackTarget {
    pub fn new(minecraft_version: &str, loader: impl Into<Loader>) -> Self {
        Self {
            minecraft_version: minecraft_version.to_string(),
            loader: loader.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_loader_parsing_is_case_insensitive() {
        assert_eq!(Loader::from("NeoForge"), Loader::NeoForge);
        assert_eq!(Loader::from(" FABRIC "), Loader::Fabric);
        assert_eq!(Loader::from(""), Loader::Unknown);
        assert_eq!(Loader::from("Unknown"), Loader::Unknown);
        assert_eq!(Loader::from("LiteLoader"), Loader::Other("liteloader".into()));
    }

    #[test]
    fn test_forge_family() {
        assert!(Loader::Forge.runs_mods_for(&Loader::NeoForge));
        assert!(Loader::NeoForge.runs_mods_for(&Loader::Forge));
        assert!(!Loader::Quilt.runs_mods_for(&Loader::Fabric));
        assert!(!Loader::Fabric.runs_mods_for(&Loader::Quilt));
    }

    #[test]
    fn test_content_type_names() {
        assert_eq!(ContentType::ResourcePack.to_string(), "resourcepack");
        assert_eq!("Shader".parse::<ContentType>().unwrap(), ContentType::Shader);
    }
}
