use serde::{Deserialize, Serialize};

use crate::compat::{ContentType, ModpackTarget, Resource};

/// How many declared versions are spelled out in an incompatibility reason.
const LISTED_VERSIONS: usize = 3;

/// The verdict for one resource against one modpack target.
///
/// A warning only ever accompanies a compatible verdict, so it is modelled as
/// its own variant rather than a flag next to `compatible`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Compatibility {
    Compatible,
    /// Usable, but the user should decide (e.g. a loader mismatch).
    Warning(String),
    /// Targets a different Minecraft version.
    Incompatible(String),
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        !matches!(self, Compatibility::Incompatible(_))
    }

    pub fn has_warning(&self) -> bool {
        matches!(self, Compatibility::Warning(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Compatibility::Compatible => None,
            Compatibility::Warning(reason) | Compatibility::Incompatible(reason) => Some(reason),
        }
    }

    /// Ordering used by the library list: clean, then warnings, then
    /// incompatible.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Compatibility::Compatible => 0,
            Compatibility::Warning(_) => 1,
            Compatibility::Incompatible(_) => 2,
        }
    }
}

/// Decide whether `resource` fits a modpack targeting `target`.
///
/// A missing target means the modpack is still loading, which is treated as
/// compatible so nothing flashes red in the meantime.
pub fn classify(resource: &Resource, target: Option<&ModpackTarget>) -> Compatibility {
    let Some(target) = target else {
        return Compatibility::Compatible;
    };

    let loader_warning = loader_warning(resource, target);

    if let Some(reason) = version_incompatibility(resource, &target.minecraft_version) {
        return Compatibility::Incompatible(reason);
    }

    match loader_warning {
        Some(reason) => Compatibility::Warning(reason),
        None => Compatibility::Compatible,
    }
}

/// Prefix match in either direction, so `1.20` and `1.20.1` match no matter
/// which side declares which.
pub fn versions_match(a: &str, b: &str) -> bool {
    a == b || a.starts_with(b) || b.starts_with(a)
}

fn loader_warning(resource: &Resource, target: &ModpackTarget) -> Option<String> {
    // Resource packs and shaders are loader agnostic
    if resource.content_type != ContentType::Mod {
        return None;
    }

    let (mod_loader, pack_loader) = (&resource.loader, &target.loader);
    if !mod_loader.is_known() || !pack_loader.is_known() || mod_loader.runs_mods_for(pack_loader) {
        return None;
    }

    Some(format!("{mod_loader} mod in {pack_loader} pack"))
}

fn version_incompatibility(resource: &Resource, pack_version: &str) -> Option<String> {
    if pack_version.is_empty() {
        return None;
    }

    if !resource.game_versions.is_empty() {
        if resource
            .game_versions
            .iter()
            .any(|v| versions_match(v, pack_version))
        {
            return None;
        }

        let listed = resource
            .game_versions
            .iter()
            .take(LISTED_VERSIONS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let more = if resource.game_versions.len() > LISTED_VERSIONS {
            "..."
        } else {
            ""
        };

        return Some(format!(
            "Supports MC {listed}{more}, modpack is {pack_version}"
        ));
    }

    let declared = resource.game_version.as_deref().filter(|v| !v.is_empty())?;
    if versions_match(declared, pack_version)
        || declared.contains(pack_version)
        || pack_version.contains(declared)
    {
        return None;
    }

    Some(format!("For MC {declared}, modpack is {pack_version}"))
}
