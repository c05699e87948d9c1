//! Checks run on modpack settings before anything is sent to the backend.

use thiserror::Error;

use crate::backend::{Modpack, ModpackSettings};

const MAX_NAME_LEN: usize = 64;
const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Modpack name cannot be empty")]
    EmptyName,
    #[error("Modpack name cannot be longer than {MAX_NAME_LEN} characters")]
    NameTooLong,
    #[error("Modpack name cannot contain '{0}'")]
    ForbiddenCharacter(char),
    #[error("Minecraft version is required")]
    MissingMinecraftVersion,
    #[error("Mod loader is required")]
    MissingLoader,
    #[error("The {0} of an existing modpack cannot be changed")]
    TargetLocked(&'static str),
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c) || c.is_control()) {
        return Err(ValidationError::ForbiddenCharacter(c));
    }

    Ok(())
}

/// Validates the settings of a modpack that has not been created yet.
pub fn validate_new(settings: &ModpackSettings) -> Result<(), ValidationError> {
    validate_name(&settings.name)?;

    if settings.minecraft_version.trim().is_empty() {
        return Err(ValidationError::MissingMinecraftVersion);
    }
    if !settings.loader.is_known() {
        return Err(ValidationError::MissingLoader);
    }

    Ok(())
}

/// Validates edits to a persisted modpack. Its Minecraft version and loader
/// are frozen, since every compatibility verdict depends on them.
pub fn validate_update(
    existing: &Modpack,
    settings: &ModpackSettings,
) -> Result<(), ValidationError> {
    validate_name(&settings.name)?;

    if settings.minecraft_version != existing.minecraft_version {
        return Err(ValidationError::TargetLocked("Minecraft version"));
    }
    if settings.loader != existing.loader {
        return Err(ValidationError::TargetLocked("loader"));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compat::Loader;

    fn modpack() -> Modpack {
        Modpack {
            id: "pack".into(),
            name: "All the Things".into(),
            description: None,
            minecraft_version: "1.20.1".into(),
            loader: Loader::Forge,
            loader_version: Some("forge-47.2.0".into()),
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert_eq!(validate_name(&"a".repeat(65)), Err(ValidationError::NameTooLong));
        assert_eq!(validate_name("a/b"), Err(ValidationError::ForbiddenCharacter('/')));
        assert!(validate_name("Create: Above and Beyond").is_err());
        assert!(validate_name("Create Above and Beyond").is_ok());
    }

    #[test]
    fn test_validate_new() {
        let mut settings = modpack().settings();
        assert!(validate_new(&settings).is_ok());

        settings.loader = Loader::Unknown;
        assert_eq!(validate_new(&settings), Err(ValidationError::MissingLoader));

        settings.minecraft_version.clear();
        assert_eq!(validate_new(&settings), Err(ValidationError::MissingMinecraftVersion));
    }

    #[test]
    fn test_target_is_locked_after_creation() {
        let existing = modpack();

        let mut settings = existing.settings();
        settings.name = "Renamed".into();
        settings.loader_version = Some("forge-47.3.0".into());
        assert!(validate_update(&existing, &settings).is_ok());

        let mut settings = existing.settings();
        settings.minecraft_version = "1.21".into();
        assert_eq!(
            validate_update(&existing, &settings),
            Err(ValidationError::TargetLocked("Minecraft version"))
        );

        let mut settings = existing.settings();
        settings.loader = Loader::NeoForge;
        assert_eq!(
            validate_update(&existing, &settings),
            Err(ValidationError::TargetLocked("loader"))
        );
    }
}
