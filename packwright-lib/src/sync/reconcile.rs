use std::collections::{HashMap, HashSet};

use crate::{
    compat::ContentType,
    sync::{
        DisabledIssue, DisabledMismatch, FileDiff, InstanceSnapshot, SyncManifest, SyncStatus,
        loader_versions_match,
    },
};

/// Compares what a modpack declares against what its instance contains.
///
/// Undeclared resource packs and shaders are still listed in
/// `extra_in_instance` but are not counted as differences, since no sync mode
/// removes them.
pub fn reconcile(manifest: &SyncManifest, snapshot: &InstanceSnapshot) -> SyncStatus {
    let present: HashMap<&str, _> = snapshot
        .files
        .iter()
        .map(|file| (file.filename.as_str(), file))
        .collect();
    let declared: HashSet<&str> = manifest
        .files
        .iter()
        .map(|file| file.filename.as_str())
        .collect();

    let mut missing_in_instance = Vec::new();
    let mut disabled_mismatch = Vec::new();

    for file in &manifest.files {
        match present.get(file.filename.as_str()) {
            None if file.enabled => {
                missing_in_instance.push(FileDiff::new(&file.filename, file.content_type))
            }
            None => {}
            Some(found) if found.enabled != file.enabled => {
                disabled_mismatch.push(DisabledMismatch {
                    filename: file.filename.clone(),
                    issue: if file.enabled {
                        DisabledIssue::EnabledInModpack
                    } else {
                        DisabledIssue::DisabledInModpack
                    },
                })
            }
            Some(_) => {}
        }
    }

    let extra_in_instance: Vec<_> = snapshot
        .files
        .iter()
        .filter(|file| !declared.contains(file.filename.as_str()))
        .map(|file| FileDiff::new(&file.filename, file.content_type))
        .collect();

    let loader_version_mismatch = match (&manifest.loader_version, &snapshot.loader_version) {
        (Some(wanted), Some(installed)) => !loader_versions_match(wanted, installed),
        (Some(_), None) => true,
        (None, _) => false,
    };

    let extra_mods = extra_in_instance
        .iter()
        .filter(|diff| diff.content_type == ContentType::Mod)
        .count();
    let total_differences = missing_in_instance.len()
        + extra_mods
        + disabled_mismatch.len()
        + snapshot.config_differences;

    SyncStatus {
        needs_sync: total_differences > 0 || loader_version_mismatch,
        missing_in_instance,
        extra_in_instance,
        disabled_mismatch,
        config_differences: snapshot.config_differences,
        total_differences,
        loader_version_mismatch,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sync::{DeclaredFile, InstanceFile};

    fn declared(filename: &str, enabled: bool) -> DeclaredFile {
        DeclaredFile {
            filename: filename.into(),
            content_type: ContentType::Mod,
            enabled,
        }
    }

    fn manifest(files: Vec<DeclaredFile>) -> SyncManifest {
        SyncManifest {
            files,
            loader_version: None,
        }
    }

    fn snapshot(files: &[(&str, ContentType)]) -> InstanceSnapshot {
        InstanceSnapshot {
            files: files
                .iter()
                .map(|(name, kind)| InstanceFile::from_filename(name, *kind))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_differences() {
        let manifest = manifest(vec![declared("a.jar", true), declared("b.jar", false)]);
        let snapshot = snapshot(&[
            ("a.jar", ContentType::Mod),
            ("b.jar.disabled", ContentType::Mod),
        ]);

        let status = reconcile(&manifest, &snapshot);

        assert!(!status.needs_sync);
        assert_eq!(status.total_differences, 0);
        assert_eq!(status, SyncStatus::default());
    }

    #[test]
    fn test_missing_file() {
        let manifest = manifest(vec![declared("a.jar", true)]);

        let status = reconcile(&manifest, &InstanceSnapshot::default());

        assert_eq!(
            status.missing_in_instance,
            vec![FileDiff::new("a.jar", ContentType::Mod)]
        );
        assert!(status.needs_sync);
        assert_eq!(status.total_differences, 1);
    }

    #[test]
    fn test_absent_disabled_file_is_not_missing() {
        let manifest = manifest(vec![declared("b.jar", false)]);

        let status = reconcile(&manifest, &InstanceSnapshot::default());

        assert!(status.missing_in_instance.is_empty());
        assert!(!status.needs_sync);
    }

    #[test]
    fn test_extra_mod_vs_extra_resourcepack() {
        let manifest = manifest(vec![]);
        let snapshot = snapshot(&[
            ("x.jar", ContentType::Mod),
            ("y.zip", ContentType::ResourcePack),
        ]);

        let status = reconcile(&manifest, &snapshot);

        assert_eq!(status.extra_in_instance.len(), 2);
        assert_eq!(status.total_differences, 1);
        assert!(status.needs_sync);

        let removable: Vec<_> = status.removal_candidates().map(|d| d.filename.as_str()).collect();
        let preserved: Vec<_> = status.preserved_extras().map(|d| d.filename.as_str()).collect();
        assert_eq!(removable, ["x.jar"]);
        assert_eq!(preserved, ["y.zip"]);
    }

    #[test]
    fn test_extra_resourcepack_alone_needs_no_sync() {
        let snapshot = snapshot(&[
            ("y.zip", ContentType::ResourcePack),
            ("s.zip", ContentType::Shader),
        ]);

        let status = reconcile(&manifest(vec![]), &snapshot);

        assert!(!status.needs_sync);
        assert_eq!(status.total_differences, 0);
        assert_eq!(status.extra_in_instance.len(), 2);
    }

    #[test]
    fn test_disabled_mismatch() {
        let manifest = manifest(vec![declared("a.jar", true), declared("b.jar", false)]);
        let snapshot = snapshot(&[
            ("a.jar.disabled", ContentType::Mod),
            ("b.jar", ContentType::Mod),
        ]);

        let status = reconcile(&manifest, &snapshot);

        assert_eq!(
            status.disabled_mismatch,
            vec![
                DisabledMismatch {
                    filename: "a.jar".into(),
                    issue: DisabledIssue::EnabledInModpack,
                },
                DisabledMismatch {
                    filename: "b.jar".into(),
                    issue: DisabledIssue::DisabledInModpack,
                },
            ]
        );
        assert_eq!(status.total_differences, 2);
    }

    #[test]
    fn test_config_differences_count() {
        let mut snapshot = InstanceSnapshot::default();
        snapshot.config_differences = 2;

        let status = reconcile(&manifest(vec![]), &snapshot);

        assert!(status.needs_sync);
        assert_eq!(status.total_differences, 2);
    }

    #[test]
    fn test_loader_version_mismatch() {
        let mut manifest = manifest(vec![]);
        manifest.loader_version = Some("47.2.0".into());

        let mut snapshot = InstanceSnapshot::default();
        snapshot.loader_version = Some("1.20.1-forge-47.2.0".into());
        assert!(!reconcile(&manifest, &snapshot).needs_sync);

        snapshot.loader_version = Some("forge-47.1.0".into());
        let status = reconcile(&manifest, &snapshot);
        assert!(status.loader_version_mismatch);
        assert!(status.needs_sync);
        assert_eq!(status.total_differences, 0);

        snapshot.loader_version = None;
        assert!(reconcile(&manifest, &snapshot).loader_version_mismatch);
    }
}
