use std::collections::HashSet;

use crate::{
    backend::{BackendError, Modpack, ModpackSettings},
    compat::{CompatFilter, Compatibility, ModpackTarget, Resource, ResourceId, classify},
    sync::{SyncManifest, SyncMode, SyncStatus},
};

/// What the editing pane shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Loading,
    /// The initial load failed; the pane offers a retry instead of going
    /// blank.
    Error(String),
    Loaded(Snapshot),
}

/// Local copy of a modpack and the sets it owns.
///
/// Treat it as stale after any mutating call: only the single field the call
/// describes is patched locally, everything else comes from the reload.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub modpack: Modpack,
    pub resources: Vec<Resource>,
    pub disabled: HashSet<ResourceId>,
    pub locked: HashSet<ResourceId>,
}

impl Snapshot {
    pub fn target(&self) -> ModpackTarget {
        self.modpack.target()
    }

    pub fn resource(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.id == *id)
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.resource(id).is_some()
    }

    pub fn is_enabled(&self, id: &ResourceId) -> bool {
        !self.disabled.contains(id)
    }

    pub fn is_locked(&self, id: &ResourceId) -> bool {
        self.locked.contains(id)
    }

    pub fn compatibility(&self, resource: &Resource) -> Compatibility {
        classify(resource, Some(&self.target()))
    }

    /// Rows for the mod list, filtered by verdict.
    pub fn rows(&self, filter: CompatFilter) -> Vec<ModRow> {
        let target = self.target();
        self.resources
            .iter()
            .map(|resource| ModRow {
                compatibility: classify(resource, Some(&target)),
                enabled: self.is_enabled(&resource.id),
                locked: self.is_locked(&resource.id),
                resource: resource.clone(),
            })
            .filter(|row| filter.matches(&row.compatibility))
            .collect()
    }

    pub fn manifest(&self) -> SyncManifest {
        SyncManifest::from_resources(
            &self.resources,
            &self.disabled,
            self.modpack.loader_version.as_deref(),
        )
    }

    pub(crate) fn apply(&mut self, change: &LocalChange) {
        match change {
            LocalChange::Enabled { id, enabled } => {
                if *enabled {
                    self.disabled.remove(id);
                } else {
                    self.disabled.insert(id.clone());
                }
            }
            LocalChange::Locked { id, locked } => {
                if *locked {
                    self.locked.insert(id.clone());
                } else {
                    self.locked.remove(id);
                }
            }
            LocalChange::Added(resource) => {
                if !self.contains(&resource.id) {
                    self.resources.push(resource.clone());
                }
            }
            LocalChange::Removed(id) => {
                self.resources.retain(|resource| resource.id != *id);
                self.disabled.remove(id);
                self.locked.remove(id);
            }
            LocalChange::Settings(settings) => settings.apply_to(&mut self.modpack),
        }
    }
}

/// The single field a mutating action changes, applied to the snapshot
/// before the backend confirms it.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalChange {
    Enabled { id: ResourceId, enabled: bool },
    Locked { id: ResourceId, locked: bool },
    Added(Resource),
    Removed(ResourceId),
    Settings(ModpackSettings),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModRow {
    pub resource: Resource,
    pub compatibility: Compatibility,
    pub enabled: bool,
    pub locked: bool,
}

/// Whether a response was applied or dropped because a newer request for
/// the same resource had been issued in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A transient, user facing message (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Outcome of an ordered bulk loop. Failures never stop the loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkReport {
    pub succeeded: usize,
    pub failures: Vec<(ResourceId, BackendError)>,
    /// Items left alone because they are locked or otherwise protected
    pub skipped: Vec<ResourceId>,
}

impl BulkReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn summary(&self, verb: &str) -> String {
        let mut summary = format!("{verb}: {} succeeded", self.succeeded);
        if self.failed() > 0 {
            summary.push_str(&format!(", {} failed", self.failed()));
        }
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", {} skipped", self.skipped.len()));
        }
        summary
    }

    pub(crate) fn notification(&self, verb: &str) -> Notification {
        if self.failed() == 0 {
            Notification::success(self.summary(verb))
        } else {
            Notification::warning(self.summary(verb))
        }
    }
}

/// Whether an instance may be launched straight away.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchGate {
    Ready,
    /// The instance is out of date; ask before launching.
    NeedsSync {
        status: SyncStatus,
        mode: SyncMode,
        prompt: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compat::{ContentType, Loader};

    fn snapshot() -> Snapshot {
        Snapshot {
            modpack: Modpack {
                id: "pack".into(),
                name: "Pack".into(),
                description: None,
                minecraft_version: "1.20.1".into(),
                loader: Loader::Forge,
                loader_version: None,
            },
            resources: vec![
                Resource::new("a", "A", ContentType::Mod).with_game_version("1.20.1"),
                Resource::new("b", "B", ContentType::Mod).with_game_version("1.16.5"),
            ],
            disabled: HashSet::new(),
            locked: HashSet::new(),
        }
    }

    #[test]
    fn test_apply_local_changes() {
        let mut snapshot = snapshot();
        let a = ResourceId::from("a");

        snapshot.apply(&LocalChange::Enabled {
            id: a.clone(),
            enabled: false,
        });
        assert!(!snapshot.is_enabled(&a));

        snapshot.apply(&LocalChange::Locked {
            id: a.clone(),
            locked: true,
        });
        assert!(snapshot.is_locked(&a));

        snapshot.apply(&LocalChange::Removed(a.clone()));
        assert!(!snapshot.contains(&a));
        assert!(snapshot.is_enabled(&a));
        assert!(!snapshot.is_locked(&a));
    }

    #[test]
    fn test_rows() {
        let snapshot = snapshot();

        assert_eq!(snapshot.rows(CompatFilter::All).len(), 2);

        let incompatible = snapshot.rows(CompatFilter::Incompatible);
        assert_eq!(incompatible.len(), 1);
        assert_eq!(incompatible.first().map(|row| row.resource.name.as_str()), Some("B"));
    }

    #[test]
    fn test_bulk_summary() {
        let report = BulkReport {
            succeeded: 2,
            failures: vec![("c".into(), BackendError::Rejected("busy".into()))],
            skipped: vec!["d".into()],
        };

        assert_eq!(report.summary("Removed"), "Removed: 2 succeeded, 1 failed, 1 skipped");
        assert_eq!(report.notification("Removed").level, NotificationLevel::Warning);
    }
}
