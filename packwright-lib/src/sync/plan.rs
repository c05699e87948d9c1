use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::sync::SyncStatus;

/// How aggressively a sync brings the instance in line with the modpack.
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
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SyncMode {
    /// Apply the full declared state, deleting undeclared mod files
    Overwrite,
    /// Only add what is missing, never remove or overwrite
    #[default]
    NewOnly,
    /// Report only
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledFix {
    pub filename: String,
    pub enabled: bool,
}

/// The concrete file operations a sync in a given mode performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub mode: SyncMode,
    pub add: Vec<String>,
    pub remove: Vec<String>,
    pub set_enabled: Vec<EnabledFix>,
    /// Undeclared files that are deliberately left alone
    pub preserve: Vec<String>,
    pub update_loader: bool,
}

impl SyncPlan {
    pub fn new(status: &SyncStatus, mode: SyncMode) -> Self {
        let mut plan = Self {
            mode,
            add: Vec::new(),
            remove: Vec::new(),
            set_enabled: Vec::new(),
            preserve: status
                .preserved_extras()
                .map(|diff| diff.filename.clone())
                .collect(),
            update_loader: false,
        };

        match mode {
            SyncMode::Skip => {}
            SyncMode::NewOnly => {
                plan.add = missing(status);
            }
            SyncMode::Overwrite => {
                plan.add = missing(status);
                plan.remove = status
                    .removal_candidates()
                    .map(|diff| diff.filename.clone())
                    .collect();
                plan.set_enabled = status
                    .disabled_mismatch
                    .iter()
                    .map(|mismatch| EnabledFix {
                        filename: mismatch.filename.clone(),
                        enabled: mismatch.issue.declared_enabled(),
                    })
                    .collect();
                plan.update_loader = status.loader_version_mismatch;
            }
        }

        plan
    }

    /// Whether carrying out the plan would change anything.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty()
            && self.remove.is_empty()
            && self.set_enabled.is_empty()
            && !self.update_loader
    }
}

fn missing(status: &SyncStatus) -> Vec<String> {
    status
        .missing_in_instance
        .iter()
        .map(|diff| diff.filename.clone())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        compat::ContentType,
        sync::{DisabledIssue, DisabledMismatch, FileDiff},
    };

    fn status() -> SyncStatus {
        SyncStatus {
            needs_sync: true,
            missing_in_instance: vec![FileDiff::new("a.jar", ContentType::Mod)],
            extra_in_instance: vec![
                FileDiff::new("x.jar", ContentType::Mod),
                FileDiff::new("y.zip", ContentType::ResourcePack),
            ],
            disabled_mismatch: vec![DisabledMismatch {
                filename: "b.jar".into(),
                issue: DisabledIssue::DisabledInModpack,
            }],
            config_differences: 0,
            total_differences: 3,
            loader_version_mismatch: true,
        }
    }

    #[test]
    fn test_overwrite() {
        let plan = SyncPlan::new(&status(), SyncMode::Overwrite);

        assert_eq!(plan.add, ["a.jar"]);
        assert_eq!(plan.remove, ["x.jar"]);
        assert_eq!(
            plan.set_enabled,
            vec![EnabledFix {
                filename: "b.jar".into(),
                enabled: false,
            }]
        );
        assert_eq!(plan.preserve, ["y.zip"]);
        assert!(plan.update_loader);
    }

    #[test]
    fn test_new_only() {
        let plan = SyncPlan::new(&status(), SyncMode::NewOnly);

        assert_eq!(plan.add, ["a.jar"]);
        assert!(plan.remove.is_empty());
        assert!(plan.set_enabled.is_empty());
        assert!(!plan.update_loader);
    }

    #[test]
    fn test_skip() {
        let plan = SyncPlan::new(&status(), SyncMode::Skip);

        assert!(plan.is_empty());
        assert_eq!(plan.preserve, ["y.zip"]);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(SyncMode::default(), SyncMode::NewOnly);
        assert_eq!(SyncMode::NewOnly.to_string(), "new_only");
        assert_eq!("overwrite".parse::<SyncMode>().unwrap(), SyncMode::Overwrite);
    }
}
