use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::compat::ContentType;

/// A file present on one side of the comparison but not the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub filename: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl FileDiff {
    pub fn new(filename: &str, content_type: ContentType) -> Self {
        Self {
            filename: filename.to_string(),
            content_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DisabledIssue {
    #[display("disabled in modpack but enabled in instance")]
    DisabledInModpack,
    #[display("enabled in modpack but disabled in instance")]
    EnabledInModpack,
}

impl DisabledIssue {
    /// The enabled state the modpack asks for.
    pub fn declared_enabled(&self) -> bool {
        matches!(self, DisabledIssue::EnabledInModpack)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabledMismatch {
    pub filename: String,
    pub issue: DisabledIssue,
}

/// The differences between a modpack and its instance at one point in time.
///
/// Never stored; recompute it whenever either side may have changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub needs_sync: bool,
    /// Enabled declared files absent from the instance
    pub missing_in_instance: Vec<FileDiff>,
    /// Undeclared files found in the instance, of every content type
    pub extra_in_instance: Vec<FileDiff>,
    pub disabled_mismatch: Vec<DisabledMismatch>,
    pub config_differences: usize,
    /// Count of every difference that a sync would act on
    pub total_differences: usize,
    pub loader_version_mismatch: bool,
}

impl SyncStatus {
    /// Undeclared mod files, which an overwriting sync deletes.
    pub fn removal_candidates(&self) -> impl Iterator<Item = &FileDiff> {
        self.extra_in_instance
            .iter()
            .filter(|diff| diff.content_type == ContentType::Mod)
    }

    /// Undeclared resource packs and shaders. Players add these by hand, so
    /// no sync mode ever removes them.
    pub fn preserved_extras(&self) -> impl Iterator<Item = &FileDiff> {
        self.extra_in_instance
            .iter()
            .filter(|diff| diff.content_type != ContentType::Mod)
    }

    /// Text for the confirmation shown before launching an out-of-date
    /// instance.
    pub fn summary(&self) -> String {
        let mut summary = match self.total_differences {
            0 => String::from("Instance matches the modpack"),
            1 => String::from("1 difference between the instance and the modpack"),
            n => format!("{n} differences between the instance and the modpack"),
        };

        if self.loader_version_mismatch {
            if self.total_differences == 0 {
                summary = String::from("Instance loader version differs from the modpack");
            } else {
                summary.push_str(", and the loader version differs");
            }
        }

        summary
    }
}
