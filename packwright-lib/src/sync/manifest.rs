use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compat::{ContentType, Resource, ResourceId};

/// A file the modpack expects to find in its instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredFile {
    pub filename: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub enabled: bool,
}

/// Everything a modpack declares about the contents of its instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncManifest {
    pub files: Vec<DeclaredFile>,
    /// Raw loader build name the modpack asks for
    pub loader_version: Option<String>,
}

impl SyncManifest {
    /// Derives the manifest from a modpack's resources and its disabled set.
    ///
    /// Resources without a file name cannot be matched against instance
    /// contents and are left out.
    pub fn from_resources<'a>(
        resources: impl IntoIterator<Item = &'a Resource>,
        disabled: &HashSet<ResourceId>,
        loader_version: Option<&str>,
    ) -> Self {
        let files = resources
            .into_iter()
            .filter(|resource| {
                if resource.filename.is_empty() {
                    debug!("Resource {} has no file name, leaving it out of sync", resource.id);
                    return false;
                }
                true
            })
            .map(|resource| DeclaredFile {
                filename: resource.filename.clone(),
                content_type: resource.content_type,
                enabled: !disabled.contains(&resource.id),
            })
            .collect();

        Self {
            files,
            loader_version: loader_version
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string),
        }
    }
}
