use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::compat::{Compatibility, ModpackTarget, Resource, ResourceId, classify};

/// Which verdicts a list should show.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CompatFilter {
    #[default]
    All,
    /// Compatible without any warning
    Compatible,
    Warning,
    Incompatible,
}

impl CompatFilter {
    pub fn matches(&self, compatibility: &Compatibility) -> bool {
        match self {
            CompatFilter::All => true,
            CompatFilter::Compatible => *compatibility == Compatibility::Compatible,
            CompatFilter::Warning => compatibility.has_warning(),
            CompatFilter::Incompatible => !compatibility.is_compatible(),
        }
    }
}

/// Pair every resource with its verdict, keeping only those `filter` admits.
pub fn classify_all<'a>(
    resources: impl IntoIterator<Item = &'a Resource>,
    target: Option<&ModpackTarget>,
    filter: CompatFilter,
) -> Vec<(&'a Resource, Compatibility)> {
    resources
        .into_iter()
        .map(|resource| (resource, classify(resource, target)))
        .filter(|(_, compatibility)| filter.matches(compatibility))
        .collect()
}

/// Order resources for the "available to add" list: clean matches first,
/// then warnings, then incompatible ones, alphabetical within each group.
pub fn sort_for_library(resources: &mut [Resource], target: Option<&ModpackTarget>) {
    resources.sort_by_cached_key(|resource| {
        (
            classify(resource, target).rank(),
            resource.name.to_lowercase(),
        )
    });
}

/// Ids a "remove all incompatible" action may touch. Locked resources are
/// never included, whatever their verdict.
pub fn removable_incompatible(
    resources: &[Resource],
    target: Option<&ModpackTarget>,
    locked: &HashSet<ResourceId>,
) -> Vec<ResourceId> {
    resources
        .iter()
        .filter(|resource| !locked.contains(&resource.id))
        .filter(|resource| !classify(resource, target).is_compatible())
        .map(|resource| resource.id.clone())
        .collect()
}
