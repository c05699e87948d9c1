//! Version and loader compatibility between resources and modpacks.
//!
//! Everything in here is pure: the same inputs always produce the same
//! verdict, so callers recompute whenever the resource list or the modpack
//! target changes instead of caching results.

mod classify;
mod library;
mod resource;

pub use classify::{Compatibility, classify, versions_match};
pub use library::{CompatFilter, classify_all, removable_incompatible, sort_for_library};
pub use resource::{ContentType, ExternalSource, Loader, ModpackTarget, Resource, ResourceId};
