//! Reconciliation between what a modpack declares and what its game instance
//! actually contains.
//!
//! The backend inspects the instance directory and hands back an
//! [`InstanceSnapshot`]. [`reconcile`] turns that plus the modpack's
//! [`SyncManifest`] into a [`SyncStatus`], and [`SyncPlan`] spells out what a
//! given [`SyncMode`] would do about it.

mod instance;
mod loader_version;
mod manifest;
mod plan;
mod reconcile;
mod status;

pub use instance::{DISABLED_SUFFIX, Instance, InstanceFile, InstanceId, InstanceSnapshot};
pub use loader_version::{extract_loader_version, loader_versions_match};
pub use manifest::{DeclaredFile, SyncManifest};
pub use plan::{EnabledFix, SyncMode, SyncPlan};
pub use reconcile::reconcile;
pub use status::{DisabledIssue, DisabledMismatch, FileDiff, SyncStatus};
