//! The capability interface to the process that does the real work.
//!
//! File I/O, catalog lookups, dependency analysis and instance management all
//! happen on the other side of [`Backend`]. Sessions receive it as an
//! injected `Arc<dyn Backend>`, so tests can substitute an in-memory fake.

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    compat::{Resource, ResourceId},
    sync::{Instance, InstanceId, InstanceSnapshot, SyncPlan},
};

#[cfg(test)]
pub(crate) mod mock;
mod models;

pub use models::{Modpack, ModpackId, ModpackSettings, ModUpdate, RemovalImpact};

pub type Result<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Backend: Send + Sync {
    // Modpacks

    async fn modpack(&self, id: &ModpackId) -> Result<Modpack>;

    async fn modpack_mods(&self, id: &ModpackId) -> Result<Vec<Resource>>;

    async fn disabled_mods(&self, id: &ModpackId) -> Result<Vec<ResourceId>>;

    async fn locked_mods(&self, id: &ModpackId) -> Result<Vec<ResourceId>>;

    async fn update_modpack(&self, id: &ModpackId, settings: &ModpackSettings) -> Result<()>;

    async fn add_mod(&self, id: &ModpackId, mod_id: &ResourceId) -> Result<()>;

    async fn remove_mod(&self, id: &ModpackId, mod_id: &ResourceId) -> Result<()>;

    async fn toggle_mod(&self, id: &ModpackId, mod_id: &ResourceId, enabled: bool) -> Result<()>;

    async fn set_mod_locked(&self, id: &ModpackId, mod_id: &ResourceId, locked: bool)
    -> Result<()>;

    /// Which other mods in the pack depend on `mod_id`.
    async fn analyze_mod_removal_impact(
        &self,
        id: &ModpackId,
        mod_id: &ResourceId,
    ) -> Result<RemovalImpact>;

    // Library

    async fn library(&self) -> Result<Vec<Resource>>;

    // Instances

    async fn instance_for_modpack(&self, id: &ModpackId) -> Result<Option<Instance>>;

    /// Inspect the instance directory. Fails routinely while no instance has
    /// been created yet.
    async fn check_sync_status(&self, instance: &InstanceId) -> Result<InstanceSnapshot>;

    async fn sync_instance(&self, instance: &InstanceId, plan: &SyncPlan) -> Result<()>;

    // Updates

    async fn check_mod_update(&self, mod_id: &ResourceId) -> Result<Option<ModUpdate>>;

    async fn apply_mod_update(&self, id: &ModpackId, update: &ModUpdate) -> Result<()>;
}
