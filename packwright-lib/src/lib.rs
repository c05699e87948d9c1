//! Compatibility classification and instance sync reconciliation for
//! Minecraft modpacks.
//!
//! The heavy lifting (downloads, filesystem inspection, launching) lives
//! behind the [`Backend`] trait. This crate decides what the results mean:
//! whether a resource fits a modpack, what differs between a modpack and its
//! game instance, and how an editing session keeps its snapshot consistent
//! while backend responses arrive out of order.

use thiserror::Error;

pub mod backend;
pub mod compat;
pub mod config;
pub mod fs;
pub mod session;
pub mod sync;
pub mod validation;

pub use backend::{Backend, BackendError};
pub use compat::{Compatibility, ContentType, Loader, ModpackTarget, Resource, ResourceId};
pub use session::EditingSession;
pub use sync::{SyncMode, SyncPlan, SyncStatus};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Backend call failed: {0}")]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Validation(#[from] validation::ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::Error),
    #[error("No modpack is loaded")]
    NotLoaded,
    #[error("No instance exists for this modpack")]
    NoInstance,
    #[error("The instance sync status could not be determined")]
    SyncStatusUnknown,
    #[error("'{0}' is not part of this modpack")]
    UnknownResource(ResourceId),
    #[error("'{0}' is locked")]
    Locked(ResourceId),
    #[error("{0}")]
    Incompatible(String),
}
