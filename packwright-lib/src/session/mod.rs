//! Orchestration of one modpack editing session.
//!
//! An [`EditingSession`] owns the in-memory [`Snapshot`] of a modpack and
//! talks to the injected [`Backend`]. Every load is tagged with a
//! [`RequestToken`] so late responses to superseded requests never overwrite
//! newer state, and every mutation runs in two explicit phases:
//! [`EditingSession::apply_local`] followed by [`EditingSession::reload`].

use std::{collections::HashMap, future::Future, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    backend::{
        self, Backend, BackendError, ModUpdate, ModpackId, ModpackSettings, RemovalImpact,
    },
    compat::{
        CompatFilter, Compatibility, ModpackTarget, Resource, ResourceId, classify,
        removable_incompatible, sort_for_library,
    },
    config::Cfg,
    sync::{Instance, SyncMode, SyncPlan, SyncStatus, reconcile},
    validation,
};

mod request;
mod state;

pub use request::{RequestKey, RequestSequencer, RequestToken};
pub use state::{
    BulkReport, LaunchGate, LoadOutcome, LocalChange, ModRow, Notification, NotificationLevel,
    Snapshot, ViewState,
};

#[derive(Debug, Default)]
struct SessionState {
    view: ViewState,
    instance: Option<Instance>,
    /// `None` while the status is unknown, e.g. no instance exists yet
    sync_status: Option<SyncStatus>,
    library: Vec<Resource>,
    notifications: Vec<Notification>,
}

pub struct EditingSession {
    backend: Arc<dyn Backend>,
    cfg: Cfg,
    modpack_id: ModpackId,
    requests: RequestSequencer,
    state: RwLock<SessionState>,
}

impl EditingSession {
    pub fn new(backend: Arc<dyn Backend>, cfg: Cfg, modpack_id: ModpackId) -> Self {
        Self {
            backend,
            cfg,
            modpack_id,
            requests: RequestSequencer::new(),
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn modpack_id(&self) -> &ModpackId {
        &self.modpack_id
    }

    pub fn view(&self) -> ViewState {
        self.state.read().view.clone()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        match &self.state.read().view {
            ViewState::Loaded(snapshot) => Some(snapshot.clone()),
            _ => None,
        }
    }

    /// The modpack's target, or `None` while it is not loaded.
    pub fn target(&self) -> Option<ModpackTarget> {
        self.snapshot().map(|snapshot| snapshot.target())
    }

    /// Drain pending toasts.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.write().notifications)
    }

    // Loading

    /// Fetch the modpack and the sets it owns, replacing the snapshot unless
    /// a newer load was issued while this one was in flight.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let token = self.requests.issue(RequestKey::Modpack);
        let fetched = self.fetch_snapshot().await;

        let mut state = self.state.write();
        if !self.requests.is_current(token) {
            debug!(seq = token.seq(), "Discarding superseded modpack response");
            return Ok(LoadOutcome::Superseded);
        }

        match fetched {
            Ok(snapshot) => {
                debug!(
                    "Loaded modpack {} with {} resources",
                    self.modpack_id,
                    snapshot.resources.len()
                );
                state.view = ViewState::Loaded(snapshot);
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                warn!(error = %err, "Failed to load modpack {}", self.modpack_id);
                if matches!(state.view, ViewState::Loaded(_)) {
                    state
                        .notifications
                        .push(Notification::error(format!("Failed to refresh modpack: {err}")));
                } else {
                    state.view = ViewState::Error(err.to_string());
                }
                Err(err.into())
            }
        }
    }

    /// Second phase of every mutation: reconcile the snapshot with the
    /// backend.
    pub async fn reload(&self) -> Result<LoadOutcome> {
        self.load().await
    }

    /// Retry action offered by the error pane.
    pub async fn retry(&self) -> Result<LoadOutcome> {
        {
            let mut state = self.state.write();
            if matches!(state.view, ViewState::Error(_)) {
                state.view = ViewState::Loading;
            }
        }
        self.load().await
    }

    async fn fetch_snapshot(&self) -> backend::Result<Snapshot> {
        let modpack = self.backend.modpack(&self.modpack_id).await?;
        let resources = self.backend.modpack_mods(&self.modpack_id).await?;
        let disabled = self.backend.disabled_mods(&self.modpack_id).await?;
        let locked = self.backend.locked_mods(&self.modpack_id).await?;

        Ok(Snapshot {
            modpack,
            resources,
            disabled: disabled.into_iter().collect(),
            locked: locked.into_iter().collect(),
        })
    }

    // Mutations

    /// First phase of every mutation: patch the one field the action
    /// changes. Returns `false` if nothing is loaded yet.
    pub fn apply_local(&self, change: &LocalChange) -> bool {
        match &mut self.state.write().view {
            ViewState::Loaded(snapshot) => {
                snapshot.apply(change);
                true
            }
            _ => false,
        }
    }

    pub async fn set_mod_enabled(&self, id: &ResourceId, enabled: bool) -> Result<()> {
        let compatibility = self.compatibility_of(id)?;
        if enabled && let Compatibility::Incompatible(reason) = compatibility {
            return Err(Error::Incompatible(reason));
        }

        self.apply_local(&LocalChange::Enabled {
            id: id.clone(),
            enabled,
        });
        let result = self.backend.toggle_mod(&self.modpack_id, id, enabled).await;

        let verb = if enabled { "enable" } else { "disable" };
        self.finish_mutation(result, &format!("Failed to {verb} {id}")).await
    }

    pub async fn set_mod_locked(&self, id: &ResourceId, locked: bool) -> Result<()> {
        self.compatibility_of(id)?;

        self.apply_local(&LocalChange::Locked {
            id: id.clone(),
            locked,
        });
        let result = self
            .backend
            .set_mod_locked(&self.modpack_id, id, locked)
            .await;

        self.finish_mutation(result, &format!("Failed to update lock on {id}")).await
    }

    /// Add a resource from the library. Incompatible resources are refused.
    pub async fn add_mod(&self, id: &ResourceId) -> Result<()> {
        let resource = self
            .state
            .read()
            .library
            .iter()
            .find(|resource| resource.id == *id)
            .cloned()
            .ok_or_else(|| Error::UnknownResource(id.clone()))?;

        if let Compatibility::Incompatible(reason) = classify(&resource, self.target().as_ref()) {
            return Err(Error::Incompatible(reason));
        }

        self.apply_local(&LocalChange::Added(resource));
        let result = self.backend.add_mod(&self.modpack_id, id).await;

        self.finish_mutation(result, &format!("Failed to add {id}")).await
    }

    pub async fn remove_mod(&self, id: &ResourceId) -> Result<()> {
        let snapshot = self.snapshot().ok_or(Error::NotLoaded)?;
        if !snapshot.contains(id) {
            return Err(Error::UnknownResource(id.clone()));
        }
        if snapshot.is_locked(id) {
            return Err(Error::Locked(id.clone()));
        }

        self.apply_local(&LocalChange::Removed(id.clone()));
        let result = self.backend.remove_mod(&self.modpack_id, id).await;

        self.finish_mutation(result, &format!("Failed to remove {id}")).await
    }

    /// Ask the backend which mods depend on `id` before removing it.
    pub async fn removal_impact(&self, id: &ResourceId) -> Result<RemovalImpact> {
        self.backend
            .analyze_mod_removal_impact(&self.modpack_id, id)
            .await
            .map_err(|err| {
                self.notify(Notification::error(format!(
                    "Failed to analyze removal of {id}: {err}"
                )));
                err.into()
            })
    }

    /// Save edited modpack settings. The Minecraft version and loader of a
    /// persisted modpack cannot change.
    pub async fn update_settings(&self, settings: ModpackSettings) -> Result<()> {
        let existing = self.snapshot().ok_or(Error::NotLoaded)?.modpack;
        validation::validate_update(&existing, &settings)?;

        self.apply_local(&LocalChange::Settings(settings.clone()));
        let result = self
            .backend
            .update_modpack(&self.modpack_id, &settings)
            .await;

        self.finish_mutation(result, "Failed to save modpack settings").await
    }

    async fn finish_mutation(&self, result: backend::Result<()>, failure: &str) -> Result<()> {
        match &result {
            Ok(()) => info!("Modpack {} updated", self.modpack_id),
            Err(err) => {
                warn!(error = %err, "{failure}");
                self.notify(Notification::error(format!("{failure}: {err}")));
            }
        }

        self.settle().await;

        result.map_err(Into::into)
    }

    /// Reload after a mutation. Failures were already surfaced by `load`.
    ///
    /// The sync status described the modpack before the mutation, so it is
    /// dropped until the next refresh.
    async fn settle(&self) {
        if let Err(err) = self.reload().await {
            debug!(error = %err, "Reload after mutation failed");
        }
        self.state.write().sync_status = None;
    }

    // Bulk operations

    pub async fn bulk_set_enabled(&self, ids: &[ResourceId], enabled: bool) -> Result<BulkReport> {
        let snapshot = self.snapshot().ok_or(Error::NotLoaded)?;
        let (eligible, skipped): (Vec<_>, Vec<_>) = ids.iter().cloned().partition(|id| {
            !snapshot.is_locked(id)
                && (!enabled
                    || snapshot
                        .resource(id)
                        .is_none_or(|resource| snapshot.compatibility(resource).is_compatible()))
        });

        let backend = self.backend.clone();
        let modpack_id = self.modpack_id.clone();
        let verb = if enabled { "Enabled" } else { "Disabled" };

        Ok(self
            .run_bulk(verb, eligible, skipped, move |id| {
                let backend = backend.clone();
                let modpack_id = modpack_id.clone();
                async move { backend.toggle_mod(&modpack_id, &id, enabled).await }
            })
            .await)
    }

    pub async fn bulk_remove(&self, ids: &[ResourceId]) -> Result<BulkReport> {
        let snapshot = self.snapshot().ok_or(Error::NotLoaded)?;
        let (eligible, skipped): (Vec<_>, Vec<_>) =
            ids.iter().cloned().partition(|id| !snapshot.is_locked(id));

        Ok(self.remove_each(eligible, skipped).await)
    }

    /// Remove every incompatible resource that is not locked.
    pub async fn remove_all_incompatible(&self) -> Result<BulkReport> {
        let snapshot = self.snapshot().ok_or(Error::NotLoaded)?;
        let target = snapshot.target();

        let eligible = removable_incompatible(&snapshot.resources, Some(&target), &snapshot.locked);
        let skipped = snapshot
            .resources
            .iter()
            .filter(|resource| snapshot.is_locked(&resource.id))
            .filter(|resource| !snapshot.compatibility(resource).is_compatible())
            .map(|resource| resource.id.clone())
            .collect();

        Ok(self.remove_each(eligible, skipped).await)
    }

    async fn remove_each(&self, eligible: Vec<ResourceId>, skipped: Vec<ResourceId>) -> BulkReport {
        let backend = self.backend.clone();
        let modpack_id = self.modpack_id.clone();

        self.run_bulk("Removed", eligible, skipped, move |id| {
            let backend = backend.clone();
            let modpack_id = modpack_id.clone();
            async move { backend.remove_mod(&modpack_id, &id).await }
        })
        .await
    }

    /// Ask the backend for updates to every unlocked mod. A failed check for
    /// one mod does not stop the others; failures are counted in one warning.
    pub async fn check_updates(&self) -> Result<Vec<ModUpdate>> {
        let snapshot = self.snapshot().ok_or(Error::NotLoaded)?;
        let mut updates = Vec::new();
        let mut failed = 0_usize;

        for resource in snapshot
            .resources
            .iter()
            .filter(|resource| !snapshot.is_locked(&resource.id))
        {
            match self.backend.check_mod_update(&resource.id).await {
                Ok(Some(update)) => updates.push(update),
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "Update check failed for {}", resource.id);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            let noun = if failed == 1 { "mod" } else { "mods" };
            self.notify(Notification::warning(format!("Update check failed for {failed} {noun}")));
        }

        Ok(updates)
    }

    pub async fn apply_updates(&self, updates: &[ModUpdate]) -> Result<BulkReport> {
        let snapshot = self.snapshot().ok_or(Error::NotLoaded)?;
        let (eligible, skipped): (Vec<_>, Vec<_>) = updates
            .iter()
            .map(|update| update.mod_id.clone())
            .partition(|id| !snapshot.is_locked(id));

        let by_id: HashMap<ResourceId, ModUpdate> = updates
            .iter()
            .map(|update| (update.mod_id.clone(), update.clone()))
            .collect();
        let backend = self.backend.clone();
        let modpack_id = self.modpack_id.clone();

        Ok(self
            .run_bulk("Updated", eligible, skipped, move |id| {
                let backend = backend.clone();
                let modpack_id = modpack_id.clone();
                let update = by_id.get(&id).cloned();
                async move {
                    match update {
                        Some(update) => backend.apply_mod_update(&modpack_id, &update).await,
                        None => Err(BackendError::NotFound(id.to_string())),
                    }
                }
            })
            .await)
    }

    /// Run `op` for each id in order, awaiting each before the next. Failures
    /// are collected, summarised once, and followed by a single reload.
    async fn run_bulk<F, Fut>(
        &self,
        verb: &str,
        ids: Vec<ResourceId>,
        skipped: Vec<ResourceId>,
        mut op: F,
    ) -> BulkReport
    where
        F: FnMut(ResourceId) -> Fut,
        Fut: Future<Output = backend::Result<()>>,
    {
        let mut report = BulkReport {
            skipped,
            ..Default::default()
        };

        for id in ids {
            match op(id.clone()).await {
                Ok(()) => report.succeeded += 1,
                Err(err) => {
                    warn!(error = %err, "{verb} failed for {id}");
                    report.failures.push((id, err));
                }
            }
        }

        info!("{}", report.summary(verb));
        self.notify(report.notification(verb));
        self.settle().await;

        report
    }

    // Library

    pub async fn load_library(&self) -> Result<LoadOutcome> {
        let token = self.requests.issue(RequestKey::Library);
        let fetched = self.backend.library().await;

        let mut state = self.state.write();
        if !self.requests.is_current(token) {
            debug!(seq = token.seq(), "Discarding superseded library response");
            return Ok(LoadOutcome::Superseded);
        }

        match fetched {
            Ok(library) => {
                state.library = library;
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                state
                    .notifications
                    .push(Notification::error(format!("Failed to load library: {err}")));
                Err(err.into())
            }
        }
    }

    /// Library resources not yet in the modpack, best matches first.
    pub fn available_library(&self, filter: CompatFilter) -> Vec<(Resource, Compatibility)> {
        let snapshot = self.snapshot();
        let target = snapshot.as_ref().map(Snapshot::target);

        let mut available: Vec<Resource> = self
            .state
            .read()
            .library
            .iter()
            .filter(|resource| {
                snapshot
                    .as_ref()
                    .is_none_or(|snapshot| !snapshot.contains(&resource.id))
            })
            .cloned()
            .collect();
        sort_for_library(&mut available, target.as_ref());

        available
            .into_iter()
            .map(|resource| {
                let compatibility = classify(&resource, target.as_ref());
                (resource, compatibility)
            })
            .filter(|(_, compatibility)| filter.matches(compatibility))
            .collect()
    }

    pub fn mod_rows(&self, filter: CompatFilter) -> Vec<ModRow> {
        self.snapshot()
            .map(|snapshot| snapshot.rows(filter))
            .unwrap_or_default()
    }

    /// The filter the user last picked for library lists.
    pub fn library_filter(&self) -> CompatFilter {
        self.cfg.read().library.filter
    }

    // Instance sync

    pub fn instance(&self) -> Option<Instance> {
        self.state.read().instance.clone()
    }

    pub async fn load_instance(&self) -> Result<LoadOutcome> {
        let token = self.requests.issue(RequestKey::Instance);
        let fetched = self.backend.instance_for_modpack(&self.modpack_id).await;

        let mut state = self.state.write();
        if !self.requests.is_current(token) {
            debug!(seq = token.seq(), "Discarding superseded instance response");
            return Ok(LoadOutcome::Superseded);
        }

        match fetched {
            Ok(instance) => {
                state.instance = instance;
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                debug!(error = %err, "Failed to look up instance for {}", self.modpack_id);
                state.instance = None;
                Err(err.into())
            }
        }
    }

    /// Last computed sync status, `None` if unknown.
    pub fn sync_status(&self) -> Option<SyncStatus> {
        self.state.read().sync_status.clone()
    }

    /// The status to show in the sync banner, only when a sync is due.
    pub fn sync_banner(&self) -> Option<SyncStatus> {
        self.sync_status().filter(|status| status.needs_sync)
    }

    /// Inspect the instance and recompute its sync status.
    ///
    /// A failed inspection is expected while no instance exists; it leaves
    /// the status unknown and is only logged, never shown to the user.
    pub async fn refresh_sync_status(&self) -> Option<SyncStatus> {
        let token = self.requests.issue(RequestKey::SyncStatus);

        let Some(instance) = self.instance() else {
            self.state.write().sync_status = None;
            return None;
        };

        let inspected = self.backend.check_sync_status(&instance.id).await;
        let manifest = self.snapshot().map(|snapshot| snapshot.manifest());

        let mut state = self.state.write();
        if !self.requests.is_current(token) {
            debug!(seq = token.seq(), "Discarding superseded sync status");
            return state.sync_status.clone();
        }

        state.sync_status = match (inspected, manifest) {
            (Ok(snapshot), Some(manifest)) => Some(reconcile(&manifest, &snapshot)),
            (Ok(_), None) => None,
            (Err(err), _) => {
                debug!(error = %err, "Sync check for instance {} failed", instance.id);
                None
            }
        };

        state.sync_status.clone()
    }

    /// Mode preselected for manual syncs.
    pub fn default_sync_mode(&self) -> SyncMode {
        self.cfg.read().sync.default_mode
    }

    /// Bring the instance in line with the modpack using `mode`. The plan is
    /// always built from a fresh inspection of the instance.
    pub async fn sync_instance(&self, mode: SyncMode) -> Result<SyncPlan> {
        let instance = self.instance().ok_or(Error::NoInstance)?;
        let status = self
            .refresh_sync_status()
            .await
            .ok_or(Error::SyncStatusUnknown)?;

        let plan = SyncPlan::new(&status, mode);
        if plan.is_empty() {
            debug!("Nothing to sync in {mode} mode");
            return Ok(plan);
        }

        if let Err(err) = self.backend.sync_instance(&instance.id, &plan).await {
            warn!(error = %err, "Failed to sync instance {}", instance.id);
            self.notify(Notification::error(format!("Failed to sync instance: {err}")));
            return Err(err.into());
        }

        info!(
            "Synced instance {}: {} added, {} removed",
            instance.id,
            plan.add.len(),
            plan.remove.len()
        );
        self.notify(Notification::success("Instance synced"));
        self.refresh_sync_status().await;

        Ok(plan)
    }

    /// Decide whether the instance can launch as is, using the configured
    /// pre-launch sync mode for the prompt.
    pub async fn prelaunch_check(&self) -> LaunchGate {
        match self.refresh_sync_status().await {
            Some(status) if status.needs_sync => LaunchGate::NeedsSync {
                prompt: status.summary(),
                mode: self.cfg.read().sync.prelaunch_mode,
                status,
            },
            _ => LaunchGate::Ready,
        }
    }

    fn compatibility_of(&self, id: &ResourceId) -> Result<Compatibility> {
        let snapshot = self.snapshot().ok_or(Error::NotLoaded)?;
        let resource = snapshot
            .resource(id)
            .ok_or_else(|| Error::UnknownResource(id.clone()))?;

        Ok(snapshot.compatibility(resource))
    }

    fn notify(&self, notification: Notification) {
        self.state.write().notifications.push(notification);
    }
}
