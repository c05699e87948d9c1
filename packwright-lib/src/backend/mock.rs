use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
    backend::{
        Backend, BackendError, Modpack, ModpackId, ModpackSettings, ModUpdate, RemovalImpact,
        Result,
    },
    compat::{Resource, ResourceId},
    sync::{Instance, InstanceId, InstanceSnapshot, SyncPlan},
};

/// Backend state held in memory. Mutations really change it, so a reload
/// after a failed call shows the unchanged backend truth.
#[derive(Debug, Default)]
pub(crate) struct MockData {
    pub modpack: Option<Modpack>,
    /// Served in order by `modpack` before falling back to `modpack`
    pub modpack_responses: VecDeque<Modpack>,
    pub mods: Vec<Resource>,
    pub disabled: HashSet<ResourceId>,
    pub locked: HashSet<ResourceId>,
    pub library: Vec<Resource>,
    pub instance: Option<Instance>,
    /// `None` makes instance inspection fail
    pub instance_snapshot: Option<InstanceSnapshot>,
    /// Mutations touching these ids are rejected
    pub failing: HashSet<ResourceId>,
    pub fail_loads: bool,
    pub updates: HashMap<ResourceId, ModUpdate>,
    pub dependents: HashMap<ResourceId, Vec<ResourceId>>,
    pub applied_updates: Vec<ModUpdate>,
    pub synced: Vec<SyncPlan>,
}

#[derive(Debug, Default)]
pub(crate) struct MockBackend {
    pub data: Mutex<MockData>,
    /// Holds the first `modpack` call until notified
    gate: Option<Arc<Notify>>,
    modpack_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new(modpack: Modpack, mods: Vec<Resource>) -> Self {
        Self {
            data: Mutex::new(MockData {
                modpack: Some(modpack),
                mods,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn check(&self, id: &ResourceId) -> Result<()> {
        if self.data.lock().failing.contains(id) {
            return Err(BackendError::Rejected(format!("{id} is busy")));
        }
        Ok(())
    }

    fn check_loads(&self) -> Result<()> {
        if self.data.lock().fail_loads {
            return Err(BackendError::Unavailable("bridge offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn modpack(&self, id: &ModpackId) -> Result<Modpack> {
        let call = self.modpack_calls.fetch_add(1, Ordering::SeqCst);
        self.check_loads()?;

        let response = {
            let mut data = self.data.lock();
            data.modpack_responses
                .pop_front()
                .or_else(|| data.modpack.clone())
                .ok_or_else(|| BackendError::NotFound(id.to_string()))?
        };

        if call == 0
            && let Some(gate) = &self.gate
        {
            gate.notified().await;
        }

        Ok(response)
    }

    async fn modpack_mods(&self, _id: &ModpackId) -> Result<Vec<Resource>> {
        self.check_loads()?;
        Ok(self.data.lock().mods.clone())
    }

    async fn disabled_mods(&self, _id: &ModpackId) -> Result<Vec<ResourceId>> {
        self.check_loads()?;
        Ok(self.data.lock().disabled.iter().cloned().collect())
    }

    async fn locked_mods(&self, _id: &ModpackId) -> Result<Vec<ResourceId>> {
        self.check_loads()?;
        Ok(self.data.lock().locked.iter().cloned().collect())
    }

    async fn update_modpack(&self, _id: &ModpackId, settings: &ModpackSettings) -> Result<()> {
        let mut data = self.data.lock();
        if let Some(modpack) = data.modpack.as_mut() {
            settings.apply_to(modpack);
        }
        Ok(())
    }

    async fn add_mod(&self, _id: &ModpackId, mod_id: &ResourceId) -> Result<()> {
        self.check(mod_id)?;
        let mut data = self.data.lock();
        let resource = data
            .library
            .iter()
            .find(|resource| resource.id == *mod_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(mod_id.to_string()))?;
        data.mods.push(resource);
        Ok(())
    }

    async fn remove_mod(&self, _id: &ModpackId, mod_id: &ResourceId) -> Result<()> {
        self.check(mod_id)?;
        let mut data = self.data.lock();
        data.mods.retain(|resource| resource.id != *mod_id);
        data.disabled.remove(mod_id);
        data.locked.remove(mod_id);
        Ok(())
    }

    async fn toggle_mod(&self, _id: &ModpackId, mod_id: &ResourceId, enabled: bool) -> Result<()> {
        self.check(mod_id)?;
        let mut data = self.data.lock();
        if enabled {
            data.disabled.remove(mod_id);
        } else {
            data.disabled.insert(mod_id.clone());
        }
        Ok(())
    }

    async fn set_mod_locked(
        &self,
        _id: &ModpackId,
        mod_id: &ResourceId,
        locked: bool,
    ) -> Result<()> {
        self.check(mod_id)?;
        let mut data = self.data.lock();
        if locked {
            data.locked.insert(mod_id.clone());
        } else {
            data.locked.remove(mod_id);
        }
        Ok(())
    }

    async fn analyze_mod_removal_impact(
        &self,
        _id: &ModpackId,
        mod_id: &ResourceId,
    ) -> Result<RemovalImpact> {
        self.check(mod_id)?;
        Ok(RemovalImpact {
            dependents: self
                .data
                .lock()
                .dependents
                .get(mod_id)
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn library(&self) -> Result<Vec<Resource>> {
        self.check_loads()?;
        Ok(self.data.lock().library.clone())
    }

    async fn instance_for_modpack(&self, _id: &ModpackId) -> Result<Option<Instance>> {
        Ok(self.data.lock().instance.clone())
    }

    async fn check_sync_status(&self, instance: &InstanceId) -> Result<InstanceSnapshot> {
        self.data
            .lock()
            .instance_snapshot
            .clone()
            .ok_or_else(|| BackendError::NotFound(format!("instance {instance}")))
    }

    async fn sync_instance(&self, _instance: &InstanceId, plan: &SyncPlan) -> Result<()> {
        self.data.lock().synced.push(plan.clone());
        Ok(())
    }

    async fn check_mod_update(&self, mod_id: &ResourceId) -> Result<Option<ModUpdate>> {
        self.check(mod_id)?;
        Ok(self.data.lock().updates.get(mod_id).cloned())
    }

    async fn apply_mod_update(&self, _id: &ModpackId, update: &ModUpdate) -> Result<()> {
        self.check(&update.mod_id)?;
        self.data.lock().applied_updates.push(update.clone());
        Ok(())
    }
}
