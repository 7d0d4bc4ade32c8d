//! Shared staging store: island id → staging structure
//!
//! Drivers for different record kinds may run on different threads. The outer
//! map lock is held only for the get-or-create lookup; every mutation of one
//! island happens under that island's own lock, so get-or-create plus the
//! field update form a single critical section per identity.

use super::cached::CachedIslandInfo;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub type SharedIsland = Arc<Mutex<CachedIslandInfo>>;

#[derive(Debug, Default)]
pub struct StagingStore {
    islands: Mutex<HashMap<Uuid, SharedIsland>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the staging entry for `uuid`, creating it on first use
    ///
    /// Every caller asking for the same id receives the same instance.
    pub fn get_or_create(&self, uuid: Uuid) -> SharedIsland {
        let mut islands = lock(&self.islands);
        islands
            .entry(uuid)
            .or_insert_with(|| {
                log::trace!("Staging new island {}", uuid);
                Arc::new(Mutex::new(CachedIslandInfo::new(uuid)))
            })
            .clone()
    }

    /// Run `update` against the island's staging entry while holding its lock
    pub fn with_island<R>(&self, uuid: Uuid, update: impl FnOnce(&mut CachedIslandInfo) -> R) -> R {
        let entry = self.get_or_create(uuid);
        let mut info = lock(&entry);
        update(&mut info)
    }

    pub fn contains(&self, uuid: &Uuid) -> bool {
        lock(&self.islands).contains_key(uuid)
    }

    pub fn len(&self) -> usize {
        lock(&self.islands).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn island_ids(&self) -> Vec<Uuid> {
        lock(&self.islands).keys().copied().collect()
    }

    /// Copy of the current state of one island
    pub fn snapshot(&self, uuid: &Uuid) -> Option<CachedIslandInfo> {
        let entry = lock(&self.islands).get(uuid).cloned()?;
        let info = lock(&entry).clone();
        Some(info)
    }

    /// Hand every staged island over to the caller
    pub fn into_islands(self) -> HashMap<Uuid, CachedIslandInfo> {
        let islands = self
            .islands
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        islands
            .into_iter()
            .map(|(uuid, entry)| {
                let info = match Arc::try_unwrap(entry) {
                    Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
                    // An outside handle is still alive; hand over a copy
                    Err(shared) => lock(&shared).clone(),
                };
                (uuid, info)
            })
            .collect()
    }
}
