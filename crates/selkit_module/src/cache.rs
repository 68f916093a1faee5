//! Process-wide module cache.
//!
//! Each canonical identity owns at most one [`ModuleRecord`]. Loading follows
//! a claim-then-populate-or-evict discipline: the first caller claims the
//! identity and receives a [`LoadGuard`]; later callers either get the cached
//! exports or wait until the claim settles. A guard dropped without being
//! completed evicts the entry, so failures are never cached.

use std::collections::HashMap;
use std::iter;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::{Exports, ModuleError, ModuleId};

/// Loading state of a cached module.
#[derive(Debug, Clone)]
pub enum ModuleState {
    /// Being evaluated by the given thread.
    Loading { owner: ThreadId },
    /// Evaluated; holds the normalized exports.
    Loaded(Exports),
}

/// A cache entry.
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub state: ModuleState,
}

impl ModuleRecord {
    /// Returns true while the module is being evaluated.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ModuleState::Loading { .. })
    }

    /// Returns the exports once loaded.
    pub fn exports(&self) -> Option<&Exports> {
        match &self.state {
            ModuleState::Loaded(exports) => Some(exports),
            ModuleState::Loading { .. } => None,
        }
    }
}

/// Result of claiming an identity.
pub enum Claim<'c> {
    /// Already loaded.
    Cached(Exports),
    /// The caller now owns the load and must complete or drop the guard.
    Owned(LoadGuard<'c>),
}

#[derive(Default)]
struct CacheState {
    records: HashMap<ModuleId, ModuleRecord>,
    /// Identity each blocked thread waits on.
    waiting: HashMap<ThreadId, ModuleId>,
    /// Identities each thread is loading, innermost last.
    loading: HashMap<ThreadId, Vec<ModuleId>>,
}

enum Slot {
    Vacant,
    Loaded(Exports),
    Loading(ThreadId),
}

impl CacheState {
    fn slot(&self, id: &ModuleId) -> Slot {
        match self.records.get(id).map(|record| &record.state) {
            None => Slot::Vacant,
            Some(ModuleState::Loaded(exports)) => Slot::Loaded(exports.clone()),
            Some(ModuleState::Loading { owner }) => Slot::Loading(*owner),
        }
    }

    /// Follows the wait-for chain from `owner`; true if it leads back to `me`.
    fn leads_to(&self, me: ThreadId, owner: ThreadId) -> bool {
        let mut current = owner;
        for _ in 0..=self.waiting.len() {
            if current == me {
                return true;
            }
            let Some(next) = self.waiting.get(&current) else {
                return false;
            };
            match self.slot(next) {
                Slot::Loading(next_owner) => current = next_owner,
                _ => return false,
            }
        }
        false
    }

    fn cycle_chain(&self, me: ThreadId, id: &ModuleId) -> Vec<ModuleId> {
        let stack = self.loading.get(&me).map(Vec::as_slice).unwrap_or_default();
        let start = stack.iter().position(|loading| loading == id).unwrap_or(0);
        stack[start..]
            .iter()
            .cloned()
            .chain(iter::once(id.clone()))
            .collect()
    }

    fn release(&mut self, owner: ThreadId, id: &ModuleId) {
        let mut emptied = false;
        if let Some(stack) = self.loading.get_mut(&owner) {
            if let Some(pos) = stack.iter().rposition(|loading| loading == id) {
                stack.remove(pos);
            }
            emptied = stack.is_empty();
        }
        if emptied {
            self.loading.remove(&owner);
        }
    }
}

/// Cache of loaded modules keyed by canonical identity.
///
/// Created empty when the extension process starts and never persisted.
#[derive(Default)]
pub struct ModuleCache {
    state: Mutex<CacheState>,
    settled: Condvar,
}

impl ModuleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the exports of a loaded module.
    pub fn get(&self, id: &ModuleId) -> Option<Exports> {
        self.state
            .lock()
            .records
            .get(id)
            .and_then(|record| record.exports().cloned())
    }

    /// Returns a snapshot of the record for `id`.
    pub fn record(&self, id: &ModuleId) -> Option<ModuleRecord> {
        self.state.lock().records.get(id).cloned()
    }

    /// Returns true while `id` is being evaluated.
    pub fn is_loading(&self, id: &ModuleId) -> bool {
        self.state
            .lock()
            .records
            .get(id)
            .is_some_and(ModuleRecord::is_loading)
    }

    /// Number of loaded modules.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .records
            .values()
            .filter(|record| !record.is_loading())
            .count()
    }

    /// Returns true when no module has been loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claims `id` for loading, or returns its cached exports.
    ///
    /// Blocks while another thread is loading the same identity. Fails with
    /// [`ModuleError::CyclicLoad`] when the caller would end up waiting on
    /// itself, either directly or through other waiting threads.
    pub fn claim(&self, id: &ModuleId) -> Result<Claim<'_>, ModuleError> {
        let me = thread::current().id();
        let mut state = self.state.lock();

        loop {
            match state.slot(id) {
                Slot::Loaded(exports) => return Ok(Claim::Cached(exports)),
                Slot::Vacant => {
                    state.records.insert(
                        id.clone(),
                        ModuleRecord {
                            id: id.clone(),
                            state: ModuleState::Loading { owner: me },
                        },
                    );
                    state.loading.entry(me).or_default().push(id.clone());
                    return Ok(Claim::Owned(LoadGuard {
                        cache: self,
                        id: id.clone(),
                        owner: me,
                        completed: false,
                    }));
                }
                Slot::Loading(owner) => {
                    if state.leads_to(me, owner) {
                        let chain = state.cycle_chain(me, id);
                        return Err(ModuleError::cyclic(id, chain));
                    }
                    debug!("Waiting for module {} to finish loading", id);
                    state.waiting.insert(me, id.clone());
                    self.settled.wait(&mut state);
                    state.waiting.remove(&me);
                }
            }
        }
    }
}

/// Exclusive right to populate one cache entry.
///
/// Dropping the guard without calling [`LoadGuard::complete`] evicts the
/// entry and wakes any waiters.
pub struct LoadGuard<'c> {
    cache: &'c ModuleCache,
    id: ModuleId,
    owner: ThreadId,
    completed: bool,
}

impl LoadGuard<'_> {
    /// The identity being loaded.
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Stores the exports and releases the claim.
    pub fn complete(mut self, exports: Exports) -> Exports {
        {
            let mut state = self.cache.state.lock();
            state.records.insert(
                self.id.clone(),
                ModuleRecord {
                    id: self.id.clone(),
                    state: ModuleState::Loaded(exports.clone()),
                },
            );
            state.release(self.owner, &self.id);
        }
        self.completed = true;
        self.cache.settled.notify_all();
        exports
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        {
            let mut state = self.cache.state.lock();
            state.records.remove(&self.id);
            state.release(self.owner, &self.id);
        }
        debug!("Evicted module {} after a failed load", self.id);
        self.cache.settled.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn id(path: &str) -> ModuleId {
        ModuleId::new(path)
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = ModuleCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&id("/a.js")).is_none());
    }

    #[test]
    fn test_claim_then_complete_caches() {
        let cache = ModuleCache::new();
        let a = id("/a.js");

        let Claim::Owned(guard) = cache.claim(&a).unwrap() else {
            panic!("first claim should own the load");
        };
        assert!(cache.is_loading(&a));
        assert!(cache.is_empty());

        let stored = guard.complete(Arc::new(json!({"x": 1})));
        assert!(!cache.is_loading(&a));
        assert_eq!(cache.len(), 1);

        match cache.claim(&a).unwrap() {
            Claim::Cached(exports) => assert!(Arc::ptr_eq(&exports, &stored)),
            Claim::Owned(_) => panic!("second claim should hit the cache"),
        }
    }

    #[test]
    fn test_dropped_guard_evicts() {
        let cache = ModuleCache::new();
        let a = id("/a.js");

        {
            let _guard = cache.claim(&a).unwrap();
            assert!(cache.record(&a).is_some());
        }

        assert!(cache.record(&a).is_none());
        assert!(matches!(cache.claim(&a).unwrap(), Claim::Owned(_)));
    }

    #[test]
    fn test_reclaim_on_same_thread_is_cyclic() {
        let cache = ModuleCache::new();
        let a = id("/a.js");
        let b = id("/b.js");

        let _a_guard = cache.claim(&a).unwrap();
        let _b_guard = cache.claim(&b).unwrap();

        match cache.claim(&a) {
            Err(ModuleError::CyclicLoad { id: cyclic, chain }) => {
                assert_eq!(cyclic, a);
                assert_eq!(chain, vec![a.clone(), b.clone(), a.clone()]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a cyclic load error"),
        }
    }

    #[test]
    fn test_waiter_receives_completed_exports() {
        let cache = Arc::new(ModuleCache::new());
        let a = id("/a.js");

        let Claim::Owned(guard) = cache.claim(&a).unwrap() else {
            panic!("first claim should own the load");
        };

        let waiter = {
            let cache = Arc::clone(&cache);
            let a = a.clone();
            thread::spawn(move || match cache.claim(&a).unwrap() {
                Claim::Cached(exports) => exports,
                Claim::Owned(_) => panic!("waiter must not evaluate again"),
            })
        };

        // Give the waiter a moment to block on the loading entry.
        thread::sleep(std::time::Duration::from_millis(50));
        let stored = guard.complete(Arc::new(json!("done")));

        let seen = waiter.join().unwrap();
        assert!(Arc::ptr_eq(&seen, &stored));
    }
}
