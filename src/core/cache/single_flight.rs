//! Per-path generation gate and per-record invalidation gate
//!
//! At most one generation runs per artifact path inside this process. Late
//! arrivals wait on the same async lock and re-check the cache once they
//! get it, so they pick up the winner's artifact instead of regenerating.
//!
//! Generations of a record share its [`RecordGates`] entry; invalidating
//! the record takes it exclusively, so stale-artifact deletion never runs
//! while a generation of the same record is writing or renaming files.
//!
//! Both gates are process-scoped. Several processes sharing one artifact
//! directory need an advisory file lock on the target path instead.

use crate::domain::{FormKind, RecordId};
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

type Gate = Arc<RwLock<()>>;
type GateMap<K> = Arc<Mutex<HashMap<K, Gate>>>;

/// Keyed async locks whose entries disappear once nobody holds or waits
#[derive(Debug)]
struct Gates<K> {
    map: GateMap<K>,
}

impl<K> Default for Gates<K> {
    fn default() -> Self {
        Self {
            map: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> Gates<K> {
    fn gate(&self, key: &K) -> Gate {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(key.clone())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    async fn shared(&self, key: &K) -> GateGuard<K> {
        let held = Held::Shared(self.gate(key).read_owned().await);
        self.guard(key, held)
    }

    async fn exclusive(&self, key: &K) -> GateGuard<K> {
        let held = Held::Exclusive(self.gate(key).write_owned().await);
        self.guard(key, held)
    }

    fn guard(&self, key: &K, held: Held) -> GateGuard<K> {
        GateGuard {
            key: key.clone(),
            map: Arc::clone(&self.map),
            held: Some(held),
        }
    }

    fn len(&self) -> usize {
        self.map.lock().map(|m| m.len()).unwrap_or_default()
    }
}

enum Held {
    Shared(OwnedRwLockReadGuard<()>),
    Exclusive(OwnedRwLockWriteGuard<()>),
}

/// Held while generating or invalidating; releases the key on drop
pub struct GateGuard<K: Eq + Hash> {
    key: K,
    map: GateMap<K>,
    held: Option<Held>,
}

impl<K: Eq + Hash> GateGuard<K> {
    /// Whether this guard excludes every other holder of the key
    pub fn is_exclusive(&self) -> bool {
        matches!(self.held, Some(Held::Exclusive(_)))
    }
}

impl<K: Eq + Hash> Drop for GateGuard<K> {
    fn drop(&mut self) {
        // Release the async lock before inspecting the refcount
        drop(self.held.take());

        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(gate) = map.get(&self.key) {
            // Only the map itself still holds it: nobody is waiting
            if Arc::strong_count(gate) == 1 {
                map.remove(&self.key);
            }
        }
    }
}

/// Guard for one artifact path
pub type FlightGuard = GateGuard<PathBuf>;

/// Guard for one record, shared by generations and exclusive for invalidation
pub type RecordGuard = GateGuard<(FormKind, RecordId)>;

/// Map of in-flight generations keyed by resolved artifact path
#[derive(Debug, Default)]
pub struct SingleFlight {
    gates: Gates<PathBuf>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive generation rights on `key`
    pub async fn acquire(&self, key: &Path) -> FlightGuard {
        self.gates.exclusive(&key.to_path_buf()).await
    }

    /// Number of keys currently tracked
    pub fn in_flight(&self) -> usize {
        self.gates.len()
    }
}

/// Per-record gates separating generation from invalidation
#[derive(Debug, Default)]
pub struct RecordGates {
    gates: Gates<(FormKind, RecordId)>,
}

impl RecordGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the generations running for a record
    pub async fn generating(&self, kind: FormKind, id: RecordId) -> RecordGuard {
        self.gates.shared(&(kind, id)).await
    }

    /// Wait until no generation of the record runs, then block new ones
    pub async fn invalidating(&self, kind: FormKind, id: RecordId) -> RecordGuard {
        self.gates.exclusive(&(kind, id)).await
    }

    /// Number of records currently tracked
    pub fn tracked(&self) -> usize {
        self.gates.len()
    }
}
