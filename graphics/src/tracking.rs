//! Live-object tracking for native resources.
//!
//! Guards created with [`ResourceGuard::tracked`](crate::ResourceGuard::tracked)
//! register here on construction and unregister when their reference is
//! released. Anything still registered at shutdown was never disposed.
//!
//! ```ignore
//! let table = Arc::new(ObjectTable::new());
//! let texture = Texture::from_memory(&factory, &bytes)?.tracked(&table);
//! // ...
//! drop(texture);
//! assert_eq!(table.report_leaks(), 0);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use comlink_core::RawInterface;
use parking_lot::Mutex;

/// Identifier of one registration in an [`ObjectTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackingId(u64);

/// Snapshot of a live tracked resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedObject {
    /// Registration id, increasing in creation order.
    pub id: TrackingId,
    /// Resource type name, e.g. `"CubeTexture"`.
    pub type_name: &'static str,
    /// Address of the native object.
    pub address: usize,
}

/// Registry of native resources that have not been released yet.
///
/// Thread-safe; share it between owners with an `Arc`.
#[derive(Debug, Default)]
pub struct ObjectTable {
    next_id: AtomicU64,
    live: Mutex<HashMap<TrackingId, TrackedObject>>,
}

impl ObjectTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, raw: RawInterface, type_name: &'static str) -> TrackingId {
        let id = TrackingId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let object = TrackedObject {
            id,
            type_name,
            address: raw.as_ptr() as usize,
        };
        self.live.lock().insert(id, object);
        id
    }

    pub(crate) fn unregister(&self, id: TrackingId) -> bool {
        self.live.lock().remove(&id).is_some()
    }

    /// Number of live tracked resources.
    pub fn len(&self) -> usize {
        self.live.lock().len()
    }

    /// Whether no tracked resource is alive.
    pub fn is_empty(&self) -> bool {
        self.live.lock().is_empty()
    }

    /// Snapshot of the live resources, oldest first.
    pub fn live_objects(&self) -> Vec<TrackedObject> {
        let mut objects: Vec<_> = self.live.lock().values().cloned().collect();
        objects.sort_by_key(|object| object.id);
        objects
    }

    /// Log a warning for every live resource and return how many there are.
    pub fn report_leaks(&self) -> usize {
        let objects = self.live_objects();
        for object in &objects {
            log::warn!(
                "Object of type {} not disposed (native object at {:#x}).",
                object.type_name,
                object.address
            );
        }
        objects.len()
    }
}

static_assertions::assert_impl_all!(ObjectTable: Send, Sync);
