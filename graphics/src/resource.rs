//! Ownership of native resource handles.
//!
//! A [`ResourceGuard`] owns exactly one reference to a native COM object.
//! The reference is released on [`dispose`](ResourceGuard::dispose) or, if
//! that never happens, when the guard is dropped. After release every access
//! fails with [`ResourceError::Disposed`].
//!
//! # State
//!
//! ```text
//! Constructed ──dispose()/drop──▶ Disposed
//!      │                             │
//!      └─ raw() -> Ok(ptr)           └─ raw() -> Err(Disposed), dispose() no-op
//! ```

use std::sync::Arc;

use comlink_core::RawInterface;

use crate::error::{ResourceError, ResourceResult};
use crate::tracking::{ObjectTable, TrackingId};

/// Scoped owner of one native reference.
pub struct ResourceGuard {
    handle: Option<RawInterface>,
    type_name: &'static str,
    tracking: Option<(Arc<ObjectTable>, TrackingId)>,
}

impl ResourceGuard {
    /// Take ownership of the reference carried by `raw`.
    ///
    /// # Safety
    ///
    /// `raw` must point to a live COM object and the caller must transfer
    /// exactly one reference, which the guard will release.
    pub unsafe fn new(raw: RawInterface, type_name: &'static str) -> Self {
        log::debug!("Acquired {} at {:?}", type_name, raw);
        Self {
            handle: Some(raw),
            type_name,
            tracking: None,
        }
    }

    /// Register this guard in `table` until its reference is released.
    ///
    /// Has no effect on a disposed guard. A guard is registered in at most one
    /// table; calling this again moves the registration.
    pub fn tracked(mut self, table: &Arc<ObjectTable>) -> Self {
        let Some(raw) = self.handle else {
            return self;
        };
        self.untrack();
        let id = table.register(raw, self.type_name);
        self.tracking = Some((Arc::clone(table), id));
        self
    }

    /// Type name of the owned resource.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the reference has been released.
    pub fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    /// The owned pointer, without adding a reference.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Disposed`] once the guard has been disposed.
    pub fn raw(&self) -> ResourceResult<RawInterface> {
        self.handle.ok_or(ResourceError::Disposed(self.type_name))
    }

    /// Release the owned reference.
    ///
    /// Returns `true` if this call released it and `false` if the guard was
    /// already disposed.
    pub fn dispose(&mut self) -> bool {
        self.release(true)
    }

    fn release(&mut self, explicit: bool) -> bool {
        let Some(raw) = self.handle.take() else {
            return false;
        };
        if !explicit && self.tracking.is_some() {
            log::warn!("{} at {:?} released without dispose", self.type_name, raw);
        }
        self.untrack();
        // SAFETY: `new` transferred one reference to this guard and `handle`
        // was taken above, so it is released exactly once.
        let remaining = unsafe { raw.release() };
        log::debug!(
            "Released {} at {:?} ({} references left)",
            self.type_name,
            raw,
            remaining
        );
        true
    }

    fn untrack(&mut self) {
        if let Some((table, id)) = self.tracking.take() {
            table.unregister(id);
        }
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        self.release(false);
    }
}

impl std::fmt::Debug for ResourceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceGuard")
            .field("type_name", &self.type_name)
            .field("handle", &self.handle)
            .field("tracked", &self.tracking.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(ResourceGuard: Send, Sync);

/// Anything that owns a native resource through a [`ResourceGuard`].
///
/// Generic resource-management code can hold `&dyn NativeResource` and ask
/// for the native handle without knowing the concrete resource kind.
///
/// The untyped pointer is public so callers can hand it to native APIs this
/// crate does not wrap. Typed interface views stay inside the crate; code
/// outside that reinterprets the pointer with [`RawInterface::cast`] takes on
/// the interface-type guarantee itself.
pub trait NativeResource {
    /// The guard owning the native reference.
    fn guard(&self) -> &ResourceGuard;

    /// Mutable access to the guard, for disposal.
    fn guard_mut(&mut self) -> &mut ResourceGuard;

    /// The untyped native pointer.
    fn native_pointer(&self) -> ResourceResult<RawInterface> {
        self.guard().raw()
    }

    /// Type name of the resource.
    fn type_name(&self) -> &'static str {
        self.guard().type_name()
    }

    /// Whether the resource has been disposed.
    fn is_disposed(&self) -> bool {
        self.guard().is_disposed()
    }

    /// Release the native reference. Idempotent.
    fn dispose(&mut self) -> bool {
        self.guard_mut().dispose()
    }
}

impl NativeResource for ResourceGuard {
    fn guard(&self) -> &ResourceGuard {
        self
    }

    fn guard_mut(&mut self) -> &mut ResourceGuard {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comlink_core::com::fake::FakeObject;

    fn guard_for(object: &FakeObject) -> ResourceGuard {
        unsafe { ResourceGuard::new(object.raw(), "Texture") }
    }

    #[test]
    fn dispose_releases_once() {
        let object = FakeObject::new(1);
        let mut guard = guard_for(&object);

        assert!(guard.dispose());
        assert_eq!(object.refs(), 0);
        assert!(!guard.dispose());
        assert_eq!(object.refs(), 0);
        drop(guard);
        assert_eq!(object.refs(), 0);
    }

    #[test]
    fn drop_releases_when_not_disposed() {
        let object = FakeObject::new(2);
        drop(guard_for(&object));
        assert_eq!(object.refs(), 1);
    }

    #[test]
    fn access_after_dispose_fails() {
        let object = FakeObject::new(1);
        let mut guard = guard_for(&object);
        assert_eq!(guard.raw().unwrap(), object.raw());

        guard.dispose();
        assert!(guard.is_disposed());
        let err = guard.raw().unwrap_err();
        assert!(matches!(err, ResourceError::Disposed("Texture")));
    }

    #[test]
    fn tracked_guard_unregisters_on_dispose() {
        let table = Arc::new(ObjectTable::new());
        let object = FakeObject::new(1);
        let mut guard = guard_for(&object).tracked(&table);
        assert_eq!(table.len(), 1);

        guard.dispose();
        assert!(table.is_empty());
    }

    #[test]
    fn tracked_guard_unregisters_on_drop() {
        let table = Arc::new(ObjectTable::new());
        let object = FakeObject::new(1);
        let guard = guard_for(&object).tracked(&table);
        drop(guard);
        assert!(table.is_empty());
        assert_eq!(object.refs(), 0);
    }

    #[test]
    fn retracking_moves_registration() {
        let first = Arc::new(ObjectTable::new());
        let second = Arc::new(ObjectTable::new());
        let object = FakeObject::new(1);

        let guard = guard_for(&object).tracked(&first).tracked(&second);
        assert!(first.is_empty());
        assert_eq!(second.len(), 1);
        drop(guard);
    }

    #[test]
    fn disposed_guard_is_not_tracked() {
        let table = Arc::new(ObjectTable::new());
        let object = FakeObject::new(1);
        let mut guard = guard_for(&object);
        guard.dispose();

        let _guard = guard.tracked(&table);
        assert!(table.is_empty());
    }

    #[test]
    fn trait_defaults_delegate_to_guard() {
        let object = FakeObject::new(1);
        let mut guard = guard_for(&object);
        let resource: &mut dyn NativeResource = &mut guard;

        assert_eq!(resource.type_name(), "Texture");
        assert_eq!(resource.native_pointer().unwrap(), object.raw());
        assert!(resource.dispose());
        assert!(resource.is_disposed());
    }
}
