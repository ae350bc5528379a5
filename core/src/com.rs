//! Minimal COM binary interface.
//!
//! Every native object handed out by the graphics API starts with a pointer
//! to a vtable whose first three slots are `QueryInterface`, `AddRef` and
//! `Release`. That is all this layer needs to own a reference: the rest of
//! each interface is called by code outside this crate.
//!
//! On Windows, objects obtained through the `windows` crate convert to and
//! from [`RawInterface`] (see `from_interface`, `from_owned` and
//! `into_interface`). The vtable below stays for `ID3DXBuffer`, which
//! `windows` does not ship, and for the portable test doubles.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

use crate::guid::NativeGuid;

#[cfg(windows)]
mod win32;
#[cfg(windows)]
pub use win32::{hresult_from_windows, hresult_to_windows};

/// Native status code. Negative values are failures.
pub type HRESULT = i32;

/// `S_OK`
pub const S_OK: HRESULT = 0;
/// `E_NOINTERFACE`
pub const E_NOINTERFACE: HRESULT = 0x8000_4002_u32 as i32;

/// `IID_IUnknown` {00000000-0000-0000-C000-000000000046}
pub const IID_IUNKNOWN: NativeGuid = NativeGuid {
    data1: 0,
    data2: 0,
    data3: 0,
    data4: [0xc0, 0, 0, 0, 0, 0, 0, 0x46],
};

/// Returns `true` for success codes (`SUCCEEDED` macro).
pub fn succeeded(hr: HRESULT) -> bool {
    hr >= 0
}

/// The `IUnknown` vtable, in COM slot order.
#[repr(C)]
pub struct IUnknownVtbl {
    pub query_interface: unsafe extern "system" fn(
        this: *mut c_void,
        riid: *const NativeGuid,
        object: *mut *mut c_void,
    ) -> HRESULT,
    pub add_ref: unsafe extern "system" fn(this: *mut c_void) -> u32,
    pub release: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

/// A non-null pointer to a native COM object.
///
/// Holding a `RawInterface` does not imply owning a reference; ownership is
/// tracked by whoever stores it (see `ResourceGuard` in the graphics crate).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawInterface(NonNull<c_void>);

// SAFETY: the pointer is an opaque address; thread affinity of the object it
// points to is the native library's contract, not this wrapper's.
unsafe impl Send for RawInterface {}
unsafe impl Sync for RawInterface {}

impl RawInterface {
    /// Wrap a raw pointer, returning `None` for null.
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// Wrap a typed non-null pointer.
    pub fn from_non_null<T>(ptr: NonNull<T>) -> Self {
        Self(ptr.cast())
    }

    /// The untyped address.
    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// Reinterpret the same address as a pointer to interface `T`.
    ///
    /// No reference is added; the result is only valid while the owner of
    /// this pointer keeps its reference.
    pub fn cast<T>(&self) -> NonNull<T> {
        self.0.cast()
    }

    /// Add one reference, returning the new count.
    ///
    /// # Safety
    ///
    /// The pointer must address a live COM object.
    pub unsafe fn add_ref(&self) -> u32 {
        let vtbl = unsafe { self.vtable() };
        unsafe { (vtbl.add_ref)(self.as_ptr()) }
    }

    /// Drop one reference, returning the remaining count.
    ///
    /// # Safety
    ///
    /// The pointer must address a live COM object and the caller must own the
    /// reference being released. The object may be destroyed by this call.
    pub unsafe fn release(&self) -> u32 {
        let vtbl = unsafe { self.vtable() };
        unsafe { (vtbl.release)(self.as_ptr()) }
    }

    /// Ask the object for another interface. On success the returned pointer
    /// carries its own reference.
    ///
    /// # Safety
    ///
    /// The pointer must address a live COM object.
    pub unsafe fn query_interface(&self, iid: &NativeGuid) -> Result<RawInterface, HRESULT> {
        let vtbl = unsafe { self.vtable() };
        let mut out: *mut c_void = std::ptr::null_mut();
        let hr = unsafe { (vtbl.query_interface)(self.as_ptr(), iid, &mut out) };
        if !succeeded(hr) {
            return Err(hr);
        }
        RawInterface::new(out).ok_or(E_NOINTERFACE)
    }

    /// # Safety
    ///
    /// The pointer must address a COM object whose first field is a vtable
    /// pointer starting with the `IUnknown` slots.
    unsafe fn vtable(&self) -> &IUnknownVtbl {
        unsafe { &**self.as_ptr().cast::<*const IUnknownVtbl>() }
    }
}

impl fmt::Debug for RawInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawInterface").field(&self.0.as_ptr()).finish()
    }
}

/// Test doubles shaped like real COM objects.
///
/// Reference counts are observable and objects are never freed, so tests can
/// check exactly how many releases happened.
#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A heap object whose first field is an `IUnknown` vtable pointer.
    ///
    /// `QueryInterface` succeeds for `IID_IUnknown` and for `iid`, handing
    /// out the same address with one added reference.
    #[repr(C)]
    pub struct FakeObject {
        pub vtbl: *const IUnknownVtbl,
        pub refs: AtomicU32,
        pub iid: NativeGuid,
    }

    unsafe extern "system" fn query_interface(
        this: *mut c_void,
        riid: *const NativeGuid,
        object: *mut *mut c_void,
    ) -> HRESULT {
        let fake = unsafe { &*this.cast::<FakeObject>() };
        let riid = unsafe { *riid };
        if riid == IID_IUNKNOWN || (!riid.is_null() && riid == fake.iid) {
            fake.refs.fetch_add(1, Ordering::SeqCst);
            unsafe { *object = this };
            S_OK
        } else {
            unsafe { *object = std::ptr::null_mut() };
            E_NOINTERFACE
        }
    }

    unsafe extern "system" fn add_ref(this: *mut c_void) -> u32 {
        let object = unsafe { &*this.cast::<FakeObject>() };
        object.refs.fetch_add(1, Ordering::SeqCst) + 1
    }

    // Never frees; tests inspect the count afterwards.
    unsafe extern "system" fn release(this: *mut c_void) -> u32 {
        let object = unsafe { &*this.cast::<FakeObject>() };
        object.refs.fetch_sub(1, Ordering::SeqCst) - 1
    }

    /// Shared vtable for every [`FakeObject`].
    pub static VTBL: IUnknownVtbl = IUnknownVtbl {
        query_interface,
        add_ref,
        release,
    };

    impl FakeObject {
        /// Allocate an object already holding `refs` references.
        pub fn new(refs: u32) -> Box<Self> {
            Self::with_interface(refs, NativeGuid::NULL)
        }

        /// Allocate an object that also answers `QueryInterface` for `iid`.
        pub fn with_interface(refs: u32, iid: NativeGuid) -> Box<Self> {
            Box::new(Self {
                vtbl: &VTBL,
                refs: AtomicU32::new(refs),
                iid,
            })
        }

        pub fn raw(&self) -> RawInterface {
            RawInterface::from_non_null(NonNull::from(self))
        }

        pub fn refs(&self) -> u32 {
            self.refs.load(Ordering::SeqCst)
        }
    }
}
