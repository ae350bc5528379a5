//! Conversions between this layer and the `windows` crate's COM types.
//!
//! Real Direct3D objects arrive as `windows` smart pointers; these turn them
//! into [`RawInterface`] values (and back) without touching the reference
//! count unless ownership is moved explicitly.

use std::ptr::NonNull;

use windows::core::{Interface, GUID, HRESULT as WinHRESULT};

use super::{RawInterface, HRESULT};
use crate::guid::NativeGuid;

impl From<GUID> for NativeGuid {
    fn from(guid: GUID) -> Self {
        Self {
            data1: guid.data1,
            data2: guid.data2,
            data3: guid.data3,
            data4: guid.data4,
        }
    }
}

impl From<NativeGuid> for GUID {
    fn from(guid: NativeGuid) -> Self {
        GUID::from_values(guid.data1, guid.data2, guid.data3, guid.data4)
    }
}

/// Unwrap a `windows` status code.
pub fn hresult_from_windows(code: WinHRESULT) -> HRESULT {
    code.0
}

/// Wrap a status code for `windows` APIs.
pub fn hresult_to_windows(code: HRESULT) -> WinHRESULT {
    WinHRESULT(code)
}

impl RawInterface {
    /// The pointer behind a `windows` interface, without adding a reference.
    pub fn from_interface<T: Interface>(interface: &T) -> Self {
        // SAFETY: `windows` interface values always wrap a live, non-null
        // object.
        Self(unsafe { NonNull::new_unchecked(interface.as_raw()) })
    }

    /// Take over the reference held by `interface`.
    pub fn from_owned<T: Interface>(interface: T) -> Self {
        // SAFETY: as above; `into_raw` hands over the reference instead of
        // releasing it.
        Self(unsafe { NonNull::new_unchecked(interface.into_raw()) })
    }

    /// Move one owned reference into a `windows` smart pointer of type `T`.
    ///
    /// # Safety
    ///
    /// The object must implement `T` and the caller must own the reference
    /// being moved; the returned value releases it on drop.
    pub unsafe fn into_interface<T: Interface>(self) -> T {
        unsafe { T::from_raw(self.as_ptr()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::com::{E_NOINTERFACE, IID_IUNKNOWN};
    use windows::core::IUnknown;

    #[test]
    fn iunknown_iid_matches() {
        assert_eq!(NativeGuid::from(IUnknown::IID), IID_IUNKNOWN);
        assert_eq!(GUID::from(IID_IUNKNOWN), IUnknown::IID);
    }

    #[test]
    fn hresults_carry_the_same_code() {
        let code = hresult_to_windows(E_NOINTERFACE);
        assert_eq!(code, windows::Win32::Foundation::E_NOINTERFACE);
        assert_eq!(hresult_from_windows(code), E_NOINTERFACE);
        assert!(code.is_err());
    }

    #[test]
    fn guid_fields_are_preserved() {
        let guid = GUID::from_u128(0x85c31227_3de5_4f00_9b3a_f11ac38c18b5);
        let native = NativeGuid::from(guid);
        assert_eq!(native.data1, 0x85c3_1227);
        assert_eq!(native.data4[7], 0xb5);
        assert_eq!(GUID::from(native), guid);
    }
}
