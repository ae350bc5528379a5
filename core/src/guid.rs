//! Conversion between the native `GUID` struct and [`Uuid`].
//!
//! The native struct is laid out as `u32, u16, u16, [u8; 8]`. In memory the
//! three integer fields are little-endian on every platform the native API
//! ships on, which is also the byte order [`Uuid::to_bytes_le`] produces. The
//! conversions below pack and unpack fields explicitly instead of copying
//! memory, so they give the same answer on big-endian hosts.

use bytemuck::{Pod, Zeroable};
use uuid::Uuid;

use crate::error::{MarshalError, MarshalResult};

/// Native 128-bit identifier with the exact layout of the C `GUID` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct NativeGuid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

static_assertions::assert_eq_size!(NativeGuid, [u8; 16]);

impl NativeGuid {
    /// The all-zero identifier (`GUID_NULL`).
    pub const NULL: Self = Self {
        data1: 0,
        data2: 0,
        data3: 0,
        data4: [0; 8],
    };

    /// Whether this is `GUID_NULL`.
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Unpack from the 16-byte in-memory layout (little-endian integer fields).
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&bytes[8..16]);
        Self {
            data1: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            data2: u16::from_le_bytes([bytes[4], bytes[5]]),
            data3: u16::from_le_bytes([bytes[6], bytes[7]]),
            data4,
        }
    }

    /// Pack into the 16-byte in-memory layout (little-endian integer fields).
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&self.data1.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.data2.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.data3.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.data4);
        bytes
    }

    /// Read a `GUID` directly out of native memory, in host byte order.
    ///
    /// Use this for bytes handed over by the native library itself; use
    /// [`from_bytes`](Self::from_bytes) for the portable serialized form.
    pub fn from_native_memory(bytes: &[u8]) -> MarshalResult<Self> {
        bytemuck::try_pod_read_unaligned(bytes).map_err(|_| MarshalError::OutOfRange("bytes"))
    }
}

/// Convert a native `GUID` to a [`Uuid`].
///
/// `GUID_NULL` maps to [`Uuid::nil()`]; every other value keeps its fields as-is.
pub fn guid_from_native(guid: &NativeGuid) -> Uuid {
    if guid.is_null() {
        return Uuid::nil();
    }
    Uuid::from_fields(guid.data1, guid.data2, guid.data3, &guid.data4)
}

/// Convert a [`Uuid`] to a native `GUID`.
///
/// [`Uuid::nil()`] maps to `GUID_NULL`; every other value is serialized to its
/// canonical 16-byte layout and unpacked into the native fields.
pub fn guid_to_native(guid: Uuid) -> NativeGuid {
    if guid.is_nil() {
        return NativeGuid::NULL;
    }
    NativeGuid::from_bytes(guid.to_bytes_le())
}

impl From<NativeGuid> for Uuid {
    fn from(guid: NativeGuid) -> Self {
        guid_from_native(&guid)
    }
}

impl From<Uuid> for NativeGuid {
    fn from(guid: Uuid) -> Self {
        guid_to_native(guid)
    }
}
