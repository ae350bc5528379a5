//! Consuming native output buffers.
//!
//! Compilers and loaders in the native library return text and bytecode in a
//! reference-counted buffer object (`ID3DXBuffer`). The caller receives one
//! reference and must release it after copying the payload out. The consumers
//! here take the buffer by value, copy, and release exactly once, even if the
//! copy panics.

use std::ffi::c_void;

use crate::com::{IUnknownVtbl, RawInterface};

/// A native buffer holding one owned reference.
///
/// # Safety
///
/// Implementors must guarantee that [`buffer_pointer`](Self::buffer_pointer)
/// is either null or valid for reads of [`buffer_size`](Self::buffer_size)
/// bytes until [`release`](Self::release) is called. Implementors must not be
/// `Copy`, so the release cannot be duplicated.
pub unsafe trait NativeBuffer {
    /// Start of the payload.
    fn buffer_pointer(&self) -> *const u8;

    /// Payload length in bytes.
    fn buffer_size(&self) -> usize;

    /// Release the owned reference, returning the remaining count.
    fn release(self) -> u32;
}

/// The `ID3DXBuffer` vtable.
#[repr(C)]
pub struct ID3DXBufferVtbl {
    pub base: IUnknownVtbl,
    pub get_buffer_pointer: unsafe extern "system" fn(this: *mut c_void) -> *mut c_void,
    pub get_buffer_size: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

/// Owned reference to a native `ID3DXBuffer`.
///
/// Dropping it releases the reference; [`buffer_to_string`] and
/// [`buffer_to_bytes`] release it after copying.
#[derive(Debug)]
pub struct ComBuffer {
    raw: RawInterface,
}

impl ComBuffer {
    /// Adopt the reference carried by `raw`.
    ///
    /// # Safety
    ///
    /// `raw` must point to a live `ID3DXBuffer` and the caller must transfer
    /// ownership of exactly one reference.
    pub unsafe fn from_raw(raw: RawInterface) -> Self {
        Self { raw }
    }

    /// Adopt a possibly-null out-parameter from a native call.
    ///
    /// # Safety
    ///
    /// Same as [`from_raw`](Self::from_raw) when `ptr` is non-null.
    pub unsafe fn from_out_param(ptr: *mut c_void) -> Option<Self> {
        RawInterface::new(ptr).map(|raw| unsafe { Self::from_raw(raw) })
    }

    fn vtable(&self) -> &ID3DXBufferVtbl {
        // SAFETY: `from_raw` requires an ID3DXBuffer, whose vtable pointer is
        // the first field of the object.
        unsafe { &**self.raw.as_ptr().cast::<*const ID3DXBufferVtbl>() }
    }
}

unsafe impl NativeBuffer for ComBuffer {
    fn buffer_pointer(&self) -> *const u8 {
        let get = self.vtable().get_buffer_pointer;
        unsafe { get(self.raw.as_ptr()) as *const u8 }
    }

    fn buffer_size(&self) -> usize {
        let get = self.vtable().get_buffer_size;
        unsafe { get(self.raw.as_ptr()) as usize }
    }

    fn release(self) -> u32 {
        let raw = self.raw;
        std::mem::forget(self);
        unsafe { raw.release() }
    }
}

impl Drop for ComBuffer {
    fn drop(&mut self) {
        unsafe {
            self.raw.release();
        }
    }
}

/// Releases the wrapped buffer when dropped.
struct ReleaseOnDrop<B: NativeBuffer>(Option<B>);

impl<B: NativeBuffer> ReleaseOnDrop<B> {
    fn payload(&self) -> &[u8] {
        let Some(buffer) = &self.0 else {
            return &[];
        };
        let ptr = buffer.buffer_pointer();
        let len = buffer.buffer_size();
        if ptr.is_null() || len == 0 {
            return &[];
        }
        // SAFETY: guaranteed by the `NativeBuffer` contract until release,
        // which only happens when `self` is dropped.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

impl<B: NativeBuffer> Drop for ReleaseOnDrop<B> {
    fn drop(&mut self) {
        if let Some(buffer) = self.0.take() {
            let remaining = buffer.release();
            log::trace!("Released native buffer ({} references left)", remaining);
        }
    }
}

/// Copy a NUL-terminated narrow string out of `buffer` and release it.
///
/// The string ends at the first NUL byte or at the end of the buffer,
/// whichever comes first. Bytes that are not valid UTF-8 are replaced with
/// `U+FFFD`. A `None` buffer yields an empty string and releases nothing.
pub fn buffer_to_string<B: NativeBuffer>(buffer: Option<B>) -> String {
    let Some(buffer) = buffer else {
        return String::new();
    };
    let guard = ReleaseOnDrop(Some(buffer));
    let bytes = guard.payload();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = String::from_utf8_lossy(&bytes[..end]).into_owned();
    text
}

/// Copy the full payload of `buffer` and release it.
///
/// Used for binary results such as compiled shader bytecode. A `None` buffer
/// yields an empty vector and releases nothing.
pub fn buffer_to_bytes<B: NativeBuffer>(buffer: Option<B>) -> Vec<u8> {
    let Some(buffer) = buffer else {
        return Vec::new();
    };
    let guard = ReleaseOnDrop(Some(buffer));
    let bytes = guard.payload().to_vec();
    bytes
}
