//! Resource error types.

use comlink_core::{MarshalError, HRESULT};
use thiserror::Error;

use crate::types::TextureKind;

/// A native call returned a failure `HRESULT`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{call} failed with HRESULT 0x{hresult:08X}")]
pub struct NativeCallError {
    /// Name of the native entry point.
    pub call: &'static str,
    /// The failure code, as an unsigned bit pattern for display.
    pub hresult: u32,
}

impl NativeCallError {
    /// Create an error for `call` returning `hresult`.
    pub fn new(call: &'static str, hresult: HRESULT) -> Self {
        Self {
            call,
            hresult: hresult as u32,
        }
    }

    /// The failure code as a signed `HRESULT`.
    pub fn code(&self) -> HRESULT {
        self.hresult as HRESULT
    }
}

/// Errors that can occur while creating or accessing native resources.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The resource has been disposed; its native handle is gone.
    #[error("{0} has been disposed")]
    Disposed(&'static str),
    /// A native call reported success but returned no object.
    #[error("{0} returned a null interface")]
    NullPointer(&'static str),
    /// A request describes a different resource kind than the one being built.
    #[error("expected a {expected} request, got {requested}")]
    KindMismatch {
        /// Kind of the resource being created.
        expected: TextureKind,
        /// Kind named in the request.
        requested: TextureKind,
    },
    /// A native call failed.
    #[error(transparent)]
    Native(#[from] NativeCallError),
    /// Input data could not be marshaled.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
}

/// Result alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
