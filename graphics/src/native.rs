//! The native side of the texture boundary.
//!
//! Interface types are opaque: this crate never dereferences them, it only
//! stores, casts and releases pointers to them. Creation and binding calls
//! belong to the native library and are reached through
//! [`NativeTextureFactory`] and [`NativeDevice`].

use std::ffi::c_void;
use std::path::Path;
use std::ptr::NonNull;

use comlink_core::NativeGuid;

use crate::error::NativeCallError;
use crate::types::{TextureKind, TextureRequest};

macro_rules! opaque_interface {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(C)]
        pub struct $name {
            _private: [u8; 0],
        }
    };
}

opaque_interface!(
    /// `IDirect3DBaseTexture9`, the common base of every texture interface.
    IDirect3DBaseTexture9
);
opaque_interface!(
    /// `IDirect3DTexture9`
    IDirect3DTexture9
);
opaque_interface!(
    /// `IDirect3DCubeTexture9`
    IDirect3DCubeTexture9
);
opaque_interface!(
    /// `IDirect3DVolumeTexture9`
    IDirect3DVolumeTexture9
);

/// `IID_IDirect3DBaseTexture9` {580CA87E-1D3C-4D54-991D-B7D3E3C298CE}
pub const IID_BASE_TEXTURE: NativeGuid = NativeGuid {
    data1: 0x580c_a87e,
    data2: 0x1d3c,
    data3: 0x4d54,
    data4: [0x99, 0x1d, 0xb7, 0xd3, 0xe3, 0xc2, 0x98, 0xce],
};

/// A native texture interface deriving from `IDirect3DBaseTexture9`.
///
/// Every implementor is a COM interface with single inheritance from the base
/// texture interface, so a pointer to it is also a valid base pointer.
pub trait TextureInterface: 'static {
    /// Shape of textures exposing this interface.
    const KIND: TextureKind;
    /// Interface identifier.
    const IID: NativeGuid;
}

impl TextureInterface for IDirect3DTexture9 {
    const KIND: TextureKind = TextureKind::Texture2d;
    // {85C31227-3DE5-4F00-9B3A-F11AC38C18B5}
    const IID: NativeGuid = NativeGuid {
        data1: 0x85c3_1227,
        data2: 0x3de5,
        data3: 0x4f00,
        data4: [0x9b, 0x3a, 0xf1, 0x1a, 0xc3, 0x8c, 0x18, 0xb5],
    };
}

impl TextureInterface for IDirect3DCubeTexture9 {
    const KIND: TextureKind = TextureKind::Cube;
    // {FFF32F81-D953-473A-9223-93D652ABA93F}
    const IID: NativeGuid = NativeGuid {
        data1: 0xfff3_2f81,
        data2: 0xd953,
        data3: 0x473a,
        data4: [0x92, 0x23, 0x93, 0xd6, 0x52, 0xab, 0xa9, 0x3f],
    };
}

impl TextureInterface for IDirect3DVolumeTexture9 {
    const KIND: TextureKind = TextureKind::Volume;
    // {2518526C-E789-4111-A7B9-47EF328D13E6}
    const IID: NativeGuid = NativeGuid {
        data1: 0x2518_526c,
        data2: 0xe789,
        data3: 0x4111,
        data4: [0xa7, 0xb9, 0x47, 0xef, 0x32, 0x8d, 0x13, 0xe6],
    };
}

/// Native texture creation entry points.
///
/// # Safety
///
/// A non-null pointer returned from any method must address a live object
/// implementing the interface for `request.kind` and carry exactly one
/// reference, which the caller takes over.
pub unsafe trait NativeTextureFactory {
    /// Create an empty texture described by `request`.
    fn create_texture(&self, request: &TextureRequest) -> Result<*mut c_void, NativeCallError>;

    /// Create a texture from an image file held in memory.
    fn texture_from_memory(
        &self,
        data: &[u8],
        request: &TextureRequest,
    ) -> Result<*mut c_void, NativeCallError>;

    /// Create a texture from an image file on disk.
    fn texture_from_file(
        &self,
        path: &Path,
        request: &TextureRequest,
    ) -> Result<*mut c_void, NativeCallError>;
}

/// Native device calls that consume texture pointers.
pub trait NativeDevice {
    /// Bind `texture` (or nothing) to sampler `stage`.
    ///
    /// The device adds its own reference; ownership stays with the caller.
    fn set_texture(
        &self,
        stage: u32,
        texture: Option<NonNull<IDirect3DBaseTexture9>>,
    ) -> Result<(), NativeCallError>;
}
