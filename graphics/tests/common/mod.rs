//! Shared fakes for texture integration tests.
//!
//! The factory hands out fake COM objects that are never freed, so tests can
//! inspect reference counts after every texture is gone.

use std::cell::RefCell;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use comlink_core::com::fake::FakeObject;
use comlink_core::NativeGuid;
use comlink_graphics::native::{
    IDirect3DBaseTexture9, IDirect3DCubeTexture9, IDirect3DTexture9, IDirect3DVolumeTexture9,
};
use comlink_graphics::{
    NativeCallError, NativeDevice, NativeTextureFactory, TextureInterface, TextureKind,
    TextureRequest,
};

/// Initialize logging for test output.
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// The interface id a texture of `kind` answers to.
pub fn iid_for(kind: TextureKind) -> NativeGuid {
    match kind {
        TextureKind::Texture2d => IDirect3DTexture9::IID,
        TextureKind::Cube => IDirect3DCubeTexture9::IID,
        TextureKind::Volume => IDirect3DVolumeTexture9::IID,
    }
}

/// Factory creating one fake object per call.
#[derive(Default)]
pub struct FakeFactory {
    objects: RefCell<Vec<Box<FakeObject>>>,
    loaded: RefCell<Vec<Vec<u8>>>,
    opened: RefCell<Vec<PathBuf>>,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference counts of every object created so far, oldest first.
    pub fn refs(&self) -> Vec<u32> {
        self.objects.borrow().iter().map(|object| object.refs()).collect()
    }

    /// Payloads passed to `texture_from_memory`, oldest first.
    pub fn loaded(&self) -> Vec<Vec<u8>> {
        self.loaded.borrow().clone()
    }

    /// Paths passed to `texture_from_file`, oldest first.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }

    fn spawn(&self, kind: TextureKind) -> *mut c_void {
        let object = FakeObject::with_interface(1, iid_for(kind));
        let ptr = object.raw().as_ptr();
        self.objects.borrow_mut().push(object);
        ptr
    }
}

unsafe impl NativeTextureFactory for FakeFactory {
    fn create_texture(&self, request: &TextureRequest) -> Result<*mut c_void, NativeCallError> {
        Ok(self.spawn(request.kind))
    }

    fn texture_from_memory(
        &self,
        data: &[u8],
        request: &TextureRequest,
    ) -> Result<*mut c_void, NativeCallError> {
        self.loaded.borrow_mut().push(data.to_vec());
        Ok(self.spawn(request.kind))
    }

    fn texture_from_file(
        &self,
        path: &Path,
        request: &TextureRequest,
    ) -> Result<*mut c_void, NativeCallError> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(self.spawn(request.kind))
    }
}

/// Device that records every binding.
#[derive(Default)]
pub struct RecordingDevice {
    bindings: RefCell<Vec<(u32, Option<usize>)>>,
}

impl RecordingDevice {
    /// `(stage, address)` pairs in call order.
    pub fn bindings(&self) -> Vec<(u32, Option<usize>)> {
        self.bindings.borrow().clone()
    }
}

impl NativeDevice for RecordingDevice {
    fn set_texture(
        &self,
        stage: u32,
        texture: Option<NonNull<IDirect3DBaseTexture9>>,
    ) -> Result<(), NativeCallError> {
        let address = texture.map(|ptr| ptr.as_ptr() as usize);
        self.bindings.borrow_mut().push((stage, address));
        Ok(())
    }
}
