//! Texture resources.
//!
//! [`TextureResource`] is generic over the native interface it wraps; the
//! aliases [`Texture`], [`CubeTexture`] and [`VolumeTexture`] are the three
//! shapes the graphics API knows about. Every variant owns its native
//! reference through a [`ResourceGuard`] and only adds a typed view of the
//! stored pointer.

use std::ffi::c_void;
use std::marker::PhantomData;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use comlink_core::com::E_NOINTERFACE;
use comlink_core::{check_array_bounds, read_stream, RawInterface, ReadableStream};

use crate::error::{NativeCallError, ResourceError, ResourceResult};
use crate::native::{
    IDirect3DBaseTexture9, IDirect3DCubeTexture9, IDirect3DTexture9, IDirect3DVolumeTexture9,
    NativeDevice, NativeTextureFactory, TextureInterface,
};
use crate::resource::{NativeResource, ResourceGuard};
use crate::tracking::ObjectTable;
use crate::types::{TextureKind, TextureRequest};

/// A texture owning one reference to native interface `I`.
pub struct TextureResource<I: TextureInterface> {
    guard: ResourceGuard,
    _interface: PhantomData<fn() -> I>,
}

/// 2D texture.
pub type Texture = TextureResource<IDirect3DTexture9>;
/// Cube texture.
pub type CubeTexture = TextureResource<IDirect3DCubeTexture9>;
/// Volume texture.
pub type VolumeTexture = TextureResource<IDirect3DVolumeTexture9>;

impl<I: TextureInterface> TextureResource<I> {
    /// Adopt an existing native reference.
    ///
    /// # Safety
    ///
    /// `ptr` must address a live object implementing `I`, and the caller
    /// transfers exactly one reference to the returned texture.
    pub unsafe fn from_raw(ptr: NonNull<I>) -> Self {
        let raw = RawInterface::from_non_null(ptr);
        Self {
            guard: unsafe { ResourceGuard::new(raw, I::KIND.name()) },
            _interface: PhantomData,
        }
    }

    /// Create an empty texture.
    ///
    /// # Errors
    ///
    /// [`ResourceError::KindMismatch`] if `request` describes another texture
    /// shape, otherwise whatever the factory reports.
    pub fn new<F>(factory: &F, request: &TextureRequest) -> ResourceResult<Self>
    where
        F: NativeTextureFactory + ?Sized,
    {
        check_kind::<I>(request)?;
        let ptr = factory.create_texture(request)?;
        unsafe { Self::adopt(ptr, "create_texture") }
    }

    /// Load a texture from an image file held in memory, taking size, levels
    /// and format from the file.
    pub fn from_memory<F>(factory: &F, data: &[u8]) -> ResourceResult<Self>
    where
        F: NativeTextureFactory + ?Sized,
    {
        Self::from_memory_with(factory, data, &TextureRequest::from_source(I::KIND))
    }

    /// Load a texture from an image file held in memory.
    pub fn from_memory_with<F>(
        factory: &F,
        data: &[u8],
        request: &TextureRequest,
    ) -> ResourceResult<Self>
    where
        F: NativeTextureFactory + ?Sized,
    {
        check_kind::<I>(request)?;
        log::trace!("Loading {} from {} bytes", I::KIND, data.len());
        let ptr = factory.texture_from_memory(data, request)?;
        unsafe { Self::adopt(ptr, "texture_from_memory") }
    }

    /// Load a texture from an image file, taking size, levels and format from
    /// the file.
    pub fn from_file<F>(factory: &F, path: impl AsRef<Path>) -> ResourceResult<Self>
    where
        F: NativeTextureFactory + ?Sized,
    {
        Self::from_file_with(factory, path, &TextureRequest::from_source(I::KIND))
    }

    /// Load a texture from an image file.
    pub fn from_file_with<F>(
        factory: &F,
        path: impl AsRef<Path>,
        request: &TextureRequest,
    ) -> ResourceResult<Self>
    where
        F: NativeTextureFactory + ?Sized,
    {
        check_kind::<I>(request)?;
        let path = path.as_ref();
        log::trace!("Loading {} from {}", I::KIND, path.display());
        let ptr = factory.texture_from_file(path, request)?;
        unsafe { Self::adopt(ptr, "texture_from_file") }
    }

    /// Load a texture from the window `offset..offset + count` of `data`.
    ///
    /// A `count` of zero extends the window to the end of `data`.
    ///
    /// # Errors
    ///
    /// [`MarshalError::OutOfRange`](comlink_core::MarshalError::OutOfRange)
    /// if the window does not fit; the factory is not called in that case.
    pub fn from_memory_range<F>(
        factory: &F,
        data: &[u8],
        offset: i64,
        count: i64,
        request: &TextureRequest,
    ) -> ResourceResult<Self>
    where
        F: NativeTextureFactory + ?Sized,
    {
        let window = check_array_bounds(data, offset, count)?;
        Self::from_memory_with(factory, window.slice(data), request)
    }

    /// Load a texture from `length` bytes of `stream`.
    ///
    /// A `length` of zero reads everything from the current position to the
    /// end of the stream.
    pub fn from_stream<F, S>(
        factory: &F,
        stream: Option<&mut S>,
        length: i64,
        request: &TextureRequest,
    ) -> ResourceResult<Self>
    where
        F: NativeTextureFactory + ?Sized,
        S: ReadableStream + ?Sized,
    {
        check_kind::<I>(request)?;
        let data = read_stream(stream, length)?;
        Self::from_memory_with(factory, &data, request)
    }

    /// # Safety
    ///
    /// A non-null `ptr` must satisfy the [`NativeTextureFactory`] contract.
    unsafe fn adopt(ptr: *mut c_void, call: &'static str) -> ResourceResult<Self> {
        let raw = RawInterface::new(ptr).ok_or(ResourceError::NullPointer(call))?;
        Ok(unsafe { Self::from_raw(raw.cast()) })
    }

    /// Shape of this texture.
    pub fn kind(&self) -> TextureKind {
        I::KIND
    }

    /// Register this texture in `table` until it is released.
    pub fn tracked(self, table: &Arc<ObjectTable>) -> Self {
        Self {
            guard: self.guard.tracked(table),
            _interface: PhantomData,
        }
    }

    /// The stored pointer viewed as `I`.
    pub(crate) fn texture_pointer(&self) -> ResourceResult<NonNull<I>> {
        Ok(self.guard.raw()?.cast())
    }

    /// The stored pointer viewed as the base texture interface.
    pub(crate) fn base_texture_pointer(&self) -> ResourceResult<NonNull<IDirect3DBaseTexture9>> {
        // Single inheritance: the base interface sits at the same address.
        Ok(self.texture_pointer()?.cast())
    }
}

impl<I: TextureInterface> NativeResource for TextureResource<I> {
    fn guard(&self) -> &ResourceGuard {
        &self.guard
    }

    fn guard_mut(&mut self) -> &mut ResourceGuard {
        &mut self.guard
    }
}

impl<I: TextureInterface> std::fmt::Debug for TextureResource<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureResource")
            .field("kind", &I::KIND)
            .field("guard", &self.guard)
            .finish()
    }
}

fn check_kind<I: TextureInterface>(request: &TextureRequest) -> ResourceResult<()> {
    if request.kind != I::KIND {
        return Err(ResourceError::KindMismatch {
            expected: I::KIND,
            requested: request.kind,
        });
    }
    Ok(())
}

/// Bind `texture` to sampler `stage`, or unbind the stage with `None`.
///
/// # Errors
///
/// [`ResourceError::Disposed`] for a disposed texture, otherwise whatever the
/// device reports.
pub fn set_texture<D, I>(
    device: &D,
    stage: u32,
    texture: Option<&TextureResource<I>>,
) -> ResourceResult<()>
where
    D: NativeDevice + ?Sized,
    I: TextureInterface,
{
    let ptr = texture.map(TextureResource::base_texture_pointer).transpose()?;
    device.set_texture(stage, ptr)?;
    Ok(())
}

/// Unbind whatever texture is set on sampler `stage`.
pub fn clear_texture<D>(device: &D, stage: u32) -> ResourceResult<()>
where
    D: NativeDevice + ?Sized,
{
    device.set_texture(stage, None)?;
    Ok(())
}

/// Any texture, for code that stores textures of mixed shapes.
#[derive(Debug)]
pub enum BaseTexture {
    Texture(Texture),
    Cube(CubeTexture),
    Volume(VolumeTexture),
}

impl BaseTexture {
    /// Adopt a base texture reference, narrowing it to its concrete shape.
    ///
    /// The reference passed in is always released; on success the returned
    /// texture holds the reference obtained from `QueryInterface`.
    ///
    /// # Safety
    ///
    /// `raw` must address a live object implementing the base texture
    /// interface, and the caller transfers exactly one reference.
    pub unsafe fn from_base_raw(raw: RawInterface) -> ResourceResult<Self> {
        let _base = unsafe { ResourceGuard::new(raw, "BaseTexture") };

        if let Some(texture) = unsafe { narrow::<IDirect3DTexture9>(raw) } {
            return Ok(Self::Texture(texture));
        }
        if let Some(texture) = unsafe { narrow::<IDirect3DCubeTexture9>(raw) } {
            return Ok(Self::Cube(texture));
        }
        if let Some(texture) = unsafe { narrow::<IDirect3DVolumeTexture9>(raw) } {
            return Ok(Self::Volume(texture));
        }
        Err(NativeCallError::new("QueryInterface", E_NOINTERFACE).into())
    }

    /// Shape of the wrapped texture.
    pub fn kind(&self) -> TextureKind {
        match self {
            Self::Texture(texture) => texture.kind(),
            Self::Cube(texture) => texture.kind(),
            Self::Volume(texture) => texture.kind(),
        }
    }

    /// Bind this texture to sampler `stage`.
    pub fn set_on<D>(&self, device: &D, stage: u32) -> ResourceResult<()>
    where
        D: NativeDevice + ?Sized,
    {
        let ptr = self.base_texture_pointer()?;
        device.set_texture(stage, Some(ptr))?;
        Ok(())
    }

    pub(crate) fn base_texture_pointer(&self) -> ResourceResult<NonNull<IDirect3DBaseTexture9>> {
        match self {
            Self::Texture(texture) => texture.base_texture_pointer(),
            Self::Cube(texture) => texture.base_texture_pointer(),
            Self::Volume(texture) => texture.base_texture_pointer(),
        }
    }
}

/// # Safety
///
/// `raw` must address a live COM object.
unsafe fn narrow<I: TextureInterface>(raw: RawInterface) -> Option<TextureResource<I>> {
    let narrowed = unsafe { raw.query_interface(&I::IID) }.ok()?;
    Some(unsafe { TextureResource::from_raw(narrowed.cast()) })
}

impl NativeResource for BaseTexture {
    fn guard(&self) -> &ResourceGuard {
        match self {
            Self::Texture(texture) => texture.guard(),
            Self::Cube(texture) => texture.guard(),
            Self::Volume(texture) => texture.guard(),
        }
    }

    fn guard_mut(&mut self) -> &mut ResourceGuard {
        match self {
            Self::Texture(texture) => texture.guard_mut(),
            Self::Cube(texture) => texture.guard_mut(),
            Self::Volume(texture) => texture.guard_mut(),
        }
    }
}

impl From<Texture> for BaseTexture {
    fn from(texture: Texture) -> Self {
        Self::Texture(texture)
    }
}

impl From<CubeTexture> for BaseTexture {
    fn from(texture: CubeTexture) -> Self {
        Self::Cube(texture)
    }
}

impl From<VolumeTexture> for BaseTexture {
    fn from(texture: VolumeTexture) -> Self {
        Self::Volume(texture)
    }
}

static_assertions::assert_impl_all!(Texture: Send, Sync);
static_assertions::assert_impl_all!(BaseTexture: Send, Sync);
