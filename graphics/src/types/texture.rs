//! Texture creation parameters.
//!
//! These values are handed to the native texture factory unchanged; the
//! numeric values match the native `D3DUSAGE_*`, `D3DPOOL_*` and `D3DFORMAT`
//! constants.

use super::Extent3d;
use bitflags::bitflags;

/// The shape of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// A 2D texture with a mip chain.
    Texture2d,
    /// Six square 2D faces.
    Cube,
    /// A 3D (volume) texture.
    Volume,
}

impl TextureKind {
    /// Human-readable name, as used in log and leak reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Texture2d => "Texture",
            Self::Cube => "CubeTexture",
            Self::Volume => "VolumeTexture",
        }
    }
}

impl std::fmt::Display for TextureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Usage flags for textures (`D3DUSAGE_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Usage: u32 {
        /// Texture can be bound as a render target.
        const RENDER_TARGET = 0x0000_0001;
        /// Texture can be bound as a depth-stencil surface.
        const DEPTH_STENCIL = 0x0000_0002;
        /// Texture contents are updated frequently from the CPU.
        const DYNAMIC = 0x0000_0200;
        /// The driver generates lower mip levels.
        const AUTO_GEN_MIPMAP = 0x0000_0400;
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Memory class a resource is placed in (`D3DPOOL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Pool {
    /// Driver-chosen memory, usually video memory.
    Default = 0,
    /// Copied to device memory on demand and restored after device loss.
    #[default]
    Managed = 1,
    /// System memory, not directly accessible by the device.
    SystemMemory = 2,
    /// System memory, not bound by device format restrictions.
    Scratch = 3,
}

/// Native pixel format code, passed through without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Format(pub u32);

impl Format {
    /// `D3DFMT_UNKNOWN`: let the loader pick the format from the source data.
    pub const UNKNOWN: Self = Self(0);
}

/// Everything the native factory needs to create or load a texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRequest {
    /// Debug label for the texture.
    pub label: Option<String>,
    /// Shape of the texture.
    pub kind: TextureKind,
    /// Size; zero dimensions are taken from the source data.
    pub size: Extent3d,
    /// Mip level count; zero requests a full chain.
    pub mip_levels: u32,
    /// Usage flags.
    pub usage: Usage,
    /// Pixel format.
    pub format: Format,
    /// Memory pool.
    pub pool: Pool,
}

impl TextureRequest {
    /// Request for a 2D texture.
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self::new(TextureKind::Texture2d, Extent3d::new_2d(width, height))
    }

    /// Request for a cube texture with square faces of `edge_length`.
    pub fn new_cube(edge_length: u32) -> Self {
        Self::new(TextureKind::Cube, Extent3d::new_2d(edge_length, edge_length))
    }

    /// Request for a volume texture.
    pub fn new_volume(width: u32, height: u32, depth: u32) -> Self {
        Self::new(TextureKind::Volume, Extent3d::new_3d(width, height, depth))
    }

    /// Request whose size, levels and format come from the loaded data.
    pub fn from_source(kind: TextureKind) -> Self {
        Self::new(kind, Extent3d::from_source())
    }

    fn new(kind: TextureKind, size: Extent3d) -> Self {
        Self {
            label: None,
            kind,
            size,
            mip_levels: 0,
            usage: Usage::empty(),
            format: Format::UNKNOWN,
            pool: Pool::default(),
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the mip level count.
    pub fn with_mip_levels(mut self, count: u32) -> Self {
        self.mip_levels = count;
        self
    }

    /// Set the usage flags.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// Set the pixel format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the memory pool.
    pub fn with_pool(mut self, pool: Pool) -> Self {
        self.pool = pool;
        self
    }
}
