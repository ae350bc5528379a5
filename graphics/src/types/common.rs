//! Shared value types.

/// 3D extent for textures.
///
/// A zero dimension means "take it from the source data" when the extent is
/// passed to a file or memory loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3d {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth in texels (1 for 2D and cube textures).
    pub depth: u32,
}

impl Extent3d {
    /// Create a new 2D extent.
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
        }
    }

    /// Create a new 3D extent.
    pub fn new_3d(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Extent whose size is taken from the source data.
    pub fn from_source() -> Self {
        Self::default()
    }

    /// Whether any dimension is left to the source data.
    pub fn is_from_source(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }
}
