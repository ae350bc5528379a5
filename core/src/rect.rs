//! Conversion between native `RECT` and edge-plus-size rectangles.

use bytemuck::{Pod, Zeroable};

/// Native rectangle given by its four edges (`RECT`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct NativeRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

static_assertions::assert_eq_size!(NativeRect, [i32; 4]);

/// Rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x.wrapping_add(self.width)
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y.wrapping_add(self.height)
    }
}

/// Convert a native `RECT` to a [`Rectangle`].
pub fn rect_from_native(rect: NativeRect) -> Rectangle {
    Rectangle {
        x: rect.left,
        y: rect.top,
        width: rect.right.wrapping_sub(rect.left),
        height: rect.bottom.wrapping_sub(rect.top),
    }
}

/// Convert a [`Rectangle`] to a native `RECT`.
pub fn rect_to_native(rect: Rectangle) -> NativeRect {
    NativeRect {
        left: rect.x,
        top: rect.y,
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

impl From<NativeRect> for Rectangle {
    fn from(rect: NativeRect) -> Self {
        rect_from_native(rect)
    }
}

impl From<Rectangle> for NativeRect {
    fn from(rect: Rectangle) -> Self {
        rect_to_native(rect)
    }
}
