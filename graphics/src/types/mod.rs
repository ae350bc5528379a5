//! Value types used when creating native resources.

mod common;
mod texture;

pub use common::Extent3d;
pub use texture::{Format, Pool, TextureKind, TextureRequest, Usage};
