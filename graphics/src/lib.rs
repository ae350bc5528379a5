//! # comlink graphics
//!
//! Ownership of native texture resources.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`ResourceGuard`] - Scoped owner of one native reference, released on
//!   `dispose` or drop
//! - [`NativeResource`] - Uniform access to any guarded resource
//! - [`Texture`], [`CubeTexture`], [`VolumeTexture`] - Typed texture handles
//! - [`BaseTexture`] - Any texture, narrowed from a base interface pointer
//! - [`ObjectTable`] - Leak reporting for resources that were never disposed
//!
//! Creation goes through a [`NativeTextureFactory`] supplied by the caller;
//! this crate never links the graphics API itself.
//!
//! ## Example
//!
//! ```ignore
//! use comlink_graphics::{CubeTexture, NativeResource, TextureRequest, TextureKind};
//!
//! let request = TextureRequest::from_source(TextureKind::Cube);
//! let mut sky = CubeTexture::from_memory_with(&factory, &dds_bytes, &request)?;
//! sky.dispose();
//! ```

mod error;
pub mod native;
mod resource;
mod texture;
mod tracking;
pub mod types;

pub use error::{NativeCallError, ResourceError, ResourceResult};
pub use native::{NativeDevice, NativeTextureFactory, TextureInterface};
pub use resource::{NativeResource, ResourceGuard};
pub use texture::{
    clear_texture, set_texture, BaseTexture, CubeTexture, Texture, TextureResource, VolumeTexture,
};
pub use tracking::{ObjectTable, TrackedObject, TrackingId};
pub use types::{Extent3d, Format, Pool, TextureKind, TextureRequest, Usage};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
