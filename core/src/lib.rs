//! # comlink core
//!
//! Marshaling utilities shared by every native-facing crate in comlink.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`stream`] - Draining a readable source into one contiguous buffer
//! - [`bounds`] - Offset/count validation for windowed array access
//! - [`guid`] - Byte-exact conversion between native `GUID` and [`uuid::Uuid`]
//! - [`buffer`] - Consuming native output buffers (`ID3DXBuffer`)
//! - [`com`] - The `IUnknown` binary layout and raw interface pointers
//! - [`rect`] - Native `RECT` conversion
//!
//! Nothing here interprets pixel data or calls into the graphics API beyond
//! `AddRef`/`Release`/`QueryInterface`.

pub mod bounds;
pub mod buffer;
pub mod com;
mod error;
pub mod guid;
pub mod rect;
pub mod stream;

pub use bounds::{check_array_bounds, Window};
pub use buffer::{buffer_to_bytes, buffer_to_string, ComBuffer, NativeBuffer};
pub use com::{RawInterface, HRESULT};
pub use error::{MarshalError, MarshalResult};
pub use guid::{guid_from_native, guid_to_native, NativeGuid};
pub use rect::{rect_from_native, rect_to_native, NativeRect, Rectangle};
pub use stream::{read_stream, read_stream_with, DrainOptions, ReadableStream, SeekableStream};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
