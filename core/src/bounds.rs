//! Offset/count validation for windowed array access.

use std::ops::Range;

use crate::error::{MarshalError, MarshalResult};

/// A validated `(offset, count)` window into a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// Index of the first element.
    pub offset: usize,
    /// Number of elements.
    pub count: usize,
}

impl Window {
    /// Index range covered by this window.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.count
    }

    /// Borrow the windowed elements of `data`.
    ///
    /// `data` must be the sequence the window was validated against.
    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        &data[self.range()]
    }

    /// Mutably borrow the windowed elements of `data`.
    pub fn slice_mut<'a, T>(&self, data: &'a mut [T]) -> &'a mut [T] {
        &mut data[self.range()]
    }
}

/// Validate and normalize an `(offset, count)` pair against `data`.
///
/// A `count` of zero selects everything from `offset` to the end. The offset
/// must point at an existing element, so an empty sequence never validates.
///
/// # Errors
///
/// - [`MarshalError::OutOfRange`]`("offset")` unless `0 <= offset < data.len()`.
/// - [`MarshalError::OutOfRange`]`("count")` unless the normalized count is in
///   `0..=data.len() - offset`.
pub fn check_array_bounds<T>(data: &[T], offset: i64, count: i64) -> MarshalResult<Window> {
    let len = i64::try_from(data.len()).map_err(|_| MarshalError::OutOfRange("offset"))?;
    if offset < 0 || offset >= len {
        return Err(MarshalError::OutOfRange("offset"));
    }

    let available = len - offset;
    let count = if count == 0 { available } else { count };
    if count < 0 || count > available {
        return Err(MarshalError::OutOfRange("count"));
    }

    // Both values are within 0..=len, which came from a usize.
    Ok(Window {
        offset: offset as usize,
        count: count as usize,
    })
}
