//! Draining readable streams into contiguous byte buffers.
//!
//! Native texture and effect loaders take a single pointer + length pair, so
//! stream-based entry points first pull the requested bytes into one owned
//! buffer. Sources are allowed to deliver data in arbitrarily small chunks;
//! [`read_stream`] keeps reading into the unfilled tail until the buffer is
//! full.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use comlink_core::stream::{read_stream, SeekableStream};
//!
//! let mut source = SeekableStream::new(Cursor::new(b"DDS payload".to_vec()));
//! let header = read_stream(Some(&mut source), 3).unwrap();
//! assert_eq!(header, b"DDS");
//!
//! // A length of zero drains whatever is left.
//! let rest = read_stream(Some(&mut source), 0).unwrap();
//! assert_eq!(rest, b" payload");
//! ```

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{MarshalError, MarshalResult};

/// Default number of consecutive zero-byte reads tolerated before giving up.
pub const DEFAULT_MAX_STALLED_READS: u32 = 8;

/// A byte source that can report its size and current position.
///
/// This is the input boundary of the drainer: anything that can answer
/// "can I read", "how long are you", "where am I" and "fill this slice"
/// can be drained.
pub trait ReadableStream {
    /// Whether the source supports reading at all.
    fn can_read(&self) -> bool;

    /// Total length of the source in bytes.
    fn length(&mut self) -> io::Result<u64>;

    /// Current read position in bytes.
    fn position(&mut self) -> io::Result<u64>;

    /// Read into `buf`, returning how many bytes were written.
    ///
    /// Returning fewer bytes than `buf.len()` is allowed at any time.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Adapts any `Read + Seek` source to [`ReadableStream`].
#[derive(Debug)]
pub struct SeekableStream<R> {
    inner: R,
}

impl<R: Read + Seek> SeekableStream<R> {
    /// Wrap a seekable reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ReadableStream for SeekableStream<R> {
    fn can_read(&self) -> bool {
        true
    }

    fn length(&mut self) -> io::Result<u64> {
        let current = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        if end != current {
            self.inner.seek(SeekFrom::Start(current))?;
        }
        Ok(end)
    }

    fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Options controlling how a stream is drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainOptions {
    /// Consecutive zero-byte reads after which the drain fails with
    /// [`MarshalError::StalledRead`]. Values below 1 are treated as 1.
    pub max_stalled_reads: u32,
}

impl DrainOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stall limit.
    pub fn with_max_stalled_reads(mut self, count: u32) -> Self {
        self.max_stalled_reads = count;
        self
    }
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            max_stalled_reads: DEFAULT_MAX_STALLED_READS,
        }
    }
}

/// Read exactly `read_length` bytes from `stream` using default [`DrainOptions`].
///
/// See [`read_stream_with`] for the full contract.
pub fn read_stream<S: ReadableStream + ?Sized>(
    stream: Option<&mut S>,
    read_length: i64,
) -> MarshalResult<Vec<u8>> {
    read_stream_with(stream, read_length, &DrainOptions::default())
}

/// Read exactly `read_length` bytes from `stream` into a new buffer.
///
/// A `read_length` of zero means "everything between the current position and
/// the end of the source". Short reads are retried until the buffer is full.
///
/// # Errors
///
/// - [`MarshalError::InvalidArgument`] if `stream` is `None`.
/// - [`MarshalError::UnsupportedOperation`] if the source cannot be read.
/// - [`MarshalError::OutOfRange`] if the (possibly computed) length is negative
///   or does not fit in memory. Raised before allocating.
/// - [`MarshalError::StalledRead`] after `options.max_stalled_reads`
///   consecutive zero-byte reads.
/// - [`MarshalError::Io`] for any read error other than `Interrupted`.
pub fn read_stream_with<S: ReadableStream + ?Sized>(
    stream: Option<&mut S>,
    read_length: i64,
    options: &DrainOptions,
) -> MarshalResult<Vec<u8>> {
    let stream = stream.ok_or(MarshalError::InvalidArgument("stream"))?;
    if !stream.can_read() {
        return Err(MarshalError::UnsupportedOperation("stream is not readable"));
    }

    let read_length = if read_length == 0 {
        remaining_length(stream)?
    } else {
        read_length
    };
    if read_length < 0 {
        return Err(MarshalError::OutOfRange("read_length"));
    }
    if read_length == 0 {
        return Ok(Vec::new());
    }

    let length =
        usize::try_from(read_length).map_err(|_| MarshalError::OutOfRange("read_length"))?;
    let max_stalled = options.max_stalled_reads.max(1);

    let mut buffer: Vec<u8> = Vec::new();
    buffer
        .try_reserve_exact(length)
        .map_err(|_| MarshalError::OutOfRange("read_length"))?;
    buffer.resize(length, 0);
    let mut filled = 0;
    let mut stalled = 0;

    while filled < length {
        match stream.read(&mut buffer[filled..]) {
            Ok(0) => {
                stalled += 1;
                if stalled >= max_stalled {
                    log::warn!(
                        "Stream stalled: {} consecutive empty reads after {}/{} bytes",
                        stalled,
                        filled,
                        length
                    );
                    return Err(MarshalError::StalledRead {
                        requested: length,
                        received: filled,
                    });
                }
            }
            Ok(read) => {
                stalled = 0;
                filled += read.min(length - filled);
                if filled < length {
                    log::trace!("Short read of {} bytes ({}/{})", read, filled, length);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(buffer)
}

/// Bytes left between the current position and the end of the source.
///
/// Negative when the position is past the end.
fn remaining_length<S: ReadableStream + ?Sized>(stream: &mut S) -> MarshalResult<i64> {
    let length = stream.length()?;
    let position = stream.position()?;
    let remaining = i128::from(length) - i128::from(position);
    i64::try_from(remaining).map_err(|_| MarshalError::OutOfRange("read_length"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    /// Source that hands out at most `chunk` bytes per read and counts calls.
    struct ChunkedSource {
        data: Vec<u8>,
        position: usize,
        chunk: usize,
        reads: usize,
        readable: bool,
        interrupts: u32,
        failure: Option<io::ErrorKind>,
    }

    impl ChunkedSource {
        fn new(data: &[u8], chunk: usize) -> Self {
            Self {
                data: data.to_vec(),
                position: 0,
                chunk,
                reads: 0,
                readable: true,
                interrupts: 0,
                failure: None,
            }
        }
    }

    impl ReadableStream for ChunkedSource {
        fn can_read(&self) -> bool {
            self.readable
        }

        fn length(&mut self) -> io::Result<u64> {
            Ok(self.data.len() as u64)
        }

        fn position(&mut self) -> io::Result<u64> {
            Ok(self.position as u64)
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.interrupts > 0 {
                self.interrupts -= 1;
                return Err(io::ErrorKind::Interrupted.into());
            }
            if let Some(kind) = self.failure {
                return Err(kind.into());
            }
            let available = self.data.len() - self.position;
            let count = buf.len().min(self.chunk).min(available);
            buf[..count].copy_from_slice(&self.data[self.position..self.position + count]);
            self.position += count;
            Ok(count)
        }
    }

    /// Source that reports more data than it ever delivers.
    struct StuckSource {
        reads: u32,
    }

    impl ReadableStream for StuckSource {
        fn can_read(&self) -> bool {
            true
        }

        fn length(&mut self) -> io::Result<u64> {
            Ok(64)
        }

        fn position(&mut self) -> io::Result<u64> {
            Ok(0)
        }

        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            Ok(0)
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 % 251) as u8).collect()
    }

    #[rstest]
    #[case::one_byte(1)]
    #[case::odd_chunks(3)]
    #[case::all_at_once(usize::MAX)]
    fn reads_exact_length_regardless_of_chunking(#[case] chunk: usize) {
        let data = pattern(100);
        let mut source = ChunkedSource::new(&data, chunk);
        source.position = 10;

        let buffer = read_stream(Some(&mut source), 40).unwrap();
        assert_eq!(buffer.len(), 40);
        assert_eq!(buffer, &data[10..50]);
        assert_eq!(source.position, 50);
    }

    #[test]
    fn one_byte_and_bulk_sources_agree() {
        let data = pattern(257);
        let mut slow = ChunkedSource::new(&data, 1);
        let mut fast = ChunkedSource::new(&data, usize::MAX);

        let slow_bytes = read_stream(Some(&mut slow), 257).unwrap();
        let fast_bytes = read_stream(Some(&mut fast), 257).unwrap();
        assert_eq!(slow_bytes, fast_bytes);
        assert_eq!(slow.reads, 257);
        assert_eq!(fast.reads, 1);
    }

    #[test]
    fn zero_length_reads_remainder() {
        let data = pattern(32);
        let mut source = ChunkedSource::new(&data, 5);
        source.position = 12;

        let buffer = read_stream(Some(&mut source), 0).unwrap();
        assert_eq!(buffer, &data[12..]);
    }

    #[test]
    fn zero_length_on_exhausted_source_issues_no_read() {
        let mut source = ChunkedSource::new(b"abc", 1);
        source.position = 3;

        let buffer = read_stream(Some(&mut source), 0).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(source.reads, 0);
    }

    #[test]
    fn negative_length_is_out_of_range() {
        let mut source = ChunkedSource::new(b"abc", 1);
        let err = read_stream(Some(&mut source), -1).unwrap_err();
        assert!(matches!(err, MarshalError::OutOfRange("read_length")));
        assert_eq!(source.reads, 0);
    }

    #[test]
    fn position_past_end_is_out_of_range() {
        let mut source = ChunkedSource::new(b"abc", 1);
        source.position = 5;
        let err = read_stream(Some(&mut source), 0).unwrap_err();
        assert!(matches!(err, MarshalError::OutOfRange("read_length")));
    }

    #[test]
    fn missing_stream_is_invalid_argument() {
        let err = read_stream::<ChunkedSource>(None, 4).unwrap_err();
        assert!(matches!(err, MarshalError::InvalidArgument("stream")));
    }

    #[test]
    fn unreadable_stream_is_unsupported() {
        let mut source = ChunkedSource::new(b"abc", 1);
        source.readable = false;
        let err = read_stream(Some(&mut source), 2).unwrap_err();
        assert!(matches!(err, MarshalError::UnsupportedOperation(_)));
        assert_eq!(source.reads, 0);
    }

    #[test]
    fn stalled_source_fails_after_limit() {
        let mut source = StuckSource { reads: 0 };
        let options = DrainOptions::new().with_max_stalled_reads(3);

        let err = read_stream_with(Some(&mut source), 16, &options).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::StalledRead {
                requested: 16,
                received: 0
            }
        ));
        assert_eq!(source.reads, 3);
    }

    #[test]
    fn truncated_source_reports_bytes_received() {
        let mut source = ChunkedSource::new(b"abcd", 2);
        let err = read_stream(Some(&mut source), 10).unwrap_err();
        match err {
            MarshalError::StalledRead {
                requested,
                received,
            } => {
                assert_eq!(requested, 10);
                assert_eq!(received, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn interrupted_reads_do_not_count_as_stalls() {
        let data = pattern(24);
        let mut source = ChunkedSource::new(&data, 8);
        source.interrupts = 10;
        let options = DrainOptions::new().with_max_stalled_reads(3);

        let buffer = read_stream_with(Some(&mut source), 24, &options).unwrap();
        assert_eq!(buffer, data);
        assert_eq!(source.reads, 13);
    }

    #[test]
    fn other_read_errors_surface_as_io() {
        let mut source = ChunkedSource::new(b"abcd", 2);
        source.failure = Some(io::ErrorKind::BrokenPipe);

        let err = read_stream(Some(&mut source), 4).unwrap_err();
        match err {
            MarshalError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.reads, 1);
    }

    #[test]
    fn unallocatable_length_is_out_of_range() {
        let mut stream = SeekableStream::new(Cursor::new(b"abc".to_vec()));
        let err = read_stream(Some(&mut stream), i64::MAX).unwrap_err();
        assert!(matches!(err, MarshalError::OutOfRange("read_length")));
        assert_eq!(stream.position().unwrap(), 0);
    }

    #[test]
    fn seekable_stream_reports_length_without_moving() {
        let mut stream = SeekableStream::new(Cursor::new(pattern(20)));
        stream.read(&mut [0u8; 4]).unwrap();

        assert_eq!(stream.length().unwrap(), 20);
        assert_eq!(stream.position().unwrap(), 4);

        let rest = read_stream(Some(&mut stream), 0).unwrap();
        assert_eq!(rest, &pattern(20)[4..]);
    }

    #[test]
    fn default_options() {
        assert_eq!(
            DrainOptions::default().max_stalled_reads,
            DEFAULT_MAX_STALLED_READS
        );
    }
}
