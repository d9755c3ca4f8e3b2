//! Cursor-based, bounds-checked primitives for the JDX byte layout.
//!
//! All multi-byte values are little-endian. The reader learns the total
//! stream length once, up front, so every read can be checked against the
//! bytes that remain before anything is consumed or allocated.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::JdxError;
use crate::validation::check_available;

/// Sequential reader over any seekable byte source.
#[derive(Debug)]
pub struct BinaryReader<R> {
    inner: R,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> BinaryReader<R> {
    /// Wraps a source, starting at its current position.
    pub fn new(mut inner: R) -> Result<Self, JdxError> {
        let position = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(position))?;

        Ok(Self {
            inner,
            position,
            len,
        })
    }

    /// Current byte offset from the start of the stream.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total length of the stream in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the stream holds no bytes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left between the cursor and the end of the stream.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking past the end of the stream is a truncation error.
    pub fn seek(&mut self, offset: u64) -> Result<(), JdxError> {
        if offset > self.len {
            return Err(JdxError::Truncated {
                offset: self.position,
                needed: offset - self.position,
                available: self.remaining(),
                context: "seek target",
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    /// Advances the cursor by `n` bytes without reading them.
    pub fn skip(&mut self, n: u64, context: &'static str) -> Result<(), JdxError> {
        check_available(self.position, n, self.remaining(), context)?;
        self.seek(self.position + n)
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(
        &mut self,
        context: &'static str,
    ) -> Result<[u8; N], JdxError> {
        let mut buf = [0u8; N];
        self.fill(&mut buf, context)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8, JdxError> {
        Ok(self.read_array::<1>(context)?[0])
    }

    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, JdxError> {
        Ok(u16::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, JdxError> {
        Ok(u32::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u64(&mut self, context: &'static str) -> Result<u64, JdxError> {
        Ok(u64::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_f32(&mut self, context: &'static str) -> Result<f32, JdxError> {
        Ok(f32::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_f64(&mut self, context: &'static str) -> Result<f64, JdxError> {
        Ok(f64::from_le_bytes(self.read_array(context)?))
    }

    /// Reads a block of `n` raw bytes.
    ///
    /// The length is checked against the remaining stream before the buffer
    /// is allocated, so a corrupt length prefix cannot trigger a huge
    /// allocation.
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<Vec<u8>, JdxError> {
        check_available(self.position, n as u64, self.remaining(), context)?;
        let mut buf = vec![0u8; n];
        self.fill(&mut buf, context)?;
        Ok(buf)
    }

    /// Reads `n` bytes and decodes them as UTF-8.
    pub fn read_fixed_string(
        &mut self,
        n: usize,
        context: &'static str,
    ) -> Result<String, JdxError> {
        let start = self.position;
        let bytes = self.read_bytes(n, context)?;
        String::from_utf8(bytes).map_err(|e| JdxError::Format {
            offset: start + e.utf8_error().valid_up_to() as u64,
            message: format!("{context} is not valid UTF-8"),
        })
    }

    /// Consumes the reader and returns the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8], context: &'static str) -> Result<(), JdxError> {
        let needed = buf.len() as u64;
        check_available(self.position, needed, self.remaining(), context)?;

        self.inner.read_exact(buf).map_err(|e| {
            // The source shrank underneath us after the length was recorded.
            if e.kind() == io::ErrorKind::UnexpectedEof {
                JdxError::Truncated {
                    offset: self.position,
                    needed,
                    available: 0,
                    context,
                }
            } else {
                JdxError::Io(e)
            }
        })?;
        self.position += needed;
        Ok(())
    }
}

/// Sequential writer over any byte sink.
///
/// Callers must call [`BinaryWriter::finish`] to flush; dropping the writer
/// without finishing still releases the sink but loses buffered errors.
#[derive(Debug)]
pub struct BinaryWriter<W: Write> {
    inner: W,
    position: u64,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), JdxError> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), JdxError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), JdxError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), JdxError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), JdxError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), JdxError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), JdxError> {
        self.inner.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Writes `value` into a field of exactly `width` bytes, zero-padded.
    pub fn write_fixed_string(&mut self, value: &str, width: usize) -> Result<(), JdxError> {
        let bytes = value.as_bytes();
        if bytes.len() > width {
            return Err(JdxError::Format {
                offset: self.position,
                message: format!(
                    "string of {} bytes does not fit a {width}-byte field",
                    bytes.len()
                ),
            });
        }
        self.write_bytes(bytes)?;
        self.write_bytes(&vec![0u8; width - bytes.len()])
    }

    /// Flushes buffered bytes and returns the sink.
    pub fn finish(mut self) -> Result<W, JdxError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
