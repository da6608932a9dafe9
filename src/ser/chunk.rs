//! Tagged, length-prefixed binary chunks.
//!
//! # Layout
//!
//! ```text
//! tag     NUL-terminated ASCII, zero-padded to a multiple of 4 bytes
//! length  u32 LE; payload bytes, including the trailing padding
//! payload arbitrary bytes, or a sequence of child chunks
//! padding zeroes up to the next 4-byte boundary
//! ```
//!
//! Encoding is done in two passes: once against a [CountingSink] to learn the final size, then
//! against a buffer allocated to exactly that size. Both passes run the same [WriteChunks]
//! implementation, so the length bookkeeping only exists in one place.

use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::{Error, Result};

/// Every chunk, and every text field, ends on a multiple of this many bytes.
pub const ALIGNMENT: usize = 4;

/// Number of zero bytes needed to bring `len` up to [ALIGNMENT].
#[inline]
pub const fn padding_for(len: usize) -> usize {
    (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
}

/// Destination of a [ChunkWriter].
pub trait ChunkSink: Write {
    /// Number of bytes emitted so far.
    fn position(&self) -> usize;
    /// Overwrite 4 already-emitted bytes at `at` with `value`, little-endian.
    ///
    /// # Panics
    ///
    /// * `at + 4 > self.position()`, for sinks which store their bytes
    fn patch_u32le(&mut self, at: usize, value: u32);
}

/// A sink which only counts the bytes written to it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingSink {
    len: usize,
}

impl CountingSink {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Write for CountingSink {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.len += buf.len();
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ChunkSink for CountingSink {
    #[inline(always)]
    fn position(&self) -> usize {
        self.len
    }

    #[inline(always)]
    fn patch_u32le(&mut self, _at: usize, _value: u32) {}
}

impl ChunkSink for Vec<u8> {
    #[inline(always)]
    fn position(&self) -> usize {
        self.len()
    }

    #[inline]
    fn patch_u32le(&mut self, at: usize, value: u32) {
        LittleEndian::write_u32(&mut self[at..at + 4], value);
    }
}

/// An open chunk whose length field has not been written yet.
///
/// Only [ChunkWriter::end_chunk] consumes a mark, so each chunk is backpatched exactly once.
#[must_use = "an open chunk must be closed with `ChunkWriter::end_chunk`"]
#[derive(Debug, PartialEq, Eq)]
pub struct ChunkMark {
    length_at: usize,
}

impl ChunkMark {
    /// Offset of the first payload byte.
    #[inline]
    pub fn payload_start(&self) -> usize {
        self.length_at + 4
    }
}

/// Encoder for nested [chunks](self).
#[derive(Debug)]
pub struct ChunkWriter<S> {
    sink: S,
}

impl<S: ChunkSink> ChunkWriter<S> {
    #[inline]
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.sink.position()
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.sink
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.sink.write_u8(value)?)
    }

    #[inline]
    pub fn write_u16le(&mut self, value: u16) -> Result<()> {
        Ok(self.sink.write_u16::<LittleEndian>(value)?)
    }

    #[inline]
    pub fn write_u32le(&mut self, value: u32) -> Result<()> {
        Ok(self.sink.write_u32::<LittleEndian>(value)?)
    }

    #[inline]
    pub fn write_f32le(&mut self, value: f32) -> Result<()> {
        Ok(self.sink.write_f32::<LittleEndian>(value)?)
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.sink.write_all(bytes)?)
    }

    /// Emit zeroes until the distance from `start` is a multiple of [ALIGNMENT].
    pub fn align_from(&mut self, start: usize) -> Result<()> {
        const ZEROES: [u8; ALIGNMENT] = [0; ALIGNMENT];
        let pad = padding_for(self.position() - start);
        self.write_bytes(&ZEROES[..pad])
    }

    /// Write `text`, a NUL terminator, and enough zeroes to end on a 4-byte boundary.
    ///
    /// # Errors
    ///
    /// * [Error::InteriorNul] if `text` contains a NUL byte
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        if text.as_bytes().contains(&0) {
            return Err(Error::InteriorNul(text.to_owned()));
        }
        let start = self.position();
        self.write_bytes(text.as_bytes())?;
        self.write_u8(0)?;
        self.align_from(start)
    }

    /// Write a chunk tag and reserve its length field.
    pub fn begin_chunk(&mut self, tag: &str) -> Result<ChunkMark> {
        self.write_text(tag)?;
        let length_at = self.position();
        self.write_u32le(0)?;
        Ok(ChunkMark { length_at })
    }

    /// Pad the payload of `mark` and backpatch its length field.
    pub fn end_chunk(&mut self, mark: ChunkMark) -> Result<()> {
        let start = mark.payload_start();
        self.align_from(start)?;
        let len = self.position() - start;
        let len32 = u32::try_from(len).map_err(|_| Error::ChunkTooLarge(len))?;
        self.sink.patch_u32le(mark.length_at, len32);
        Ok(())
    }

    /// Write a chunk whose payload is produced by `body`.
    pub fn chunk<F>(&mut self, tag: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mark = self.begin_chunk(tag)?;
        body(self)?;
        self.end_chunk(mark)
    }
}

/// Types which can be encoded as a sequence of chunks.
pub trait WriteChunks {
    fn write_binary<S: ChunkSink>(&self, w: &mut ChunkWriter<S>) -> Result<()>;

    /// The exact number of bytes [WriteChunks::to_binary] would produce.
    fn binary_len(&self) -> Result<usize> {
        let mut w = ChunkWriter::new(CountingSink::new());
        self.write_binary(&mut w)?;
        Ok(w.position())
    }

    /// Encode `self` into a buffer sized by a counting pass.
    fn to_binary(&self) -> Result<Vec<u8>> {
        let len = self.binary_len()?;
        let mut w = ChunkWriter::new(Vec::with_capacity(len));
        self.write_binary(&mut w)?;
        let out = w.into_inner();
        debug_assert_eq!(out.len(), len, "counting pass disagrees with encoding pass");
        #[cfg(feature = "tracing")]
        tracing::trace!(len, "encoded chunk stream");
        Ok(out)
    }
}
