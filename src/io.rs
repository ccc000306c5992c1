//! Byte sources and sinks the decoder and encoder run on.
//!
//! The codec only needs a handful of primitives from its transport: read the
//! next byte, read exactly `n` bytes, write bytes, and report a running
//! position. Sources and sinks do no buffering or seeking on the codec's
//! behalf.

use bytes::{Bytes, BytesMut};
use std::io::{self, Read, Write};

/// A sequential supplier of bytes.
pub trait ByteSource {
    /// Reads the next byte. `Ok(None)` signals the end of the data.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;

    /// Reads exactly `len` bytes, failing with [`io::ErrorKind::UnexpectedEof`]
    /// if fewer are available.
    fn read_exact(&mut self, len: usize) -> io::Result<Bytes>;

    /// Number of bytes consumed so far.
    fn position(&self) -> u64;
}

/// A sequential consumer of bytes.
pub trait ByteSink {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Number of bytes written so far.
    fn position(&self) -> u64;
}

/// In-memory source over a [`Bytes`] buffer.
///
/// Byte string payloads are returned as zero-copy slices of the buffer.
#[derive(Debug, Clone)]
pub struct SliceSource {
    data: Bytes,
    pos: usize,
}

impl SliceSource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    pub fn copy_from(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ByteSource for SliceSource {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    fn read_exact(&mut self, len: usize) -> io::Result<Bytes> {
        if self.remaining() < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} bytes requested, {} available", len, self.remaining()),
            ));
        }
        let out = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(out)
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}

/// Source over any [`Read`] implementation, counting consumed bytes.
///
/// Reads are issued one byte at a time for structure; wrap unbuffered
/// handles in [`io::BufReader`] first.
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.pos += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn read_exact(&mut self, len: usize) -> io::Result<Bytes> {
        // Grow as data arrives so a bogus length cannot force a huge allocation.
        let mut buf = Vec::with_capacity(len.min(64 * 1024));
        let n = (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        self.pos += n as u64;
        if n < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} bytes requested, {} available", len, n),
            ));
        }
        Ok(Bytes::from(buf))
    }

    fn position(&self) -> u64 {
        self.pos
    }
}

/// Growable in-memory sink.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: BytesMut,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl ByteSink for MemorySink {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn position(&self) -> u64 {
        self.buf.len() as u64
    }
}

/// Sink over a preallocated buffer; writes that do not fit fail with
/// [`io::ErrorKind::WriteZero`] and leave the buffer untouched.
#[derive(Debug)]
pub struct BufferSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufferSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl ByteSink for BufferSink<'_> {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let end = self.pos + data.len();
        if end > self.buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!(
                    "{} bytes do not fit, {} remaining",
                    data.len(),
                    self.buf.len() - self.pos
                ),
            ));
        }
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}

/// Sink over any [`Write`] implementation, counting written bytes.
#[derive(Debug)]
pub struct WriterSink<W> {
    inner: W,
    pos: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn position(&self) -> u64 {
        self.pos
    }
}
