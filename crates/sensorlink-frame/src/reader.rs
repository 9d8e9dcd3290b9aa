use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::decoder::FrameDecoder;
use crate::error::{FrameError, Result};

// Frames top out at 521 wire bytes; one chunk usually holds several.
const READ_CHUNK_SIZE: usize = 512;

/// Reads validated frames from any `Read` stream.
///
/// Handles partial reads and inter-frame noise internally — callers always
/// get whole payloads that passed the checksum.
#[derive(Debug)]
pub struct FrameReader<T> {
    inner: T,
    decoder: FrameDecoder,
    buf: BytesMut,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::new(),
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Read the next valid frame (blocking).
    ///
    /// Corrupt candidates are skipped and counted by the decoder. Returns
    /// `Err(FrameError::LinkClosed)` when EOF is reached first.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(payload) = self.decoder.decode(&mut self.buf) {
                return Ok(payload);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::LinkClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Frames successfully decoded on this reader.
    pub fn frames_decoded(&self) -> u64 {
        self.decoder.frames_decoded()
    }

    /// Corrupt frame candidates rejected on this reader.
    pub fn frames_rejected(&self) -> u64 {
        self.decoder.frames_rejected()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
