use bytes::{BufMut, BytesMut};

use crate::error::{MessageError, Result};
use crate::tag::MAX_TAG;

/// Largest body one sub-message header can declare (4-bit length nibble).
pub const MAX_BODY: usize = 15;

/// Default builder capacity; fits one frame payload.
pub const DEFAULT_CAPACITY: usize = 255;

/// Packs tagged sub-messages into one frame payload.
///
/// A failed append leaves the buffer untouched, so a half-written
/// sub-message is never transmitted.
#[derive(Debug)]
pub struct MessageBuilder {
    buf: BytesMut,
    capacity: usize,
}

impl MessageBuilder {
    /// Builder sized to one frame payload.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Builder with an explicit byte capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one sub-message: a tag/length header byte, then the body.
    pub fn append(&mut self, tag: u8, body: &[u8]) -> Result<()> {
        if tag > MAX_TAG {
            return Err(MessageError::TagOutOfRange(tag));
        }
        if body.len() > MAX_BODY {
            return Err(MessageError::BodyTooLarge {
                size: body.len(),
                max: MAX_BODY,
            });
        }

        let needed = 1 + body.len();
        let remaining = self.capacity - self.buf.len();
        if needed > remaining {
            return Err(MessageError::BufferFull { needed, remaining });
        }

        self.buf.put_u8((tag << 4) | body.len() as u8);
        self.buf.put_slice(body);
        Ok(())
    }

    /// Append a sub-message whose body is a u32 in 4-byte big-endian form.
    pub fn append_u32(&mut self, tag: u8, value: u32) -> Result<()> {
        self.append(tag, &value.to_be_bytes())
    }

    /// Rewind to empty. Capacity is kept.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// The packed bytes, ready to frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
