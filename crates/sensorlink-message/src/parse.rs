use crate::error::{MessageError, Result};

/// One parsed sub-message, borrowing its body from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    pub tag: u8,
    pub body: &'a [u8],
}

impl Message<'_> {
    /// Decode the body as the fixed 4-byte big-endian u32 form.
    pub fn as_u32(&self) -> Result<u32> {
        let bytes: [u8; 4] = self
            .body
            .try_into()
            .map_err(|_| MessageError::ValueLength(self.body.len()))?;
        Ok(u32::from_be_bytes(bytes))
    }
}

/// Iterator over the sub-messages of one payload.
///
/// Partial-success semantics: items already yielded stay valid. When a
/// header declares more body bytes than remain, the iterator yields one
/// `Err(Truncated)` and then terminates — it never resynchronizes inside
/// a payload.
#[derive(Debug)]
pub struct Messages<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> Iterator for Messages<'a> {
    type Item = Result<Message<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }

        let header = self.rest[0];
        let tag = header >> 4;
        let declared = (header & 0x0F) as usize;
        let available = self.rest.len() - 1;

        if declared > available {
            self.failed = true;
            return Some(Err(MessageError::Truncated {
                declared,
                available,
            }));
        }

        let body = &self.rest[1..1 + declared];
        self.rest = &self.rest[1 + declared..];
        Some(Ok(Message { tag, body }))
    }
}

/// Iterate the sub-messages packed in `payload`.
pub fn messages(payload: &[u8]) -> Messages<'_> {
    Messages {
        rest: payload,
        failed: false,
    }
}
