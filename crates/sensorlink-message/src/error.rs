/// Errors from packing or unpacking sub-messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The tag does not fit the header's 4-bit type nibble.
    #[error("tag out of range ({0}, max 15)")]
    TagOutOfRange(u8),

    /// The body does not fit the header's 4-bit length nibble.
    #[error("body too large ({size} bytes, max {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// Appending would overflow the accumulation buffer.
    #[error("message buffer full (needed {needed} bytes, {remaining} remaining)")]
    BufferFull { needed: usize, remaining: usize },

    /// A header declared more body bytes than remain in the payload.
    #[error("truncated message (header declares {declared} bytes, {available} remain)")]
    Truncated { declared: usize, available: usize },

    /// The body is not the 4-byte big-endian form carrying a u32 value.
    #[error("expected a 4-byte value body, found {0} bytes")]
    ValueLength(usize),
}

pub type Result<T> = std::result::Result<T, MessageError>;
