/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The bytes after the payload were not the SEP TRL trailer.
    #[error("trailer mismatch (expected 0x80 0x82)")]
    TrailerMismatch,

    /// The transmitted checksum does not match the computed one.
    #[error("checksum mismatch (got {got:#010x}, computed {computed:#010x})")]
    ChecksumMismatch { got: u32, computed: u32 },

    /// The payload exceeds what the one-byte length field can carry.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed before a complete frame was received.
    #[error("link closed (incomplete frame)")]
    LinkClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
