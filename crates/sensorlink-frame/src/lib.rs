//! Detect-only framing for noisy sensor byte streams.
//!
//! Frames delimit payloads with marker bytes, escape marker collisions
//! inside the payload, and carry a 32-bit rolling checksum:
//!
//! ```text
//! 0x80 0x80 0x80 0x81  <len>  <escaped payload>  0x80 0x82  <checksum BE>
//! ```
//!
//! Corruption is detected, never corrected: a bad candidate is counted and
//! the decoder rescans for the next header, so the ingest loop rides across
//! line noise. [`FrameDecoder`] is the incremental state machine;
//! [`FrameReader`]/[`FrameWriter`] adapt it to blocking streams.

pub mod codec;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    checksum, checksum_step, encode_frame, ESC, ESC_ESC, ESC_SEP, FRAME_OVERHEAD, HDR,
    MAX_PAYLOAD, SEP, TRL,
};
pub use decoder::FrameDecoder;
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
