//! Typed sub-messages packed inside one frame payload.
//!
//! Each sub-message is a single header byte — high nibble type tag, low
//! nibble body length (0–15) — followed by the body. Four tags are
//! assigned (client id, sequence number, sensor id, sensor value); the
//! rest are reserved. Parsing is partial-success: a truncated trailing
//! sub-message never invalidates the ones before it.

pub mod builder;
pub mod error;
pub mod parse;
pub mod tag;

pub use builder::{MessageBuilder, DEFAULT_CAPACITY, MAX_BODY};
pub use error::{MessageError, Result};
pub use parse::{messages, Message, Messages};
pub use tag::{tag_name, CLIENT_ID, MAX_TAG, SENSOR_ID, SENSOR_VALUE, SEQNUM};
