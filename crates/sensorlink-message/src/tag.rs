//! Sub-message type tags.
//!
//! Tags 0–3 are assigned; 4–15 are reserved for extension. A tag must fit
//! the header's 4-bit type nibble.

/// Remote node identity (opaque bytes).
pub const CLIENT_ID: u8 = 0;

/// Transmission sequence number (u32 big-endian body).
pub const SEQNUM: u8 = 1;

/// Sensor identity within a node.
pub const SENSOR_ID: u8 = 2;

/// Sensor reading (u32 big-endian body, reinterpreted as i32 by consumers).
pub const SENSOR_VALUE: u8 = 3;

/// Largest encodable tag.
pub const MAX_TAG: u8 = 15;

/// Returns a human-readable name for a tag.
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        CLIENT_ID => "CLIENT_ID",
        SEQNUM => "SEQNUM",
        SENSOR_ID => "SENSOR_ID",
        SENSOR_VALUE => "SENSOR_VALUE",
        4..=MAX_TAG => "RESERVED",
        _ => "INVALID",
    }
}
