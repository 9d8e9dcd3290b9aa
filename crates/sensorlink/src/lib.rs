//! Sensor telemetry ingestion over unreliable serial links.
//!
//! sensorlink moves sensor measurements from battery-powered transmitters to
//! a hub across noisy, clockless byte streams: marker-delimited frames with
//! escaping and a rolling checksum, nibble-packed messages inside each
//! frame, and a bounded per-client registry on the receiving end.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial device and socket-pair byte links
//! - [`frame`] — Detect-only framing: markers, escaping, rolling checksum
//! - [`message`] — Nibble-packed telemetry messages inside frame payloads
//! - [`registry`] — Bounded per-client and per-sensor state with dirty flags
//! - [`hub`] — Ingest sessions that fold decoded frames into the registry

/// Re-export transport types.
pub mod transport {
    pub use sensorlink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use sensorlink_frame::*;
}

/// Re-export message types.
pub mod message {
    pub use sensorlink_message::*;
}

/// Re-export registry types.
pub mod registry {
    pub use sensorlink_registry::*;
}

/// Re-export hub types.
pub mod hub {
    pub use sensorlink_hub::*;
}
