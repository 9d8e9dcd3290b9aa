//! Hub-side ingest: framed transmissions folded into per-client state.
//!
//! The hub end of a telemetry link sits between the frame layer and the
//! registry. [`Ingestor`] walks one decoded payload at a time, applying
//! client identities, sequence numbers, and sensor readings while charging
//! sequence gaps as packet loss. [`HubSession`] ties an ingestor to a
//! [`FrameReader`](sensorlink_frame::FrameReader) so callers can pull
//! registry updates straight off a serial link.

pub mod error;
pub mod ingest;
pub mod session;

pub use error::{HubError, Result};
pub use ingest::{Applied, Ingestor};
pub use session::HubSession;
