//! Byte transports for sensor links.
//!
//! Provides the physical channel the telemetry stack ingests from:
//! - Serial tty devices (the radio bridge), configured raw 8N1
//! - Connected socket pairs for loopback testing
//!
//! This is the lowest layer of sensorlink. Everything else builds on the
//! [`LinkStream`] type provided here.

pub mod error;
pub mod link;

#[cfg(unix)]
pub mod serial;

pub use error::{LinkError, Result};
pub use link::LinkStream;

#[cfg(unix)]
pub use serial::{open_serial, DEFAULT_BAUD};
