//! Bounded, identity-keyed state for transmitting nodes and their sensors.
//!
//! The registry is an allocate-once pool sized at construction: client slots
//! are claimed the first time a new identity is seen and never evicted, and
//! each client owns an equally bounded set of sensor slots. When a table is
//! full, updates for unknown identities are rejected and the caller drops
//! them; established sequencing and loss history always wins over new
//! arrivals.
//!
//! Identities are opaque byte strings of 1 to 16 bytes, matched exactly.
//! Mutators leave change detection to the caller: ingest code marks entries
//! dirty as it applies updates, and the reporting sink clears the flags once
//! it has flushed them.

pub mod client;
pub mod error;
pub mod id;
pub mod registry;

pub use client::{Client, SensorValue, MAX_SENSORS};
pub use error::{RegistryError, Result};
pub use id::{ByteId, MAX_ID_LEN};
pub use registry::{ClientRegistry, ClientReport, Reading, DEFAULT_CAPACITY};
