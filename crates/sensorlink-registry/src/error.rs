//! Error types for registry operations.

/// Errors from the bounded client/sensor registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Every client slot is claimed by a different identity.
    #[error("client table full ({capacity} slots claimed)")]
    ClientsFull {
        /// The registry's fixed client bound.
        capacity: usize,
    },

    /// Every sensor slot under this client is claimed.
    #[error("sensor table full ({capacity} slots claimed)")]
    SensorsFull {
        /// The per-client sensor bound.
        capacity: usize,
    },

    /// Identities are 1 to 16 opaque bytes.
    #[error("invalid identity length {0} (expected 1-16 bytes)")]
    InvalidId(usize),
}

/// Convenience alias for registry results.
pub type Result<T> = std::result::Result<T, RegistryError>;
