//! Error types for hub sessions.

/// Errors that can occur while ingesting telemetry.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Link-level error.
    #[error("link error: {0}")]
    Link(#[from] sensorlink_transport::LinkError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] sensorlink_frame::FrameError),
}

/// Convenience alias for hub results.
pub type Result<T> = std::result::Result<T, HubError>;
