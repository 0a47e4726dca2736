use thiserror::Error;

/// Top-level error type for hookbell.
#[derive(Debug, Error)]
pub enum HookbellError {
    /// Configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A channel is enabled but lacks the settings it needs.
    #[error("config incomplete: {0}")]
    ConfigIncomplete(String),

    /// Network, DNS, TLS, proxy, or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote side answered, but reported a failure or an unreadable body.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Local audio playback failed on both the primary and fallback path.
    #[error("playback error: {0}")]
    Playback(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
