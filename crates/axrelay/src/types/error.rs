/*! Error types for relay operations. */

/// Errors that can occur during relay operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
  #[error("Relay is already connected to a host")]
  AlreadyConnected,

  #[error("Relay is not connected to a host")]
  NotConnected,

  #[error("Operation not supported: {0}")]
  NotSupported(String),

  #[error("Delegate '{name}' failed: {reason}")]
  Delegate { name: String, reason: String },

  #[error("Snapshot executor error: {0}")]
  Executor(String),

  #[error("Invalid configuration: {0}")]
  Config(String),
}

impl RelayError {
  /// Convenience constructor for delegate failures.
  pub fn delegate(name: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::Delegate {
      name: name.into(),
      reason: reason.into(),
    }
  }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Failures reported by the host when it is queried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
  /// The host cannot answer yet (typically right after connect). Retried next tick.
  #[error("Host not ready")]
  NotReady,

  #[error("Host query failed: {0}")]
  Failed(String),
}

impl HostError {
  /// Whether the failure is expected to clear on its own.
  pub const fn is_transient(&self) -> bool {
    matches!(self, Self::NotReady)
  }
}
