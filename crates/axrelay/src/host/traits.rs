/*!
Host abstraction traits.

These traits define the contract between the relay core and the platform
service it runs inside. Core code only uses these traits, never
platform-specific types directly.
*/

use crate::types::HostError;

/// The connected host platform.
///
/// Events arrive through [`crate::Relay::dispatch`]; this trait covers the
/// calls the relay makes back into the host.
pub trait Host: Send + Sync + 'static {
  /// Root node of the active window. Clone should be cheap (reference-counted).
  type Node: Clone + Send + Sync + 'static;

  /// Opaque platform event carried by [`crate::Event`].
  type Payload: Send + Sync + 'static;

  /// Query the root of the currently active window.
  ///
  /// `Ok(None)` means the host answered but has no active window.
  /// `Err(HostError::NotReady)` is expected shortly after connect.
  fn root_in_active_window(&self) -> Result<Option<Self::Node>, HostError>;

  /// Whether this host version lets the service deactivate itself.
  fn supports_self_disable(&self) -> bool;

  /// Ask the host to deactivate the service. Only called when
  /// [`Host::supports_self_disable`] returns true.
  fn disable_self(&self);
}

/// Checks from outside the service whether the relay is enabled for the application.
pub trait EnablementProbe {
  /// Whether the host currently has the relay enabled.
  fn is_relay_enabled(&self) -> bool;
}
