/*! Service lifecycle state and the events broadcast on transitions. */

use serde::Serialize;
use ts_rs::TS;

/// Lifecycle state of a relay. There is no intermediate "connecting" state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ServiceState {
  #[default]
  Disconnected,
  Connected,
}

impl ServiceState {
  pub const fn is_connected(self) -> bool {
    matches!(self, Self::Connected)
  }
}

/// Events emitted when the relay changes lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum RelayEvent {
  #[serde(rename = "service:connected")]
  Connected,
  #[serde(rename = "service:disconnected")]
  Disconnected,
  /// The host accepted a self-disable request. `Disconnected` follows when the host tears down.
  #[serde(rename = "service:disable_requested")]
  DisableRequested,
}
