/*!
Configuration for a relay.

All values have sensible defaults. Override individual fields, or load from JSON:

```
use axrelay::{FailurePolicy, RelayConfig};

let config = RelayConfig::from_json(r#"{ "snapshot_interval_ms": 250 }"#).unwrap();
assert_eq!(config.snapshot_interval_ms, 250);
assert_eq!(config.failure_policy, FailurePolicy::Isolate);
```
*/

use serde::{Deserialize, Serialize};

use crate::types::{RelayError, RelayResult};

pub(crate) const DEFAULT_SNAPSHOT_INTERVAL_MS: u64 = 100;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// What a disconnect does to the readiness gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessPolicy {
  /// Disconnect rearms the gate: waiters block again until the next connect.
  #[default]
  ResetOnDisconnect,
  /// The gate only records "has ever connected".
  Latch,
}

/// What dispatch does when a delegate fails or panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
  /// Log the failure and continue with the next delegate.
  #[default]
  Isolate,
  /// Log the failure and skip the rest of the chain for that event.
  Abort,
}

/// Relay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
  /// Interval between root snapshot polls.
  /// Default: 100ms.
  pub snapshot_interval_ms: u64,

  /// Default: reset on disconnect.
  pub readiness_policy: ReadinessPolicy,

  /// Default: isolate.
  pub failure_policy: FailurePolicy,

  /// Capacity of the lifecycle event broadcast channel.
  /// Oldest events are dropped when full. Default: 64.
  pub event_channel_capacity: usize,
}

impl Default for RelayConfig {
  fn default() -> Self {
    Self {
      snapshot_interval_ms: DEFAULT_SNAPSHOT_INTERVAL_MS,
      readiness_policy: ReadinessPolicy::default(),
      failure_policy: FailurePolicy::default(),
      event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
    }
  }
}

impl RelayConfig {
  /// Parse a config from JSON. Missing fields take their defaults.
  pub fn from_json(json: &str) -> RelayResult<Self> {
    let config: Self = serde_json::from_str(json).map_err(|e| RelayError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub(crate) fn validate(&self) -> RelayResult<()> {
    if self.snapshot_interval_ms == 0 {
      return Err(RelayError::Config(
        "snapshot_interval_ms must be greater than zero".into(),
      ));
    }
    if self.event_channel_capacity == 0 {
      return Err(RelayError::Config(
        "event_channel_capacity must be greater than zero".into(),
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_values() {
    let config = RelayConfig::default();
    assert_eq!(config.snapshot_interval_ms, DEFAULT_SNAPSHOT_INTERVAL_MS);
    assert_eq!(config.readiness_policy, ReadinessPolicy::ResetOnDisconnect);
    assert_eq!(config.failure_policy, FailurePolicy::Isolate);
    assert_eq!(config.event_channel_capacity, DEFAULT_EVENT_CHANNEL_CAPACITY);
  }

  #[test]
  fn empty_json_yields_defaults() {
    let config = RelayConfig::from_json("{}").unwrap();
    assert_eq!(config, RelayConfig::default());
  }

  #[test]
  fn policies_parse_from_snake_case() {
    let config =
      RelayConfig::from_json(r#"{ "readiness_policy": "latch", "failure_policy": "abort" }"#)
        .unwrap();
    assert_eq!(config.readiness_policy, ReadinessPolicy::Latch);
    assert_eq!(config.failure_policy, FailurePolicy::Abort);
  }

  #[test]
  fn zero_interval_is_rejected() {
    let err = RelayConfig::from_json(r#"{ "snapshot_interval_ms": 0 }"#).unwrap_err();
    assert!(matches!(err, RelayError::Config(_)));
  }

  #[test]
  fn malformed_json_is_a_config_error() {
    let err = RelayConfig::from_json("not json").unwrap_err();
    assert!(matches!(err, RelayError::Config(_)));
  }
}
