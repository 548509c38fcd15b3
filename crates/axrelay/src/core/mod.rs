/*!
Core relay instance - owns the handler registry, readiness gate, snapshot
cache and the current host connection.

# Module Structure

- `mod.rs` - Relay struct, construction, lifecycle event broadcasting
- `registry.rs` - `HandlerRegistry`, delegates ordered by priority
- `dispatch.rs` - routing one host event through the delegate chain
- `lifecycle.rs` - connect/disconnect, self-disable, instance and readiness queries

# Example

```ignore
let relay = Relay::<MyHost>::builder().snapshot_interval_ms(100).build()?;
relay.register(0, MyDelegate::default());

// host glue
relay.on_connect(Arc::new(host))?;
relay.dispatch(&Event::new(EventType::VIEW_CLICKED, payload));

// elsewhere
if relay.wait_ready(Duration::from_secs(5)) {
    let root = relay.snapshot();
}
```
*/

mod dispatch;
mod lifecycle;
mod registry;

pub use dispatch::DispatchOutcome;
pub use registry::Priority;

use async_broadcast::{InactiveReceiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{FailurePolicy, ReadinessPolicy, RelayConfig};
use crate::delegate::Delegate;
use crate::host::Host;
use crate::polling::{RootSnapshotCache, SnapshotPoller};
use crate::readiness::ReadinessGate;
use crate::types::{EventType, RelayEvent, RelayResult};
use registry::HandlerRegistry;

/// A live connection to the host. Dropping it stops the poller.
struct Session<H: Host> {
  host: Arc<H>,
  poller: SnapshotPoller,
}

/// The relay service object.
///
/// Owns everything the service needs; nothing is process-global.
/// Clone is cheap (Arc bumps) - share freely across threads.
pub struct Relay<H: Host> {
  registry: Arc<RwLock<HandlerRegistry<H>>>,
  readiness: Arc<ReadinessGate>,
  snapshot: Arc<RootSnapshotCache<H::Node>>,
  session: Arc<Mutex<Option<Session<H>>>>,
  /// Held for the whole of `on_connect` / `on_disconnect`.
  transition: Arc<Mutex<()>>,
  events_tx: Sender<RelayEvent>,
  events_keepalive: InactiveReceiver<RelayEvent>,
  config: RelayConfig,
}

impl<H: Host> Clone for Relay<H> {
  fn clone(&self) -> Self {
    Self {
      registry: Arc::clone(&self.registry),
      readiness: Arc::clone(&self.readiness),
      snapshot: Arc::clone(&self.snapshot),
      session: Arc::clone(&self.session),
      transition: Arc::clone(&self.transition),
      events_tx: self.events_tx.clone(),
      events_keepalive: self.events_keepalive.clone(),
      config: self.config,
    }
  }
}

impl<H: Host> std::fmt::Debug for Relay<H> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Relay")
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a Relay.
///
/// # Example
///
/// ```
/// use axrelay::{FailurePolicy, ReadinessPolicy, RelayBuilder};
///
/// let builder = RelayBuilder::default()
///     .snapshot_interval_ms(50)
///     .readiness_policy(ReadinessPolicy::Latch)
///     .failure_policy(FailurePolicy::Abort);
/// assert_eq!(builder.config().snapshot_interval_ms, 50);
/// ```
#[derive(Debug, Default, Clone, Copy)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct RelayBuilder {
  config: RelayConfig,
}

impl RelayBuilder {
  /// Start from an existing config, e.g. one loaded with [`RelayConfig::from_json`].
  pub const fn from_config(config: RelayConfig) -> Self {
    Self { config }
  }

  /// Set the root snapshot polling interval in milliseconds. Default: 100ms.
  pub const fn snapshot_interval_ms(mut self, ms: u64) -> Self {
    self.config.snapshot_interval_ms = ms;
    self
  }

  /// Choose whether a disconnect rearms the readiness gate.
  pub const fn readiness_policy(mut self, policy: ReadinessPolicy) -> Self {
    self.config.readiness_policy = policy;
    self
  }

  /// Choose what dispatch does when a delegate fails.
  pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
    self.config.failure_policy = policy;
    self
  }

  /// Set lifecycle event channel capacity. Oldest events are dropped when full.
  pub const fn event_channel_capacity(mut self, capacity: usize) -> Self {
    self.config.event_channel_capacity = capacity;
    self
  }

  /// The configuration built so far.
  pub const fn config(&self) -> &RelayConfig {
    &self.config
  }

  /// Build the relay. Returns an error if the configuration is invalid.
  pub fn build<H: Host>(self) -> RelayResult<Relay<H>> {
    Relay::create_with_config(self.config)
  }
}

impl<H: Host> Relay<H> {
  /// Create a disconnected relay with default options.
  pub fn new() -> RelayResult<Self> {
    Self::builder().build()
  }

  /// Create a builder for configuring a new relay.
  pub fn builder() -> RelayBuilder {
    RelayBuilder::default()
  }

  fn create_with_config(config: RelayConfig) -> RelayResult<Self> {
    config.validate()?;

    let (mut tx, rx) = async_broadcast::broadcast(config.event_channel_capacity);
    tx.set_overflow(true); // Drop oldest messages when full

    Ok(Self {
      registry: Arc::new(RwLock::new(HandlerRegistry::new())),
      readiness: Arc::new(ReadinessGate::new()),
      snapshot: Arc::new(RootSnapshotCache::new()),
      session: Arc::new(Mutex::new(None)),
      transition: Arc::new(Mutex::new(())),
      events_tx: tx,
      events_keepalive: rx.deactivate(),
      config,
    })
  }

  /// The configuration this relay was built with.
  pub const fn config(&self) -> &RelayConfig {
    &self.config
  }

  /// Subscribe to lifecycle events from this relay.
  pub fn subscribe(&self) -> async_broadcast::Receiver<RelayEvent> {
    self.events_keepalive.activate_cloned()
  }

  /// Register `delegate` at `priority`, replacing (and returning) any delegate
  /// already registered there.
  ///
  /// Intended for process setup. A registration made while an event is being
  /// dispatched takes effect from the next event.
  pub fn register<D: Delegate<H>>(
    &self,
    priority: Priority,
    delegate: D,
  ) -> Option<Arc<dyn Delegate<H>>> {
    let name = delegate.name().to_string();
    let replaced = self.registry.write().register(priority, Arc::new(delegate));
    if let Some(old) = &replaced {
      log::warn!(
        "Delegate '{name}' replaced '{}' at priority {priority}",
        old.name()
      );
    } else {
      log::debug!("Registered delegate '{name}' at priority {priority}");
    }
    replaced
  }

  /// Registered priorities in evaluation order.
  pub fn priorities(&self) -> Vec<Priority> {
    self.registry.read().priorities()
  }

  /// Number of registered delegates.
  pub fn delegate_count(&self) -> usize {
    self.registry.read().len()
  }

  /// Whether any registered delegate may receive events of this type.
  pub fn accepts(&self, event_type: EventType) -> bool {
    self.registry.read().accepts(event_type)
  }

  /// Whether a delegate interested in every event type is registered.
  pub fn accepts_all_types(&self) -> bool {
    self.registry.read().all_types()
  }

  /// Latest cached active-window root. Never blocks; may be one interval stale,
  /// and is empty before the first successful poll or while disconnected.
  pub fn snapshot(&self) -> Option<H::Node> {
    self.snapshot.get()
  }

  /// How long ago the cached root was published.
  pub fn snapshot_age(&self) -> Option<Duration> {
    self.snapshot.age()
  }

  pub(crate) fn emit(&self, event: RelayEvent) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!("Lifecycle event channel overflow - events are being dropped");
      }
    }
  }

  const fn snapshot_interval(&self) -> Duration {
    Duration::from_millis(self.config.snapshot_interval_ms)
  }
}
