/*!
axrelay - accessibility event relay core.

Routes host accessibility events to prioritized delegates, keeps a cached
snapshot of the active window root, and lets callers wait for the relay to
become active.

```ignore
use axrelay::{Event, EventType, EventTypes, FnDelegate, Relay};

// Create a relay at process setup (nothing is global)
let relay = Relay::<MyHost>::builder().snapshot_interval_ms(100).build()?;

// Register delegates; lower priority runs first, first handler wins
relay.register(0, FnDelegate::new("clicks", Some(EventTypes::from([EventType::VIEW_CLICKED])), |_, event| {
    Ok(false)
}));

// Host glue forwards platform callbacks
relay.on_connect(Arc::new(host))?;
relay.dispatch(&Event::new(EventType::VIEW_CLICKED, platform_event));

// Anyone else
if relay.wait_ready(Duration::from_secs(5)) {
    let root = relay.snapshot(); // cached, may be one interval stale
}

relay.on_disconnect()?;
```
*/

mod config;
mod core;
mod delegate;
mod host;
mod polling;
mod readiness;

#[cfg(test)]
mod testing;

mod types;
pub use types::*;

pub use crate::config::{FailurePolicy, ReadinessPolicy, RelayConfig};
pub use crate::core::{DispatchOutcome, Priority, Relay, RelayBuilder};
pub use crate::delegate::{Delegate, FnDelegate};
pub use crate::host::{EnablementProbe, Host};
pub use crate::readiness::ReadinessGate;
