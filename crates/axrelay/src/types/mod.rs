/*! Core types for axrelay.

Regenerate TypeScript types: `cargo test export_bindings`
*/

#![allow(missing_docs)]

mod error;
mod event;
mod state;

pub use error::{HostError, RelayError, RelayResult};
pub use event::{Event, EventType, EventTypes};
pub use state::{RelayEvent, ServiceState};
