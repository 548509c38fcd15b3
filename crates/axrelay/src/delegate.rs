/*!
Delegates: the handlers the relay routes events to.

A delegate declares which event types it cares about once, at registration,
and is then invoked for matching events in priority order until one of them
reports the event handled.
*/

use std::marker::PhantomData;

use crate::core::Relay;
use crate::host::Host;
use crate::types::{Event, EventTypes, RelayResult};

/// A registered event handler.
///
/// `on_event` returns `Ok(true)` when the delegate fully handled the event;
/// delegates with a larger priority then never see it. `Err` is logged and
/// treated according to the relay's [`crate::FailurePolicy`].
pub trait Delegate<H: Host>: Send + Sync + 'static {
  /// Event types this delegate is interested in. `None` means all types.
  ///
  /// Read once when the delegate is registered.
  fn event_types(&self) -> Option<EventTypes> {
    None
  }

  /// Handle one event. `Ok(true)` claims it.
  fn on_event(&self, relay: &Relay<H>, event: &Event<H::Payload>) -> RelayResult<bool>;

  /// Name used in logs.
  fn name(&self) -> &str {
    std::any::type_name::<Self>()
  }
}

/// Delegate backed by a closure.
///
/// ```ignore
/// relay.register(10, FnDelegate::new("clicks", Some(EventTypes::from([EventType::VIEW_CLICKED])), |_, event| {
///     log::info!("clicked: {:?}", event.payload());
///     Ok(false)
/// }));
/// ```
pub struct FnDelegate<H, F> {
  name: String,
  event_types: Option<EventTypes>,
  handler: F,
  _host: PhantomData<fn() -> H>,
}

impl<H, F> FnDelegate<H, F>
where
  H: Host,
  F: Fn(&Relay<H>, &Event<H::Payload>) -> RelayResult<bool> + Send + Sync + 'static,
{
  /// Wrap `handler`. `event_types: None` subscribes to every event type.
  pub fn new(name: impl Into<String>, event_types: Option<EventTypes>, handler: F) -> Self {
    Self {
      name: name.into(),
      event_types,
      handler,
      _host: PhantomData,
    }
  }
}

impl<H, F> std::fmt::Debug for FnDelegate<H, F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FnDelegate")
      .field("name", &self.name)
      .field("event_types", &self.event_types)
      .finish_non_exhaustive()
  }
}

impl<H, F> Delegate<H> for FnDelegate<H, F>
where
  H: Host,
  F: Fn(&Relay<H>, &Event<H::Payload>) -> RelayResult<bool> + Send + Sync + 'static,
{
  fn event_types(&self) -> Option<EventTypes> {
    self.event_types.clone()
  }

  fn on_event(&self, relay: &Relay<H>, event: &Event<H::Payload>) -> RelayResult<bool> {
    (self.handler)(relay, event)
  }

  fn name(&self) -> &str {
    &self.name
  }
}
