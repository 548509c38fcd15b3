/*!
Event dispatch.

One inbound event is checked against the registry's interest union, then
offered to each interested delegate in ascending priority until one reports
it handled. The registry lock is released before any delegate runs.
*/

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use super::{Priority, Relay};
use crate::config::FailurePolicy;
use crate::host::Host;
use crate::types::Event;

/// What happened to a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
  /// No registered delegate is interested in this event type. Nothing was invoked.
  Rejected,
  /// The delegate at `priority` handled the event; later delegates were skipped.
  Handled {
    /// Priority of the delegate that handled the event.
    priority: Priority,
    /// Delegates invoked, including the handler.
    invoked: usize,
  },
  /// Every interested delegate ran and none handled the event.
  Unhandled {
    /// Delegates invoked.
    invoked: usize,
  },
  /// The delegate at `priority` failed and the failure policy stopped the chain.
  Aborted {
    /// Priority of the delegate that failed.
    priority: Priority,
    /// Delegates invoked, including the failed one.
    invoked: usize,
  },
}

impl DispatchOutcome {
  /// Whether some delegate claimed the event.
  pub const fn is_handled(&self) -> bool {
    matches!(self, Self::Handled { .. })
  }

  /// Number of delegates invoked for the event.
  pub const fn invoked(&self) -> usize {
    match self {
      Self::Rejected => 0,
      Self::Handled { invoked, .. }
      | Self::Unhandled { invoked }
      | Self::Aborted { invoked, .. } => *invoked,
    }
  }
}

impl<H: Host> Relay<H> {
  /// Route one host event to the registered delegates.
  ///
  /// Called by host glue from the platform's event callback. A delegate that
  /// returns an error or panics is logged; whether the chain continues is
  /// decided by [`FailurePolicy`].
  pub fn dispatch(&self, event: &Event<H::Payload>) -> DispatchOutcome {
    let event_type = event.event_type();

    let chain = {
      let registry = self.registry.read();
      if !registry.accepts(event_type) {
        return DispatchOutcome::Rejected;
      }
      registry.chain()
    };

    let mut invoked = 0;
    for entry in chain.iter().filter(|entry| entry.wants(event_type)) {
      invoked += 1;
      let name = entry.delegate.name();
      let start = Instant::now();

      let result = panic::catch_unwind(AssertUnwindSafe(|| entry.delegate.on_event(self, event)));

      log::trace!(
        "Delegate '{name}' (priority {}) took {}ms for event type {event_type}",
        entry.priority,
        start.elapsed().as_millis()
      );

      let failed = match result {
        Ok(Ok(true)) => {
          return DispatchOutcome::Handled {
            priority: entry.priority,
            invoked,
          };
        }
        Ok(Ok(false)) => false,
        Ok(Err(e)) => {
          log::error!("Delegate '{name}' failed on event type {event_type}: {e}");
          true
        }
        Err(_) => {
          log::error!("Delegate '{name}' panicked on event type {event_type}");
          true
        }
      };

      if failed && self.config.failure_policy == FailurePolicy::Abort {
        return DispatchOutcome::Aborted {
          priority: entry.priority,
          invoked,
        };
      }
    }

    DispatchOutcome::Unhandled { invoked }
  }
}
