/*!
Handler registry - delegates ordered by unique priority.

The interest union and `all_types` flag are derived at registration and only
grow; there is no unregister. Lower priority values are evaluated first.
*/

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::delegate::Delegate;
use crate::host::Host;
use crate::types::{EventType, EventTypes};

/// Priority key. Ascending order is evaluation order.
pub type Priority = i32;

/// A delegate together with the interest it declared at registration.
pub(crate) struct RegisteredDelegate<H: Host> {
  pub(crate) priority: Priority,
  /// `None` = all event types.
  pub(crate) interest: Option<EventTypes>,
  pub(crate) delegate: Arc<dyn Delegate<H>>,
}

impl<H: Host> RegisteredDelegate<H> {
  pub(crate) fn wants(&self, event_type: EventType) -> bool {
    match &self.interest {
      None => true,
      Some(types) => types.contains(&event_type),
    }
  }
}

pub(crate) struct HandlerRegistry<H: Host> {
  delegates: BTreeMap<Priority, Arc<RegisteredDelegate<H>>>,
  interest_union: EventTypes,
  all_types: bool,
}

impl<H: Host> HandlerRegistry<H> {
  pub(crate) fn new() -> Self {
    Self {
      delegates: BTreeMap::new(),
      interest_union: EventTypes::new(),
      all_types: false,
    }
  }

  /// Insert or replace the delegate at `priority`. Returns the replaced delegate.
  pub(crate) fn register(
    &mut self,
    priority: Priority,
    delegate: Arc<dyn Delegate<H>>,
  ) -> Option<Arc<dyn Delegate<H>>> {
    let interest = delegate.event_types();
    match &interest {
      None => self.all_types = true,
      Some(types) => self.interest_union.extend(types.iter().copied()),
    }

    let entry = Arc::new(RegisteredDelegate {
      priority,
      interest,
      delegate,
    });
    self
      .delegates
      .insert(priority, entry)
      .map(|replaced| Arc::clone(&replaced.delegate))
  }

  /// Global fast filter: could any registered delegate want this type?
  pub(crate) fn accepts(&self, event_type: EventType) -> bool {
    self.all_types || self.interest_union.contains(&event_type)
  }

  /// Delegates in evaluation order. Cheap: clones `Arc`s only.
  pub(crate) fn chain(&self) -> Vec<Arc<RegisteredDelegate<H>>> {
    self.delegates.values().cloned().collect()
  }

  pub(crate) fn priorities(&self) -> Vec<Priority> {
    self.delegates.keys().copied().collect()
  }

  pub(crate) fn len(&self) -> usize {
    self.delegates.len()
  }

  pub(crate) const fn all_types(&self) -> bool {
    self.all_types
  }

  #[cfg(test)]
  pub(crate) const fn interest_union(&self) -> &EventTypes {
    &self.interest_union
  }
}
