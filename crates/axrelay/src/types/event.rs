/*! Inbound accessibility events and their type codes. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

/// Host event type code. Used for interest filtering.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct EventType(pub u32);

impl EventType {
  pub const VIEW_CLICKED: Self = Self(0x0000_0001);
  pub const VIEW_LONG_CLICKED: Self = Self(0x0000_0002);
  pub const VIEW_SELECTED: Self = Self(0x0000_0004);
  pub const VIEW_FOCUSED: Self = Self(0x0000_0008);
  pub const VIEW_TEXT_CHANGED: Self = Self(0x0000_0010);
  pub const WINDOW_STATE_CHANGED: Self = Self(0x0000_0020);
  pub const NOTIFICATION_STATE_CHANGED: Self = Self(0x0000_0040);
  pub const WINDOW_CONTENT_CHANGED: Self = Self(0x0000_0800);
  pub const VIEW_SCROLLED: Self = Self(0x0000_1000);
  pub const VIEW_TEXT_SELECTION_CHANGED: Self = Self(0x0000_2000);
  pub const ANNOUNCEMENT: Self = Self(0x0000_4000);
  pub const WINDOWS_CHANGED: Self = Self(0x0040_0000);
}

/// Set of event types a delegate is interested in.
pub type EventTypes = HashSet<EventType>;

/// One inbound notification from the host. Read-only once dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<P> {
  event_type: EventType,
  payload: P,
}

impl<P> Event<P> {
  /// Wrap a host payload with its type code.
  pub const fn new(event_type: EventType, payload: P) -> Self {
    Self {
      event_type,
      payload,
    }
  }

  pub const fn event_type(&self) -> EventType {
    self.event_type
  }

  /// The opaque platform event.
  pub const fn payload(&self) -> &P {
    &self.payload
  }

  pub fn into_payload(self) -> P {
    self.payload
  }
}
