/*! Test doubles: a scripted host and recording delegates. */

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::Relay;
use crate::delegate::{Delegate, FnDelegate};
use crate::host::{EnablementProbe, Host};
use crate::types::{Event, EventTypes, HostError, RelayError, RelayResult};

pub(crate) type RootAnswer = Result<Option<u32>, HostError>;

/// Host whose root query replays scripted answers, then repeats a fallback.
pub(crate) struct FakeHost {
  script: Mutex<VecDeque<RootAnswer>>,
  fallback: Mutex<RootAnswer>,
  queries: AtomicUsize,
  panics_left: AtomicUsize,
  self_disable: bool,
  disable_calls: AtomicUsize,
}

impl FakeHost {
  pub(crate) fn new() -> Self {
    Self::answering(Ok(Some(1)))
  }

  pub(crate) fn answering(fallback: RootAnswer) -> Self {
    Self {
      script: Mutex::new(VecDeque::new()),
      fallback: Mutex::new(fallback),
      queries: AtomicUsize::new(0),
      panics_left: AtomicUsize::new(0),
      self_disable: true,
      disable_calls: AtomicUsize::new(0),
    }
  }

  pub(crate) fn without_self_disable(mut self) -> Self {
    self.self_disable = false;
    self
  }

  pub(crate) fn script(&self, answers: impl IntoIterator<Item = RootAnswer>) {
    self.script.lock().extend(answers);
  }

  /// Make the next `count` root queries panic.
  pub(crate) fn panic_next(&self, count: usize) {
    self.panics_left.store(count, Ordering::SeqCst);
  }

  pub(crate) fn set_fallback(&self, answer: RootAnswer) {
    *self.fallback.lock() = answer;
  }

  pub(crate) fn queries(&self) -> usize {
    self.queries.load(Ordering::SeqCst)
  }

  pub(crate) fn disable_calls(&self) -> usize {
    self.disable_calls.load(Ordering::SeqCst)
  }
}

impl Host for FakeHost {
  type Node = u32;
  type Payload = &'static str;

  fn root_in_active_window(&self) -> Result<Option<u32>, HostError> {
    self.queries.fetch_add(1, Ordering::SeqCst);
    if self.panics_left.load(Ordering::SeqCst) > 0 {
      self.panics_left.fetch_sub(1, Ordering::SeqCst);
      panic!("root query exploded");
    }
    let scripted = self.script.lock().pop_front();
    scripted.unwrap_or_else(|| self.fallback.lock().clone())
  }

  fn supports_self_disable(&self) -> bool {
    self.self_disable
  }

  fn disable_self(&self) {
    self.disable_calls.fetch_add(1, Ordering::SeqCst);
  }
}

pub(crate) struct FixedProbe(pub(crate) bool);

impl EnablementProbe for FixedProbe {
  fn is_relay_enabled(&self) -> bool {
    self.0
  }
}

/// Shared record of delegate invocations, by delegate name.
#[derive(Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
  pub(crate) fn push(&self, name: &'static str) {
    self.0.lock().push(name);
  }

  pub(crate) fn calls(&self) -> Vec<&'static str> {
    self.0.lock().clone()
  }
}

/// Delegate that records its name and reports `handles` as the handled flag.
pub(crate) fn recorder(
  name: &'static str,
  log: &CallLog,
  interest: Option<EventTypes>,
  handles: bool,
) -> impl Delegate<FakeHost> {
  let log = log.clone();
  FnDelegate::new(
    name,
    interest,
    move |_: &Relay<FakeHost>, _: &Event<&'static str>| -> RelayResult<bool> {
      log.push(name);
      Ok(handles)
    },
  )
}

/// Delegate that records its name and then fails.
pub(crate) fn failing(name: &'static str, log: &CallLog) -> impl Delegate<FakeHost> {
  let log = log.clone();
  FnDelegate::new(
    name,
    None,
    move |_: &Relay<FakeHost>, _: &Event<&'static str>| -> RelayResult<bool> {
      log.push(name);
      Err(RelayError::delegate(name, "boom"))
    },
  )
}

/// Delegate that records its name and then panics.
pub(crate) fn panicking(name: &'static str, log: &CallLog) -> impl Delegate<FakeHost> {
  let log = log.clone();
  FnDelegate::new(
    name,
    None,
    move |_: &Relay<FakeHost>, _: &Event<&'static str>| -> RelayResult<bool> {
      log.push(name);
      panic!("{name} exploded");
    },
  )
}

/// Poll `condition` until it holds or `timeout` elapses.
pub(crate) fn eventually(timeout: Duration, condition: impl Fn() -> bool) -> bool {
  let deadline = Instant::now() + timeout;
  while Instant::now() < deadline {
    if condition() {
      return true;
    }
    std::thread::sleep(Duration::from_millis(2));
  }
  condition()
}
