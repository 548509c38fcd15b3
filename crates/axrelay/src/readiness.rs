/*!
Readiness gate.

Lets any thread block until the relay connects. One `signal_ready` releases
every waiter. Whether a disconnect rearms the gate is decided by the owner
(see [`crate::ReadinessPolicy`]); the gate itself only exposes `reset`.
*/

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Connected flag guarded by a mutex, with a condvar to wake waiters.
#[derive(Debug, Default)]
pub struct ReadinessGate {
  connected: Mutex<bool>,
  ready: Condvar,
}

impl ReadinessGate {
  /// A gate that is not ready yet.
  pub fn new() -> Self {
    Self::default()
  }

  /// Mark the gate ready and wake all waiters.
  pub fn signal_ready(&self) {
    let mut connected = self.connected.lock();
    *connected = true;
    self.ready.notify_all();
  }

  /// Rearm the gate. Later waiters block until the next `signal_ready`.
  pub fn reset(&self) {
    *self.connected.lock() = false;
  }

  /// Non-blocking probe.
  pub fn is_ready(&self) -> bool {
    *self.connected.lock()
  }

  /// Block until ready or until `timeout` elapses. Returns whether the gate is ready.
  ///
  /// Returns immediately if the gate is ready at call time. Spurious wakeups
  /// do not shorten the wait.
  pub fn wait_ready(&self, timeout: Duration) -> bool {
    let deadline = Instant::now().checked_add(timeout);
    let mut connected = self.connected.lock();
    while !*connected {
      match deadline {
        Some(deadline) => {
          if self.ready.wait_until(&mut connected, deadline).timed_out() {
            return *connected;
          }
        }
        // Timeout too large to represent: wait without bound.
        None => self.ready.wait(&mut connected),
      }
    }
    true
  }
}
