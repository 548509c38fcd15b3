/*!
Root snapshot polling.

A ticker thread fires every interval and hands each poll to a dedicated
single-threaded executor, which queries the host and publishes the result.
The executor is the only writer of the snapshot; readers load it without
locking. Consumers don't interact with the poller directly - it is owned by
the relay's connection.
*/

use arc_swap::ArcSwapOption;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::host::Host;
use crate::types::{HostError, RelayError, RelayResult};

struct Published<N> {
  node: N,
  at: Instant,
}

/// Latest active-window root, published atomically.
pub(crate) struct RootSnapshotCache<N> {
  current: ArcSwapOption<Published<N>>,
}

impl<N: Clone> RootSnapshotCache<N> {
  pub(crate) fn new() -> Self {
    Self {
      current: ArcSwapOption::empty(),
    }
  }

  /// Latest published root. Never blocks; may be one interval stale.
  pub(crate) fn get(&self) -> Option<N> {
    self.current.load_full().map(|p| p.node.clone())
  }

  /// Time since the current root was published.
  pub(crate) fn age(&self) -> Option<Duration> {
    self.current.load_full().map(|p| p.at.elapsed())
  }

  pub(crate) fn publish(&self, node: N) {
    self.current.store(Some(Arc::new(Published {
      node,
      at: Instant::now(),
    })));
  }

  pub(crate) fn clear(&self) {
    self.current.store(None);
  }
}

/// Handle to a running poller. Stops on drop.
pub(crate) struct SnapshotPoller {
  stop_signal: Arc<AtomicBool>,
  thread: Option<JoinHandle<()>>,
  executor: Arc<rayon::ThreadPool>,
}

impl std::fmt::Debug for SnapshotPoller {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SnapshotPoller").finish_non_exhaustive()
  }
}

impl SnapshotPoller {
  /// Stop ticking and wait for any queued poll to finish.
  ///
  /// Once this returns the host is not queried again and nothing else is
  /// published, so the owner can safely clear the cache.
  pub(crate) fn stop(&mut self) {
    self.stop_signal.store(true, Ordering::SeqCst);
    if let Some(t) = self.thread.take() {
      t.thread().unpark();
      drop(t.join());
    }
    // Single worker, FIFO injection: this runs after every poll spawned before it.
    self.executor.install(|| ());
  }
}

impl Drop for SnapshotPoller {
  fn drop(&mut self) {
    self.stop();
  }
}

/// Start polling `host` into `cache` every `interval`. The first poll fires immediately.
pub(crate) fn start_polling<H: Host>(
  host: Arc<H>,
  cache: Arc<RootSnapshotCache<H::Node>>,
  interval: Duration,
) -> RelayResult<SnapshotPoller> {
  let executor = rayon::ThreadPoolBuilder::new()
    .num_threads(1)
    .thread_name(|_| "axrelay-snapshot".to_string())
    .build()
    .map(Arc::new)
    .map_err(|e| RelayError::Executor(e.to_string()))?;

  let stop_signal = Arc::new(AtomicBool::new(false));
  let in_flight = Arc::new(AtomicBool::new(false));

  let thread = {
    let stop_signal = Arc::clone(&stop_signal);
    let executor = Arc::clone(&executor);
    thread::Builder::new()
      .name("axrelay-ticker".to_string())
      .spawn(move || {
        while !stop_signal.load(Ordering::SeqCst) {
          let tick_start = Instant::now();

          // Skip the tick if the previous poll is still waiting on the host.
          if !in_flight.swap(true, Ordering::SeqCst) {
            let host = Arc::clone(&host);
            let cache = Arc::clone(&cache);
            let stop_signal = Arc::clone(&stop_signal);
            let in_flight = Arc::clone(&in_flight);
            executor.spawn(move || {
              poll_root(host.as_ref(), &cache, &stop_signal);
              in_flight.store(false, Ordering::SeqCst);
            });
          }

          park_until(tick_start.checked_add(interval), &stop_signal);
        }
      })
      .map_err(|e| RelayError::Executor(e.to_string()))?
  };

  Ok(SnapshotPoller {
    stop_signal,
    thread: Some(thread),
    executor,
  })
}

/// Sleep until `deadline`, waking early when stopped.
/// `None` (interval past the end of `Instant`) sleeps until stopped.
fn park_until(deadline: Option<Instant>, stop_signal: &AtomicBool) {
  loop {
    if stop_signal.load(Ordering::SeqCst) {
      return;
    }
    match deadline {
      Some(deadline) => {
        let now = Instant::now();
        if now >= deadline {
          return;
        }
        thread::park_timeout(deadline - now);
      }
      None => thread::park(),
    }
  }
}

/// One poll: query the host and publish on success. Failures keep the previous root.
fn poll_root<H: Host>(host: &H, cache: &RootSnapshotCache<H::Node>, stop_signal: &AtomicBool) {
  if stop_signal.load(Ordering::SeqCst) {
    return;
  }

  let Ok(answer) = panic::catch_unwind(AssertUnwindSafe(|| host.root_in_active_window())) else {
    log::error!("Root query panicked, keeping previous snapshot");
    return;
  };

  match answer {
    Ok(Some(root)) => {
      cache.publish(root);
      log::trace!("Published active window root");
    }
    Ok(None) => {
      log::trace!("No active window root, keeping previous snapshot");
    }
    Err(HostError::NotReady) => {
      log::debug!("Host not ready for root query, retrying next tick");
    }
    Err(e) => {
      log::warn!("Root query failed, keeping previous snapshot: {e}");
    }
  }
}
