/*!
Service lifecycle: `Disconnected -> Connected -> Disconnected`.

Only the host glue drives transitions. Connecting starts the snapshot poller
and opens the readiness gate; disconnecting stops the poller, clears the
snapshot and applies the configured [`ReadinessPolicy`].

Transitions are serialized by the `transition` lock: the session swap, the
readiness change and the snapshot clear of one transition never interleave
with another's.
*/

use std::sync::Arc;
use std::time::Duration;

use super::{Relay, Session};
use crate::config::ReadinessPolicy;
use crate::host::{EnablementProbe, Host};
use crate::polling;
use crate::types::{RelayError, RelayEvent, RelayResult, ServiceState};

impl<H: Host> Relay<H> {
  /// Host callback: the service is connected.
  ///
  /// Fails with [`RelayError::AlreadyConnected`] if another host is live; the
  /// existing connection is left untouched.
  pub fn on_connect(&self, host: Arc<H>) -> RelayResult<()> {
    let _transition = self.transition.lock();
    {
      let mut session = self.session.lock();
      if session.is_some() {
        log::warn!("on_connect while already connected, ignoring");
        return Err(RelayError::AlreadyConnected);
      }

      let poller = polling::start_polling(
        Arc::clone(&host),
        Arc::clone(&self.snapshot),
        self.snapshot_interval(),
      )?;
      *session = Some(Session { host, poller });
    }

    self.readiness.signal_ready();
    self.emit(RelayEvent::Connected);
    log::debug!(
      "Relay connected (snapshot interval {}ms)",
      self.config.snapshot_interval_ms
    );
    Ok(())
  }

  /// Host callback: the service is going away.
  ///
  /// Once this returns no further root queries are made and
  /// [`Relay::current_instance`] is empty.
  pub fn on_disconnect(&self) -> RelayResult<()> {
    let _transition = self.transition.lock();
    let Some(mut session) = self.session.lock().take() else {
      log::warn!("on_disconnect while not connected, ignoring");
      return Err(RelayError::NotConnected);
    };

    if self.config.readiness_policy == ReadinessPolicy::ResetOnDisconnect {
      self.readiness.reset();
    }

    // Join outside the session lock; the transition lock still excludes a reconnect.
    session.poller.stop();
    drop(session);
    self.snapshot.clear();

    self.emit(RelayEvent::Disconnected);
    log::debug!("Relay disconnected");
    Ok(())
  }

  /// Ask the host to deactivate the service.
  ///
  /// Fails without side effects when not connected or when the host version
  /// cannot self-disable. On success the host later calls [`Relay::on_disconnect`].
  pub fn request_disable(&self) -> RelayResult<()> {
    let host = self.current_instance().ok_or(RelayError::NotConnected)?;
    if !host.supports_self_disable() {
      return Err(RelayError::NotSupported(
        "host version cannot disable the service".into(),
      ));
    }

    host.disable_self();
    self.emit(RelayEvent::DisableRequested);
    log::debug!("Requested host to disable the relay");
    Ok(())
  }

  /// Whether the relay is enabled for the application, according to `probe`.
  /// Needs no relay instance or connection.
  pub fn is_enabled(probe: &dyn EnablementProbe) -> bool {
    probe.is_relay_enabled()
  }

  /// The connected host, or `None` while disconnected.
  pub fn current_instance(&self) -> Option<Arc<H>> {
    self.session.lock().as_ref().map(|s| Arc::clone(&s.host))
  }

  /// Current lifecycle state.
  pub fn state(&self) -> ServiceState {
    if self.session.lock().is_some() {
      ServiceState::Connected
    } else {
      ServiceState::Disconnected
    }
  }

  /// Block until the relay is connected or `timeout` elapses. Returns whether it is ready.
  pub fn wait_ready(&self, timeout: Duration) -> bool {
    self.readiness.wait_ready(timeout)
  }

  /// Non-blocking readiness probe.
  pub fn is_ready(&self) -> bool {
    self.readiness.is_ready()
  }
}
