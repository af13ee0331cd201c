//! Owner of the presence record and the client connection.
//!
//! All record writes and adapter calls go through one async mutex. A single
//! background task runs the connect, ready, poll, failed cycle until
//! [`Supervisor::stop`] cancels it.

mod run_loop;

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::Utc;
use cmdr_common::{CallId, HostEvent};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{Activity, CallOutcome, ConnectParams, Connector, PresenceAdapter};
use crate::gate::PresenceGate;
use crate::record::PresenceRecord;
use crate::translator::Translator;

/// Connection lifecycle as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connecting,
    Ready,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Disconnected => "disconnected",
            Phase::Connecting => "connecting",
            Phase::Ready => "ready",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub connect: ConnectParams,
    /// Delay before each handshake attempt.
    pub retry_interval: Duration,
    /// Backoff ceiling. Equal to `retry_interval` for a fixed cadence.
    pub max_retry_interval: Duration,
    pub poll_interval: Duration,
    pub large_image: String,
    /// How long `stop` waits for the final clear.
    pub stop_timeout: Duration,
}

pub struct Supervisor {
    shared: Arc<Shared>,
    running: StdMutex<Option<Running>>,
}

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct Shared {
    config: SupervisorConfig,
    connector: Arc<dyn Connector>,
    translator: Translator,
    gate: Arc<dyn PresenceGate>,
    inner: Mutex<Inner>,
    phase: watch::Sender<Phase>,
}

struct Inner {
    record: PresenceRecord,
    adapter: Option<PresenceAdapter>,
    launcher_registered: bool,
}

impl Supervisor {
    pub fn new(
        config: SupervisorConfig,
        connector: Arc<dyn Connector>,
        translator: Translator,
        gate: Arc<dyn PresenceGate>,
    ) -> Self {
        let record = PresenceRecord::new(
            config.large_image.clone(),
            translator.placeholder(),
            Utc::now(),
        );
        Self {
            shared: Arc::new(Shared {
                config,
                connector,
                translator,
                gate,
                inner: Mutex::new(Inner {
                    record,
                    adapter: None,
                    launcher_registered: false,
                }),
                phase: watch::Sender::new(Phase::Disconnected),
            }),
            running: StdMutex::new(None),
        }
    }

    /// Spawn the connection task. A second call while running is a no-op.
    pub fn start(&self, path_hint: Option<PathBuf>) {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if running.is_some() {
            warn!("Presence supervisor already running");
            return;
        }

        let mut params = self.shared.config.connect.clone();
        if path_hint.is_some() {
            params.path_hint = path_hint;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop::supervise(
            Arc::clone(&self.shared),
            params,
            cancel.clone(),
        ));
        *running = Some(Running { cancel, handle });
        info!(client_id = self.shared.config.connect.client_id, "Presence supervisor started");
    }

    /// Translate one host event and push the result if anything changed.
    ///
    /// Never waits on the presence service.
    pub async fn handle_event(&self, event: &HostEvent) -> Option<CallId> {
        let mut inner = self.shared.inner.lock().await;
        let translation = self.shared.translator.translate(&inner.record, event);
        let changed = inner.record.apply(translation, Utc::now());
        debug!(
            event = %event.kind(),
            changed,
            state = %inner.record.state,
            details = %inner.record.details,
            "Journal event translated"
        );

        if changed {
            self.shared.push(&inner)
        } else if inner.record.shutdown {
            self.shared.push_clear(&inner)
        } else {
            None
        }
    }

    /// Re-push after the disabled setting may have changed.
    pub async fn settings_changed(&self) -> Option<CallId> {
        let inner = self.shared.inner.lock().await;
        self.shared.push(&inner)
    }

    /// Stop the connection task, deliver a final clear and disconnect.
    pub async fn stop(&self) {
        let running = self
            .running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(Running { cancel, handle }) = running {
            cancel.cancel();
            if let Err(e) = handle.await {
                warn!(error = %e, "Presence supervisor task ended abnormally");
            }
        }

        let adapter = self.shared.inner.lock().await.adapter.take();
        if let Some(adapter) = adapter {
            match tokio::time::timeout(self.shared.config.stop_timeout, adapter.clear_and_wait())
                .await
            {
                Ok(CallOutcome::Ok) => debug!("Final presence clear delivered"),
                Ok(_) => {}
                Err(_) => warn!(
                    timeout_ms = self.shared.config.stop_timeout.as_millis() as u64,
                    "Final presence clear timed out"
                ),
            }
            adapter.shutdown().await;
        }

        self.shared.set_phase(Phase::Disconnected);
        info!("Presence supervisor stopped");
    }

    pub fn phase(&self) -> Phase {
        *self.shared.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.shared.phase.subscribe()
    }

    /// Copy of the current record.
    pub async fn record(&self) -> PresenceRecord {
        self.shared.inner.lock().await.record.clone()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        let running = self.running.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(running) = running.take() {
            running.cancel.cancel();
        }
    }
}

impl Shared {
    fn set_phase(&self, phase: Phase) {
        let previous = self.phase.send_replace(phase);
        if previous != phase {
            debug!(from = %previous, to = %phase, "Presence phase changed");
        }
    }

    /// Clear when the session is over or presence is disabled, update
    /// otherwise. Deferred until the client is connected.
    fn push(&self, inner: &Inner) -> Option<CallId> {
        let Some(adapter) = inner.adapter.as_ref() else {
            debug!("Presence client not connected, deferring push");
            return None;
        };
        if inner.record.shutdown || self.gate.presence_disabled() {
            Some(adapter.clear())
        } else {
            Some(adapter.update(Activity::from(&inner.record)))
        }
    }

    fn push_clear(&self, inner: &Inner) -> Option<CallId> {
        match inner.adapter.as_ref() {
            Some(adapter) => Some(adapter.clear()),
            None => {
                debug!("Presence client not connected, deferring clear");
                None
            }
        }
    }
}
