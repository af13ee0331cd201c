use std::sync::Arc;

use chrono::Utc;
use cmdr_common::ClientError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Phase, Shared};
use crate::client::{ConnectParams, PresenceAdapter, PresenceTransport};

enum SessionEnd {
    Cancelled,
    Failed(ClientError),
}

/// Connect, serve, and reconnect until cancelled.
pub(super) async fn supervise(shared: Arc<Shared>, params: ConnectParams, cancel: CancellationToken) {
    let base = shared.config.retry_interval;
    let ceiling = shared.config.max_retry_interval.max(base);
    let mut backoff = base;

    loop {
        shared.set_phase(Phase::Connecting);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(backoff) => {}
        }

        let attempt = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = shared.connector.connect(&params) => result,
        };

        let transport = match attempt {
            Ok(transport) => transport,
            Err(e) => {
                debug!(error = %e, retry_ms = backoff.as_millis() as u64, "Presence handshake failed");
                backoff = (backoff * 2).min(ceiling);
                continue;
            }
        };
        backoff = base;

        enter_ready(&shared, transport, &params).await;

        match poll_session(&shared, &cancel).await {
            SessionEnd::Cancelled => return,
            SessionEnd::Failed(e) => {
                warn!(error = %e, "Presence client failed, reconnecting");
                shared.set_phase(Phase::Failed);
                let adapter = shared.inner.lock().await.adapter.take();
                if let Some(adapter) = adapter {
                    adapter.shutdown().await;
                }
            }
        }
    }
}

/// Reseed the record, register the launcher once and push the placeholder.
async fn enter_ready(shared: &Shared, transport: Arc<dyn PresenceTransport>, params: &ConnectParams) {
    let mut inner = shared.inner.lock().await;

    inner
        .record
        .reseed(shared.translator.placeholder(), Utc::now());

    if !inner.launcher_registered {
        if let Err(e) = shared.connector.register_launcher(params) {
            warn!(error = %e, "Failed to register launcher with presence service");
        }
        inner.launcher_registered = true;
    }

    let adapter = PresenceAdapter::new(transport);
    info!(transport = adapter.transport_name(), "Presence client ready");
    inner.adapter = Some(adapter);
    shared.set_phase(Phase::Ready);
    shared.push(&inner);
}

async fn poll_session(shared: &Shared, cancel: &CancellationToken) -> SessionEnd {
    let mut ticker = tokio::time::interval(shared.config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return SessionEnd::Cancelled,
            _ = ticker.tick() => {}
        }

        let mut inner = shared.inner.lock().await;
        let Some(adapter) = inner.adapter.as_mut() else {
            return SessionEnd::Failed(ClientError::NotConnected);
        };
        if let Err(e) = adapter.poll_once() {
            return SessionEnd::Failed(e);
        }
    }
}
