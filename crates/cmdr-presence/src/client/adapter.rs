use std::fmt;
use std::sync::Arc;

use cmdr_common::{CallId, ClientError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{Activity, PresenceTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Update,
    Clear,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Update => f.write_str("update"),
            CallKind::Clear => f.write_str("clear"),
        }
    }
}

/// How an outbound call ended.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    Ok,
    /// The adapter shut down before the call finished.
    Aborted,
    Failed(ClientError),
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub id: CallId,
    pub kind: CallKind,
    pub outcome: CallOutcome,
}

enum Op {
    Update(Activity),
    Clear,
}

impl Op {
    fn kind(&self) -> CallKind {
        match self {
            Op::Update(_) => CallKind::Update,
            Op::Clear => CallKind::Clear,
        }
    }
}

struct Call {
    id: CallId,
    op: Op,
    /// Set for awaited calls; the outcome goes here instead of the
    /// completion channel.
    reply: Option<oneshot::Sender<CallOutcome>>,
}

/// Fire-and-forget wrapper around a [`PresenceTransport`].
///
/// Calls run one at a time on a worker task, in submission order. Their
/// outcomes queue up until [`PresenceAdapter::poll_once`] drains them.
pub struct PresenceAdapter {
    transport: Arc<dyn PresenceTransport>,
    calls: mpsc::UnboundedSender<Call>,
    completions: mpsc::UnboundedReceiver<Completion>,
    cancel: CancellationToken,
    worker: JoinHandle<()>,
}

impl PresenceAdapter {
    /// Wrap `transport`. Must be called inside a tokio runtime.
    pub fn new(transport: Arc<dyn PresenceTransport>) -> Self {
        let (calls_tx, calls_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_calls(
            Arc::clone(&transport),
            calls_rx,
            done_tx,
            cancel.clone(),
        ));

        Self {
            transport,
            calls: calls_tx,
            completions: done_rx,
            cancel,
            worker,
        }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Queue an activity update.
    pub fn update(&self, activity: Activity) -> CallId {
        self.submit(Op::Update(activity), None)
    }

    /// Queue an activity clear.
    pub fn clear(&self) -> CallId {
        self.submit(Op::Clear, None)
    }

    /// Queue a clear behind any pending calls and wait for it to finish.
    pub async fn clear_and_wait(&self) -> CallOutcome {
        let (tx, rx) = oneshot::channel();
        let id = self.submit(Op::Clear, Some(tx));
        let outcome = rx.await.unwrap_or(CallOutcome::Aborted);
        log_outcome(&id, CallKind::Clear, &outcome);
        outcome
    }

    /// Check the channel and drain finished calls.
    ///
    /// Returns how many completions were handled. A dead channel or a
    /// failed call is an error; the adapter should then be replaced.
    pub fn poll_once(&mut self) -> Result<usize, ClientError> {
        self.transport.check_alive()?;

        let mut handled = 0;
        while let Ok(done) = self.completions.try_recv() {
            handled += 1;
            log_outcome(&done.id, done.kind, &done.outcome);
            if let CallOutcome::Failed(e) = done.outcome {
                return Err(ClientError::Callback {
                    call: done.id.to_string(),
                    message: e.to_string(),
                });
            }
        }
        Ok(handled)
    }

    /// Abort queued calls and close the channel.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Err(e) = (&mut self.worker).await {
            warn!(error = %e, "Presence call worker ended abnormally");
        }
        while let Ok(done) = self.completions.try_recv() {
            log_outcome(&done.id, done.kind, &done.outcome);
        }
        self.transport.disconnect().await;
        debug!(transport = self.transport.name(), "Presence adapter shut down");
    }

    fn submit(&self, op: Op, reply: Option<oneshot::Sender<CallOutcome>>) -> CallId {
        let id = CallId::new();
        debug!(call = %id, kind = %op.kind(), "Queueing presence call");
        let call = Call {
            id,
            op,
            reply,
        };
        if let Err(mpsc::error::SendError(call)) = self.calls.send(call) {
            // Worker is gone; report the call as aborted like any other
            // call that lost the race with shutdown.
            if let Some(reply) = call.reply {
                let _ = reply.send(CallOutcome::Aborted);
            }
        }
        id
    }
}

impl Drop for PresenceAdapter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_calls(
    transport: Arc<dyn PresenceTransport>,
    mut calls: mpsc::UnboundedReceiver<Call>,
    done: mpsc::UnboundedSender<Completion>,
    cancel: CancellationToken,
) {
    loop {
        let call = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            call = calls.recv() => match call {
                Some(call) => call,
                None => return,
            },
        };

        let kind = call.op.kind();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => CallOutcome::Aborted,
            result = execute(transport.as_ref(), &call.op) => match result {
                Ok(()) => CallOutcome::Ok,
                Err(e) => CallOutcome::Failed(e),
            },
        };
        deliver(&done, call.id, kind, call.reply, outcome);
    }

    // Anything still queued lost the race with shutdown.
    calls.close();
    while let Ok(call) = calls.try_recv() {
        let kind = call.op.kind();
        deliver(&done, call.id, kind, call.reply, CallOutcome::Aborted);
    }
}

async fn execute(transport: &dyn PresenceTransport, op: &Op) -> Result<(), ClientError> {
    match op {
        Op::Update(activity) => transport.update_activity(activity).await,
        Op::Clear => transport.clear_activity().await,
    }
}

fn deliver(
    done: &mpsc::UnboundedSender<Completion>,
    id: CallId,
    kind: CallKind,
    reply: Option<oneshot::Sender<CallOutcome>>,
    outcome: CallOutcome,
) {
    match reply {
        Some(reply) => {
            let _ = reply.send(outcome);
        }
        None => {
            let _ = done.send(Completion { id, kind, outcome });
        }
    }
}

fn log_outcome(id: &CallId, kind: CallKind, outcome: &CallOutcome) {
    match outcome {
        CallOutcome::Ok => info!(call = %id, %kind, "Successfully set the activity"),
        CallOutcome::Aborted => {
            warn!(call = %id, %kind, "Presence call aborted by client shutdown")
        }
        CallOutcome::Failed(e) => error!(call = %id, %kind, error = %e, "Presence call failed"),
    }
}
