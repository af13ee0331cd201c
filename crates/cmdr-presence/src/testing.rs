//! In-memory connector and transport for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use cmdr_common::ClientError;
use tokio::sync::watch;

use crate::client::{Activity, ConnectParams, Connector, PresenceTransport};

pub fn activity(state: &str) -> Activity {
    Activity {
        state: state.into(),
        details: String::new(),
        start: Utc::now(),
        large_image: "elite".into(),
        large_text: String::new(),
        small_image: None,
        small_text: String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    /// Update carrying the activity's state and details.
    Update(String),
    Clear,
}

pub struct MockTransport {
    calls: Mutex<Vec<Recorded>>,
    details: Mutex<Vec<String>>,
    finished: watch::Sender<usize>,
    started: watch::Sender<usize>,
    alive: AtomicBool,
    fail_requests: AtomicBool,
    hold_requests: AtomicBool,
    disconnected: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            details: Mutex::new(Vec::new()),
            finished: watch::Sender::new(0),
            started: watch::Sender::new(0),
            alive: AtomicBool::new(true),
            fail_requests: AtomicBool::new(false),
            hold_requests: AtomicBool::new(false),
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    /// Details lines of every update, in order.
    pub fn details(&self) -> Vec<String> {
        self.details.lock().unwrap().clone()
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }

    pub fn hold_requests(&self, hold: bool) {
        self.hold_requests.store(hold, Ordering::SeqCst);
    }

    pub fn disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` calls have finished.
    pub async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.finished.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    /// Wait until at least `n` calls have reached the transport.
    pub async fn wait_for_started(&self, n: usize) {
        let mut rx = self.started.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    async fn request(&self, call: Recorded, details: Option<String>) -> Result<(), ClientError> {
        self.started.send_modify(|n| *n += 1);
        if self.hold_requests.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.calls.lock().unwrap().push(call);
        if let Some(details) = details {
            self.details.lock().unwrap().push(details);
        }
        self.finished.send_modify(|n| *n += 1);
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(ClientError::Request("rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PresenceTransport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn update_activity(&self, activity: &Activity) -> Result<(), ClientError> {
        self.request(
            Recorded::Update(activity.state.clone()),
            Some(activity.details.clone()),
        )
        .await
    }

    async fn clear_activity(&self) -> Result<(), ClientError> {
        self.request(Recorded::Clear, None).await
    }

    fn check_alive(&self) -> Result<(), ClientError> {
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClientError::Disconnected("mock channel closed".into()))
        }
    }

    async fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

/// Connector whose first `failures` handshakes fail.
pub struct MockConnector {
    failures: AtomicUsize,
    attempts: watch::Sender<usize>,
    registrations: AtomicUsize,
    connections: watch::Sender<usize>,
    transports: Mutex<Vec<Arc<MockTransport>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::failing(0)
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            attempts: watch::Sender::new(0),
            registrations: AtomicUsize::new(0),
            connections: watch::Sender::new(0),
            transports: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.borrow()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn connections(&self) -> usize {
        *self.connections.borrow()
    }

    /// Wait until at least `n` handshakes have succeeded.
    pub async fn wait_for_connections(&self, n: usize) {
        let mut rx = self.connections.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    /// Transport handed out by the most recent successful handshake.
    pub fn latest(&self) -> Option<Arc<MockTransport>> {
        self.transports.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(
        &self,
        _params: &ConnectParams,
    ) -> Result<Arc<dyn PresenceTransport>, ClientError> {
        self.attempts.send_modify(|n| *n += 1);
        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(ClientError::Connect("service not running".into()));
        }
        let transport = Arc::new(MockTransport::new());
        self.transports.lock().unwrap().push(Arc::clone(&transport));
        self.connections.send_modify(|n| *n += 1);
        Ok(transport)
    }

    fn register_launcher(&self, _params: &ConnectParams) -> Result<(), ClientError> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
