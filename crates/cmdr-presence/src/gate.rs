use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Live view of the "presence disabled" setting.
///
/// Read on every push decision. Implementations must not cache.
pub trait PresenceGate: Send + Sync {
    fn presence_disabled(&self) -> bool;
}

impl PresenceGate for AtomicBool {
    fn presence_disabled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl PresenceGate for watch::Receiver<bool> {
    fn presence_disabled(&self) -> bool {
        *self.borrow()
    }
}

/// Gate that never disables presence.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEnabled;

impl PresenceGate for AlwaysEnabled {
    fn presence_disabled(&self) -> bool {
        false
    }
}
