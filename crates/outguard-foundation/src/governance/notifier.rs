//! Governance step notifiers

use outguard_kernel::governance::{GovernanceNotifier, GovernanceStep};
use tokio::sync::broadcast;
use tracing::debug;

/// Discards every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl GovernanceNotifier for NoopNotifier {
    fn notify(&self, _step: &GovernanceStep) {}
}

/// Logs every step at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl GovernanceNotifier for TracingNotifier {
    fn notify(&self, step: &GovernanceStep) {
        debug!(invocation_id = %step.invocation_id(), ?step, "governance step");
    }
}

/// Fans steps out to any number of subscribers, e.g. websocket sessions of
/// an admin view.
///
/// Sending never blocks. Steps are dropped when nobody is subscribed, and
/// slow subscribers observe `RecvError::Lagged` instead of slowing
/// governance down.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<GovernanceStep>,
}

impl BroadcastNotifier {
    /// Create a notifier buffering up to `capacity` steps per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GovernanceStep> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl GovernanceNotifier for BroadcastNotifier {
    fn notify(&self, step: &GovernanceStep) {
        // Err only means there are no subscribers right now
        let _ = self.tx.send(step.clone());
    }
}
