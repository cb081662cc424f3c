//! Signature approval gate
//!
//! The wallet parks each signature request here and waits for the UI thread
//! to answer via a oneshot. Unanswered requests (channel dropped) count as
//! rejections.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::oneshot;

#[derive(Debug, Default)]
pub struct ApprovalGate {
    pending: Mutex<HashMap<u64, oneshot::Sender<bool>>>,
    counter: AtomicU64,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new approval request. The caller awaits the receiver.
    pub fn begin(&self) -> (u64, oneshot::Receiver<bool>) {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("approval gate lock poisoned")
            .insert(id, tx);
        (id, rx)
    }

    /// Answer an outstanding request. Unknown ids are ignored (the prompt may
    /// have been abandoned by a disconnect).
    pub fn resolve(&self, id: u64, approved: bool) {
        let sender = self
            .pending
            .lock()
            .expect("approval gate lock poisoned")
            .remove(&id);
        if let Some(sender) = sender {
            let _ = sender.send(approved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn approval_round_trip() {
        let gate = ApprovalGate::new();
        let (id, rx) = gate.begin();
        gate.resolve(id, true);
        assert_eq!(rx.await, Ok(true));
    }

    #[tokio::test]
    async fn dropped_prompt_reads_as_rejection() {
        let gate = ApprovalGate::new();
        let (_, rx) = gate.begin();
        drop(gate);
        assert!(!rx.await.unwrap_or(false));
    }

    #[test]
    fn resolving_unknown_id_is_a_no_op() {
        let gate = ApprovalGate::new();
        gate.resolve(99, true);
    }
}
