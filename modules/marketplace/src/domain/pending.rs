//! Submission guards and per-view cancellation for the mocked async calls.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::error::DomainError;

/// Views that own an in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    AuthModal,
    JobDetail,
    ProfileEditor,
    CreateJob,
}

/// Set of operations currently in flight. One of each kind at a time.
#[derive(Default)]
pub struct PendingOps {
    busy: Mutex<HashSet<&'static str>>,
}

impl PendingOps {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark `op` as pending, or fail with `Busy` if it already is.
    pub fn try_begin(self: &Arc<Self>, op: &'static str) -> Result<PendingGuard, DomainError> {
        if !self.busy.lock().insert(op) {
            debug!(op, "rejected duplicate submission");
            return Err(DomainError::busy(op));
        }
        Ok(PendingGuard {
            ops: Arc::clone(self),
            op,
        })
    }

    pub fn is_pending(&self, op: &str) -> bool {
        self.busy.lock().contains(op)
    }
}

/// Clears the pending flag on drop, whatever the outcome.
pub struct PendingGuard {
    ops: Arc<PendingOps>,
    op: &'static str,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.ops.busy.lock().remove(self.op);
    }
}

/// Cancellation tokens handed to open views. Dismissing a view cancels its
/// token so a late result is dropped instead of applied.
#[derive(Default)]
pub struct ViewScopes {
    tokens: Mutex<HashMap<ViewKind, CancellationToken>>,
}

impl ViewScopes {
    /// Open (or reopen) a view. Reopening cancels the previous instance.
    pub fn open(&self, kind: ViewKind) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(old) = self.tokens.lock().insert(kind, token.clone()) {
            old.cancel();
        }
        token
    }

    /// Token of the open view, opening it if needed.
    pub fn current(&self, kind: ViewKind) -> CancellationToken {
        self.tokens
            .lock()
            .entry(kind)
            .or_insert_with(CancellationToken::new)
            .clone()
    }

    pub fn dismiss(&self, kind: ViewKind) {
        if let Some(token) = self.tokens.lock().remove(&kind) {
            debug!(view = ?kind, "view dismissed");
            token.cancel();
        }
    }

    pub fn is_open(&self, kind: ViewKind) -> bool {
        self.tokens.lock().contains_key(&kind)
    }
}

/// Artificial network latency that gives up as soon as `cancel` fires.
pub async fn simulated_latency(
    op: &'static str,
    latency: Duration,
    cancel: &CancellationToken,
) -> Result<(), DomainError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DomainError::cancelled(op)),
        _ = tokio::time::sleep(latency) => Ok(()),
    }
}
