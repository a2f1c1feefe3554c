//! Cancellable execution context.
//!
//! Every suspension point (query, exec, transaction begin/commit) checks the
//! context before touching the database. Cancelling also fires
//! `sqlite3_interrupt` on every tracked connection so statements already
//! running on another thread abort instead of completing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, InterruptHandle};

use crate::errors::{DaoError, DaoResult};

/// Shared cancellation token for database operations.
///
/// Cheap to clone; all clones observe the same cancelled state. A fresh
/// (or `Default`) context is active and never expires on its own.
#[derive(Clone, Default)]
pub struct ExecContext {
    inner: Arc<ContextInner>,
}

#[derive(Default)]
struct ContextInner {
    cancelled: AtomicBool,
    interrupts: Mutex<Vec<InterruptHandle>>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the context cancelled and interrupt statements in flight on
    /// every tracked connection. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let handles = self
            .inner
            .interrupts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for handle in handles.iter() {
            handle.interrupt();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Track a connection so `cancel` can interrupt its in-flight
    /// statements. A connection opened after cancellation is interrupted
    /// immediately.
    pub fn track(&self, conn: &Connection) {
        let handle = conn.get_interrupt_handle();
        if self.is_cancelled() {
            handle.interrupt();
        }
        let mut handles = self
            .inner
            .interrupts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        handles.push(handle);
    }

    /// Gate for suspension points: `Cancelled` once `cancel` has been
    /// observed, `Ok` otherwise.
    pub fn ensure_active(&self) -> DaoResult<()> {
        if self.is_cancelled() {
            return Err(DaoError::Cancelled);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_active() {
        let ctx = ExecContext::new();
        assert!(!ctx.is_cancelled());
        assert!(ctx.ensure_active().is_ok());
    }

    #[test]
    fn cancel_is_observed_by_clones() {
        let ctx = ExecContext::new();
        let clone = ctx.clone();
        ctx.cancel();
        assert!(clone.is_cancelled());
        assert!(matches!(clone.ensure_active(), Err(DaoError::Cancelled)));
    }
}
