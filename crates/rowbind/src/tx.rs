//! Transaction runner: begin → unit of work → commit, rollback on failure.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::warn;

use crate::context::ExecContext;
use crate::errors::{DaoError, DaoResult};

/// SQLite locking behavior for the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxBehavior {
    /// Take locks lazily on first use.
    #[default]
    Deferred,
    /// Take the write lock at BEGIN.
    Immediate,
    /// Exclude other connections entirely.
    Exclusive,
}

impl From<TxBehavior> for TransactionBehavior {
    fn from(behavior: TxBehavior) -> Self {
        match behavior {
            TxBehavior::Deferred => TransactionBehavior::Deferred,
            TxBehavior::Immediate => TransactionBehavior::Immediate,
            TxBehavior::Exclusive => TransactionBehavior::Exclusive,
        }
    }
}

/// Options for [`with_transaction`].
///
/// `read_only` enforces the `query_only` pragma for the duration of the
/// transaction and restores it afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxOptions {
    pub behavior: TxBehavior,
    pub read_only: bool,
}

/// Run `body` inside a transaction.
///
/// Commits when the unit of work succeeds; a commit failure is the
/// operation's failure. When the unit of work fails, a rollback is
/// attempted and the *original* failure propagates; a rollback failure is
/// logged as a secondary diagnostic, never surfaced in its place. A context
/// cancelled before begin surfaces `Cancelled` and no transaction is
/// started; cancellation observed inside the body still rolls back.
pub fn with_transaction<R, F>(
    ctx: &ExecContext,
    conn: &mut Connection,
    opts: TxOptions,
    body: F,
) -> DaoResult<R>
where
    F: FnOnce(&ExecContext, &Transaction<'_>) -> DaoResult<R>,
{
    ctx.ensure_active()?;

    let tx = conn
        .transaction_with_behavior(opts.behavior.into())
        .map_err(|err| DaoError::Begin {
            message: err.to_string(),
        })?;
    if opts.read_only {
        tx.pragma_update(None, "query_only", true)
            .map_err(|err| DaoError::Begin {
                message: format!("enable query_only: {err}"),
            })?;
    }

    let result = match body(ctx, &tx) {
        Ok(value) => tx.commit().map(|()| value).map_err(|err| DaoError::Commit {
            message: err.to_string(),
        }),
        Err(failure) => {
            if let Err(err) = tx.rollback() {
                let secondary = DaoError::Rollback {
                    message: err.to_string(),
                };
                warn!(error = %secondary, "rollback failed after aborted unit of work");
            }
            Err(failure)
        }
    };

    if opts.read_only {
        if let Err(err) = conn.pragma_update(None, "query_only", false) {
            warn!(error = %err, "failed to restore query_only pragma");
        }
    }

    result
}
