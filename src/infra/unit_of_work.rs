//! Unit of Work - one request-scoped database transaction.
//!
//! Repositories created for a request share a single `UnitOfWork`. The
//! transaction is opened lazily by the first write, reads see pending writes
//! once it is open, and `commit` makes them durable. Dropping the unit of work
//! without committing rolls everything back.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tokio::sync::{Mutex, MutexGuard};

use crate::errors::{AppError, AppResult};

pub struct UnitOfWork {
    db: DatabaseConnection,
    txn: Mutex<Option<DatabaseTransaction>>,
}

impl UnitOfWork {
    /// Create a new unit of work over a pooled connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            txn: Mutex::new(None),
        }
    }

    /// Pooled connection used for reads outside a transaction.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Current transaction slot, without opening one.
    pub(crate) async fn current(&self) -> MutexGuard<'_, Option<DatabaseTransaction>> {
        self.txn.lock().await
    }

    /// Transaction slot with a transaction guaranteed to be open.
    pub(crate) async fn writer(&self) -> AppResult<MutexGuard<'_, Option<DatabaseTransaction>>> {
        let mut guard = self.txn.lock().await;
        if guard.is_none() {
            *guard = Some(self.db.begin().await.map_err(AppError::from)?);
            tracing::trace!("Transaction opened");
        }
        Ok(guard)
    }

    /// Commit pending writes. A no-op when nothing was written.
    pub async fn commit(&self) -> AppResult<()> {
        let pending = self.txn.lock().await.take();
        if let Some(txn) = pending {
            txn.commit().await.map_err(AppError::from)?;
            tracing::trace!("Transaction committed");
        }
        Ok(())
    }
}

/// Borrow the open transaction out of a guard returned by [`UnitOfWork::writer`].
pub(crate) fn open_transaction<'a>(
    guard: &'a MutexGuard<'_, Option<DatabaseTransaction>>,
) -> AppResult<&'a DatabaseTransaction> {
    guard
        .as_ref()
        .ok_or_else(|| AppError::internal("Transaction is not open"))
}
