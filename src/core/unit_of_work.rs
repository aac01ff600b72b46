//! Unit of work - runs a group of database operations atomically.
//!
//! The closure receives the open transaction. Returning `Ok` commits, returning
//! `Err` (or panicking) rolls everything back, so multi-step mutations never leave
//! partial state behind.

use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by a unit-of-work closure.
pub type WorkFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'c>>;

/// Executes `work` inside a single database transaction.
///
/// Database failures while beginning or committing surface as
/// [`Error::Database`]; errors returned by `work` are passed through unchanged.
pub async fn run<F, T>(db: &DatabaseConnection, work: F) -> Result<T>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> WorkFuture<'c, T> + Send,
    T: Send,
{
    db.transaction::<F, T, Error>(work)
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => Error::Database(db_err),
            TransactionError::Transaction(err) => err,
        })
}
