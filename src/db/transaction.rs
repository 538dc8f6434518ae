/*!
 * Transaction Helper Utilities
 *
 * Runs a unit of work inside one database transaction: commit when the
 * closure returns `Ok`, roll back when it returns `Err`.
 */

use futures::future::BoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use tracing::{debug, warn};
use uuid::Uuid;

/// Execute a closure within a database transaction
///
/// Errors raised while opening or committing the transaction are converted
/// with `E::from(DbErr)`; errors returned by the closure pass through as-is.
///
/// # Example
///
/// ```rust,ignore
/// use crate::db::transaction::transaction_scope;
///
/// let report = transaction_scope(&db, move |txn| {
///     Box::pin(async move { seed_all(txn, &fixtures).await })
/// })
/// .await?;
/// ```
pub async fn transaction_scope<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, E>> + Send,
    T: Send,
    E: std::error::Error + From<DbErr> + Send,
{
    let transaction_id = Uuid::new_v4();
    let start = std::time::Instant::now();
    debug!(transaction_id = %transaction_id, "Starting database transaction");

    let result = db.transaction(f).await;

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => {
            debug!(transaction_id = %transaction_id, "Transaction committed in {:?}", elapsed);
        }
        Err(_) => {
            warn!(transaction_id = %transaction_id, "Transaction rolled back after {:?}", elapsed);
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => E::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}
