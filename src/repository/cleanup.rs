use anyhow::Context;
use sqlx::PgPool;

use crate::domain::{CleanupReport, DUPLICATE_RULES, DuplicateRule};
use crate::repository::PgTransaction;

// Arbitrary but fixed; every instance of the service must agree on it.
const CLEANUP_LOCK_KEY: i64 = 0x6475_7073_7765_6570;

/// Runs every duplicate rule inside one transaction.
///
/// Either all four deletions are committed or, on the first error, the transaction
/// is dropped and PostgreSQL rolls every one of them back. A transaction scoped
/// advisory lock serializes concurrent runs and is released on commit or rollback.
#[tracing::instrument(skip_all, fields(total_deleted = tracing::field::Empty))]
pub async fn remove_all_duplicates(pool: &PgPool) -> Result<CleanupReport, anyhow::Error> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    acquire_cleanup_lock(&mut transaction).await?;

    let mut report = CleanupReport::default();
    for rule in DUPLICATE_RULES {
        let deleted = remove_duplicates(&mut transaction, &rule).await?;
        report.record(rule.table, deleted);
    }

    transaction
        .commit()
        .await
        .context("Failed to commit duplicate cleanup transaction")?;

    tracing::Span::current().record("total_deleted", report.total());
    tracing::info!(?report, "Duplicate cleanup completed");
    Ok(report)
}

#[tracing::instrument(skip(transaction), fields(table = %rule.table))]
pub async fn remove_duplicates(
    transaction: &mut PgTransaction,
    rule: &DuplicateRule,
) -> Result<u64, anyhow::Error> {
    let deleted = sqlx::query(&rule.delete_statement())
        .execute(&mut **transaction)
        .await
        .with_context(|| format!("Failed to remove duplicate rows from {}", rule.table))?
        .rows_affected();

    tracing::info!(deleted, "Duplicate rows removed");
    Ok(deleted)
}

async fn acquire_cleanup_lock(transaction: &mut PgTransaction) -> Result<(), anyhow::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(CLEANUP_LOCK_KEY)
        .execute(&mut **transaction)
        .await
        .context("Failed to acquire duplicate cleanup advisory lock")?;
    Ok(())
}
