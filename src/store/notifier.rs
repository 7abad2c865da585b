use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::finalize::ports::{NoticeKind, Notifier};

/// Queues notices into an outbox table; the mail worker drains it
/// out-of-process. `INSERT IGNORE` against the unique
/// (employee_id, date, kind) key keeps overlapping finalization runs
/// from producing duplicate notices.
pub struct OutboxNotifier {
    pool: MySqlPool,
}

impl OutboxNotifier {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn notify(
        &self,
        employee_id: u64,
        date: NaiveDate,
        reason: &str,
        kind: NoticeKind,
    ) -> Result<()> {
        sqlx::query(
            "INSERT IGNORE INTO attendance_notifications (employee_id, date, kind, reason) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(employee_id)
        .bind(date)
        .bind(kind.to_string())
        .bind(reason)
        .execute(&self.pool)
        .await
        .context("notification enqueue failed")?;
        Ok(())
    }
}
