use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::finalize::ports::LeaveLookup;

/// Reads approved leave ranges from the leave module's table.
pub struct SqlLeaveLookup {
    pool: MySqlPool,
}

impl SqlLeaveLookup {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveLookup for SqlLeaveLookup {
    async fn has_approved_leave(&self, employee_id: u64, date: NaiveDate) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leave_requests \
             WHERE employee_id = ? AND status = 'approved' \
               AND start_date <= ? AND end_date >= ?",
        )
        .bind(employee_id)
        .bind(date)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .context("approved leave lookup failed")?;
        Ok(count > 0)
    }
}
