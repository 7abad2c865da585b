use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use sqlx::MySqlPool;

use crate::finalize::ports::CalendarRules;

/// Holiday table plus a fixed Saturday/Sunday weekend rule.
pub struct SqlCalendarRules {
    pool: MySqlPool,
}

impl SqlCalendarRules {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarRules for SqlCalendarRules {
    async fn is_holiday(&self, date: NaiveDate) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM holidays WHERE date = ?")
            .bind(date)
            .fetch_one(&self.pool)
            .await
            .context("holiday lookup failed")?;
        Ok(count > 0)
    }

    async fn is_working_day(&self, date: NaiveDate) -> Result<bool> {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Ok(false);
        }
        Ok(!self.is_holiday(date).await?)
    }
}
