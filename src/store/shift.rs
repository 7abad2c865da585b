use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::warn;

use crate::finalize::ports::ShiftResolver;
use crate::model::shift::{Shift, parse_shift_time};

/// Resolves the active shift assignment for an employee on a date.
/// Shift times are stored as `HH:MM[:SS]` text; a row that fails to
/// parse resolves to "no shift" with a warning rather than poisoning
/// the finalization decision.
pub struct SqlShiftResolver {
    pool: MySqlPool,
}

impl SqlShiftResolver {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShiftRow {
    id: u64,
    name: String,
    start_time: String,
    end_time: String,
    full_day_hours: f64,
    half_day_hours: f64,
    grace_period_minutes: i64,
}

#[async_trait]
impl ShiftResolver for SqlShiftResolver {
    async fn resolve_shift(&self, employee_id: u64, date: NaiveDate) -> Result<Option<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(
            "SELECT s.id, s.name, s.start_time, s.end_time, s.full_day_hours, \
                    s.half_day_hours, s.grace_period_minutes \
             FROM employee_shift_assignments a \
             JOIN shifts s ON s.id = a.shift_id \
             WHERE a.employee_id = ? AND a.is_active = 1 \
               AND a.effective_date <= ? \
               AND (a.end_date IS NULL OR a.end_date >= ?) \
             ORDER BY a.effective_date DESC",
        )
        .bind(employee_id)
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .context("shift assignment lookup failed")?;

        if rows.len() > 1 {
            // At most one assignment should cover a date; the
            // most-recently-effective one wins, but the configuration
            // needs fixing.
            warn!(
                employee_id,
                %date,
                matches = rows.len(),
                "overlapping active shift assignments"
            );
        }

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let (Some(start_time), Some(end_time)) =
            (parse_shift_time(&row.start_time), parse_shift_time(&row.end_time))
        else {
            warn!(
                employee_id,
                shift_id = row.id,
                start = %row.start_time,
                end = %row.end_time,
                "shift has unparseable times, treating as unassigned"
            );
            return Ok(None);
        };

        Ok(Some(Shift {
            id: row.id,
            name: row.name,
            start_time,
            end_time,
            full_day_hours: row.full_day_hours,
            half_day_hours: row.half_day_hours,
            grace_period_minutes: row.grace_period_minutes,
        }))
    }
}
