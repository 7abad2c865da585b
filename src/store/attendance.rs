use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;

use crate::finalize::ports::AttendanceRecordStore;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, BreakSession};

/// MySQL-backed record store. Break sessions live in a JSON text column;
/// status is the snake_case string form of the status sum type.
pub struct SqlAttendanceStore {
    pool: MySqlPool,
}

impl SqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    date: NaiveDate,
    status: String,
    clock_in: Option<NaiveDateTime>,
    clock_out: Option<NaiveDateTime>,
    break_sessions: Option<String>,
    work_hours: f64,
    late_minutes: i64,
    early_exit_minutes: i64,
    overtime_minutes: i64,
    status_reason: Option<String>,
    correction_requested: bool,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = anyhow::Error;

    fn try_from(row: AttendanceRow) -> Result<Self> {
        let status = AttendanceStatus::from_str(&row.status)
            .with_context(|| format!("record {} has unknown status `{}`", row.id, row.status))?;
        let break_sessions: Vec<BreakSession> = match row.break_sessions.as_deref() {
            None | Some("") => Vec::new(),
            Some(json) => serde_json::from_str(json)
                .with_context(|| format!("record {} has malformed break sessions", row.id))?,
        };
        Ok(AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            status,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            break_sessions,
            work_hours: row.work_hours,
            late_minutes: row.late_minutes,
            early_exit_minutes: row.early_exit_minutes,
            overtime_minutes: row.overtime_minutes,
            status_reason: row.status_reason,
            correction_requested: row.correction_requested,
        })
    }
}

const COLUMNS: &str = "id, employee_id, date, status, clock_in, clock_out, break_sessions, \
     work_hours, late_minutes, early_exit_minutes, overtime_minutes, status_reason, \
     correction_requested";

#[async_trait]
impl AttendanceRecordStore for SqlAttendanceStore {
    async fn find(&self, employee_id: u64, date: NaiveDate) -> Result<Option<AttendanceRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .context("attendance lookup failed")?;
        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn find_open_clock_ins(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM attendance \
             WHERE date = ? AND clock_in IS NOT NULL AND clock_out IS NULL \
             AND status IN ('in_progress', 'on_break', 'incomplete')"
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .context("open clock-in query failed")?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match AttendanceRecord::try_from(row) {
                Ok(record) => records.push(record),
                // A single corrupted row must not block the whole pass.
                Err(e) => tracing::warn!(error = %e, "skipping unreadable attendance row"),
            }
        }
        Ok(records)
    }

    async fn create(&self, record: AttendanceRecord) -> Result<AttendanceRecord> {
        let breaks = serde_json::to_string(&record.break_sessions)?;
        let result = sqlx::query(
            "INSERT INTO attendance \
             (employee_id, date, status, clock_in, clock_out, break_sessions, work_hours, \
              late_minutes, early_exit_minutes, overtime_minutes, status_reason, \
              correction_requested) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.employee_id)
        .bind(record.date)
        .bind(record.status.to_string())
        .bind(record.clock_in)
        .bind(record.clock_out)
        .bind(&breaks)
        .bind(record.work_hours)
        .bind(record.late_minutes)
        .bind(record.early_exit_minutes)
        .bind(record.overtime_minutes)
        .bind(&record.status_reason)
        .bind(record.correction_requested)
        .execute(&self.pool)
        .await
        .context("attendance insert failed")?;

        let mut record = record;
        record.id = result.last_insert_id();
        Ok(record)
    }

    async fn save(&self, record: &AttendanceRecord) -> Result<()> {
        let breaks = serde_json::to_string(&record.break_sessions)?;
        sqlx::query(
            "UPDATE attendance SET status = ?, clock_in = ?, clock_out = ?, \
             break_sessions = ?, work_hours = ?, late_minutes = ?, early_exit_minutes = ?, \
             overtime_minutes = ?, status_reason = ?, correction_requested = ? \
             WHERE id = ?",
        )
        .bind(record.status.to_string())
        .bind(record.clock_in)
        .bind(record.clock_out)
        .bind(&breaks)
        .bind(record.work_hours)
        .bind(record.late_minutes)
        .bind(record.early_exit_minutes)
        .bind(record.overtime_minutes)
        .bind(&record.status_reason)
        .bind(record.correction_requested)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .context("attendance update failed")?;
        Ok(())
    }
}
