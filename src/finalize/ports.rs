//! Collaborator interfaces the finalization engine consumes. Production
//! implementations live in `crate::store`; tests swap in in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use strum_macros::{Display, EnumString};

use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::model::shift::Shift;

#[async_trait]
pub trait CalendarRules: Send + Sync {
    async fn is_holiday(&self, date: NaiveDate) -> Result<bool>;
    async fn is_working_day(&self, date: NaiveDate) -> Result<bool>;
}

#[async_trait]
pub trait LeaveLookup: Send + Sync {
    /// True when some approved leave covers `date` for the employee.
    async fn has_approved_leave(&self, employee_id: u64, date: NaiveDate) -> Result<bool>;
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn list_active_employees(&self) -> Result<Vec<Employee>>;
}

#[async_trait]
pub trait AttendanceRecordStore: Send + Sync {
    async fn find(&self, employee_id: u64, date: NaiveDate) -> Result<Option<AttendanceRecord>>;

    /// Records for `date` holding a clock-in with no clock-out that are
    /// still overwritable (a live status or `incomplete`).
    async fn find_open_clock_ins(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>>;

    async fn create(&self, record: AttendanceRecord) -> Result<AttendanceRecord>;
    async fn save(&self, record: &AttendanceRecord) -> Result<()>;
}

#[async_trait]
pub trait ShiftResolver: Send + Sync {
    /// The shift covering (employee, date), or `None` when no active
    /// assignment covers the date.
    async fn resolve_shift(&self, employee_id: u64, date: NaiveDate) -> Result<Option<Shift>>;
}

/// Category of notice sent to an employee when the engine decides a day
/// without their involvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum NoticeKind {
    MarkedAbsent,
    MissingClockOut,
    AutoClockedOut,
}

/// Fire-and-forget notification delivery. Errors are surfaced so the
/// call site can log them, but they never roll back an attendance
/// transition and never abort the batch.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        employee_id: u64,
        date: NaiveDate,
        reason: &str,
        kind: NoticeKind,
    ) -> Result<()>;
}
