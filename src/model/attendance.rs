use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::ParseError;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Transient statuses set by the real-time clock endpoints while a shift
/// is running. The finalization engine reads these but never writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LiveStatus {
    InProgress,
    OnBreak,
    Completed,
}

/// Authoritative day outcomes. Written only by the finalization engine
/// (or an explicit admin correction). `Incomplete` is the one final
/// status a later finalization pass may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Present,
    HalfDay,
    Absent,
    Leave,
    Holiday,
    PendingCorrection,
    Incomplete,
}

impl FinalStatus {
    /// True for every final status the engine must never touch again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FinalStatus::Incomplete)
    }
}

/// Two-tier attendance status. Keeping live and final statuses in
/// disjoint variants means "accidentally overwrote a finalized day"
/// fails to typecheck instead of failing in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Live(LiveStatus),
    Final(FinalStatus),
}

impl AttendanceStatus {
    /// A status the engine is forbidden to overwrite (final states other
    /// than `incomplete` never regress).
    pub fn is_sealed(&self) -> bool {
        matches!(self, AttendanceStatus::Final(f) if f.is_terminal())
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Live(s) => s.fmt(f),
            AttendanceStatus::Final(s) => s.fmt(f),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(live) = LiveStatus::from_str(s) {
            return Ok(AttendanceStatus::Live(live));
        }
        FinalStatus::from_str(s).map(AttendanceStatus::Final)
    }
}

impl Serialize for AttendanceStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AttendanceStatus::from_str(&s)
            .map_err(|_| serde::de::Error::custom(format!("unknown attendance status `{s}`")))
    }
}

/// One break taken during the day. `break_out` stays `None` while the
/// break is still running.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BreakSession {
    #[schema(example = "2026-01-05T13:00:00", value_type = String, format = "date-time")]
    pub break_in: NaiveDateTime,
    #[schema(example = "2026-01-05T13:30:00", value_type = String, format = "date-time", nullable = true)]
    pub break_out: Option<NaiveDateTime>,
    #[schema(example = 30)]
    pub duration_minutes: i64,
}

/// Per-employee per-day attendance record. `date` is the employee's
/// local calendar date, never derived from a UTC round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "in_progress", value_type = String)]
    pub status: AttendanceStatus,
    #[schema(example = "2026-01-05T09:05:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_in: Option<NaiveDateTime>,
    #[schema(example = "2026-01-05T17:00:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<NaiveDateTime>,
    pub break_sessions: Vec<BreakSession>,
    #[schema(example = 7.5)]
    pub work_hours: f64,
    #[schema(example = 5)]
    pub late_minutes: i64,
    #[schema(example = 0)]
    pub early_exit_minutes: i64,
    #[schema(example = 0)]
    pub overtime_minutes: i64,
    #[schema(example = "No clock-in recorded", nullable = true)]
    pub status_reason: Option<String>,
    pub correction_requested: bool,
}

impl AttendanceRecord {
    /// Fresh record in the given status with no clock activity.
    pub fn new(employee_id: u64, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            id: 0,
            employee_id,
            date,
            status,
            clock_in: None,
            clock_out: None,
            break_sessions: Vec::new(),
            work_hours: 0.0,
            late_minutes: 0,
            early_exit_minutes: 0,
            overtime_minutes: 0,
            status_reason: None,
            correction_requested: false,
        }
    }

    /// A clock-in without a matching clock-out.
    pub fn has_open_clock_in(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }

    /// Total minutes spent on closed break sessions.
    pub fn break_minutes(&self) -> i64 {
        self.break_sessions
            .iter()
            .filter(|b| b.break_out.is_some())
            .map(|b| b.duration_minutes.max(0))
            .sum()
    }

    pub fn open_break_mut(&mut self) -> Option<&mut BreakSession> {
        self.break_sessions.iter_mut().find(|b| b.break_out.is_none())
    }

    /// Closes a still-running break at `at`, recomputing its duration.
    /// Used by the live break-end endpoint and by the missed clock-out
    /// reconciler when it synthesizes a clock-out.
    pub fn close_open_break(&mut self, at: NaiveDateTime) {
        if let Some(open) = self.open_break_mut() {
            let minutes = (at - open.break_in).num_minutes().max(0);
            open.break_out = Some(at);
            open.duration_minutes = minutes;
        }
    }
}
