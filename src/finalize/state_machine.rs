//! The per-employee decision core: given the day's record (or its
//! absence), the resolved shift, leave status and the shift-end guard,
//! compute the authoritative final status and write it exactly once.

use std::fmt;

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::model::attendance::{AttendanceRecord, AttendanceStatus, FinalStatus};
use crate::model::shift::Shift;

use super::guard;
use super::orchestrator::FinalizeEngine;
use super::ports::NoticeKind;

pub const REASON_NO_CLOCK_IN: &str = "No clock-in recorded";
pub const REASON_MISSING_CLOCK_OUT: &str = "Missing clock-out, correction available";
pub const REASON_CLOCK_OUT_ONLY: &str = "Invalid record: clock-out without clock-in";
pub const REASON_AUTO_CLOCK_OUT: &str = "Auto clock-out at scheduled shift end";
pub const REASON_UNDER_THRESHOLD: &str = "Worked hours below half-day threshold";

/// Why an employee's day was left untouched by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoShift,
    ShiftActive,
    AlreadyFinalized,
    OnLeave,
    NonWorkingDay,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::NoShift => "no shift",
            SkipReason::ShiftActive => "shift active",
            SkipReason::AlreadyFinalized => "already finalized",
            SkipReason::OnLeave => "on leave",
            SkipReason::NonWorkingDay => "non-working day",
        };
        f.write_str(s)
    }
}

/// Outcome of one employee-day pass through the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Skipped(SkipReason),
    Finalized(FinalStatus),
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Skipped(reason) => write!(f, "skipped: {reason}"),
            Transition::Finalized(status) => write!(f, "finalized: {status}"),
        }
    }
}

impl FinalizeEngine {
    /// Runs the decision table for one (employee, date). First match
    /// wins; a sealed record is never touched again.
    pub async fn finalize_one(&self, employee_id: u64, date: NaiveDate) -> Result<Transition> {
        let Some(shift) = self.shifts.resolve_shift(employee_id, date).await? else {
            debug!(employee_id, %date, "no shift assignment covers date, skipping");
            return Ok(Transition::Skipped(SkipReason::NoShift));
        };

        let end = shift.end_datetime(date);
        if !guard::has_shift_ended(
            self.clock.as_ref(),
            end.time(),
            end.date(),
            self.buffer_minutes,
        ) {
            return Ok(Transition::Skipped(SkipReason::ShiftActive));
        }

        match self.records.find(employee_id, date).await? {
            None => {
                if self.leaves.has_approved_leave(employee_id, date).await? {
                    // Leave bookkeeping belongs to the leave module; the
                    // engine just refuses to mark the employee absent.
                    return Ok(Transition::Skipped(SkipReason::OnLeave));
                }
                let mut record = AttendanceRecord::new(
                    employee_id,
                    date,
                    AttendanceStatus::Final(FinalStatus::Absent),
                );
                record.status_reason = Some(REASON_NO_CLOCK_IN.to_owned());
                self.records.create(record).await?;
                self.dispatch_notice(employee_id, date, REASON_NO_CLOCK_IN, NoticeKind::MarkedAbsent)
                    .await;
                Ok(Transition::Finalized(FinalStatus::Absent))
            }
            Some(record) if record.status.is_sealed() => {
                Ok(Transition::Skipped(SkipReason::AlreadyFinalized))
            }
            Some(record) => self.finalize_existing(record, &shift).await,
        }
    }

    async fn finalize_existing(
        &self,
        mut record: AttendanceRecord,
        shift: &Shift,
    ) -> Result<Transition> {
        let employee_id = record.employee_id;
        let date = record.date;

        match (record.clock_in, record.clock_out) {
            (Some(_), None) => {
                record.status = AttendanceStatus::Final(FinalStatus::Incomplete);
                record.status_reason = Some(REASON_MISSING_CLOCK_OUT.to_owned());
                self.records.save(&record).await?;
                self.dispatch_notice(
                    employee_id,
                    date,
                    REASON_MISSING_CLOCK_OUT,
                    NoticeKind::MissingClockOut,
                )
                .await;
                Ok(Transition::Finalized(FinalStatus::Incomplete))
            }
            (None, Some(clock_out)) => {
                // Clock-out with no clock-in cannot come from the live
                // endpoints; something upstream corrupted the record.
                warn!(employee_id, %date, %clock_out, "clock-out without clock-in");
                record.status = AttendanceStatus::Final(FinalStatus::Absent);
                record.status_reason = Some(REASON_CLOCK_OUT_ONLY.to_owned());
                record.clock_out = None;
                self.records.save(&record).await?;
                Ok(Transition::Finalized(FinalStatus::Absent))
            }
            (Some(clock_in), Some(clock_out)) => {
                let status = apply_completion(&mut record, shift, clock_in, clock_out);
                self.records.save(&record).await?;
                Ok(Transition::Finalized(status))
            }
            (None, None) => {
                // Live record with zero clock activity; same outcome as
                // no record at all.
                record.status = AttendanceStatus::Final(FinalStatus::Absent);
                record.status_reason = Some(REASON_NO_CLOCK_IN.to_owned());
                self.records.save(&record).await?;
                self.dispatch_notice(employee_id, date, REASON_NO_CLOCK_IN, NoticeKind::MarkedAbsent)
                    .await;
                Ok(Transition::Finalized(FinalStatus::Absent))
            }
        }
    }
}

/// Completion arm of the decision table: both clock marks exist, so the
/// derived metrics are recomputed here as the authoritative values
/// (finalization is the last writer) and the present/half-day call is
/// made against the shift's hour thresholds.
pub(crate) fn apply_completion(
    record: &mut AttendanceRecord,
    shift: &Shift,
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
) -> FinalStatus {
    // Anchor the shift window to the day the employee clocked in, so an
    // overnight shift measures against its own end on the next day.
    let anchor = clock_in.date();
    let shift_start = shift.start_datetime(anchor);
    let shift_end = shift.end_datetime(anchor);

    let gross_minutes = (clock_out - clock_in).num_minutes();
    let net_minutes = (gross_minutes - record.break_minutes()).max(0);
    record.work_hours = net_minutes as f64 / 60.0;

    let grace_deadline = shift_start + Duration::minutes(shift.grace_period_minutes);
    record.late_minutes = if clock_in > grace_deadline {
        (clock_in - shift_start).num_minutes()
    } else {
        0
    };
    record.early_exit_minutes = (shift_end - clock_out).num_minutes().max(0);
    record.overtime_minutes = (clock_out - shift_end).num_minutes().max(0);

    let status = if record.work_hours >= shift.full_day_hours {
        FinalStatus::Present
    } else if record.work_hours >= shift.half_day_hours {
        FinalStatus::HalfDay
    } else {
        FinalStatus::Absent
    };
    if status == FinalStatus::Absent {
        record.status_reason = Some(REASON_UNDER_THRESHOLD.to_owned());
    }
    record.status = AttendanceStatus::Final(status);
    status
}
