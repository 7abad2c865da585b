//! Batch driver: gates the calendar day, runs the missed clock-out
//! pre-pass, then walks every active employee through the state machine
//! with per-employee failure isolation.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use super::clock::Clock;
use super::ports::{
    AttendanceRecordStore, CalendarRules, EmployeeDirectory, LeaveLookup, NoticeKind, Notifier,
    ShiftResolver,
};
use super::state_machine::Transition;
use super::stats::{FinalizeOutcome, FinalizeStats};

/// The attendance finalization engine. All collaborators are injected;
/// the engine owns no connections and spawns no tasks of its own, so a
/// scheduled run, a manual trigger and a test run are the same code path.
pub struct FinalizeEngine {
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) calendar: Arc<dyn CalendarRules>,
    pub(crate) leaves: Arc<dyn LeaveLookup>,
    pub(crate) employees: Arc<dyn EmployeeDirectory>,
    pub(crate) records: Arc<dyn AttendanceRecordStore>,
    pub(crate) shifts: Arc<dyn ShiftResolver>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) buffer_minutes: i64,
}

impl FinalizeEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: Arc<dyn Clock>,
        calendar: Arc<dyn CalendarRules>,
        leaves: Arc<dyn LeaveLookup>,
        employees: Arc<dyn EmployeeDirectory>,
        records: Arc<dyn AttendanceRecordStore>,
        shifts: Arc<dyn ShiftResolver>,
        notifier: Arc<dyn Notifier>,
        buffer_minutes: i64,
    ) -> Self {
        Self {
            clock,
            calendar,
            leaves,
            employees,
            records,
            shifts,
            notifier,
            buffer_minutes,
        }
    }

    /// Current local calendar date as the engine sees it.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Finalizes the current local calendar day. This is what the
    /// recurring scheduler calls.
    pub async fn finalize_day_today(&self) -> Result<FinalizeOutcome> {
        self.finalize_day(self.clock.today()).await
    }

    /// Runs one full finalization batch for `date`. Re-entrant: records
    /// already in a non-incomplete final state are skipped, so repeated
    /// and overlapping invocations converge instead of double-writing.
    pub async fn finalize_day(&self, date: NaiveDate) -> Result<FinalizeOutcome> {
        // Calendar gates. A failure here aborts the batch: guessing
        // whether today is a holiday would corrupt every decision below.
        if self
            .calendar
            .is_holiday(date)
            .await
            .context("holiday lookup failed")?
        {
            info!(%date, "holiday, finalization skipped");
            return Ok(FinalizeOutcome::skipped("holiday"));
        }
        if !self
            .calendar
            .is_working_day(date)
            .await
            .context("working-day lookup failed")?
        {
            info!(%date, "non-working day, finalization skipped");
            return Ok(FinalizeOutcome::skipped("weekend"));
        }

        let mut stats = FinalizeStats::default();

        match self.reconcile_open_clock_ins(date).await {
            Ok(n) => stats.auto_finalized = n,
            Err(e) => {
                error!(%date, error = %e, "missed clock-out pass failed, continuing with batch");
                stats.errors += 1;
            }
        }

        let employees = self
            .employees
            .list_active_employees()
            .await
            .context("active employee enumeration failed")?;

        for employee in &employees {
            match self.finalize_one(employee.id, date).await {
                Ok(transition) => {
                    debug!(employee_id = employee.id, %date, %transition, "employee pass done");
                    stats.record(&transition);
                }
                Err(e) => {
                    // One employee's failure never aborts the batch.
                    error!(employee_id = employee.id, %date, error = %e, "employee finalization failed");
                    stats.errors += 1;
                }
            }
        }

        if stats.errors > 0 {
            warn!(%date, errors = stats.errors, "finalization finished with errors");
        }
        info!(
            %date,
            processed = stats.processed,
            present = stats.present,
            half_day = stats.half_day,
            absent = stats.absent,
            incomplete = stats.incomplete,
            auto_finalized = stats.auto_finalized,
            skipped = stats.skipped,
            "finalization batch complete"
        );
        Ok(FinalizeOutcome::Completed(stats))
    }

    /// Single-employee finalization used by administrative correction
    /// flows. Applies the same calendar gates as the batch.
    pub async fn finalize_employee(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Transition> {
        if self.calendar.is_holiday(date).await? || !self.calendar.is_working_day(date).await? {
            info!(employee_id, %date, "non-working date, nothing to finalize");
            return Ok(Transition::Skipped(super::state_machine::SkipReason::NonWorkingDay));
        }
        self.finalize_one(employee_id, date).await
    }

    /// Notification dispatch is failure-tolerant: a delivery problem is
    /// logged and the attendance transition stands.
    pub(crate) async fn dispatch_notice(
        &self,
        employee_id: u64,
        date: NaiveDate,
        reason: &str,
        kind: NoticeKind,
    ) {
        if let Err(e) = self.notifier.notify(employee_id, date, reason, kind).await {
            warn!(employee_id, %date, %kind, error = %e, "notification dispatch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finalize::state_machine::REASON_NO_CLOCK_IN;
    use crate::finalize::testutil::*;
    use crate::model::attendance::{AttendanceStatus, FinalStatus, LiveStatus};

    #[tokio::test]
    async fn absent_employee_gets_an_absence_record() {
        let env = TestEnv::new(dt(5, 18, 0));
        let outcome = env.engine.finalize_day(d(5)).await.unwrap();

        let stats = outcome.stats().unwrap();
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.processed, 1);

        let record = env.records.get(EMP, d(5)).unwrap();
        assert_eq!(record.status, AttendanceStatus::Final(FinalStatus::Absent));
        assert_eq!(record.status_reason.as_deref(), Some(REASON_NO_CLOCK_IN));
    }

    #[tokio::test]
    async fn open_clock_in_is_closed_in_a_single_run() {
        let env = TestEnv::new(dt(5, 17, 45));
        let mut record = record_for(EMP, d(5), LiveStatus::InProgress);
        record.clock_in = Some(dt(5, 9, 10));
        env.records.insert(record);

        let outcome = env.engine.finalize_day(d(5)).await.unwrap();
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.auto_finalized, 1);
        assert_eq!(stats.incomplete, 0);

        let after = env.records.get(EMP, d(5)).unwrap();
        assert_eq!(after.clock_out, Some(dt(5, 17, 0)));
        assert_ne!(after.status, AttendanceStatus::Final(FinalStatus::Incomplete));
    }

    #[tokio::test]
    async fn leave_covered_employee_is_never_marked_absent() {
        let env = TestEnv::new(dt(5, 18, 0));
        env.leaves.approve(EMP, d(4), d(6));

        let outcome = env.engine.finalize_day(d(5)).await.unwrap();
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.leave, 1);
        assert_eq!(stats.absent, 0);
        assert!(env.records.get(EMP, d(5)).is_none());
    }

    #[tokio::test]
    async fn holiday_short_circuits_without_touching_records() {
        let env = TestEnv::new(dt(5, 18, 0));
        env.calendar.add_holiday(d(5));
        let mut record = record_for(EMP, d(5), LiveStatus::InProgress);
        record.clock_in = Some(dt(5, 9, 0));
        env.records.insert(record);

        let outcome = env.engine.finalize_day(d(5)).await.unwrap();
        assert_eq!(outcome, FinalizeOutcome::skipped("holiday"));

        let after = env.records.get(EMP, d(5)).unwrap();
        assert_eq!(after.status, AttendanceStatus::Live(LiveStatus::InProgress));
        assert!(after.clock_out.is_none());
    }

    #[tokio::test]
    async fn weekend_short_circuits() {
        // 2026-01-04 is a Sunday.
        let env = TestEnv::new(dt(4, 18, 0));
        let outcome = env.engine.finalize_day(d(4)).await.unwrap();
        assert_eq!(outcome, FinalizeOutcome::skipped("weekend"));
        assert!(env.records.get(EMP, d(4)).is_none());
    }

    #[tokio::test]
    async fn second_run_is_a_no_op_for_finalized_records() {
        let env = TestEnv::new(dt(5, 18, 0));
        let mut record = record_for(EMP, d(5), LiveStatus::Completed);
        record.clock_in = Some(dt(5, 9, 0));
        record.clock_out = Some(dt(5, 17, 0));
        env.records.insert(record);

        let first = env.engine.finalize_day(d(5)).await.unwrap();
        assert_eq!(first.stats().unwrap().present, 1);
        let snapshot = env.records.get(EMP, d(5)).unwrap();

        let second = env.engine.finalize_day(d(5)).await.unwrap();
        let stats = second.stats().unwrap();
        assert_eq!(stats.present, 0);
        assert_eq!(stats.skipped, 1);

        let after = env.records.get(EMP, d(5)).unwrap();
        assert_eq!(after.status, snapshot.status);
        assert_eq!(after.work_hours, snapshot.work_hours);
        assert_eq!(after.status_reason, snapshot.status_reason);
    }

    #[tokio::test]
    async fn one_broken_employee_does_not_abort_the_batch() {
        let env = TestEnv::new(dt(5, 18, 0));
        env.employees.add(employee(2));
        env.shifts.assign(2, day_shift());
        env.records.poison(EMP);

        let outcome = env.engine.finalize_day(d(5)).await.unwrap();
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.errors, 1);
        // The healthy employee was still finalized.
        assert_eq!(stats.absent, 1);
        assert!(env.records.get(2, d(5)).is_some());
    }

    #[tokio::test]
    async fn notification_failure_does_not_roll_back_the_transition() {
        let env = TestEnv::new(dt(5, 18, 0));
        env.notifier.fail_next();

        let outcome = env.engine.finalize_day(d(5)).await.unwrap();
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.errors, 0);
        assert!(env.records.get(EMP, d(5)).is_some());
    }

    #[tokio::test]
    async fn finalize_employee_targets_one_record() {
        let env = TestEnv::new(dt(5, 18, 0));
        env.employees.add(employee(2));
        env.shifts.assign(2, day_shift());

        let t = env.engine.finalize_employee(EMP, d(5)).await.unwrap();
        assert_eq!(t, Transition::Finalized(FinalStatus::Absent));
        assert!(env.records.get(EMP, d(5)).is_some());
        assert!(env.records.get(2, d(5)).is_none());
    }

    #[tokio::test]
    async fn finalize_day_today_uses_the_injected_clock() {
        let env = TestEnv::new(dt(5, 18, 0));
        let outcome = env.engine.finalize_day_today().await.unwrap();
        assert_eq!(outcome.stats().unwrap().absent, 1);
        assert!(env.records.get(EMP, d(5)).is_some());
    }

    #[tokio::test]
    async fn stats_add_up_across_a_mixed_batch() {
        let env = TestEnv::new(dt(5, 18, 0));
        // EMP: no record -> absent. 2: full day -> present. 3: on leave.
        // 4: open clock-in, auto-finalized. 5: no shift -> skipped.
        for id in 2..=5 {
            env.employees.add(employee(id));
        }
        env.shifts.assign(2, day_shift());
        env.shifts.assign(4, day_shift());

        let mut full_day = record_for(2, d(5), LiveStatus::Completed);
        full_day.clock_in = Some(dt(5, 9, 0));
        full_day.clock_out = Some(dt(5, 17, 0));
        env.records.insert(full_day);

        env.leaves.approve(3, d(5), d(5));
        env.shifts.assign(3, day_shift());

        let mut open = record_for(4, d(5), LiveStatus::InProgress);
        open.clock_in = Some(dt(5, 9, 0));
        env.records.insert(open);

        let outcome = env.engine.finalize_day(d(5)).await.unwrap();
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.auto_finalized, 1);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.present, 1);
        assert_eq!(stats.leave, 1);
        // Employee 4 was sealed by the pre-pass, 5 has no shift.
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.processed, 5);
        assert_eq!(stats.errors, 0);
    }
}
