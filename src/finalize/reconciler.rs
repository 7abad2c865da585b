//! Missed clock-out pre-pass. Anyone who clocked in and walked out
//! without clocking out gets a synthetic clock-out at the shift's
//! scheduled end once end-of-shift plus buffer has passed, so payroll
//! hours stay deterministic instead of depending on when the job ran.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use tracing::{debug, error, info};

use crate::model::attendance::AttendanceRecord;

use super::orchestrator::FinalizeEngine;
use super::ports::NoticeKind;
use super::state_machine::{REASON_AUTO_CLOCK_OUT, apply_completion};

impl FinalizeEngine {
    /// Closes every eligible open clock-in for `date`. Runs before the
    /// per-employee pass of the same invocation, because a record it
    /// closes changes which rules apply to that employee later on.
    /// Returns how many records were auto-finalized.
    pub async fn reconcile_open_clock_ins(&self, date: NaiveDate) -> Result<u32> {
        let open = self.records.find_open_clock_ins(date).await?;
        let mut auto_finalized = 0u32;

        for record in open {
            let employee_id = record.employee_id;
            match self.try_auto_clock_out(record).await {
                Ok(true) => auto_finalized += 1,
                Ok(false) => {}
                // One broken record must not starve the rest of the
                // batch; the per-employee pass will count the error.
                Err(e) => error!(employee_id, %date, error = %e, "auto clock-out failed"),
            }
        }

        if auto_finalized > 0 {
            info!(%date, auto_finalized, "auto-finalized open clock-ins");
        }
        Ok(auto_finalized)
    }

    async fn try_auto_clock_out(&self, mut record: AttendanceRecord) -> Result<bool> {
        let Some(clock_in) = record.clock_in else {
            return Ok(false);
        };
        if record.status.is_sealed() || record.clock_out.is_some() {
            return Ok(false);
        }

        let Some(shift) = self
            .shifts
            .resolve_shift(record.employee_id, record.date)
            .await?
        else {
            debug!(
                employee_id = record.employee_id,
                date = %record.date,
                "open clock-in has no shift assignment, leaving as is"
            );
            return Ok(false);
        };

        // Shift end is anchored to the clock-in day so an overnight
        // shift rolls to the next calendar day.
        let shift_end = shift.end_datetime(clock_in.date());
        let threshold = shift_end + Duration::minutes(self.buffer_minutes);
        if self.clock.now() < threshold {
            return Ok(false);
        }

        // The scheduled end, never the current wall clock.
        record.close_open_break(shift_end);
        record.clock_out = Some(shift_end);
        record.status_reason = Some(REASON_AUTO_CLOCK_OUT.to_owned());
        let status = apply_completion(&mut record, &shift, clock_in, shift_end);
        self.records.save(&record).await?;

        info!(
            employee_id = record.employee_id,
            date = %record.date,
            clock_out = %shift_end,
            %status,
            "auto clock-out applied"
        );
        self.dispatch_notice(
            record.employee_id,
            record.date,
            REASON_AUTO_CLOCK_OUT,
            NoticeKind::AutoClockedOut,
        )
        .await;
        Ok(true)
    }
}
