use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::FinalStatus;

use super::state_machine::{SkipReason, Transition};

/// Aggregate counters for one finalization batch. The shape is a stable
/// contract consumed by callers and reporting.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FinalizeStats {
    #[schema(example = 42)]
    pub processed: u32,
    #[schema(example = 3)]
    pub skipped: u32,
    #[schema(example = 30)]
    pub present: u32,
    #[schema(example = 2)]
    pub half_day: u32,
    #[schema(example = 4)]
    pub absent: u32,
    #[schema(example = 2)]
    pub leave: u32,
    #[schema(example = 0)]
    pub pending_correction: u32,
    #[schema(example = 1)]
    pub incomplete: u32,
    #[schema(example = 0)]
    pub errors: u32,
    #[schema(example = 1)]
    pub auto_finalized: u32,
}

impl FinalizeStats {
    /// Folds one employee's transition into the counters.
    pub fn record(&mut self, transition: &Transition) {
        self.processed += 1;
        match transition {
            Transition::Skipped(SkipReason::OnLeave) => self.leave += 1,
            Transition::Skipped(_) => self.skipped += 1,
            Transition::Finalized(status) => match status {
                FinalStatus::Present => self.present += 1,
                FinalStatus::HalfDay => self.half_day += 1,
                FinalStatus::Absent => self.absent += 1,
                FinalStatus::Leave => self.leave += 1,
                FinalStatus::PendingCorrection => self.pending_correction += 1,
                FinalStatus::Incomplete => self.incomplete += 1,
                // Holiday days never reach the per-employee loop; the
                // batch gate short-circuits first.
                FinalStatus::Holiday => {}
            },
        }
    }
}

/// Result of `finalize_day`: either the whole day was gated off (holiday
/// or non-working day) or the batch ran and produced stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum FinalizeOutcome {
    Skipped {
        #[schema(example = true)]
        skipped: bool,
        #[schema(example = "holiday")]
        reason: &'static str,
    },
    Completed(FinalizeStats),
}

impl FinalizeOutcome {
    pub fn skipped(reason: &'static str) -> Self {
        FinalizeOutcome::Skipped {
            skipped: true,
            reason,
        }
    }

    pub fn stats(&self) -> Option<&FinalizeStats> {
        match self {
            FinalizeOutcome::Completed(stats) => Some(stats),
            FinalizeOutcome::Skipped { .. } => None,
        }
    }
}
