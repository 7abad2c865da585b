//! Attendance finalization engine: the scheduled reconciliation job that
//! turns transient in-shift activity into the authoritative daily record.

pub mod clock;
pub mod guard;
pub mod orchestrator;
pub mod ports;
pub mod reconciler;
pub mod scheduler;
pub mod state_machine;
pub mod stats;

#[cfg(test)]
pub(crate) mod testutil;

pub use orchestrator::FinalizeEngine;
pub use scheduler::{FinalizeScheduler, SchedulerHandle};
pub use stats::{FinalizeOutcome, FinalizeStats};
