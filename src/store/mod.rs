//! MySQL implementations of the engine's collaborator interfaces.

pub mod attendance;
pub mod calendar;
pub mod employee;
pub mod leave;
pub mod notifier;
pub mod shift;

pub use attendance::SqlAttendanceStore;
pub use calendar::SqlCalendarRules;
pub use employee::SqlEmployeeDirectory;
pub use leave::SqlLeaveLookup;
pub use notifier::OutboxNotifier;
pub use shift::SqlShiftResolver;
