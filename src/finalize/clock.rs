use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of "now" in the employee's local timezone. Injected everywhere
/// the engine reasons about wall-clock time so tests can pin the clock
/// instead of sleeping or touching the system time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Local calendar date. Deliberately not derived from UTC.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Production clock backed by `chrono::Local`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to a settable instant, for tests and backfill dry-runs.
pub struct FixedClock {
    now: std::sync::Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}
