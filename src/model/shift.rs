use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An employee's scheduled daily working window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "General")]
    pub name: String,
    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    #[schema(example = 8.0)]
    pub full_day_hours: f64,
    #[schema(example = 4.0)]
    pub half_day_hours: f64,
    #[schema(example = 15)]
    pub grace_period_minutes: i64,
}

impl Shift {
    /// An overnight shift ends numerically at-or-before it starts
    /// (e.g. 22:00 → 06:00).
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Shift start as a concrete datetime on `date`.
    pub fn start_datetime(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start_time)
    }

    /// Shift end as a concrete datetime for a shift that *started* on
    /// `date`. Overnight shifts roll over to the next calendar day.
    pub fn end_datetime(&self, date: NaiveDate) -> NaiveDateTime {
        let end_date = if self.is_overnight() {
            date.checked_add_days(Days::new(1)).unwrap_or(date)
        } else {
            date
        };
        end_date.and_time(self.end_time)
    }
}

/// Maps an employee onto a shift for a date range; `end_date = None`
/// means open-ended.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShiftAssignment {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub effective_date: NaiveDate,
    #[schema(example = "2026-06-30", value_type = String, format = "date", nullable = true)]
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl ShiftAssignment {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.is_active
            && self.effective_date <= date
            && self.end_date.map_or(true, |end| date <= end)
    }
}

/// Lenient `HH:MM` / `HH:MM:SS` parser for shift times stored as text.
/// Returns `None` on garbage so a misconfigured shift is skipped with a
/// warning upstream instead of producing a wrong absence decision.
pub fn parse_shift_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(start: &str, end: &str) -> Shift {
        Shift {
            id: 1,
            name: "test".into(),
            start_time: parse_shift_time(start).unwrap(),
            end_time: parse_shift_time(end).unwrap(),
            full_day_hours: 8.0,
            half_day_hours: 4.0,
            grace_period_minutes: 15,
        }
    }

    #[test]
    fn day_shift_ends_same_day() {
        let s = shift("09:00", "17:00");
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(!s.is_overnight());
        assert_eq!(s.end_datetime(d), d.and_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn overnight_shift_ends_next_day() {
        let s = shift("22:00", "06:00");
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(s.is_overnight());
        let next = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        assert_eq!(s.end_datetime(d), next.and_hms_opt(6, 0, 0).unwrap());
    }

    #[test]
    fn assignment_coverage_bounds() {
        let a = ShiftAssignment {
            id: 1,
            employee_id: 1,
            shift_id: 1,
            effective_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()),
            is_active: true,
        };
        assert!(a.covers(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(a.covers(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!a.covers(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
        assert!(!a.covers(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));

        let open_ended = ShiftAssignment { end_date: None, ..a.clone() };
        assert!(open_ended.covers(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));

        let inactive = ShiftAssignment { is_active: false, ..a };
        assert!(!inactive.covers(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
    }

    #[test]
    fn parse_shift_time_rejects_garbage() {
        assert_eq!(
            parse_shift_time("17:00"),
            Some(NaiveTime::from_hms_opt(17, 0, 0).unwrap())
        );
        assert_eq!(
            parse_shift_time(" 06:30:00 "),
            Some(NaiveTime::from_hms_opt(6, 30, 0).unwrap())
        );
        assert_eq!(parse_shift_time("25:00"), None);
        assert_eq!(parse_shift_time("end of day"), None);
        assert_eq!(parse_shift_time(""), None);
    }
}
