use chrono::{Duration, NaiveDate, NaiveTime};

use super::clock::Clock;

/// Whether a shift that ends at `end_time` on `end_date` is over, with
/// `buffer_minutes` of grace added before the engine is allowed to make
/// a final call for the day.
///
/// `end_date` must already be the day-boundary-correct date of the shift
/// end: for an overnight shift the caller passes the rolled-over day
/// (see `Shift::end_datetime`), this predicate does no rollover itself.
pub fn has_shift_ended(
    clock: &dyn Clock,
    end_time: NaiveTime,
    end_date: NaiveDate,
    buffer_minutes: i64,
) -> bool {
    let today = clock.today();
    if today > end_date {
        // The day is unambiguously over.
        return true;
    }
    if today < end_date {
        return false;
    }
    clock.now() >= end_date.and_time(end_time) + Duration::minutes(buffer_minutes)
}
