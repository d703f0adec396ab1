//! Next-occurrence arithmetic for repeating tasks.

use time::{Date, Duration, Month};

use crate::state::Recurrence;
use crate::task::Timestamp;

/// Compute the due timestamp of the next instance of a repeating task.
///
/// `Monthly` keeps the day of month, clamped to the last day of the target month.
/// Time of day is preserved. Returns `None` for [`Recurrence::None`] and when the
/// result falls outside the supported calendar range.
#[must_use]
pub fn next_due(current: Timestamp, period: Recurrence) -> Option<Timestamp> {
    match period {
        Recurrence::None => None,
        Recurrence::Daily => current.checked_add(Duration::days(1)),
        Recurrence::Weekly => current.checked_add(Duration::weeks(1)),
        Recurrence::Monthly => {
            let date = current.date();
            let (year, month) = match date.month() {
                Month::December => (date.year().checked_add(1)?, Month::January),
                other => (date.year(), other.next()),
            };
            let day = date.day().min(days_in_month(year, month));
            let next = Date::from_calendar_date(year, month, day).ok()?;
            Some(current.replace_date(next))
        }
    }
}

/// Gregorian leap-year rule.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`.
#[must_use]
pub const fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
    }
}
