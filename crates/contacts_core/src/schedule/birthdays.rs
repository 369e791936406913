//! Upcoming-birthday projection with weekend roll.
//!
//! # Invariants
//! - A birthday is upcoming when its next occurrence is `0..HORIZON_DAYS`
//!   days after `today` (today included, day 7 excluded).
//! - Saturday rolls forward 2 days, Sunday 1 day; weekdays are unchanged.
//! - Feb 29 falls back to Feb 28 in non-leap years.

use crate::model::field::{Birthday, BIRTHDAY_FORMAT};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Length of the look-ahead window in days.
pub const HORIZON_DAYS: i64 = 7;

/// One contact to congratulate and the (weekday) date to do it on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    pub name: String,
    /// Formatted as `DD.MM.YYYY`.
    pub congratulation_date: String,
}

/// Returns the occurrence of `birthday` in `year`.
///
/// Feb 29 is mapped to Feb 28 when `year` is not a leap year.
pub fn occurrence_in_year(birthday: &Birthday, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day()).or_else(|| {
        if birthday.month() == 2 && birthday.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// Returns the first occurrence of `birthday` on or after `today`.
pub fn next_occurrence(birthday: &Birthday, today: NaiveDate) -> Option<NaiveDate> {
    let candidate = occurrence_in_year(birthday, today.year())?;
    if candidate < today {
        return occurrence_in_year(birthday, today.year() + 1);
    }
    Some(candidate)
}

/// Moves Saturday and Sunday to the following Monday.
pub fn roll_weekend_forward(date: NaiveDate) -> NaiveDate {
    let shift = match date.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    date.checked_add_days(Days::new(shift)).unwrap_or(date)
}

/// Computes the congratulation date when `birthday` is inside the window.
///
/// Returns `None` when the next occurrence is `HORIZON_DAYS` or more days away.
pub fn congratulation_date(birthday: &Birthday, today: NaiveDate) -> Option<NaiveDate> {
    let candidate = next_occurrence(birthday, today)?;
    let diff = (candidate - today).num_days();
    if !(0..HORIZON_DAYS).contains(&diff) {
        return None;
    }
    Some(roll_weekend_forward(candidate))
}

/// Collects upcoming birthdays from `(name, birthday)` pairs, keeping input order.
pub fn upcoming_birthdays<'a, I>(entries: I, today: NaiveDate) -> Vec<UpcomingBirthday>
where
    I: IntoIterator<Item = (&'a str, &'a Birthday)>,
{
    entries
        .into_iter()
        .filter_map(|(name, birthday)| {
            congratulation_date(birthday, today).map(|date| UpcomingBirthday {
                name: name.to_string(),
                congratulation_date: date.format(BIRTHDAY_FORMAT).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{congratulation_date, next_occurrence, roll_weekend_forward, upcoming_birthdays};
    use crate::model::field::Birthday;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn birthday(raw: &str) -> Birthday {
        Birthday::parse(raw).unwrap()
    }

    #[test]
    fn weekday_birthday_inside_window_is_unchanged() {
        // 10.06.2024 is a Monday, 15.06.2024 a Saturday, 14.06.2024 a Friday.
        let today = date(2024, 6, 10);
        assert_eq!(
            congratulation_date(&birthday("14.06.1990"), today),
            Some(date(2024, 6, 14))
        );
    }

    #[test]
    fn saturday_moves_to_monday() {
        let today = date(2024, 6, 10);
        assert_eq!(
            congratulation_date(&birthday("15.06.1990"), today),
            Some(date(2024, 6, 17))
        );
    }

    #[test]
    fn sunday_moves_to_monday() {
        let today = date(2024, 6, 10);
        assert_eq!(
            congratulation_date(&birthday("16.06.1990"), today),
            Some(date(2024, 6, 17))
        );
    }

    #[test]
    fn window_includes_today_and_excludes_day_seven() {
        let today = date(2024, 6, 10);
        assert_eq!(
            congratulation_date(&birthday("10.06.2000"), today),
            Some(today)
        );
        assert_eq!(congratulation_date(&birthday("17.06.2000"), today), None);
        assert_eq!(congratulation_date(&birthday("09.06.2000"), today), None);
    }

    #[test]
    fn passed_birthday_wraps_into_next_year() {
        let today = date(2024, 12, 29);
        assert_eq!(
            next_occurrence(&birthday("02.01.1985"), today),
            Some(date(2025, 1, 2))
        );
        assert_eq!(
            congratulation_date(&birthday("02.01.1985"), today),
            Some(date(2025, 1, 2))
        );
    }

    #[test]
    fn leap_day_falls_back_to_feb_28_in_common_years() {
        let today = date(2025, 2, 25);
        assert_eq!(
            next_occurrence(&birthday("29.02.2000"), today),
            Some(date(2025, 2, 28))
        );
        // 28.02.2025 is a Friday.
        assert_eq!(
            congratulation_date(&birthday("29.02.2000"), today),
            Some(date(2025, 2, 28))
        );

        let leap_today = date(2028, 2, 25);
        assert_eq!(
            next_occurrence(&birthday("29.02.2000"), leap_today),
            Some(date(2028, 2, 29))
        );
    }

    #[test]
    fn roll_keeps_weekdays() {
        assert_eq!(roll_weekend_forward(date(2024, 6, 12)), date(2024, 6, 12));
        assert_eq!(roll_weekend_forward(date(2024, 6, 15)), date(2024, 6, 17));
        assert_eq!(roll_weekend_forward(date(2024, 6, 16)), date(2024, 6, 17));
    }

    #[test]
    fn upcoming_keeps_input_order_and_formats_dates() {
        let today = date(2024, 6, 10);
        let anna = birthday("15.06.1990");
        let bob = birthday("11.06.1980");
        let carl = birthday("01.09.1970");
        let result = upcoming_birthdays(
            [("Anna", &anna), ("Bob", &bob), ("Carl", &carl)],
            today,
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Anna");
        assert_eq!(result[0].congratulation_date, "17.06.2024");
        assert_eq!(result[1].name, "Bob");
        assert_eq!(result[1].congratulation_date, "11.06.2024");
    }
}
