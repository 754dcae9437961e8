//! Date parsing and age arithmetic.

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    Format(String),
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| DateError::Format(input.to_string()))
}

/// A calendar distance between two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Age {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

/// Age of someone born on `birth`, as of today's local date.
pub fn age(birth: NaiveDate) -> Age {
    age_on(birth, Local::now().date_naive())
}

/// Age of someone born on `birth`, as of `today`.
///
/// Whole months are counted first, the remainder in days. When the anchor
/// day does not exist in a month it is clamped to the month's last day
/// (born Jan 31 -> one month old on Feb 28/29). A birth date after `today`
/// gives a negative age.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Age {
    if birth > today {
        let age = age_on(today, birth);
        return Age {
            years: -age.years,
            months: -age.months,
            days: -age.days,
        };
    }

    let mut months = (today.year() - birth.year()) * 12 + today.month() as i32
        - birth.month() as i32;
    let mut anchor = add_months(birth, months);
    if anchor > today {
        months -= 1;
        anchor = add_months(birth, months);
    }

    Age {
        years: months / 12,
        months: months % 12,
        days: (today - anchor).num_days() as i32,
    }
}

fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    date.checked_add_months(Months::new(months.max(0) as u32))
        .unwrap_or(NaiveDate::MAX)
}
