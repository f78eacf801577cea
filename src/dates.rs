use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A viewed month. `month0` is zero-based (January = 0), matching the grid's
/// navigation arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month0: u32,
}

impl Period {
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(Self { year, month0 })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// Moves by `delta` months, wrapping across year boundaries.
    pub fn shift(self, delta: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month0) + i64::from(delta);
        Self {
            year: total.div_euclid(12) as i32,
            month0: total.rem_euclid(12) as u32,
        }
    }

    pub fn days(self) -> u32 {
        days_in_month(self.month0, self.year)
    }

    pub fn date(self, day: u32) -> Option<NaiveDate> {
        date_for(self.year, self.month0, day)
    }

    /// Every calendar date of the month, in order.
    pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
        (1..=self.days()).filter_map(move |day| self.date(day))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }
}

/// Number of days in the month. A `month0` past December rolls into the
/// following years.
pub fn days_in_month(month0: u32, year: i32) -> u32 {
    let next = i64::from(year) * 12 + i64::from(month0) + 1;
    let next_year = next.div_euclid(12) as i32;
    let next_month = next.rem_euclid(12) as u32 + 1;

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(0, |last| last.day())
}

pub fn date_for(year: i32, month0: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0.checked_add(1)?, day)
}

/// Canonical `YYYY-MM-DD` form used for every log key.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn month_name(month0: u32) -> String {
    date_for(2026, month0 % 12, 1)
        .map(|date| date.format("%B").to_string())
        .unwrap_or_default()
}

pub fn day_abbreviation(day: u32, month0: u32, year: i32) -> String {
    date_for(year, month0, day)
        .map(|date| date.format("%a").to_string())
        .unwrap_or_default()
}
