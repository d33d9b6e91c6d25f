//! Genealogical dates and calendar conversion.
//!
//! A [`GeneaDate`] may be partial (month or day `0`), qualified
//! ("before", "about", ...), or text-only. Extraction converts every event
//! date to the configured report calendar first; a date that cannot be
//! converted is treated as unknown and the event is skipped.
//!
//! Conversion goes through Julian Day Numbers. Gregorian day numbers come
//! from `chrono`; the Julian calendar is computed directly.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Offset between chrono's "days from CE" and the Julian Day Number.
const JDN_CE_OFFSET: i64 = 1_721_425;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calendar {
    #[default]
    Gregorian,
    Julian,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateModifier {
    #[default]
    None,
    Before,
    After,
    About,
    /// Free text that could not be parsed into a date.
    TextOnly,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("text-only date cannot be converted: {0:?}")]
    TextOnly(String),

    #[error("month {0} is out of range")]
    InvalidMonth(u8),

    #[error("day {day} is out of range for {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },

    #[error("date {year}-{month:02}-{day:02} has no representation in the target calendar")]
    Unrepresentable { year: i32, month: u8, day: u8 },
}

/// A possibly partial date in a given calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneaDate {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u8,
    #[serde(default)]
    pub day: u8,
    #[serde(default)]
    pub calendar: Calendar,
    #[serde(default)]
    pub modifier: DateModifier,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl GeneaDate {
    pub fn ymd(year: i32, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            ..Self::default()
        }
    }

    pub fn year(year: i32) -> Self {
        Self::ymd(year, 0, 0)
    }

    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            modifier: DateModifier::TextOnly,
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_modifier(mut self, modifier: DateModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// True when no part of the date is known.
    pub fn is_empty(&self) -> bool {
        self.modifier != DateModifier::TextOnly
            && self.year == 0
            && self.month == 0
            && self.day == 0
    }

    fn is_complete(&self) -> bool {
        self.year != 0 && self.month != 0 && self.day != 0
    }

    fn validate(&self) -> Result<(), DateError> {
        if self.modifier == DateModifier::TextOnly {
            return Err(DateError::TextOnly(self.text.clone()));
        }
        if self.month > 12 {
            return Err(DateError::InvalidMonth(self.month));
        }
        let invalid_day = DateError::InvalidDay {
            year: self.year,
            month: self.month,
            day: self.day,
        };
        if self.day > 0 && self.month == 0 {
            return Err(invalid_day);
        }
        if self.day > 0 && self.day > days_in_month(self.calendar, self.year, self.month) {
            return Err(invalid_day);
        }
        Ok(())
    }

    /// Convert to `target`.
    ///
    /// Partial dates keep their zero fields and are only relabelled; complete
    /// dates are converted day-accurately.
    pub fn to_calendar(&self, target: Calendar) -> Result<GeneaDate, DateError> {
        self.validate()?;
        if self.calendar == target || !self.is_complete() {
            return Ok(self.clone().with_calendar(target));
        }
        let unrepresentable = DateError::Unrepresentable {
            year: self.year,
            month: self.month,
            day: self.day,
        };
        let jdn = to_jdn(self.calendar, self.year, self.month, self.day)
            .ok_or_else(|| unrepresentable.clone())?;
        let (year, month, day) = from_jdn(target, jdn).ok_or(unrepresentable)?;
        Ok(GeneaDate {
            year,
            month,
            day,
            calendar: target,
            modifier: self.modifier,
            text: self.text.clone(),
        })
    }

    pub fn year_key(&self) -> YearKey {
        YearKey {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }
}

/// Human-readable rendering: `1850-03-12`, `about 1850`, or the raw text.
/// Empty dates render as an empty string.
impl fmt::Display for GeneaDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier == DateModifier::TextOnly {
            return f.write_str(&self.text);
        }
        if self.is_empty() {
            return Ok(());
        }
        match self.modifier {
            DateModifier::Before => f.write_str("before ")?,
            DateModifier::After => f.write_str("after ")?,
            DateModifier::About => f.write_str("about ")?,
            DateModifier::None | DateModifier::TextOnly => {}
        }
        write!(f, "{:04}", self.year)?;
        if self.month > 0 {
            write!(f, "-{:02}", self.month)?;
            if self.day > 0 {
                write!(f, "-{:02}", self.day)?;
            }
        }
        if self.calendar == Calendar::Julian {
            f.write_str(" (Julian)")?;
        }
        Ok(())
    }
}

/// Sortable chronological key of a mark.
///
/// Renders as zero-padded `YYYYMMDD`; the first four characters are the
/// year label. An all-zero key means the date is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearKey {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl YearKey {
    pub const UNKNOWN: YearKey = YearKey {
        year: 0,
        month: 0,
        day: 0,
    };

    pub fn from_year(year: i32) -> Self {
        Self {
            year,
            month: 0,
            day: 0,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }

    /// Four-character year label (`"0000"` when unknown).
    pub fn year_label(&self) -> String {
        format!("{:04}", self.year)
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for YearKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn is_leap(calendar: Calendar, year: i32) -> bool {
    match calendar {
        Calendar::Julian => year.rem_euclid(4) == 0,
        Calendar::Gregorian => {
            (year.rem_euclid(4) == 0 && year.rem_euclid(100) != 0) || year.rem_euclid(400) == 0
        }
    }
}

fn days_in_month(calendar: Calendar, year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(calendar, year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn to_jdn(calendar: Calendar, year: i32, month: u8, day: u8) -> Option<i64> {
    match calendar {
        Calendar::Gregorian => {
            let date = NaiveDate::from_ymd_opt(year, month as u32, day as u32)?;
            Some(date.num_days_from_ce() as i64 + JDN_CE_OFFSET)
        }
        Calendar::Julian => {
            let a = (14 - month as i64) / 12;
            let y = year as i64 + 4800 - a;
            let m = month as i64 + 12 * a - 3;
            let jdn = day as i64 + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - 32083;
            Some(jdn)
        }
    }
}

fn from_jdn(calendar: Calendar, jdn: i64) -> Option<(i32, u8, u8)> {
    match calendar {
        Calendar::Gregorian => {
            let days = i32::try_from(jdn - JDN_CE_OFFSET).ok()?;
            let date = NaiveDate::from_num_days_from_ce_opt(days)?;
            Some((date.year(), date.month() as u8, date.day() as u8))
        }
        Calendar::Julian => {
            let c = jdn + 32082;
            let d = (4 * c + 3).div_euclid(1461);
            let e = c - (1461 * d).div_euclid(4);
            let m = (5 * e + 2) / 153;
            let day = e - (153 * m + 2) / 5 + 1;
            let month = m + 3 - 12 * (m / 10);
            let year = d - 4800 + m / 10;
            Some((i32::try_from(year).ok()?, month as u8, day as u8))
        }
    }
}
