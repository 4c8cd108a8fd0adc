use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Constraint, EmprendeError};

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, EmprendeError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EmprendeError::invalid(
                "month",
                Constraint::OutOfRange {
                    min: Decimal::ONE,
                    max: Decimal::from(12),
                },
            ));
        }
        Ok(MonthKey { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // validated in the constructors
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Days of this month that have started by `today`: 0 before the
    /// month, the full month length after it.
    pub fn days_elapsed(&self, today: NaiveDate) -> u32 {
        if today < self.first_day() {
            0
        } else if today > self.last_day() {
            self.days_in_month()
        } else {
            today.day()
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = EmprendeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || {
            EmprendeError::invalid(
                "month",
                Constraint::Unparseable { raw: s.to_string() },
            )
        };
        let (y, m) = s.trim().split_once('-').ok_or_else(unparseable)?;
        let year: i32 = y.parse().map_err(|_| unparseable())?;
        let month: u32 = m.parse().map_err(|_| unparseable())?;
        MonthKey::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = EmprendeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
