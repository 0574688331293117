//! Billing period model.
//!
//! A [`BillingPeriod`] names the calendar month a billing run generates
//! items for. It is one third of the idempotency key
//! (client, service, period) that prevents duplicate generation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BillingError, BillingResult};

/// A calendar month used as the billing window for generated items.
///
/// Serialized as the string `"YYYY-MM"` in JSON and YAML.
///
/// # Example
///
/// ```
/// use billing_engine::models::BillingPeriod;
/// use chrono::NaiveDate;
///
/// let period: BillingPeriod = "2024-03".parse().unwrap();
/// assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
/// assert_eq!(period.to_string(), "2024-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillingPeriod {
    // First day of the month; keeps all date arithmetic on NaiveDate.
    first: NaiveDate,
}

impl BillingPeriod {
    /// Creates a period for the given year and month.
    ///
    /// Years outside 1900..=9999 and months outside 1..=12 are rejected
    /// with [`BillingError::InvalidBillingPeriod`].
    pub fn new(year: i32, month: u32) -> BillingResult<Self> {
        if !(1900..=9999).contains(&year) {
            return Err(BillingError::InvalidBillingPeriod {
                value: format!("{year:04}-{month:02}"),
            });
        }
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(first) => Ok(Self { first }),
            None => Err(BillingError::InvalidBillingPeriod {
                value: format!("{year:04}-{month:02}"),
            }),
        }
    }

    /// The period containing the given date.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The first day of the period.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// The last day of the period.
    pub fn last_day(&self) -> NaiveDate {
        // Cannot overflow for the year range enforced in `new`.
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.first)
    }

    /// The year component.
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// The month component (1-12).
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Returns true if the date falls within the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    /// The period immediately after this one.
    pub fn next(&self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for BillingPeriod {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BillingError::InvalidBillingPeriod {
            value: s.to_string(),
        };
        let (year_part, month_part) = s.split_once('-').ok_or_else(invalid)?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for BillingPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BillingPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
