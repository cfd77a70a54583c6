//! Enums and helpers used as keys for indexing the record store.
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::ops::RangeInclusive;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Number of hours in the time-of-day domain.
pub const HOURS_PER_DAY: u16 = 24;

/// Granularity used to bucket records by their position in the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Hash)]
pub enum Calendar {
    /// Day of the year, 1 through 366.
    DayOfYear,
    /// Calendar month, 1 through 12.
    Month,
}

impl Default for Calendar {
    fn default() -> Self {
        Calendar::DayOfYear
    }
}

impl Calendar {
    /// The period used when measuring circular distances between keys.
    ///
    /// Day 366 only occurs in leap years and lands on top of day 1.
    pub fn modulus(self) -> u16 {
        match self {
            Calendar::DayOfYear => 365,
            Calendar::Month => 12,
        }
    }

    /// The key a timestamp is filed under.
    pub fn key(self, time: &NaiveDateTime) -> u16 {
        match self {
            Calendar::DayOfYear => time.ordinal() as u16,
            Calendar::Month => time.month() as u16,
        }
    }

    /// All keys this calendar can produce.
    pub fn keys(self) -> RangeInclusive<u16> {
        match self {
            Calendar::DayOfYear => 1..=366,
            Calendar::Month => 1..=12,
        }
    }

    /// A human readable label for a key, month names for `Month`, the number otherwise.
    pub fn label(self, key: u16) -> String {
        match self {
            Calendar::DayOfYear => format!("{:03}", key),
            Calendar::Month => Month::from_number(key)
                .map(|m| m.to_string())
                .unwrap_or_else(|| key.to_string()),
        }
    }
}

/// The hour key for a timestamp.
#[inline]
pub fn hour_key(time: &NaiveDateTime) -> u16 {
    time.hour() as u16
}

/// Label an hour the way synoptic charts do, e.g. `06Z`.
pub fn hour_label(hour: u16) -> String {
    format!("{:02}Z", hour)
}

/// Calendar months, numbered from 1 like `chrono`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, Hash, PartialOrd, Ord,
)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// The month number, 1 through 12.
    #[inline]
    pub fn number(self) -> u16 {
        self as u16
    }

    /// Look up a month from its number.
    pub fn from_number(number: u16) -> Option<Self> {
        Month::iter().find(|m| m.number() == number)
    }

    /// Three letter abbreviation, e.g. `Jan`.
    pub fn abbreviation(self) -> String {
        self.to_string().chars().take(3).collect()
    }
}
