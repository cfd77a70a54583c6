//! Analog queries against a `StationStore` and the ensembles they return.
use crate::{
    keys::{self, Calendar},
    record::Record,
    utility::circular_match,
    wind::vector_difference,
};
use chrono::NaiveDateTime;
use itertools::{Itertools, MinMaxResult};
use metfor::{Celsius, MetersPSec, Quantity, WindSpdDir};
use std::collections::{btree_set, BTreeSet};
use std::iter::FromIterator;

pub use self::cells::GradientWindCells;

mod cells;

/// A filter over one of the periodic keys of the store, the calendar key or the hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotFilter {
    /// Every key matches.
    Any,
    /// Keys within `tolerance` of `target`, measured around the circle.
    Around {
        /// The key at the center of the window.
        target: u16,
        /// Largest circular distance that still matches, inclusive.
        tolerance: u16,
    },
    /// An explicit selection of keys, e.g. a set of months toggled on.
    Set(BTreeSet<u16>),
}

impl Default for SlotFilter {
    fn default() -> Self {
        SlotFilter::Any
    }
}

impl SlotFilter {
    /// Does `key` pass the filter on a domain with period `modulus`?
    pub fn matches(&self, key: u16, modulus: u16) -> bool {
        match self {
            SlotFilter::Any => true,
            SlotFilter::Around { target, tolerance } => {
                circular_match(key, *target, *tolerance, modulus)
            }
            SlotFilter::Set(keys) => keys.contains(&key),
        }
    }
}

/// Parameters describing which historical records are analogs of a situation.
///
/// A record is an analog if its calendar key and hour pass their filters and its gradient
/// wind lies strictly within `tolerance` of the reference gradient wind. Leaving either the
/// reference wind or the tolerance unset disables the wind filter. The gradient wind must also
/// fall in one of the selected wind disc cells, if any are selected.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{AnalogQuery, SlotFilter};
/// use metfor::{MetersPSec, WindSpdDir};
///
/// let query = AnalogQuery::around(200, 15, 6, 1)
///     .with_gradient_wind(WindSpdDir { speed: MetersPSec(10.0), direction: 270.0 })
///     .with_tolerance(MetersPSec(5.0));
///
/// assert_eq!(query.calendar(), &SlotFilter::Around { target: 200, tolerance: 15 });
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalogQuery {
    calendar: SlotFilter,
    hour: SlotFilter,
    gradient_wind: Option<WindSpdDir<MetersPSec>>,
    tolerance: Option<MetersPSec>,
    gradient_wind_cells: GradientWindCells,
}

impl AnalogQuery {
    /// A query that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match records within a window of calendar keys and a window of hours.
    pub fn around(
        calendar_target: u16,
        calendar_tolerance: u16,
        hour_target: u16,
        hour_tolerance: u16,
    ) -> Self {
        AnalogQuery::new()
            .with_calendar(SlotFilter::Around {
                target: calendar_target,
                tolerance: calendar_tolerance,
            })
            .with_hour(SlotFilter::Around {
                target: hour_target,
                tolerance: hour_tolerance,
            })
    }

    /// Match records near the calendar position and hour of `time`.
    pub fn for_time(
        calendar: Calendar,
        time: &NaiveDateTime,
        calendar_tolerance: u16,
        hour_tolerance: u16,
    ) -> Self {
        AnalogQuery::around(
            calendar.key(time),
            calendar_tolerance,
            keys::hour_key(time),
            hour_tolerance,
        )
    }

    /// Set the calendar filter.
    pub fn with_calendar(mut self, filter: SlotFilter) -> Self {
        self.calendar = filter;
        self
    }

    /// Set the hour filter.
    pub fn with_hour(mut self, filter: SlotFilter) -> Self {
        self.hour = filter;
        self
    }

    /// Set, or clear with `None`, the reference gradient wind.
    pub fn with_gradient_wind<W>(mut self, wind: W) -> Self
    where
        Option<WindSpdDir<MetersPSec>>: From<W>,
    {
        self.gradient_wind = Option::from(wind);
        self
    }

    /// Set, or clear with `None`, the gradient wind tolerance. A `NaN` tolerance clears it.
    pub fn with_tolerance<T>(mut self, tolerance: T) -> Self
    where
        Option<MetersPSec>: From<T>,
    {
        self.tolerance = Option::<MetersPSec>::from(tolerance).filter(|t| !t.unpack().is_nan());
        self
    }

    /// Restrict the gradient wind to a selection of wind disc cells.
    pub fn with_gradient_wind_cells(mut self, cells: GradientWindCells) -> Self {
        self.gradient_wind_cells = cells;
        self
    }

    /// The calendar filter.
    pub fn calendar(&self) -> &SlotFilter {
        &self.calendar
    }

    /// The hour filter.
    pub fn hour(&self) -> &SlotFilter {
        &self.hour
    }

    /// The reference gradient wind, if any.
    pub fn gradient_wind(&self) -> Option<WindSpdDir<MetersPSec>> {
        self.gradient_wind
    }

    /// The gradient wind tolerance, if any.
    pub fn tolerance(&self) -> Option<MetersPSec> {
        self.tolerance
    }

    /// The selected gradient wind cells.
    pub fn gradient_wind_cells(&self) -> &GradientWindCells {
        &self.gradient_wind_cells
    }

    /// Does the record's gradient wind pass the wind filter and the cell selection?
    pub fn matches_wind(&self, record: &Record) -> bool {
        let near = match (self.gradient_wind, self.tolerance) {
            (Some(reference), Some(tolerance)) => {
                vector_difference(reference, record.gradient_wind()) < tolerance
            }
            _ => true,
        };

        near && self.gradient_wind_cells.matches(record.gradient_wind())
    }
}

/// An analog ensemble: a timestamp ordered set of records with no duplicate times.
#[derive(Debug, Clone, Default)]
pub struct Ensemble {
    records: BTreeSet<Record>,
}

impl Ensemble {
    /// Create an empty ensemble.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, returns false if a record with the same timestamp was already present.
    pub fn insert(&mut self, record: Record) -> bool {
        self.records.insert(record)
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the members in time order.
    pub fn iter(&self) -> btree_set::Iter<'_, Record> {
        self.records.iter()
    }

    /// The gradient temperatures of all members, in time order.
    pub fn temperatures(&self) -> Vec<Celsius> {
        self.iter().map(Record::gradient_temperature).collect()
    }

    /// The surface winds of the members that have one, in time order.
    pub fn surface_winds(&self) -> impl Iterator<Item = WindSpdDir<MetersPSec>> + '_ {
        self.iter().filter_map(|rec| rec.surface_wind().into_option())
    }

    /// Lowest and highest gradient temperature, `None` for an empty ensemble.
    pub fn temperature_range(&self) -> Option<(Celsius, Celsius)> {
        match self.iter().map(Record::scalar).minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(t) => Some((Celsius(t), Celsius(t))),
            MinMaxResult::MinMax(lo, hi) => Some((Celsius(lo), Celsius(hi))),
        }
    }

    /// Mean and sample standard deviation of the gradient temperature, used to scale colours
    /// when rendering. `None` with fewer than two members.
    pub fn temperature_stats(&self) -> Option<(Celsius, f64)> {
        let n = self.len();
        if n < 2 {
            return None;
        }

        let mean = self.iter().map(Record::scalar).sum::<f64>() / n as f64;
        let var = self
            .iter()
            .map(|rec| (rec.scalar() - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;

        Some((Celsius(mean), var.sqrt()))
    }
}

impl FromIterator<Record> for Ensemble {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Ensemble {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<Record> for Ensemble {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.records.extend(iter)
    }
}

impl<'a> IntoIterator for &'a Ensemble {
    type Item = &'a Record;
    type IntoIter = btree_set::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
