//! Historical observations and the predictor values they are compared against.
use crate::error::{AnalysisError, Result};
use chrono::NaiveDateTime;
use metfor::{Celsius, MetersPSec, Quantity, WindSpdDir};
use optional::Optioned;
use std::{cmp::Ordering, str::FromStr};

/// Timestamp layout used in the historical data files. The colon delimiter rules out any form
/// with separators in the time of day.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// One historical observation: the gradient level wind and temperature paired with the surface
/// wind at the same station and time.
///
/// Records are ordered and compared by timestamp alone, so a set of records holds at most one
/// observation per time.
#[derive(Debug, Clone, Copy)]
pub struct Record {
    timestamp: NaiveDateTime,
    gradient_wind: WindSpdDir<MetersPSec>,
    gradient_temperature: Celsius,
    surface_wind: Optioned<WindSpdDir<MetersPSec>>,
}

impl Record {
    /// Create a new record. The surface wind may be missing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use metfor::{Celsius, MetersPSec, WindSpdDir};
    /// use optional::none;
    /// use gradient_wind_analysis::Record;
    ///
    /// let time = NaiveDate::from_ymd(2015, 7, 4).and_hms(12, 0, 0);
    /// let gw = WindSpdDir { speed: MetersPSec(12.0), direction: 250.0 };
    /// let sfc = WindSpdDir { speed: MetersPSec(4.0), direction: 210.0 };
    ///
    /// let rec = Record::new(time, gw, Celsius(18.0), sfc);
    /// assert!(rec.surface_wind().is_some());
    ///
    /// let rec = Record::new(time, gw, Celsius(18.0), none::<WindSpdDir<MetersPSec>>());
    /// assert!(rec.surface_wind().is_none());
    /// ```
    pub fn new<W>(
        timestamp: NaiveDateTime,
        gradient_wind: WindSpdDir<MetersPSec>,
        gradient_temperature: Celsius,
        surface_wind: W,
    ) -> Self
    where
        Optioned<WindSpdDir<MetersPSec>>: From<W>,
    {
        Record {
            timestamp,
            gradient_wind,
            gradient_temperature,
            surface_wind: Optioned::from(surface_wind),
        }
    }

    /// Parse one line of a historical data file,
    /// `timestamp:gradient_direction:gradient_speed:gradient_temperature:surface_direction:surface_speed`.
    ///
    /// `line_number` is only used for error reporting. The line must have exactly six fields. A
    /// `NaN` surface direction or speed marks the surface wind as missing; the gradient values
    /// must all be present.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self> {
        let tokens: Vec<&str> = line.trim().split(':').map(str::trim).collect();
        if tokens.len() != 6 {
            return Err(AnalysisError::FieldCount {
                line: line_number,
                expected: 6,
                found: tokens.len(),
            });
        }

        let timestamp = parse_timestamp(tokens[0]).ok_or_else(|| {
            AnalysisError::InvalidTimestamp {
                line: line_number,
                value: tokens[0].to_owned(),
            }
        })?;

        let number = |index: usize, field: &'static str| -> Result<f64> {
            f64::from_str(tokens[index]).map_err(|_| AnalysisError::InvalidNumber {
                line: line_number,
                field,
                value: tokens[index].to_owned(),
            })
        };
        let present = |value: f64, field: &'static str| -> Result<f64> {
            if value.is_nan() {
                Err(AnalysisError::MissingValue {
                    line: line_number,
                    field,
                })
            } else {
                Ok(value)
            }
        };

        let gradient_direction = present(
            number(1, "gradient direction")?,
            "gradient direction",
        )?;
        let gradient_speed = present(number(2, "gradient speed")?, "gradient speed")?;
        let gradient_temperature = present(
            number(3, "gradient temperature")?,
            "gradient temperature",
        )?;
        let surface_direction = number(4, "surface direction")?;
        let surface_speed = number(5, "surface speed")?;

        let gradient_wind = WindSpdDir {
            speed: MetersPSec(gradient_speed),
            direction: gradient_direction,
        };

        let surface_wind: Option<WindSpdDir<MetersPSec>> =
            if surface_direction.is_nan() || surface_speed.is_nan() {
                None
            } else {
                Some(WindSpdDir {
                    speed: MetersPSec(surface_speed),
                    direction: surface_direction,
                })
            };

        Ok(Record::new(
            timestamp,
            gradient_wind,
            Celsius(gradient_temperature),
            surface_wind,
        ))
    }

    /// Valid time of the observation.
    #[inline]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The gradient level wind.
    #[inline]
    pub fn gradient_wind(&self) -> WindSpdDir<MetersPSec> {
        self.gradient_wind
    }

    /// The gradient level temperature.
    #[inline]
    pub fn gradient_temperature(&self) -> Celsius {
        self.gradient_temperature
    }

    /// The surface wind, none if no wind was available.
    #[inline]
    pub fn surface_wind(&self) -> Optioned<WindSpdDir<MetersPSec>> {
        self.surface_wind
    }

    /// The value the regime classifier works with.
    #[inline]
    pub(crate) fn scalar(&self) -> f64 {
        self.gradient_temperature.unpack()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
    }
}

impl Eq for Record {}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

/// Parse a data file timestamp. Hour resolution stamps without minutes are accepted too.
pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    match text.len() {
        12 => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok(),
        10 => NaiveDateTime::parse_from_str(&format!("{}00", text), TIMESTAMP_FORMAT).ok(),
        _ => None,
    }
}

/// The values to classify: a gradient wind and a gradient temperature, usually from a model
/// forecast.
#[derive(Debug, Clone, Copy)]
pub struct Predictor {
    /// Gradient level wind.
    pub gradient_wind: WindSpdDir<MetersPSec>,
    /// Gradient level temperature.
    pub gradient_temperature: Celsius,
}

impl Predictor {
    /// Create a new predictor.
    pub fn new(gradient_wind: WindSpdDir<MetersPSec>, gradient_temperature: Celsius) -> Self {
        Predictor {
            gradient_wind,
            gradient_temperature,
        }
    }
}

impl From<&Record> for Predictor {
    fn from(record: &Record) -> Self {
        Predictor::new(record.gradient_wind(), record.gradient_temperature())
    }
}
