//! Model gradient wind forecasts, used to pull an analog ensemble for each forecast hour.
//!
//! Forecast files are comma delimited, one forecast hour per line:
//! `forecast_hour,dd/mm/yyyy hh...,station,u,v` with the wind components in m/s. Lines
//! beginning with a double quote are headers.
use crate::{
    error::{AnalysisError, Result},
    keys::{self, Calendar},
    query::{AnalogQuery, Ensemble, SlotFilter},
    store::StationStore,
    utility::read_lines,
};
use chrono::{Duration, NaiveDateTime};
use metfor::{MetersPSec, WindSpdDir, WindUV};
use std::{
    cmp::Ordering,
    collections::{btree_map, btree_set, BTreeMap, BTreeSet},
    fs,
    path::Path,
    str::FromStr,
};
use tracing::{debug, warn};

/// Gradient wind tolerance used when no other is given.
pub const DEFAULT_TOLERANCE: MetersPSec = MetersPSec(5.0);

/// One forecast hour of a model run.
///
/// Forecasts compare and order by valid time only.
#[derive(Debug, Clone, Copy)]
pub struct GradientWindForecast {
    base_time: NaiveDateTime,
    forecast_hour: f64,
    valid_time: NaiveDateTime,
    wind: WindSpdDir<MetersPSec>,
}

impl GradientWindForecast {
    /// Create a forecast, `None` if the forecast hour is not finite or puts the valid time out
    /// of range.
    pub fn new(
        base_time: NaiveDateTime,
        forecast_hour: f64,
        wind: WindSpdDir<MetersPSec>,
    ) -> Option<Self> {
        if !forecast_hour.is_finite() {
            return None;
        }

        let offset = Duration::try_seconds((forecast_hour * 3600.0).round() as i64)?;
        let valid_time = base_time.checked_add_signed(offset)?;

        Some(GradientWindForecast {
            base_time,
            forecast_hour,
            valid_time,
            wind,
        })
    }

    /// Parse a forecast line, returning the station identifier with the forecast.
    pub fn parse_line(line: &str, line_number: usize) -> Result<(String, Self)> {
        let tokens: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if tokens.len() < 5 {
            return Err(AnalysisError::FieldCount {
                line: line_number,
                expected: 5,
                found: tokens.len(),
            });
        }

        let number = |index: usize, field: &'static str| -> Result<f64> {
            f64::from_str(tokens[index])
                .ok()
                .filter(|val| val.is_finite())
                .ok_or_else(|| AnalysisError::InvalidNumber {
                    line: line_number,
                    field,
                    value: tokens[index].to_owned(),
                })
        };

        let forecast_hour = number(0, "forecast hour")?;
        let base_time =
            parse_base_time(tokens[1]).ok_or_else(|| AnalysisError::InvalidTimestamp {
                line: line_number,
                value: tokens[1].to_owned(),
            })?;
        let station = tokens[2].to_owned();
        let u = number(3, "u")?;
        let v = number(4, "v")?;

        let wind = WindSpdDir::from(WindUV {
            u: MetersPSec(u),
            v: MetersPSec(v),
        });

        let forecast = GradientWindForecast::new(base_time, forecast_hour, wind).ok_or_else(|| {
            AnalysisError::InvalidNumber {
                line: line_number,
                field: "forecast hour",
                value: tokens[0].to_owned(),
            }
        })?;

        Ok((station, forecast))
    }

    /// Start time of the model run.
    pub fn base_time(&self) -> NaiveDateTime {
        self.base_time
    }

    /// Hours since the start of the run.
    pub fn forecast_hour(&self) -> f64 {
        self.forecast_hour
    }

    /// Time the forecast is valid for.
    pub fn valid_time(&self) -> NaiveDateTime {
        self.valid_time
    }

    /// Forecast gradient wind.
    pub fn wind(&self) -> WindSpdDir<MetersPSec> {
        self.wind
    }

    /// Query for historical records in the same calendar slot and hour as the valid time
    /// whose gradient wind is within `tolerance` of the forecast.
    pub fn analog_query(&self, calendar: Calendar, tolerance: MetersPSec) -> AnalogQuery {
        let valid = self.valid_time();

        AnalogQuery::new()
            .with_calendar(SlotFilter::Set(
                std::iter::once(calendar.key(&valid)).collect(),
            ))
            .with_hour(SlotFilter::Set(
                std::iter::once(keys::hour_key(&valid)).collect(),
            ))
            .with_gradient_wind(self.wind)
            .with_tolerance(tolerance)
    }
}

impl PartialEq for GradientWindForecast {
    fn eq(&self, other: &Self) -> bool {
        self.valid_time() == other.valid_time()
    }
}

impl Eq for GradientWindForecast {}

impl PartialOrd for GradientWindForecast {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GradientWindForecast {
    fn cmp(&self, other: &Self) -> Ordering {
        self.valid_time().cmp(&other.valid_time())
    }
}

fn parse_base_time(text: &str) -> Option<NaiveDateTime> {
    let stamp = text.get(0..13)?;
    NaiveDateTime::parse_from_str(&format!("{}:00", stamp), "%d/%m/%Y %H:%M").ok()
}

/// The forecasts for one station, in valid time order with one forecast per valid time.
#[derive(Debug, Clone, Default)]
pub struct ForecastSequence {
    station: String,
    forecasts: BTreeSet<GradientWindForecast>,
}

impl ForecastSequence {
    /// An empty sequence.
    pub fn new<S: Into<String>>(station: S) -> Self {
        ForecastSequence {
            station: station.into(),
            forecasts: BTreeSet::new(),
        }
    }

    /// Parse the lines of a forecast file. The station is taken from the first forecast
    /// line, forecasts naming another station are skipped with a warning.
    pub fn parse_lines<I, L>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut sequence = ForecastSequence::default();

        for (number, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() || line.starts_with('"') {
                continue;
            }

            let (station, forecast) = GradientWindForecast::parse_line(line, number + 1)?;
            if sequence.station.is_empty() {
                sequence.station = station;
            } else if sequence.station != station {
                warn!(
                    expected = %sequence.station,
                    found = %station,
                    line = number + 1,
                    "forecast for another station"
                );
                continue;
            }

            sequence.insert(forecast);
        }

        Ok(sequence)
    }

    /// Load a forecast file, gzip compressed if the name ends in `.gz`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse_lines(read_lines(path.as_ref())?)
    }

    /// Add a forecast, returns false if one with the same valid time was already present.
    pub fn insert(&mut self, forecast: GradientWindForecast) -> bool {
        self.forecasts.insert(forecast)
    }

    /// The station identifier, empty if no forecasts have been parsed.
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Valid times of every forecast in order.
    pub fn times(&self) -> Vec<NaiveDateTime> {
        self.iter().map(GradientWindForecast::valid_time).collect()
    }

    /// Iterate in valid time order.
    pub fn iter(&self) -> btree_set::Iter<'_, GradientWindForecast> {
        self.forecasts.iter()
    }

    /// Number of forecasts.
    pub fn len(&self) -> usize {
        self.forecasts.len()
    }

    /// True if there are no forecasts.
    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
    }

    /// The analog ensemble of every forecast hour.
    pub fn analogs<'a>(
        &'a self,
        store: &'a StationStore,
        tolerance: MetersPSec,
    ) -> impl Iterator<Item = (&'a GradientWindForecast, Ensemble)> + 'a {
        self.iter().map(move |forecast| {
            let ensemble = store.query(&forecast.analog_query(store.calendar(), tolerance));
            (forecast, ensemble)
        })
    }
}

/// Forecast sequences keyed by station.
#[derive(Debug, Clone, Default)]
pub struct ForecastMap {
    sequences: BTreeMap<String, ForecastSequence>,
}

impl ForecastMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every forecast file in a directory. Forecast files start with an upper case
    /// letter and end in `.gw`, optionally followed by `.gz`.
    pub fn read_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let io_err = |source| AnalysisError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let is_forecast = entry
                .file_name()
                .to_str()
                .map_or(false, is_forecast_file);
            if is_forecast {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut map = ForecastMap::new();
        for path in &paths {
            map.ingest(path)?;
        }

        Ok(map)
    }

    /// Load one forecast file, replacing any sequence already held for its station.
    ///
    /// Returns the number of forecasts read. A file with no forecasts is skipped.
    pub fn ingest<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let sequence = ForecastSequence::read(path)?;

        if sequence.is_empty() {
            warn!(path = %path.display(), "no forecasts in file");
            return Ok(0);
        }

        let count = sequence.len();
        debug!(station = sequence.station(), forecasts = count, path = %path.display(), "loaded forecasts");
        self.insert(sequence);

        Ok(count)
    }

    /// Add a sequence, returning the one it replaced.
    pub fn insert(&mut self, sequence: ForecastSequence) -> Option<ForecastSequence> {
        self.sequences.insert(sequence.station.clone(), sequence)
    }

    /// The sequence for a station.
    pub fn get(&self, station: &str) -> Option<&ForecastSequence> {
        self.sequences.get(station)
    }

    /// Stations with forecasts, in order.
    pub fn stations(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    /// Iterate over the sequences by station.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ForecastSequence> {
        self.sequences.iter()
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// True if no forecasts are loaded.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

fn is_forecast_file(name: &str) -> bool {
    let starts_upper = name.chars().next().map_or(false, |c| c.is_ascii_uppercase());
    starts_upper && (name.ends_with(".gw") || name.ends_with(".gw.gz"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::StoreConfig, test_data::make_test_lines, utility::test_tools::approx_equal};
    use chrono::{Datelike, NaiveDate, Timelike};
    use metfor::Quantity;

    const FORECAST: &str = "\"hour\",\"base\",\"station\",\"u\",\"v\"
0,01/07/2010 00:00,TEST,0.0,-10.0
6,01/07/2010 00:00,TEST,-10.0,0.0
12,01/07/2010 00:00,TEST,0.0,10.0
30,01/07/2010 00:00,TEST,-10.0,0.0
";

    #[test]
    fn test_parse_line() {
        let (station, fc) = GradientWindForecast::parse_line("30,31/12/2009 18:00,YSSY,3,4", 1).unwrap();
        assert_eq!(station, "YSSY");
        assert!(approx_equal(fc.forecast_hour(), 30.0, 1.0e-12));
        assert!(approx_equal(fc.wind().speed.unpack(), 5.0, 1.0e-10));

        let valid = fc.valid_time();
        assert_eq!((valid.year(), valid.month(), valid.day()), (2010, 1, 2));
        assert_eq!(valid.hour(), 0);

        assert!(GradientWindForecast::parse_line("30,31/12/2009 18:00,YSSY,3", 4).is_err());
        match GradientWindForecast::parse_line("30,2009-12-31,YSSY,3,4", 4) {
            Err(AnalysisError::InvalidTimestamp { line: 4, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        match GradientWindForecast::parse_line("x,31/12/2009 18:00,YSSY,3,4", 2) {
            Err(AnalysisError::InvalidNumber { line: 2, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_forecast_hour_out_of_range() {
        match GradientWindForecast::parse_line("10000000000,01/07/2010 00:00,TEST,1.0,1.0", 3) {
            Err(AnalysisError::InvalidNumber {
                line: 3,
                field: "forecast hour",
                ..
            }) => {}
            other => panic!("unexpected {:?}", other),
        }

        let lines = vec![
            "0,01/07/2010 00:00,TEST,1.0,1.0",
            "10000000000,01/07/2010 00:00,TEST,1.0,1.0",
        ];
        match ForecastSequence::parse_lines(lines) {
            Err(AnalysisError::InvalidNumber { line: 2, .. }) => {}
            other => panic!("unexpected {:?}", other.map(|seq| seq.len())),
        }

        let base = NaiveDate::from_ymd(2010, 7, 1).and_hms(0, 0, 0);
        let wind = WindSpdDir {
            speed: MetersPSec(5.0),
            direction: 90.0,
        };
        assert!(GradientWindForecast::new(base, 1.0e300, wind).is_none());
        assert!(GradientWindForecast::new(base, std::f64::INFINITY, wind).is_none());
        assert!(GradientWindForecast::new(base, -12.0, wind).is_some());
    }

    #[test]
    fn test_sequence_order() {
        let seq = ForecastSequence::parse_lines(FORECAST.lines()).unwrap();
        assert_eq!(seq.station(), "TEST");
        assert_eq!(seq.len(), 4);

        let times = seq.times();
        assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(
            times[3],
            NaiveDate::from_ymd(2010, 7, 2).and_hms(6, 0, 0)
        );
    }

    #[test]
    fn test_other_station_skipped() {
        let lines = vec![
            "0,01/07/2010 00:00,TEST,0.0,-10.0",
            "6,01/07/2010 00:00,ELSE,10.0,0.0",
        ];
        let seq = ForecastSequence::parse_lines(lines).unwrap();
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_analogs() {
        let store =
            StationStore::from_lines("TEST", StoreConfig::new().with_calendar(Calendar::Month), make_test_lines())
                .unwrap();
        let seq = ForecastSequence::parse_lines(FORECAST.lines()).unwrap();

        let analogs: Vec<_> = seq.analogs(&store, DEFAULT_TOLERANCE).collect();
        assert_eq!(analogs.len(), 4);

        // The test data gradient wind is 10 m/s veering 90 degrees every six hours, starting
        // from the north at 00Z. The forecasts follow it, so every July record at the matching
        // hour is an analog.
        for (forecast, ensemble) in &analogs {
            assert_eq!(ensemble.len(), 3 * 10, "at {}", forecast.valid_time());
            assert!(ensemble
                .iter()
                .all(|rec| keys::hour_key(&rec.timestamp()) == keys::hour_key(&forecast.valid_time())));
        }
    }

    #[test]
    fn test_forecast_file_names() {
        assert!(is_forecast_file("YSSY.gw"));
        assert!(is_forecast_file("YSSY_2010070100.gw.gz"));
        assert!(!is_forecast_file("yssy.gw"));
        assert!(!is_forecast_file("YSSY.gz"));
    }

    #[test]
    fn test_map() {
        let mut map = ForecastMap::new();
        assert!(map.is_empty());

        map.insert(ForecastSequence::parse_lines(FORECAST.lines()).unwrap());
        assert_eq!(map.stations().collect::<Vec<_>>(), vec!["TEST"]);
        assert_eq!(map.get("TEST").unwrap().len(), 4);
        assert!(map.get("NONE").is_none());
    }
}
