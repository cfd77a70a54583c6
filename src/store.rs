//! Storage of all the historical observations for one station.
//!
//! Records are filed by calendar key and hour so analog queries only need to look inside the
//! buckets whose keys pass the query's periodic filters.
use crate::{
    config::{IngestPolicy, StoreConfig},
    error::Result,
    keys::{self, Calendar, HOURS_PER_DAY},
    query::{AnalogQuery, Ensemble},
    record::Record,
    utility::read_lines,
};
use std::{
    collections::{btree_set, BTreeMap, BTreeSet},
    path::Path,
};
use tracing::{debug, warn};

pub use self::archive::Archive;

mod archive;

/// The records sharing one calendar key and hour, at most one per timestamp.
#[derive(Debug, Clone, Default)]
pub struct RecordBucket {
    records: BTreeSet<Record>,
}

impl RecordBucket {
    /// Add a record, returns false if the timestamp was already present.
    pub fn insert(&mut self, record: Record) -> bool {
        self.records.insert(record)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the bucket holds nothing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate in time order.
    pub fn iter(&self) -> btree_set::Iter<'_, Record> {
        self.records.iter()
    }
}

/// All the historical observations for a station, indexed by calendar key then hour.
#[derive(Debug, Clone)]
pub struct StationStore {
    station: String,
    config: StoreConfig,
    buckets: BTreeMap<u16, BTreeMap<u16, RecordBucket>>,
}

impl StationStore {
    /// Create an empty store.
    pub fn new<S: Into<String>>(station: S, config: StoreConfig) -> Self {
        StationStore {
            station: station.into(),
            config,
            buckets: BTreeMap::new(),
        }
    }

    /// Build a store from the lines of a historical data file.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gradient_wind_analysis::{AnalogQuery, StationStore, StoreConfig};
    ///
    /// let lines = [
    ///     "201512311800:250:12.5:14.2:200:5.1",
    ///     "201601011800:260:11.0:13.8:210:4.0",
    ///     "201606151800:90:3.0:21.0:NaN:NaN",
    /// ];
    ///
    /// let store = StationStore::from_lines("YSSY", StoreConfig::new(), lines.iter()).unwrap();
    /// assert_eq!(store.len(), 3);
    ///
    /// // New Year's Eve and New Year's Day are neighbors.
    /// let ensemble = store.query(&AnalogQuery::around(1, 2, 18, 0));
    /// assert_eq!(ensemble.len(), 2);
    /// ```
    pub fn from_lines<S, I, L>(station: S, config: StoreConfig, lines: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut store = StationStore::new(station, config);
        store.ingest(lines)?;
        Ok(store)
    }

    /// Load a station's historical data file, gzip compressed if the name ends in `.gz`.
    pub fn read<S, P>(station: S, config: StoreConfig, path: P) -> Result<Self>
    where
        S: Into<String>,
        P: AsRef<Path>,
    {
        let lines = read_lines(path.as_ref())?;
        Self::from_lines(station, config, lines)
    }

    /// Parse and file every line.
    ///
    /// Blank lines are ignored. With `IngestPolicy::Strict` the first malformed line aborts
    /// the ingest with an error naming the line, records filed before it stay in the store.
    /// Returns the number of records added.
    pub fn ingest<I, L>(&mut self, lines: I) -> Result<usize>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut added = 0;
        let mut skipped = 0;

        for (number, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            match Record::parse_line(line, number + 1) {
                Ok(record) => {
                    if self.add(record) {
                        added += 1;
                    }
                }
                Err(err) => match self.config.ingest_policy() {
                    IngestPolicy::Strict => return Err(err),
                    IngestPolicy::SkipMalformed => {
                        warn!(station = %self.station, error = %err, "skipping malformed line");
                        skipped += 1;
                    }
                },
            }
        }

        debug!(
            station = %self.station,
            added,
            skipped,
            total = self.len(),
            "ingest complete"
        );

        Ok(added)
    }

    /// File a single record. Returns false if a record with the same timestamp already exists.
    pub fn add(&mut self, record: Record) -> bool {
        let time = record.timestamp();
        let calendar_key = self.config.calendar().key(&time);
        let hour = keys::hour_key(&time);

        self.buckets
            .entry(calendar_key)
            .or_default()
            .entry(hour)
            .or_default()
            .insert(record)
    }

    /// Gather every record that is an analog according to `query`.
    ///
    /// This scans every bucket, testing the calendar key and hour with wrap around distances,
    /// then applies the gradient wind filter to the records of the matching buckets.
    pub fn query(&self, query: &AnalogQuery) -> Ensemble {
        let modulus = self.config.calendar().modulus();

        let ensemble: Ensemble = self
            .buckets
            .iter()
            .filter(|&(&key, _)| query.calendar().matches(key, modulus))
            .flat_map(|(_, hours)| hours.iter())
            .filter(|&(&hour, _)| query.hour().matches(hour, HOURS_PER_DAY))
            .flat_map(|(_, bucket)| bucket.iter())
            .filter(|record| query.matches_wind(record))
            .cloned()
            .collect();

        debug!(station = %self.station, members = ensemble.len(), "analog query");

        ensemble
    }

    /// The station identifier.
    pub fn station(&self) -> &str {
        &self.station
    }

    /// The calendar granularity of the index.
    pub fn calendar(&self) -> Calendar {
        self.config.calendar()
    }

    /// The bucket for a calendar key and hour, if anything was filed there.
    pub fn bucket(&self, calendar_key: u16, hour: u16) -> Option<&RecordBucket> {
        self.buckets.get(&calendar_key)?.get(&hour)
    }

    /// Iterate over `(calendar key, hour, bucket)` for every non-empty bucket.
    pub fn buckets(&self) -> impl Iterator<Item = (u16, u16, &RecordBucket)> + '_ {
        self.buckets.iter().flat_map(|(&key, hours)| {
            hours
                .iter()
                .map(move |(&hour, bucket)| (key, hour, bucket))
        })
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.buckets().map(|(_, _, bucket)| bucket.len()).sum()
    }

    /// True if no records have been filed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
