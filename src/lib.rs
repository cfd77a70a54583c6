#![warn(missing_docs)]
//! Analog ensembles of historical gradient wind observations and a regime classifier over
//! user drawn clusters of surface wind space.
//!
//! A `StationStore` holds every historical observation for a station, pairing the gradient
//! level wind and temperature with the surface wind observed at the same time. An
//! `AnalogQuery` pulls the records close to a situation in time of year, time of day and
//! gradient wind, measuring the periodic distances the short way around. The caller draws
//! clusters over a wind space defined by a `WindSpaceTransform`, and `classify` scores a
//! predictor temperature against the members that fell in each cluster.
//!
//! Rendering is left to the caller. This crate emits `tracing` events but never installs a
//! subscriber.

//
// API
//
pub use crate::{
    classify::{classify, Classification, Gaussian, Histogram, Regime, Sample},
    cluster::{Cluster, ClusterPartition, Polygon},
    config::{ClassifierConfig, IngestPolicy, Likelihood, RoseConfig, StoreConfig},
    error::{AnalysisError, Result},
    forecast::{ForecastMap, ForecastSequence, GradientWindForecast, DEFAULT_TOLERANCE},
    keys::{hour_key, hour_label, Calendar, Month, HOURS_PER_DAY},
    query::{AnalogQuery, Ensemble, GradientWindCells, SlotFilter},
    record::{Predictor, Record, TIMESTAMP_FORMAT},
    rose::WindRose,
    session::Session,
    store::{Archive, RecordBucket, StationStore},
    transform::{Point, WindDisc, WindSpaceTransform},
    utility::{circular_distance, circular_match},
    wind::{mean_wind, to_knots, to_mps, vector_difference, MPS_PER_KNOT},
};

//
// Internal use only
//

// Modules
mod classify;
mod cluster;
mod config;
mod error;
mod forecast;
mod keys;
mod query;
mod record;
mod rose;
mod session;
mod store;
#[cfg(test)]
mod test_data;
mod transform;
mod utility;
mod wind;
