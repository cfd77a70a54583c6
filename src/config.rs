//! Configuration for ingesting records, classifying regimes and building wind roses.
//!
//! Every type follows the same builder pattern: `new()` gives the defaults, `with_*` methods
//! change one setting, and `validate()` reports values that are out of range.
use crate::{
    error::{AnalysisError, Result},
    keys::Calendar,
};
use metfor::{Knots, Quantity};

/// What to do with a line of historical data that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestPolicy {
    /// Fail the whole load on the first malformed line.
    Strict,
    /// Log a warning and carry on with the next line.
    SkipMalformed,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        IngestPolicy::Strict
    }
}

/// Settings for building a `StationStore`.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{Calendar, IngestPolicy, StoreConfig};
///
/// let config = StoreConfig::new()
///     .with_calendar(Calendar::Month)
///     .with_ingest_policy(IngestPolicy::SkipMalformed);
///
/// assert_eq!(config.calendar(), Calendar::Month);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StoreConfig {
    calendar: Calendar,
    policy: IngestPolicy,
}

impl StoreConfig {
    /// Defaults: day of year buckets, strict ingest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the calendar granularity.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Set the policy for malformed lines.
    pub fn with_ingest_policy(mut self, policy: IngestPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Calendar granularity.
    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Policy for malformed lines.
    pub fn ingest_policy(&self) -> IngestPolicy {
        self.policy
    }
}

/// How a bucket's fitted Gaussian scores the predictor value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Likelihood {
    /// Probability mass in a window around the value, `CDF(x + w) - CDF(x - w)`.
    Windowed {
        /// Half the width of the window.
        half_width: f64,
    },
    /// Probability density at the value.
    Density,
}

impl Default for Likelihood {
    fn default() -> Self {
        Likelihood::Windowed { half_width: 0.5 }
    }
}

/// Settings for the regime classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    likelihood: Likelihood,
    bin_width: f64,
    bin_offset: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            likelihood: Likelihood::default(),
            bin_width: 1.0,
            bin_offset: 0.5,
        }
    }
}

impl ClassifierConfig {
    /// Defaults: windowed likelihood with a half width of 0.5, histogram bins 1 degree wide
    /// with edges on the half degree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the likelihood form.
    pub fn with_likelihood(mut self, likelihood: Likelihood) -> Self {
        self.likelihood = likelihood;
        self
    }

    /// Set the histogram bin width and the offset of the bin edges.
    pub fn with_bins(mut self, width: f64, offset: f64) -> Self {
        self.bin_width = width;
        self.bin_offset = offset;
        self
    }

    /// The likelihood form.
    pub fn likelihood(&self) -> Likelihood {
        self.likelihood
    }

    /// Histogram bin width.
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Offset of the histogram bin edges.
    pub fn bin_offset(&self) -> f64 {
        self.bin_offset
    }

    /// Check the bins are usable and the likelihood window is not negative.
    pub fn validate(&self) -> Result<()> {
        if !self.bin_width.is_finite() || self.bin_width <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "histogram bin width must be positive, got {}",
                self.bin_width
            )));
        }
        if !self.bin_offset.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "histogram bin offset must be finite, got {}",
                self.bin_offset
            )));
        }
        if let Likelihood::Windowed { half_width } = self.likelihood {
            if !half_width.is_finite() || half_width <= 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "likelihood window must be positive, got {}",
                    half_width
                )));
            }
        }
        Ok(())
    }
}

/// Settings for a `WindRose`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoseConfig {
    directions: usize,
    thresholds: Vec<Knots>,
}

impl Default for RoseConfig {
    fn default() -> Self {
        RoseConfig {
            directions: 16,
            thresholds: [2.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0]
                .iter()
                .cloned()
                .map(Knots)
                .collect(),
        }
    }
}

impl RoseConfig {
    /// Defaults: 16 directions, speed bands starting at 2, 5, 10, 15, 20, 25, 30 and 35 knots.
    /// Winds below the first threshold are calm.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of direction sectors.
    pub fn with_directions(mut self, directions: usize) -> Self {
        self.directions = directions;
        self
    }

    /// Set the lower edges of the speed bands.
    pub fn with_thresholds(mut self, thresholds: Vec<Knots>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Number of direction sectors.
    pub fn directions(&self) -> usize {
        self.directions
    }

    /// Lower edges of the speed bands.
    pub fn thresholds(&self) -> &[Knots] {
        &self.thresholds
    }

    /// There must be at least one sector and at least one strictly increasing threshold.
    pub fn validate(&self) -> Result<()> {
        if self.directions == 0 {
            return Err(AnalysisError::InvalidConfig(
                "a wind rose needs at least one direction".to_owned(),
            ));
        }
        if self.thresholds.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "a wind rose needs at least one speed threshold".to_owned(),
            ));
        }
        let increasing = self
            .thresholds
            .windows(2)
            .all(|pair| pair[0].unpack() < pair[1].unpack());
        if !increasing {
            return Err(AnalysisError::InvalidConfig(
                "wind rose thresholds must be strictly increasing".to_owned(),
            ));
        }
        Ok(())
    }
}
