use std::collections::BTreeMap;

/// Fixed width bins of a scalar, edges at `offset + k * width`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    width: f64,
    offset: f64,
    counts: BTreeMap<i64, usize>,
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram::new(1.0, 0.5)
    }
}

impl Histogram {
    /// An empty histogram. `width` is expected to be positive, see `ClassifierConfig::validate`.
    pub fn new(width: f64, offset: f64) -> Self {
        Histogram {
            width,
            offset,
            counts: BTreeMap::new(),
        }
    }

    /// Count a value. Non-finite values are ignored.
    pub fn add(&mut self, value: f64) {
        if let Some(bin) = self.bin_index(value) {
            *self.counts.entry(bin).or_insert(0) += 1;
        }
    }

    fn bin_index(&self, value: f64) -> Option<i64> {
        let idx = ((value - self.offset) / self.width).floor();
        if idx.is_finite() {
            Some(idx as i64)
        } else {
            None
        }
    }

    /// The non-empty bins in ascending order as `(lower edge, upper edge, count)`.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().map(move |(&idx, &count)| {
            let lower = self.offset + idx as f64 * self.width;
            (lower, lower + self.width, count)
        })
    }

    /// The count in the bin holding `value`.
    pub fn count_at(&self, value: f64) -> usize {
        self.bin_index(value)
            .and_then(|bin| self.counts.get(&bin))
            .cloned()
            .unwrap_or(0)
    }

    /// Total number of values counted.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// The largest bin count, useful for scaling a plot.
    pub fn max_count(&self) -> usize {
        self.counts.values().cloned().max().unwrap_or(0)
    }

    /// Bin width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Bin edge offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Forget every count, keeping the bin layout.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// The scalar values that fell into one bucket, with their histogram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    histogram: Histogram,
}

impl Sample {
    /// An empty sample binned with the given layout.
    pub fn new(bin_width: f64, bin_offset: f64) -> Self {
        Sample {
            values: Vec::new(),
            histogram: Histogram::new(bin_width, bin_offset),
        }
    }

    /// Add a value.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
        self.histogram.add(value);
    }

    /// The values in the order they were added.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The histogram of the values.
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Empty the sample and its histogram.
    pub fn clear(&mut self) {
        self.values.clear();
        self.histogram.clear();
    }

    /// Empty the sample and switch to a new bin layout.
    pub(crate) fn reset(&mut self, bin_width: f64, bin_offset: f64) {
        self.values.clear();
        self.histogram = Histogram::new(bin_width, bin_offset);
    }
}
