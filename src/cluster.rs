//! User drawn regions of wind space and the partition they form.
//!
//! A `ClusterPartition` is an arena of clusters plus an optional index of the one currently
//! being drawn. Drawing goes `begin_draw`, any number of `extend_draw`, then `commit_draw`,
//! which keeps the polygon if it encloses anything and discards it otherwise. Committed
//! polygons never change, only the samples attached to them do.
use crate::{
    classify::{Histogram, Sample},
    error::{AnalysisError, Result},
    transform::{Point, WindSpaceTransform},
    wind,
};
use metfor::{Knots, MetersPSec, Quantity, WindSpdDir, WindUV};
use optional::{none, Optioned};

pub use self::polygon::Polygon;

mod polygon;

/// A region of wind space and the statistics of the ensemble members that fell inside it.
#[derive(Debug, Clone)]
pub struct Cluster {
    polygon: Polygon,
    sample: Sample,
    mean_wind: Option<WindUV<MetersPSec>>,
    probability: Optioned<f64>,
}

impl Cluster {
    fn new(polygon: Polygon) -> Self {
        Cluster {
            polygon,
            sample: Sample::default(),
            mean_wind: None,
            probability: none(),
        }
    }

    /// The outline.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Is the point inside the outline?
    #[inline]
    pub fn contains(&self, pt: Point) -> bool {
        self.polygon.contains(pt)
    }

    /// Gradient temperatures of the members inside.
    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    /// Histogram of the gradient temperatures of the members inside.
    pub fn histogram(&self) -> &Histogram {
        self.sample.histogram()
    }

    /// Vector mean surface wind of the members inside, `None` when empty.
    pub fn mean_wind(&self) -> Option<WindSpdDir<MetersPSec>> {
        self.mean_wind.map(WindSpdDir::from)
    }

    /// Posterior probability from the last classification, none if it was undefined or the
    /// cluster has not been classified since its samples were reset.
    pub fn probability(&self) -> Optioned<f64> {
        self.probability
    }

    pub(crate) fn add_member(&mut self, scalar: f64, surface_wind: WindSpdDir<MetersPSec>) {
        self.mean_wind = Some(wind::running_mean(
            self.mean_wind,
            self.sample.len(),
            surface_wind,
        ));
        self.sample.push(scalar);
    }

    pub(crate) fn set_probability(&mut self, probability: Optioned<f64>) {
        self.probability = probability;
    }

    fn reset(&mut self, bin_width: f64, bin_offset: f64) {
        self.sample.reset(bin_width, bin_offset);
        self.mean_wind = None;
        self.probability = none();
    }
}

/// An ordered set of clusters, the first in storage order wins where they overlap.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{ClusterPartition, Point};
///
/// let mut partition = ClusterPartition::new();
///
/// assert!(partition.begin_draw(Point::new(0.0, 0.0)));
/// partition.extend_draw(Point::new(10.0, 0.0));
/// partition.extend_draw(Point::new(10.0, 10.0));
/// let idx = partition.commit_draw(Point::new(0.0, 10.0));
///
/// assert_eq!(idx, Some(0));
/// assert_eq!(partition.index_of(Point::new(5.0, 5.0)), Some(0));
/// assert_eq!(partition.index_of(Point::new(50.0, 5.0)), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterPartition {
    clusters: Vec<Cluster>,
    defining: Option<usize>,
}

impl ClusterPartition {
    /// An empty partition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start drawing a new cluster at `pt`. Returns false, doing nothing, if a cluster is
    /// already being drawn.
    pub fn begin_draw(&mut self, pt: Point) -> bool {
        if self.defining.is_some() {
            return false;
        }

        let mut polygon = Polygon::new();
        polygon.push(pt);
        self.clusters.push(Cluster::new(polygon));
        self.defining = Some(self.clusters.len() - 1);

        true
    }

    /// Add a vertex to the cluster being drawn. Returns false if nothing is being drawn or
    /// the point repeats the last vertex.
    pub fn extend_draw(&mut self, pt: Point) -> bool {
        match self.defining {
            Some(idx) => self.clusters[idx].polygon.push(pt),
            None => false,
        }
    }

    /// Add the final vertex and finish drawing.
    ///
    /// Returns the index of the new cluster, or `None` if it had fewer than three vertices
    /// and was discarded, or if nothing was being drawn.
    pub fn commit_draw(&mut self, pt: Point) -> Option<usize> {
        let idx = self.defining.take()?;
        self.clusters[idx].polygon.push(pt);

        if self.clusters[idx].polygon.is_closed() {
            Some(idx)
        } else {
            self.clusters.remove(idx);
            None
        }
    }

    /// Index of the first committed cluster containing `pt`.
    pub fn index_of(&self, pt: Point) -> Option<usize> {
        self.clusters
            .iter()
            .enumerate()
            .filter(|&(idx, _)| Some(idx) != self.defining)
            .find(|(_, cluster)| cluster.contains(pt))
            .map(|(idx, _)| idx)
    }

    /// The first committed cluster containing `pt`.
    pub fn cluster_at(&self, pt: Point) -> Result<&Cluster> {
        self.index_of(pt)
            .map(|idx| &self.clusters[idx])
            .ok_or(AnalysisError::NoMatchingCluster)
    }

    /// Remove and return a cluster, `None` if the index is out of range.
    pub fn remove(&mut self, index: usize) -> Option<Cluster> {
        if index >= self.clusters.len() {
            return None;
        }

        self.defining = match self.defining {
            Some(d) if d == index => None,
            Some(d) if d > index => Some(d - 1),
            other => other,
        };

        Some(self.clusters.remove(index))
    }

    /// Abandon the cluster being drawn, if any.
    pub fn remove_defining(&mut self) -> Option<Cluster> {
        let idx = self.defining?;
        self.remove(idx)
    }

    /// Remove every cluster, including one being drawn.
    pub fn clear(&mut self) {
        self.clusters.clear();
        self.defining = None;
    }

    /// Commit a ring of constant `speed` around calm, approximated with `vertices` points.
    ///
    /// Fails if the ring would have fewer than three vertices or the speed is not positive.
    pub fn add_calm_cluster<T>(&mut self, speed: Knots, transform: &T, vertices: usize) -> Result<usize>
    where
        T: WindSpaceTransform + ?Sized,
    {
        if vertices < 3 {
            return Err(AnalysisError::InvalidConfig(format!(
                "a calm cluster needs at least 3 vertices, got {}",
                vertices
            )));
        }
        if !speed.unpack().is_finite() || speed.unpack() <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "calm cluster speed must be positive, got {}",
                speed.unpack()
            )));
        }

        let step = 360.0 / vertices as f64;
        let polygon: Polygon = (0..vertices)
            .map(|i| {
                transform.to_point(WindSpdDir {
                    speed,
                    direction: i as f64 * step,
                })
            })
            .collect();

        if !polygon.is_closed() {
            return Err(AnalysisError::InvalidConfig(
                "calm cluster ring collapsed to fewer than 3 distinct points".to_owned(),
            ));
        }

        self.clusters.push(Cluster::new(polygon));
        Ok(self.clusters.len() - 1)
    }

    /// Clear every cluster's sample, histogram, mean wind and probability.
    pub fn reset_samples(&mut self) {
        for cluster in &mut self.clusters {
            let width = cluster.histogram().width();
            let offset = cluster.histogram().offset();
            cluster.reset(width, offset);
        }
    }

    /// Clear every cluster's statistics and switch to a new histogram bin layout.
    pub(crate) fn reset_samples_with(&mut self, bin_width: f64, bin_offset: f64) {
        for cluster in &mut self.clusters {
            cluster.reset(bin_width, bin_offset);
        }
    }

    /// True while a cluster is being drawn.
    pub fn is_defining(&self) -> bool {
        self.defining.is_some()
    }

    /// Index of the cluster being drawn.
    pub fn defining_index(&self) -> Option<usize> {
        self.defining
    }

    /// The cluster being drawn.
    pub fn defining(&self) -> Option<&Cluster> {
        self.defining.map(|idx| &self.clusters[idx])
    }

    /// A cluster by index.
    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    /// Iterate over the committed clusters with their indexes.
    pub fn committed(&self) -> impl Iterator<Item = (usize, &Cluster)> {
        let defining = self.defining;
        self.clusters
            .iter()
            .enumerate()
            .filter(move |&(idx, _)| Some(idx) != defining)
    }

    /// Iterate over every cluster in storage order, including one being drawn.
    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Cluster> {
        self.clusters.get_mut(index)
    }

    /// Number of clusters, including one being drawn.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// True if there are no clusters.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
