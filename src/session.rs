//! One user's working state: the clusters they have drawn and how to score against them.
use crate::{
    classify::{self, Classification},
    cluster::ClusterPartition,
    config::ClassifierConfig,
    error::Result,
    query::{AnalogQuery, Ensemble},
    record::Predictor,
    store::StationStore,
    transform::WindSpaceTransform,
};
use tracing::debug;

/// A cluster partition paired with the classifier settings used on it.
///
/// Stores are shared read only between sessions, each session owns its partition.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{
///     AnalogQuery, ClassifierConfig, Point, Predictor, Session, StationStore, StoreConfig,
///     WindDisc,
/// };
/// use metfor::{Celsius, Knots, MetersPSec, WindSpdDir};
///
/// let lines = [
///     "201501011800:250:12.5:14.2:200:5.1",
///     "201501021800:260:11.0:13.8:210:4.0",
///     "201501031800:255:11.5:15.0:90:8.0",
/// ];
/// let store = StationStore::from_lines("YSSY", StoreConfig::new(), lines.iter()).unwrap();
///
/// let disc = WindDisc::new(Point::new(0.0, 0.0), 100.0, Knots(40.0)).unwrap();
/// let mut session = Session::new(ClassifierConfig::new()).unwrap();
/// session.partition_mut().add_calm_cluster(Knots(20.0), &disc, 24).unwrap();
///
/// let predictor = Predictor::new(
///     WindSpdDir { speed: MetersPSec(12.0), direction: 255.0 },
///     Celsius(14.0),
/// );
/// let (ensemble, result) = session.run(&store, &AnalogQuery::around(2, 3, 18, 0), &disc, &predictor);
///
/// assert_eq!(ensemble.len(), 3);
/// assert_eq!(result.members(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    partition: ClusterPartition,
    config: ClassifierConfig,
}

impl Session {
    /// Start a session with no clusters. Fails if the config is invalid.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;

        Ok(Session {
            partition: ClusterPartition::new(),
            config,
        })
    }

    /// The clusters drawn so far.
    pub fn partition(&self) -> &ClusterPartition {
        &self.partition
    }

    /// The clusters, for drawing and editing.
    pub fn partition_mut(&mut self) -> &mut ClusterPartition {
        &mut self.partition
    }

    /// Classifier settings.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Replace the classifier settings. Fails, leaving the old settings, if they are invalid.
    pub fn set_config(&mut self, config: ClassifierConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Retrieve the analog ensemble for `query` and classify it.
    pub fn run<T>(
        &mut self,
        store: &StationStore,
        query: &AnalogQuery,
        transform: &T,
        predictor: &Predictor,
    ) -> (Ensemble, Classification)
    where
        T: WindSpaceTransform + ?Sized,
    {
        let ensemble = store.query(query);
        debug!(station = store.station(), members = ensemble.len(), "session run");

        let classification = self.classify(&ensemble, transform, predictor);
        (ensemble, classification)
    }

    /// Classify an ensemble already in hand against the session's clusters.
    pub fn classify<T>(
        &mut self,
        ensemble: &Ensemble,
        transform: &T,
        predictor: &Predictor,
    ) -> Classification
    where
        T: WindSpaceTransform + ?Sized,
    {
        classify::classify(&mut self.partition, ensemble, transform, predictor, &self.config)
    }
}
