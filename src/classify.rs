//! Posterior probability of each wind regime given a predictor temperature.
//!
//! Ensemble members are bucketed by where their surface wind plots in wind space: into the
//! first cluster containing it, or into the rest bucket if none does. Members without a
//! surface wind count toward the ensemble size but land in no bucket. Each bucket's gradient
//! temperatures are fitted with a Gaussian and the predictor is scored against it, weighted
//! by the bucket's share of the ensemble. Normalizing the weights gives the posterior.
use crate::{
    cluster::ClusterPartition,
    config::ClassifierConfig,
    query::Ensemble,
    record::Predictor,
    transform::WindSpaceTransform,
    wind::to_knots,
};
use metfor::Quantity;
use optional::{none, some, Optioned};
use tracing::debug;

pub use self::{
    gaussian::Gaussian,
    histogram::{Histogram, Sample},
};

mod gaussian;
mod histogram;

/// A bucket an ensemble member can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// The cluster at this index of the partition.
    Cluster(usize),
    /// Outside every cluster.
    Rest,
}

/// The outcome of classifying one ensemble against a predictor.
#[derive(Debug, Clone)]
pub struct Classification {
    members: usize,
    missing_surface_wind: usize,
    rest: Sample,
    rest_probability: Optioned<f64>,
    probabilities: Vec<Optioned<f64>>,
}

impl Classification {
    /// Size of the ensemble, including members with no surface wind.
    pub fn members(&self) -> usize {
        self.members
    }

    /// Members skipped because their surface wind was missing.
    pub fn missing_surface_wind(&self) -> usize {
        self.missing_surface_wind
    }

    /// Gradient temperatures of the members outside every cluster.
    pub fn rest(&self) -> &Sample {
        &self.rest
    }

    /// Histogram of the rest bucket.
    pub fn rest_histogram(&self) -> &Histogram {
        self.rest.histogram()
    }

    /// Posterior probability of the rest bucket.
    pub fn rest_probability(&self) -> Optioned<f64> {
        self.rest_probability
    }

    /// Posterior probability for each cluster, by partition index. A cluster still being
    /// drawn gets none.
    pub fn probabilities(&self) -> &[Optioned<f64>] {
        &self.probabilities
    }

    /// Posterior probability of a regime, none if undefined or out of range.
    pub fn probability(&self, regime: Regime) -> Optioned<f64> {
        match regime {
            Regime::Cluster(idx) => self.probabilities.get(idx).cloned().unwrap_or_else(none),
            Regime::Rest => self.rest_probability,
        }
    }

    /// False when no bucket could score the predictor, in which case every probability is
    /// none.
    pub fn is_informative(&self) -> bool {
        self.rest_probability.is_some()
    }

    /// The regime with the highest posterior, clusters winning ties in index order, rest last.
    pub fn most_probable(&self) -> Option<Regime> {
        self.probabilities
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.into_option().map(|p| (Regime::Cluster(idx), p)))
            .chain(
                self.rest_probability
                    .into_option()
                    .map(|p| (Regime::Rest, p)),
            )
            .fold(None, |best: Option<(Regime, f64)>, (regime, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((regime, p)),
            })
            .map(|(regime, _)| regime)
    }
}

/// Bucket the ensemble, fit the buckets and score the predictor.
///
/// The partition's samples are reset first, then refilled from the ensemble and left in place
/// along with each cluster's probability so they can be rendered. Surface winds are converted
/// to knots before they are placed in wind space. The config is assumed valid, see
/// `ClassifierConfig::validate`.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{
///     classify, ClassifierConfig, ClusterPartition, Ensemble, Point, Predictor, WindDisc,
/// };
/// use metfor::{Celsius, Knots, MetersPSec, WindSpdDir};
///
/// let disc = WindDisc::new(Point::new(0.0, 0.0), 100.0, Knots(50.0)).unwrap();
/// let mut partition = ClusterPartition::new();
/// partition.add_calm_cluster(Knots(5.0), &disc, 24).unwrap();
///
/// let predictor = Predictor::new(
///     WindSpdDir { speed: MetersPSec(10.0), direction: 270.0 },
///     Celsius(12.0),
/// );
///
/// // Nothing to learn from an empty ensemble.
/// let result = classify(&mut partition, &Ensemble::new(), &disc, &predictor, &ClassifierConfig::new());
/// assert!(!result.is_informative());
/// assert!(result.most_probable().is_none());
/// ```
pub fn classify<T>(
    partition: &mut ClusterPartition,
    ensemble: &Ensemble,
    transform: &T,
    predictor: &Predictor,
    config: &ClassifierConfig,
) -> Classification
where
    T: WindSpaceTransform + ?Sized,
{
    let (width, offset) = (config.bin_width(), config.bin_offset());
    partition.reset_samples_with(width, offset);

    let mut rest = Sample::new(width, offset);
    let mut missing_surface_wind = 0;

    for record in ensemble {
        let surface_wind = match record.surface_wind().into_option() {
            Some(wind) => wind,
            None => {
                missing_surface_wind += 1;
                continue;
            }
        };

        let pt = transform.to_point(to_knots(surface_wind));
        match partition.index_of(pt) {
            Some(idx) => {
                if let Some(cluster) = partition.get_mut(idx) {
                    cluster.add_member(record.scalar(), surface_wind);
                }
            }
            None => rest.push(record.scalar()),
        }
    }

    let members = ensemble.len();
    let x = predictor.gradient_temperature.unpack();
    let form = config.likelihood();
    let weight = |sample: &Sample| -> f64 {
        if members == 0 {
            return 0.0;
        }
        let share = sample.len() as f64 / members as f64;
        gaussian::fitted_likelihood(sample.values(), x, form) * share
    };

    let defining = partition.defining_index();
    let cluster_weights: Vec<Option<f64>> = partition
        .iter()
        .enumerate()
        .map(|(idx, cluster)| {
            if Some(idx) == defining {
                None
            } else {
                Some(weight(cluster.sample()))
            }
        })
        .collect();
    let rest_weight = weight(&rest);

    let denominator = rest_weight + cluster_weights.iter().flatten().sum::<f64>();
    let normalize = |w: f64| -> Optioned<f64> {
        if denominator.is_finite() && denominator > 0.0 {
            some(w / denominator)
        } else {
            none()
        }
    };

    let probabilities: Vec<Optioned<f64>> = cluster_weights
        .iter()
        .map(|w| w.map_or_else(none, normalize))
        .collect();
    let rest_probability = normalize(rest_weight);

    for (idx, &p) in probabilities.iter().enumerate() {
        if let Some(cluster) = partition.get_mut(idx) {
            cluster.set_probability(p);
        }
    }

    debug!(
        members,
        missing_surface_wind,
        rest = rest.len(),
        clusters = probabilities.len(),
        informative = rest_probability.is_some(),
        "classified ensemble"
    );

    Classification {
        members,
        missing_surface_wind,
        rest,
        rest_probability,
        probabilities,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::Likelihood,
        record::Record,
        transform::{Point, WindDisc},
        utility::test_tools::approx_equal,
        wind::to_mps,
    };
    use chrono::NaiveDate;
    use metfor::{Celsius, Knots, MetersPSec, WindSpdDir};

    fn disc() -> WindDisc {
        WindDisc::new(Point::new(0.0, 0.0), 100.0, Knots(50.0)).unwrap()
    }

    fn square(partition: &mut ClusterPartition, center: Point, half: f64) -> usize {
        partition.begin_draw(Point::new(center.x - half, center.y - half));
        partition.extend_draw(Point::new(center.x + half, center.y - half));
        partition.extend_draw(Point::new(center.x + half, center.y + half));
        partition
            .commit_draw(Point::new(center.x - half, center.y + half))
            .unwrap()
    }

    fn member(n: usize, direction: f64, temperature: f64) -> Record {
        let time = NaiveDate::from_ymd(2000, 1, 1).and_hms(0, 0, 0)
            + chrono::Duration::hours(n as i64);
        let gradient = WindSpdDir {
            speed: MetersPSec(10.0),
            direction: 270.0,
        };
        let surface = to_mps(WindSpdDir {
            speed: Knots(20.0),
            direction,
        });
        Record::new(time, gradient, Celsius(temperature), surface)
    }

    fn predictor(temperature: f64) -> Predictor {
        Predictor::new(
            WindSpdDir {
                speed: MetersPSec(10.0),
                direction: 270.0,
            },
            Celsius(temperature),
        )
    }

    // Cluster A holds easterlies, cluster B westerlies, northerlies fall in the rest bucket.
    fn regimes() -> (ClusterPartition, Ensemble, WindDisc) {
        let disc = disc();
        let mut partition = ClusterPartition::new();

        let east = disc.to_point(WindSpdDir {
            speed: Knots(20.0),
            direction: 90.0,
        });
        let west = disc.to_point(WindSpdDir {
            speed: Knots(20.0),
            direction: 270.0,
        });
        assert_eq!(square(&mut partition, east, 10.0), 0);
        assert_eq!(square(&mut partition, west, 10.0), 1);

        let alternate = |i: usize, mean: f64, spread: f64| {
            if i % 2 == 0 {
                mean - spread
            } else {
                mean + spread
            }
        };

        let mut n = 0;
        let mut ensemble = Ensemble::new();
        for i in 0..30 {
            ensemble.insert(member(n, 90.0, alternate(i, 5.0, 1.0)));
            n += 1;
        }
        for i in 0..20 {
            ensemble.insert(member(n, 270.0, alternate(i, 15.0, 1.0)));
            n += 1;
        }
        for i in 0..50 {
            ensemble.insert(member(n, 0.0, alternate(i, 10.0, 3.0)));
            n += 1;
        }
        assert_eq!(ensemble.len(), 100);

        (partition, ensemble, disc)
    }

    fn total(result: &Classification) -> f64 {
        result
            .probabilities()
            .iter()
            .filter_map(|p| p.into_option())
            .sum::<f64>()
            + result.rest_probability().unpack()
    }

    #[test]
    fn test_three_regimes() {
        let (mut partition, ensemble, disc) = regimes();
        let result = classify(
            &mut partition,
            &ensemble,
            &disc,
            &predictor(5.0),
            &ClassifierConfig::new(),
        );

        assert!(result.is_informative());
        assert_eq!(result.members(), 100);
        assert_eq!(result.rest().len(), 50);
        assert_eq!(partition.get(0).unwrap().sample().len(), 30);
        assert_eq!(partition.get(1).unwrap().sample().len(), 20);

        assert_eq!(result.most_probable(), Some(Regime::Cluster(0)));
        assert!(approx_equal(total(&result), 1.0, 1.0e-10));

        // Probabilities are left on the clusters for rendering.
        let a = partition.get(0).unwrap().probability();
        assert!(approx_equal(
            a.unpack(),
            result.probability(Regime::Cluster(0)).unpack(),
            1.0e-12
        ));

        // Mean wind of cluster A is the common easterly.
        let mean = partition.get(0).unwrap().mean_wind().unwrap();
        assert!(approx_equal(mean.direction, 90.0, 1.0e-6));

        let warm = classify(
            &mut partition,
            &ensemble,
            &disc,
            &predictor(15.0),
            &ClassifierConfig::new(),
        );
        assert_eq!(warm.most_probable(), Some(Regime::Cluster(1)));

        let mild = classify(
            &mut partition,
            &ensemble,
            &disc,
            &predictor(10.0),
            &ClassifierConfig::new().with_likelihood(Likelihood::Density),
        );
        assert_eq!(mild.most_probable(), Some(Regime::Rest));
        assert!(approx_equal(total(&mild), 1.0, 1.0e-10));
    }

    #[test]
    fn test_reclassify_resets() {
        let (mut partition, ensemble, disc) = regimes();
        let config = ClassifierConfig::new();

        classify(&mut partition, &ensemble, &disc, &predictor(5.0), &config);
        classify(&mut partition, &ensemble, &disc, &predictor(5.0), &config);

        assert_eq!(partition.get(0).unwrap().sample().len(), 30);
        assert_eq!(partition.get(0).unwrap().histogram().total(), 30);
    }

    #[test]
    fn test_missing_surface_winds_count_toward_share() {
        let disc = disc();
        let mut partition = ClusterPartition::new();
        partition.add_calm_cluster(Knots(40.0), &disc, 36).unwrap();

        let gradient = WindSpdDir {
            speed: MetersPSec(10.0),
            direction: 270.0,
        };
        let mut ensemble = Ensemble::new();
        ensemble.insert(member(0, 90.0, 4.0));
        ensemble.insert(member(1, 90.0, 6.0));
        for n in 2..4 {
            let time = NaiveDate::from_ymd(2000, 1, 1).and_hms(n, 0, 0);
            ensemble.insert(Record::new(
                time,
                gradient,
                Celsius(5.0),
                optional::none::<WindSpdDir<MetersPSec>>(),
            ));
        }

        let result = classify(
            &mut partition,
            &ensemble,
            &disc,
            &predictor(5.0),
            &ClassifierConfig::new(),
        );

        assert_eq!(result.members(), 4);
        assert_eq!(result.missing_surface_wind(), 2);
        assert_eq!(result.rest().len(), 0);
        // Only one bucket scores, so it takes everything.
        assert!(approx_equal(
            result.probability(Regime::Cluster(0)).unpack(),
            1.0,
            1.0e-12
        ));
        assert!(approx_equal(result.rest_probability().unpack(), 0.0, 1.0e-12));
    }

    #[test]
    fn test_degenerate_is_uninformative() {
        let (mut partition, _, disc) = regimes();

        // One member per bucket, no bucket can be fitted.
        let ensemble: Ensemble = vec![
            member(0, 90.0, 5.0),
            member(1, 270.0, 15.0),
            member(2, 0.0, 10.0),
        ]
        .into_iter()
        .collect();

        let result = classify(
            &mut partition,
            &ensemble,
            &disc,
            &predictor(5.0),
            &ClassifierConfig::new(),
        );
        assert!(!result.is_informative());
        assert!(result.probabilities().iter().all(|p| p.is_none()));
        assert!(result.most_probable().is_none());
        assert!(partition.iter().all(|c| c.probability().is_none()));
    }

    #[test]
    fn test_defining_cluster_not_scored() {
        let (mut partition, ensemble, disc) = regimes();

        // Start drawing around the northerlies without finishing.
        partition.begin_draw(Point::new(-10.0, -60.0));
        partition.extend_draw(Point::new(10.0, -60.0));
        partition.extend_draw(Point::new(10.0, -20.0));
        partition.extend_draw(Point::new(-10.0, -20.0));

        let result = classify(
            &mut partition,
            &ensemble,
            &disc,
            &predictor(10.0),
            &ClassifierConfig::new(),
        );

        assert_eq!(result.probabilities().len(), 3);
        assert!(result.probabilities()[2].is_none());
        assert_eq!(result.rest().len(), 50);
        assert!(approx_equal(total(&result), 1.0, 1.0e-10));
    }
}
