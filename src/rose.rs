//! Frequency of surface winds by direction sector and speed band.
use crate::{
    config::RoseConfig,
    error::Result,
    query::Ensemble,
    wind::to_knots,
};
use metfor::{Knots, MetersPSec, Quantity, WindSpdDir};
use optional::{none, some, Optioned};

/// Counts of surface winds binned by direction and speed, in knots.
///
/// Sector 0 is centered on north and sectors run clockwise. Band `i` holds speeds from the
/// `i`th threshold up to, but not including, the next one; the last band is open ended.
/// Winds slower than the first threshold are calm and have no direction.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{RoseConfig, WindRose};
/// use metfor::{Knots, WindSpdDir};
///
/// let config = RoseConfig::new().with_directions(4).with_thresholds(vec![Knots(2.0), Knots(10.0)]);
/// let winds = vec![
///     WindSpdDir { speed: Knots(1.0), direction: 90.0 },
///     WindSpdDir { speed: Knots(5.0), direction: 350.0 },
///     WindSpdDir { speed: Knots(15.0), direction: 95.0 },
/// ];
///
/// let rose = WindRose::from_winds(winds, &config).unwrap();
/// assert_eq!(rose.calm(), 1);
/// assert_eq!(rose.count(0, 0), 1);
/// assert_eq!(rose.count(1, 1), 1);
/// assert_eq!(rose.total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WindRose {
    thresholds: Vec<Knots>,
    counts: Vec<Vec<usize>>,
    calm: usize,
    total: usize,
}

impl WindRose {
    /// Count the surface winds of an ensemble, skipping members without one.
    pub fn from_ensemble(ensemble: &Ensemble, config: &RoseConfig) -> Result<Self> {
        Self::from_winds(ensemble.surface_winds().map(to_knots), config)
    }

    /// Count winds already in knots.
    pub fn from_winds<I>(winds: I, config: &RoseConfig) -> Result<Self>
    where
        I: IntoIterator<Item = WindSpdDir<Knots>>,
    {
        config.validate()?;

        let mut rose = WindRose {
            thresholds: config.thresholds().to_vec(),
            counts: vec![vec![0; config.thresholds().len()]; config.directions()],
            calm: 0,
            total: 0,
        };

        for wind in winds {
            rose.add(wind);
        }

        Ok(rose)
    }

    /// Count one more wind. Winds with a non-finite speed or direction are ignored.
    pub fn add(&mut self, wind: WindSpdDir<Knots>) {
        let speed = wind.speed.unpack();
        if !speed.is_finite() || !wind.direction.is_finite() {
            return;
        }

        self.total += 1;

        match self.band(wind.speed) {
            Some(band) => {
                let sector = self.sector(wind.direction);
                self.counts[sector][band] += 1;
            }
            None => self.calm += 1,
        }
    }

    /// Count one more wind in data units.
    pub fn add_mps(&mut self, wind: WindSpdDir<MetersPSec>) {
        self.add(to_knots(wind));
    }

    fn band(&self, speed: Knots) -> Option<usize> {
        band_index(speed, &self.thresholds)
    }

    fn sector(&self, direction: f64) -> usize {
        sector_index(direction, self.counts.len())
    }

    /// Number of direction sectors.
    pub fn directions(&self) -> usize {
        self.counts.len()
    }

    /// Angular width of a sector in degrees.
    pub fn sector_width(&self) -> f64 {
        360.0 / self.counts.len() as f64
    }

    /// The direction at the middle of a sector.
    pub fn sector_center(&self, sector: usize) -> f64 {
        sector as f64 * self.sector_width()
    }

    /// Lower edges of the speed bands.
    pub fn thresholds(&self) -> &[Knots] {
        &self.thresholds
    }

    /// Winds in a sector and band, 0 if either is out of range.
    pub fn count(&self, sector: usize, band: usize) -> usize {
        self.counts
            .get(sector)
            .and_then(|bands| bands.get(band))
            .cloned()
            .unwrap_or(0)
    }

    /// Winds in a sector over all bands.
    pub fn sector_total(&self, sector: usize) -> usize {
        self.counts
            .get(sector)
            .map(|bands| bands.iter().sum())
            .unwrap_or(0)
    }

    /// Calm winds.
    pub fn calm(&self) -> usize {
        self.calm
    }

    /// All winds counted, calm included.
    pub fn total(&self) -> usize {
        self.total
    }

    /// A cell's share of all winds counted, in percent. None when nothing was counted.
    pub fn percentage(&self, sector: usize, band: usize) -> Optioned<f64> {
        self.percent_of_total(self.count(sector, band))
    }

    /// Calm winds as a percent of all winds counted.
    pub fn calm_percentage(&self) -> Optioned<f64> {
        self.percent_of_total(self.calm)
    }

    /// Percent of winds in a sector in the given band or any slower one, the radius a
    /// stacked rose draws that band out to.
    pub fn cumulative_percentage(&self, sector: usize, band: usize) -> Optioned<f64> {
        let count = (0..=band).map(|b| self.count(sector, b)).sum();
        self.percent_of_total(count)
    }

    fn percent_of_total(&self, count: usize) -> Optioned<f64> {
        if self.total == 0 {
            none()
        } else {
            some(100.0 * count as f64 / self.total as f64)
        }
    }
}

/// The speed band holding `speed`, `None` below the first threshold.
pub(crate) fn band_index(speed: Knots, thresholds: &[Knots]) -> Option<usize> {
    thresholds
        .iter()
        .rposition(|threshold| speed.unpack() >= threshold.unpack())
}

/// The direction sector holding `direction` when the circle is cut into `directions` sectors,
/// sector 0 centered on north.
pub(crate) fn sector_index(direction: f64, directions: usize) -> usize {
    let width = 360.0 / directions as f64;
    let idx = ((direction + width / 2.0).rem_euclid(360.0) / width).floor() as usize;
    idx % directions
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::{make_line, make_record};
    use crate::utility::test_tools::approx_equal;
    use crate::wind::MPS_PER_KNOT;

    fn kts(direction: f64, speed: f64) -> WindSpdDir<Knots> {
        WindSpdDir {
            speed: Knots(speed),
            direction,
        }
    }

    #[test]
    fn test_sectors() {
        let rose = WindRose::from_winds(
            vec![
                kts(0.0, 6.0),
                kts(11.0, 6.0),
                kts(349.0, 6.0),
                kts(12.0, 6.0),
                kts(180.0, 6.0),
            ],
            &RoseConfig::new(),
        )
        .unwrap();

        // 16 sectors 22.5 degrees wide, north spans [348.75, 11.25).
        assert_eq!(rose.sector_total(0), 3);
        assert_eq!(rose.sector_total(1), 1);
        assert_eq!(rose.sector_total(8), 1);
        assert!(approx_equal(rose.sector_center(4), 90.0, 1.0e-12));
    }

    #[test]
    fn test_bands_and_calm() {
        let rose = WindRose::from_winds(
            vec![
                kts(90.0, 1.9),
                kts(90.0, 2.0),
                kts(90.0, 4.9),
                kts(90.0, 5.0),
                kts(90.0, 60.0),
                kts(std::f64::NAN, 10.0),
            ],
            &RoseConfig::new(),
        )
        .unwrap();

        assert_eq!(rose.total(), 5);
        assert_eq!(rose.calm(), 1);
        assert_eq!(rose.count(4, 0), 2);
        assert_eq!(rose.count(4, 1), 1);
        assert_eq!(rose.count(4, 7), 1);
        assert_eq!(rose.count(99, 0), 0);

        assert!(approx_equal(rose.percentage(4, 0).unpack(), 40.0, 1.0e-10));
        assert!(approx_equal(rose.calm_percentage().unpack(), 20.0, 1.0e-10));
        assert!(approx_equal(
            rose.cumulative_percentage(4, 1).unpack(),
            60.0,
            1.0e-10
        ));
    }

    #[test]
    fn test_from_ensemble() {
        // 12 knots from the west and one missing surface wind.
        let speed = 12.0 * MPS_PER_KNOT;
        let ens: Ensemble = vec![
            make_record(&make_line(2010, 3, 1, 0, 270.0, 10.0, 5.0, 270.0, speed)),
            make_record(&make_line(2010, 3, 2, 0, 270.0, 10.0, 5.0, 270.0, speed)),
            make_record(&make_line(2010, 3, 3, 0, 270.0, 10.0, 5.0, std::f64::NAN, 3.0)),
        ]
        .into_iter()
        .collect();

        let rose = WindRose::from_ensemble(&ens, &RoseConfig::new()).unwrap();
        assert_eq!(rose.total(), 2);
        assert_eq!(rose.count(12, 2), 2);
    }

    #[test]
    fn test_empty_and_invalid() {
        let rose = WindRose::from_winds(Vec::new(), &RoseConfig::new()).unwrap();
        assert!(rose.percentage(0, 0).is_none());

        assert!(WindRose::from_winds(Vec::new(), &RoseConfig::new().with_directions(0)).is_err());
    }
}
