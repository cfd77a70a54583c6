//! Mapping between polar winds and the Cartesian plane clusters are drawn on.
use crate::error::{AnalysisError, Result};
use metfor::{Knots, Quantity, WindSpdDir};

/// A location in wind space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate, increasing to the right.
    pub x: f64,
    /// Vertical coordinate, increasing downward as on a screen.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// A bijection between winds in display units and points in wind space.
///
/// Rendering layers implement this for whatever plot they draw; clusters are hit tested in
/// the coordinates it produces.
pub trait WindSpaceTransform {
    /// The point a wind is plotted at.
    fn to_point(&self, wind: WindSpdDir<Knots>) -> Point;

    /// The wind plotted at a point.
    fn to_wind(&self, point: Point) -> WindSpdDir<Knots>;
}

/// A polar plot: north at the top, calm at `origin`, `max_speed` on a circle of `radius`.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{Point, WindDisc, WindSpaceTransform};
/// use metfor::{Knots, WindSpdDir};
///
/// let disc = WindDisc::new(Point::new(100.0, 100.0), 100.0, Knots(50.0)).unwrap();
///
/// // A 25 knot easterly plots half way to the right edge.
/// let pt = disc.to_point(WindSpdDir { speed: Knots(25.0), direction: 90.0 });
/// assert!((pt.x - 150.0).abs() < 1.0e-9);
/// assert!((pt.y - 100.0).abs() < 1.0e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindDisc {
    origin: Point,
    radius: f64,
    max_speed: Knots,
}

impl WindDisc {
    /// Create a disc, the radius and maximum speed must be positive.
    pub fn new(origin: Point, radius: f64, max_speed: Knots) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "wind disc radius must be positive, got {}",
                radius
            )));
        }
        if !max_speed.unpack().is_finite() || max_speed.unpack() <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "wind disc maximum speed must be positive, got {}",
                max_speed.unpack()
            )));
        }
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(AnalysisError::InvalidConfig(
                "wind disc origin must be finite".to_owned(),
            ));
        }

        Ok(WindDisc {
            origin,
            radius,
            max_speed,
        })
    }

    /// Where calm winds plot.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Distance from the origin to the `max_speed` circle.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The speed plotted on the outer circle.
    pub fn max_speed(&self) -> Knots {
        self.max_speed
    }

    fn scale(&self) -> f64 {
        self.radius / self.max_speed.unpack()
    }
}

impl WindSpaceTransform for WindDisc {
    fn to_point(&self, wind: WindSpdDir<Knots>) -> Point {
        let r = wind.speed.unpack() * self.scale();
        let theta = wind.direction.to_radians();

        Point {
            x: self.origin.x + r * theta.sin(),
            y: self.origin.y - r * theta.cos(),
        }
    }

    fn to_wind(&self, point: Point) -> WindSpdDir<Knots> {
        let dx = point.x - self.origin.x;
        let dy = self.origin.y - point.y;

        let speed = dx.hypot(dy) / self.scale();
        let direction = if speed == 0.0 {
            0.0
        } else {
            dx.atan2(dy).to_degrees().rem_euclid(360.0)
        };

        WindSpdDir {
            speed: Knots(speed),
            direction,
        }
    }
}
