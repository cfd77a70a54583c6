use crate::transform::Point;
use itertools::Itertools;

/// A closed polygon in wind space, the last vertex joins back to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// An empty polygon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex. A vertex equal to the current last vertex is dropped; returns whether
    /// the vertex was added.
    pub fn push(&mut self, pt: Point) -> bool {
        if self.vertices.last() == Some(&pt) {
            return false;
        }
        self.vertices.push(pt);
        true
    }

    /// The vertices in drawing order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if no vertices have been added.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// A polygon needs three vertices to enclose anything.
    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Even-odd crossing test. Works for concave polygons, self intersecting ones get
    /// whatever the crossing count says.
    pub fn contains(&self, pt: Point) -> bool {
        if !self.is_closed() {
            return false;
        }

        self.vertices
            .iter()
            .circular_tuple_windows()
            .filter(|&(a, b)| {
                (a.y > pt.y) != (b.y > pt.y)
                    && pt.x < (b.x - a.x) * (pt.y - a.y) / (b.y - a.y) + a.x
            })
            .count()
            % 2
            == 1
    }
}

impl std::iter::FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut poly = Polygon::new();
        for pt in iter {
            poly.push(pt);
        }
        poly
    }
}
