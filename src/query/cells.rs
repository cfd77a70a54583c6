use crate::{
    config::RoseConfig,
    error::Result,
    rose::{band_index, sector_index},
    wind::to_knots,
};
use metfor::{MetersPSec, WindSpdDir};
use std::collections::{btree_set, BTreeSet};

/// A selection of wind disc cells, each a `(sector, band)` pair laid out like a `WindRose`.
///
/// A gradient wind passes if it falls in a selected cell. An empty selection passes every
/// wind. Winds slower than the first threshold are in no cell.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::{GradientWindCells, RoseConfig};
/// use metfor::{MetersPSec, WindSpdDir};
///
/// let mut cells = GradientWindCells::new(RoseConfig::new().with_directions(4)).unwrap();
/// let westerly = WindSpdDir { speed: MetersPSec(6.0), direction: 265.0 };
/// assert!(cells.matches(westerly));
///
/// // Sector 3 is west, band 2 starts at 10 knots.
/// assert!(cells.add((3, 2)));
/// assert_eq!(cells.cell_of(westerly), Some((3, 2)));
/// assert!(cells.matches(westerly));
/// assert!(!cells.matches(WindSpdDir { speed: MetersPSec(6.0), direction: 90.0 }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradientWindCells {
    layout: RoseConfig,
    selected: BTreeSet<(usize, usize)>,
}

impl GradientWindCells {
    /// An empty selection over the sectors and speed bands of `layout`.
    pub fn new(layout: RoseConfig) -> Result<Self> {
        layout.validate()?;

        Ok(GradientWindCells {
            layout,
            selected: BTreeSet::new(),
        })
    }

    /// The sector and band layout.
    pub fn layout(&self) -> &RoseConfig {
        &self.layout
    }

    /// The cell a wind falls in, `None` if it is calm or not finite.
    pub fn cell_of(&self, wind: WindSpdDir<MetersPSec>) -> Option<(usize, usize)> {
        let wind = to_knots(wind);
        if !wind.direction.is_finite() {
            return None;
        }

        let band = band_index(wind.speed, self.layout.thresholds())?;
        Some((sector_index(wind.direction, self.layout.directions()), band))
    }

    fn in_layout(&self, (sector, band): (usize, usize)) -> bool {
        sector < self.layout.directions() && band < self.layout.thresholds().len()
    }

    /// Select a cell. Returns false if it was already selected or lies outside the layout.
    pub fn add(&mut self, cell: (usize, usize)) -> bool {
        self.in_layout(cell) && self.selected.insert(cell)
    }

    /// Select a cell if it is not selected, deselect it otherwise. Returns whether the cell
    /// is selected afterward.
    pub fn toggle(&mut self, cell: (usize, usize)) -> bool {
        if self.selected.remove(&cell) {
            false
        } else {
            self.add(cell)
        }
    }

    /// Deselect a cell, returns false if it was not selected.
    pub fn remove(&mut self, cell: (usize, usize)) -> bool {
        self.selected.remove(&cell)
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Is the cell selected?
    pub fn contains(&self, cell: (usize, usize)) -> bool {
        self.selected.contains(&cell)
    }

    /// The selected cells in order.
    pub fn iter(&self) -> btree_set::Iter<'_, (usize, usize)> {
        self.selected.iter()
    }

    /// Number of selected cells.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Does a gradient wind pass the selection?
    pub fn matches(&self, wind: WindSpdDir<MetersPSec>) -> bool {
        self.selected.is_empty()
            || self
                .cell_of(wind)
                .map_or(false, |cell| self.selected.contains(&cell))
    }
}
