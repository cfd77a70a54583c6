//! Distances on periodic domains such as the day of the year and the hour of the day, and
//! reading the line oriented data files.
use crate::error::{AnalysisError, Result};
use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Wrap-around distance between two points on a periodic domain of length `modulus`.
///
/// December 31st neighbors January 1st and hour 23 neighbors hour 0, so the distance is the
/// shorter of the two ways around the circle.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::circular_distance;
///
/// assert_eq!(circular_distance(364, 1, 365), 2);
/// assert_eq!(circular_distance(23, 0, 24), 1);
/// assert_eq!(circular_distance(6, 9, 24), 3);
/// ```
#[inline]
pub fn circular_distance(a: u16, b: u16, modulus: u16) -> u16 {
    debug_assert!(modulus > 0);

    let diff = (i32::from(a) - i32::from(b)).rem_euclid(i32::from(modulus)) as u16;
    diff.min(modulus - diff)
}

/// Whether `a` is within `tolerance` of `b` on a periodic domain. The bound is inclusive.
///
/// # Examples
///
/// ```rust
/// use gradient_wind_analysis::circular_match;
///
/// assert!(circular_match(364, 1, 2, 365));
/// assert!(!circular_match(364, 1, 1, 365));
/// ```
#[inline]
pub fn circular_match(a: u16, b: u16, tolerance: u16, modulus: u16) -> bool {
    circular_distance(a, b, modulus) <= tolerance
}

/// Read every line of a text file, decompressing it first if the name ends in `.gz`.
pub(crate) fn read_lines(path: &Path) -> Result<Vec<String>> {
    let io_err = |source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    BufReader::new(reader)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(io_err)
}
