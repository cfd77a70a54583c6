//! Wind vector helpers and the fixed conversion between data units and display units.
use metfor::{Knots, MetersPSec, Quantity, WindSpdDir, WindUV};

/// Meters per second in one knot. Data files store m/s, wind space and roses use knots.
pub const MPS_PER_KNOT: f64 = 0.514_444_44;

/// Convert a wind from data units to display units.
#[inline]
pub fn to_knots(wind: WindSpdDir<MetersPSec>) -> WindSpdDir<Knots> {
    WindSpdDir {
        speed: Knots(wind.speed.unpack() / MPS_PER_KNOT),
        direction: wind.direction,
    }
}

/// Convert a wind from display units back to data units.
#[inline]
pub fn to_mps(wind: WindSpdDir<Knots>) -> WindSpdDir<MetersPSec> {
    WindSpdDir {
        speed: MetersPSec(wind.speed.unpack() * MPS_PER_KNOT),
        direction: wind.direction,
    }
}

/// Magnitude of the vector difference between two winds.
///
/// Two winds of equal speed from opposite directions are twice their speed apart.
pub fn vector_difference(a: WindSpdDir<MetersPSec>, b: WindSpdDir<MetersPSec>) -> MetersPSec {
    let WindUV { u: ua, v: va } = WindUV::<MetersPSec>::from(a);
    let WindUV { u: ub, v: vb } = WindUV::<MetersPSec>::from(b);

    let du = (ua - ub).unpack();
    let dv = (va - vb).unpack();

    MetersPSec(du.hypot(dv))
}

/// Fold one more wind into a running vector mean of `n` winds.
///
/// The first wind sets the mean directly.
pub(crate) fn running_mean(
    mean: Option<WindUV<MetersPSec>>,
    n: usize,
    wind: WindSpdDir<MetersPSec>,
) -> WindUV<MetersPSec> {
    let WindUV { u, v } = WindUV::<MetersPSec>::from(wind);

    match mean {
        Some(WindUV { u: mu, v: mv }) if n > 0 => {
            let n = n as f64;
            WindUV {
                u: MetersPSec((mu.unpack() * n + u.unpack()) / (n + 1.0)),
                v: MetersPSec((mv.unpack() * n + v.unpack()) / (n + 1.0)),
            }
        }
        _ => WindUV { u, v },
    }
}

/// Vector mean of a collection of winds, `None` if there are none.
pub fn mean_wind<I>(winds: I) -> Option<WindSpdDir<MetersPSec>>
where
    I: IntoIterator<Item = WindSpdDir<MetersPSec>>,
{
    winds
        .into_iter()
        .enumerate()
        .fold(None, |mean, (n, wind)| Some(running_mean(mean, n, wind)))
        .map(WindSpdDir::<MetersPSec>::from)
}
