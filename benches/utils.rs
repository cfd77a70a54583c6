#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate};
use gradient_wind_analysis::{
    Calendar, ClusterPartition, Point, Predictor, StationStore, StoreConfig, WindDisc,
    WindSpaceTransform, TIMESTAMP_FORMAT,
};
use metfor::{Celsius, Knots, MetersPSec, WindSpdDir};

/// Thirty years of six hourly observations with a seasonal cycle and a daily veer.
pub fn climatology_lines() -> Vec<String> {
    let mut lines = Vec::with_capacity(30 * 366 * 4);

    for year in 1981..2011 {
        let mut date = NaiveDate::from_ymd(year, 1, 1);
        while date.year() == year {
            let doy = date.ordinal0() as f64;
            let temperature = 12.0 - 8.0 * (2.0 * std::f64::consts::PI * doy / 365.0).cos();

            for &hour in &[0, 6, 12, 18] {
                let time = date.and_hms(hour, 0, 0);
                let direction = (doy * 7.0 + f64::from(hour) * 15.0 + f64::from(year)) % 360.0;
                let speed = 3.0 + (doy + f64::from(year)) % 20.0;
                lines.push(format!(
                    "{}:{}:{}:{}:{}:{}",
                    time.format(TIMESTAMP_FORMAT),
                    direction,
                    speed,
                    temperature + f64::from(year % 5) - 2.0,
                    (direction + 30.0) % 360.0,
                    speed * 0.6
                ));
            }

            date = date + Duration::days(1);
        }
    }

    lines
}

pub fn load_store(calendar: Calendar) -> StationStore {
    StationStore::from_lines(
        "BNCH",
        StoreConfig::new().with_calendar(calendar),
        climatology_lines(),
    )
    .expect("Error building store")
}

pub fn disc() -> WindDisc {
    WindDisc::new(Point::new(0.0, 0.0), 100.0, Knots(50.0)).expect("Invalid disc")
}

pub fn predictor() -> Predictor {
    Predictor::new(
        WindSpdDir {
            speed: MetersPSec(10.0),
            direction: 270.0,
        },
        Celsius(11.0),
    )
}

/// A calm ring plus one square per quadrant.
pub fn partition(disc: &WindDisc) -> ClusterPartition {
    let mut partition = ClusterPartition::new();
    partition
        .add_calm_cluster(Knots(3.0), disc, 24)
        .expect("Error adding calm cluster");

    for &direction in &[45.0, 135.0, 225.0, 315.0] {
        let c = disc.to_point(WindSpdDir {
            speed: Knots(12.0),
            direction,
        });
        partition.begin_draw(Point::new(c.x - 10.0, c.y - 10.0));
        partition.extend_draw(Point::new(c.x + 10.0, c.y - 10.0));
        partition.extend_draw(Point::new(c.x + 10.0, c.y + 10.0));
        partition.commit_draw(Point::new(c.x - 10.0, c.y + 10.0));
    }

    partition
}
