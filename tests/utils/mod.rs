#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use flate2::{write::GzEncoder, Compression};
use gradient_wind_analysis::{
    to_mps, ClusterPartition, Ensemble, Point, Predictor, Record, WindDisc, WindSpaceTransform,
    TIMESTAMP_FORMAT,
};
use metfor::{Celsius, Knots, MetersPSec, WindSpdDir};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

pub const FIRST_YEAR: i32 = 2001;
pub const LAST_YEAR: i32 = 2005;
pub const HOURS: [u32; 4] = [0, 6, 12, 18];

/// Format a historical data line, `NaN` surface values mark a missing surface wind.
pub fn line(
    time: NaiveDateTime,
    gradient_direction: f64,
    gradient_speed: f64,
    gradient_temperature: f64,
    surface_direction: f64,
    surface_speed: f64,
) -> String {
    format!(
        "{}:{}:{}:{}:{}:{}",
        time.format(TIMESTAMP_FORMAT),
        gradient_direction,
        gradient_speed,
        gradient_temperature,
        surface_direction,
        surface_speed
    )
}

/// Five years of six hourly observations with a seasonal temperature cycle.
pub fn climatology() -> Vec<String> {
    let mut lines = Vec::new();

    for year in FIRST_YEAR..=LAST_YEAR {
        let mut date = NaiveDate::from_ymd(year, 1, 1);
        while date.year() == year {
            let doy = date.ordinal0() as f64;
            let temperature = 12.0 - 8.0 * (2.0 * std::f64::consts::PI * doy / 365.0).cos();

            for &hour in &HOURS {
                let time = date.and_hms(hour, 0, 0);
                let direction = (doy * 7.0 + f64::from(hour) * 15.0) % 360.0;
                let speed = 5.0 + doy % 15.0;
                lines.push(line(
                    time,
                    direction,
                    speed,
                    temperature,
                    (direction + 30.0) % 360.0,
                    speed / 2.0,
                ));
            }

            date = date + Duration::days(1);
        }
    }

    lines
}

pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "gradient-wind-analysis-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Error creating scratch directory");
    dir
}

pub fn write_gz(path: &Path, lines: &[String]) {
    let file = File::create(path).expect("Error creating file");
    let mut encoder = GzEncoder::new(file, Compression::default());
    for line in lines {
        writeln!(encoder, "{}", line).expect("Error writing line");
    }
    encoder.finish().expect("Error finishing gzip stream");
}

pub fn disc() -> WindDisc {
    WindDisc::new(Point::new(0.0, 0.0), 100.0, Knots(50.0)).expect("Invalid disc")
}

pub fn predictor(temperature: f64) -> Predictor {
    Predictor::new(
        WindSpdDir {
            speed: MetersPSec(10.0),
            direction: 270.0,
        },
        Celsius(temperature),
    )
}

/// Draw a square cluster centered on a point.
pub fn draw_square(partition: &mut ClusterPartition, center: Point, half: f64) -> Option<usize> {
    partition.begin_draw(Point::new(center.x - half, center.y - half));
    partition.extend_draw(Point::new(center.x + half, center.y - half));
    partition.extend_draw(Point::new(center.x + half, center.y + half));
    partition.commit_draw(Point::new(center.x - half, center.y + half))
}

fn member(n: usize, surface_direction: f64, temperature: f64) -> Record {
    let time = NaiveDate::from_ymd(2000, 1, 1).and_hms(0, 0, 0) + Duration::hours(n as i64);
    let gradient = WindSpdDir {
        speed: MetersPSec(10.0),
        direction: 270.0,
    };
    let surface = to_mps(WindSpdDir {
        speed: Knots(20.0),
        direction: surface_direction,
    });
    Record::new(time, gradient, Celsius(temperature), surface)
}

/// Three regimes: 30 easterlies near 5C in cluster 0, 20 westerlies near 15C in cluster 1,
/// and 50 northerlies near 10C with a wider spread outside both.
pub fn regimes() -> (ClusterPartition, Ensemble, WindDisc) {
    let disc = disc();
    let mut partition = ClusterPartition::new();

    for &direction in &[90.0, 270.0] {
        let center = disc.to_point(WindSpdDir {
            speed: Knots(20.0),
            direction,
        });
        draw_square(&mut partition, center, 10.0).expect("Square not committed");
    }

    let alternate = |i: usize, mean: f64, spread: f64| {
        if i % 2 == 0 {
            mean - spread
        } else {
            mean + spread
        }
    };

    let groups = [(30, 90.0, 5.0, 1.0), (20, 270.0, 15.0, 1.0), (50, 0.0, 10.0, 3.0)];

    let mut n = 0;
    let mut members = Vec::new();
    for &(count, direction, mean, spread) in &groups {
        for i in 0..count {
            members.push(member(n, direction, alternate(i, mean, spread)));
            n += 1;
        }
    }

    (partition, members.into_iter().collect(), disc)
}
