//! Data used in tests.
use crate::record::Record;

/// Format one line of a historical data file.
#[allow(clippy::too_many_arguments)]
pub(crate) fn make_line(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    gradient_direction: f64,
    gradient_speed: f64,
    gradient_temperature: f64,
    surface_direction: f64,
    surface_speed: f64,
) -> String {
    format!(
        "{:04}{:02}{:02}{:02}00:{}:{}:{}:{}:{}",
        year,
        month,
        day,
        hour,
        gradient_direction,
        gradient_speed,
        gradient_temperature,
        surface_direction,
        surface_speed
    )
}

pub(crate) fn make_record(line: &str) -> Record {
    Record::parse_line(line, 1).expect("Error parsing test line")
}

/// A few years of synthetic observations, one every six hours on the first ten days of
/// January, July and December. The gradient wind veers with the hour and the temperature
/// follows the month.
pub(crate) fn make_test_lines() -> Vec<String> {
    let mut lines = Vec::new();

    for year in 2001..=2003 {
        for &month in &[1, 7, 12] {
            for day in 1..=10 {
                for hour in (0..24).step_by(6) {
                    let temperature = match month {
                        7 => 20.0,
                        _ => 2.0,
                    } + f64::from(day) / 10.0;
                    let direction = f64::from(hour) * 15.0;

                    lines.push(make_line(
                        year,
                        month,
                        day,
                        hour,
                        direction,
                        10.0,
                        temperature,
                        direction,
                        4.0,
                    ));
                }
            }
        }
    }

    lines
}
