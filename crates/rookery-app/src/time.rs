//! Relative timestamps ("3 minutes ago").

use chrono::{DateTime, Utc};

const MINUTES_PER_DAY: u64 = 1_440;
const MINUTES_PER_MONTH: u64 = 43_200;

/// Human distance between `then` and `now`, suffixed with "ago" for the past
/// and prefixed with "in" for the future.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let phrase = distance(seconds.unsigned_abs());
    if seconds >= 0 { format!("{phrase} ago") } else { format!("in {phrase}") }
}

fn distance(seconds: u64) -> String {
    let minutes = (seconds + 30) / 60;
    match minutes {
        0 => "less than a minute".to_owned(),
        1 => "1 minute".to_owned(),
        2..=44 => format!("{minutes} minutes"),
        45..=89 => "about 1 hour".to_owned(),
        90..=1_439 => format!("about {} hours", (minutes + 30) / 60),
        1_440..=2_519 => "1 day".to_owned(),
        2_520..=43_199 => format!("{} days", (minutes + MINUTES_PER_DAY / 2) / MINUTES_PER_DAY),
        43_200..=64_799 => "about 1 month".to_owned(),
        64_800..=86_399 => "about 2 months".to_owned(),
        _ => months_or_years(minutes / MINUTES_PER_MONTH),
    }
}

fn months_or_years(months: u64) -> String {
    if months < 12 {
        return format!("{months} months");
    }

    let years = months / 12;
    let remainder = months % 12;
    let (qualifier, years) = match remainder {
        0..=2 => ("about", years),
        3..=8 => ("over", years),
        _ => ("almost", years + 1),
    };
    let unit = if years == 1 { "year" } else { "years" };
    format!("{qualifier} {years} {unit}")
}
