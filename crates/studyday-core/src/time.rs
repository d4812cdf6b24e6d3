//! Minute-of-day codec.
//!
//! The engine works purely on integer minutes since local midnight; this
//! module converts between those and human strings such as `"8:00am"`,
//! `"20:00"`, `"noon"` or `"midnight"`.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::TimeParseError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// 23:59, the due time given to work that may run until the end of the day.
pub const END_OF_DAY: i32 = 23 * 60 + 59;

/// Parse a human time string into minutes since midnight.
///
/// Accepts `H`, `H:MM`, each optionally followed by `am`/`pm` (or just
/// `a`/`p`). Whitespace and case are ignored.
pub fn parse_time(input: &str) -> Result<i32, TimeParseError> {
    let raw = input.trim().to_lowercase();
    if raw.is_empty() {
        return Err(TimeParseError::Empty);
    }
    match raw.as_str() {
        "noon" => return Ok(12 * 60),
        "midnight" => return Ok(0),
        _ => {}
    }

    let invalid = || TimeParseError::Invalid(input.to_string());
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let (clock, meridiem) = split_meridiem(&compact);
    let (hour_str, minute_str) = match clock.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (clock, None),
    };

    if hour_str.is_empty() || hour_str.len() > 2 || !hour_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hour: i32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: i32 = match minute_str {
        Some(m) if m.len() == 2 && m.bytes().all(|b| b.is_ascii_digit()) => {
            m.parse().map_err(|_| invalid())?
        }
        Some(_) => return Err(invalid()),
        None => 0,
    };
    if !(0..=59).contains(&minute) {
        return Err(invalid());
    }

    let hour = match meridiem {
        Some(Meridiem::Am) | Some(Meridiem::Pm) if !(1..=12).contains(&hour) => {
            return Err(invalid())
        }
        Some(Meridiem::Am) => hour % 12,
        Some(Meridiem::Pm) => hour % 12 + 12,
        None if (0..=23).contains(&hour) => hour,
        None => return Err(invalid()),
    };

    Ok(hour * 60 + minute)
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

fn split_meridiem(s: &str) -> (&str, Option<Meridiem>) {
    for (suffix, meridiem) in [
        ("am", Meridiem::Am),
        ("pm", Meridiem::Pm),
        ("a", Meridiem::Am),
        ("p", Meridiem::Pm),
    ] {
        if let Some(rest) = s.strip_suffix(suffix) {
            return (rest, Some(meridiem));
        }
    }
    (s, None)
}

/// Render minutes since midnight as `h:MM AM|PM`, wrapping at a day.
pub fn format_time(minutes: i32) -> String {
    let m = minutes.rem_euclid(MINUTES_PER_DAY);
    let (hh, mm) = (m / 60, m % 60);
    let suffix = if hh < 12 { "AM" } else { "PM" };
    let h12 = match hh {
        0 => 12,
        1..=12 => hh,
        _ => hh - 12,
    };
    format!("{h12}:{mm:02} {suffix}")
}

/// Monday of the week containing `date`; the key of the week store.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
