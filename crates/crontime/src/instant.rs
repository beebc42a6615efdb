//! Instant parsing: human-friendly instant text → local wall-clock datetime.
//!
//! Relative forms are resolved against a reference "now", which callers can
//! pin for deterministic results.
//!
//! # Supported formats
//!
//! - `"now"`
//! - RFC 3339: `"2020-06-30T09:00:00+02:00"` (wall clock of the given offset)
//! - ISO dates, optionally with a time: `"2020-06-30"`, `"2020-06-30 9:20"`,
//!   `"2020-06-30T09:20:12"`
//! - `"today"`, `"tomorrow"`, `"yesterday"`, optionally with a time
//! - weekday names: `"mon"`, `"Tuesday 15:00"`, today when the weekday matches,
//!   otherwise the next such day
//! - bare times: `"9:20"`, `"14:49:12"`, on the reference date
//! - anything else `chrono_english` understands relative to the reference,
//!   such as `"3 hours ago"` or `"next friday 8pm"` (US dialect)
//!
//! A missing time means midnight.

use chrono::{
    DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
    Weekday,
};
use chrono_english::{parse_date_string, Dialect};

use crate::error::{CronTimeError, Result};

/// Resolves instant text relative to a reference datetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantParser {
    now: NaiveDateTime,
}

impl Default for InstantParser {
    fn default() -> Self {
        InstantParser::local()
    }
}

impl InstantParser {
    /// A parser whose "now" is the given datetime.
    pub fn new(now: NaiveDateTime) -> Self {
        InstantParser { now }
    }

    /// A parser whose "now" is the current local wall-clock time.
    pub fn local() -> Self {
        InstantParser::new(Local::now().naive_local())
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Parse instant text.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` if the text matches no supported format.
    pub fn parse(&self, input: &str) -> Result<NaiveDateTime> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("now") {
            return Ok(self.now);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.naive_local());
        }

        let invalid = || CronTimeError::invalid(format!("invalid time value: '{}'", input));
        if trimmed.is_empty() {
            return Err(invalid());
        }
        if let Some(at) = self.parse_words(trimmed) {
            return Ok(at);
        }

        // Wall-clock arithmetic: the reference is treated as UTC and read back naive.
        parse_date_string(trimmed, Utc.from_utc_datetime(&self.now), Dialect::Us)
            .map(|at| at.naive_utc())
            .map_err(|_| invalid())
    }

    fn parse_words(&self, input: &str) -> Option<NaiveDateTime> {
        let mut words = input.split_whitespace();
        let first = words.next()?;
        let second = words.next();
        if words.next().is_some() {
            return None;
        }

        // "2020-06-30T09:20:12"
        if second.is_none()
            && first.is_ascii()
            && first.len() > 10
            && matches!(first.as_bytes()[10], b'T' | b't')
        {
            let (date, time) = first.split_at(10);
            return Some(parse_date(date)?.and_time(parse_time(&time[1..])?));
        }

        let date = match self.parse_day(first) {
            Some(date) => date,
            None if second.is_none() => {
                return Some(self.now.date().and_time(parse_time(first)?));
            }
            None => return None,
        };

        let time = match second {
            Some(text) => parse_time(text)?,
            None => NaiveTime::MIN,
        };
        Some(date.and_time(time))
    }

    fn parse_day(&self, word: &str) -> Option<NaiveDate> {
        let today = self.now.date();
        match word.to_ascii_lowercase().as_str() {
            "today" => Some(today),
            "tomorrow" => today.succ_opt(),
            "yesterday" => today.pred_opt(),
            other => match parse_weekday(other) {
                Some(weekday) => {
                    let ahead = (weekday.num_days_from_monday() + 7
                        - today.weekday().num_days_from_monday())
                        % 7;
                    today.checked_add_days(Days::new(u64::from(ahead)))
                }
                None => parse_date(word),
            },
        }
    }
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    let weekday = match word {
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        "sun" | "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// `H:M` or `H:M:S`, each part one or two digits.
fn parse_time(text: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut numbers = [0u32; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    NaiveTime::from_hms_opt(numbers[0], numbers[1], numbers[2])
}

/// Seconds since midnight of a datetime's wall-clock time.
pub fn second_of_day(at: NaiveDateTime) -> u32 {
    at.num_seconds_from_midnight()
}
