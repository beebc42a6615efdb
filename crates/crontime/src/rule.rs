//! A parsed rule: seven canonical fields, an open/closed polarity, and the
//! values derived from them once at construction.

use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{CronTimeError, Result};
use crate::field::{Field, FieldKind};
use crate::instant::InstantParser;
use crate::parser::{self, RuleSpec};
use crate::range::Window;
use crate::windows::derive_windows;

/// Granularity of a rule applicability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    /// All seven fields must match.
    #[default]
    Full,
    /// Only day, month, day-of-week and year must match.
    Day,
}

impl Level {
    fn kinds(self) -> &'static [FieldKind] {
        match self {
            Level::Full => &FieldKind::ALL,
            Level::Day => &[
                FieldKind::Day,
                FieldKind::Month,
                FieldKind::DayOfWeek,
                FieldKind::Year,
            ],
        }
    }
}

impl FromStr for Level {
    type Err = CronTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "all" | "full" => Ok(Level::Full),
            "2" | "day" => Ok(Level::Day),
            _ => Err(CronTimeError::invalid(format!("invalid level value: '{}'", s))),
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = CronTimeError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Level::Full),
            2 => Ok(Level::Day),
            other => Err(CronTimeError::invalid(format!(
                "invalid level value: {}",
                other
            ))),
        }
    }
}

/// One cron-style rule with an open/closed polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    open: bool,
    fields: [Field; 7],
    windows: Vec<Window>,
    first_run: Option<NaiveDateTime>,
    last_run: Option<NaiveDateTime>,
}

impl Rule {
    /// The rule that is open every second of every day.
    pub fn always_open() -> Self {
        Rule::from_fields(true, FieldKind::ALL.map(Field::full))
    }

    /// Parse a rule record.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` on any malformed field term.
    pub fn from_spec(spec: &RuleSpec) -> Result<Self> {
        let (open, fields) = parser::parse_spec(spec)?;
        Ok(Rule::from_fields(open, fields))
    }

    /// Parse an open rule from raw cron text.
    pub fn parse(raw: &str) -> Result<Self> {
        Rule::from_spec(&RuleSpec::raw(raw))
    }

    /// Build a rule from already canonical fields, in raw-text order.
    pub fn from_fields(open: bool, fields: [Field; 7]) -> Self {
        let windows = derive_windows(
            &fields[FieldKind::Second.index()],
            &fields[FieldKind::Minute.index()],
            &fields[FieldKind::Hour.index()],
        );
        let first_run = first_run(&fields);
        let last_run = last_run(&fields);

        Rule {
            open,
            fields,
            windows,
            first_run,
            last_run,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn field(&self, kind: FieldKind) -> &Field {
        &self.fields[kind.index()]
    }

    /// Second-of-day windows covered by the hour/minute/second fields.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Earliest instant the rule's ranges describe; `None` when a field is empty.
    pub fn first_run(&self) -> Option<NaiveDateTime> {
        self.first_run
    }

    /// Latest instant the rule's ranges describe; `None` when a field is empty.
    pub fn last_run(&self) -> Option<NaiveDateTime> {
        self.last_run
    }

    /// Whether every field checked at `level` contains the matching component
    /// of `at`.
    pub fn matches(&self, at: NaiveDateTime, level: Level) -> bool {
        level.kinds().iter().all(|kind| {
            component(at, *kind).is_some_and(|value| self.field(*kind).matches(value))
        })
    }

    /// Whether the rule applies to a calendar day, ignoring time of day.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.matches(date.and_time(NaiveTime::MIN), Level::Day)
    }

    /// [`Rule::matches`] over instant text.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` if `instant` cannot be parsed.
    pub fn is_executable(
        &self,
        parser: &InstantParser,
        instant: &str,
        level: Level,
    ) -> Result<bool> {
        let at = parser.parse(instant)?;
        Ok(self.matches(at, level))
    }
}

fn component(at: NaiveDateTime, kind: FieldKind) -> Option<u32> {
    match kind {
        FieldKind::Second => Some(at.second()),
        FieldKind::Minute => Some(at.minute()),
        FieldKind::Hour => Some(at.hour()),
        FieldKind::Day => Some(at.day()),
        FieldKind::Month => Some(at.month()),
        FieldKind::DayOfWeek => Some(at.weekday().number_from_monday()),
        FieldKind::Year => u32::try_from(at.year()).ok(),
    }
}

/// `year-month-01` plus `day - 1` days, so out-of-month days roll over.
fn rolled_date(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?
        .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
}

fn first_run(fields: &[Field; 7]) -> Option<NaiveDateTime> {
    let first = |kind: FieldKind| fields[kind.index()].first().map(|r| r.from);

    let date = rolled_date(
        first(FieldKind::Year)?,
        first(FieldKind::Month)?,
        first(FieldKind::Day)?,
    )?;
    // First matching weekday on or after the date.
    let weekday = first(FieldKind::DayOfWeek)?;
    let ahead =
        (i64::from(weekday) - i64::from(date.weekday().number_from_monday())).rem_euclid(7);
    let date = date.checked_add_days(Days::new(ahead.unsigned_abs()))?;

    let time = NaiveTime::from_hms_opt(
        first(FieldKind::Hour)?,
        first(FieldKind::Minute)?,
        first(FieldKind::Second)?,
    )?;
    Some(date.and_time(time))
}

fn last_run(fields: &[Field; 7]) -> Option<NaiveDateTime> {
    let last = |kind: FieldKind| fields[kind.index()].last().map(|r| r.to);

    let date = rolled_date(
        last(FieldKind::Year)?,
        last(FieldKind::Month)?,
        last(FieldKind::Day)?,
    )?;
    // Last matching weekday strictly before the date.
    let weekday = last(FieldKind::DayOfWeek)?;
    let back = match (i64::from(date.weekday().number_from_monday()) - i64::from(weekday))
        .rem_euclid(7)
    {
        0 => 7,
        n => n,
    };
    let date = date.checked_sub_days(Days::new(back.unsigned_abs()))?;

    let time = NaiveTime::from_hms_opt(
        last(FieldKind::Hour)?,
        last(FieldKind::Minute)?,
        last(FieldKind::Second)?,
    )?;
    Some(date.and_time(time))
}
