//! Day walk and the four availability queries.
//!
//! A [`Schedule`] walks calendar days in ascending order. For each day it folds
//! the windows of every rule that applies to that day, in rule order, into one
//! sorted disjoint window list and hands it to a visitor. The queries are
//! visitors over that walk; the two forward searches walk in bounded chunks
//! (see [`SearchLimits`]).

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::algebra::DayWindows;
use crate::config::SearchLimits;
use crate::error::{CronTimeError, Result};
use crate::instant::{second_of_day, InstantParser};
use crate::parser::RuleSpec;
use crate::range::Window;
use crate::rule::Rule;

/// Last second of a day.
const END_OF_DAY: u32 = 86_399;

/// Days with open time, in ascending order, each with its windows.
pub type OpenDays = BTreeMap<NaiveDate, Vec<Window>>;

/// An ordered list of open/closed rules.
#[derive(Debug, Clone)]
pub struct Schedule {
    rules: Vec<Rule>,
    limits: SearchLimits,
    reference: Option<NaiveDateTime>,
}

impl Schedule {
    /// Parse rule records into a schedule.
    ///
    /// When no record is an open rule (including an empty list), an always-open
    /// rule is placed first so closed rules have something to close.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` on the first malformed field term.
    pub fn new(specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs.iter().map(Rule::from_spec).collect::<Result<Vec<_>>>()?;
        Ok(Schedule::from_rules(rules))
    }

    /// Build a schedule from parsed rules.
    pub fn from_rules(mut rules: Vec<Rule>) -> Self {
        let implicit_open = !rules.iter().any(Rule::is_open);
        if implicit_open {
            rules.insert(0, Rule::always_open());
        }
        tracing::debug!(rules = rules.len(), implicit_open, "schedule built");

        Schedule {
            rules,
            limits: SearchLimits::default(),
            reference: None,
        }
    }

    /// Parse a JSON array of rule records.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` on malformed JSON or rule terms.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(json)
            .map_err(|e| CronTimeError::invalid(format!("invalid rules: {}", e)))?;
        Schedule::new(&specs)
    }

    /// Resolve "now" and other relative instants against a fixed datetime
    /// instead of the local clock.
    pub fn with_reference(mut self, now: NaiveDateTime) -> Self {
        self.reference = Some(now);
        self
    }

    /// Replace the forward-search limits.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` if the limits fail validation.
    pub fn with_limits(mut self, limits: SearchLimits) -> Result<Self> {
        limits.validate()?;
        self.limits = limits;
        Ok(self)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Parse instant text against this schedule's reference time.
    pub fn parse_instant(&self, instant: &str) -> Result<NaiveDateTime> {
        let parser = match self.reference {
            Some(now) => InstantParser::new(now),
            None => InstantParser::local(),
        };
        parser.parse(instant)
    }

    /// Fold the windows of every rule applying on `date` into `day`.
    fn fold_day(&self, date: NaiveDate, day: &mut DayWindows) {
        day.reset();
        for rule in self.rules.iter().filter(|rule| rule.applies_on(date)) {
            for window in rule.windows() {
                day.fold(*window, rule.is_open());
            }
        }
    }

    /// The merged windows of a single day.
    pub fn windows_on(&self, date: NaiveDate) -> Vec<Window> {
        let mut day = DayWindows::new();
        self.fold_day(date, &mut day);
        day.into_vec()
    }

    /// Visit every day in `from..=to`, ascending, with that day's merged
    /// windows. The walk stops as soon as the visitor breaks.
    pub fn walk_days<F>(&self, from: NaiveDate, to: NaiveDate, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(NaiveDate, &[Window]) -> ControlFlow<()>,
    {
        let mut day = DayWindows::new();
        let mut date = from;
        while date <= to {
            self.fold_day(date, &mut day);
            let windows = day.finish();
            tracing::trace!(%date, windows = windows.len(), "day folded");
            if visitor(date, windows).is_break() {
                return ControlFlow::Break(());
            }

            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        ControlFlow::Continue(())
    }

    /// Walk forward from `start` in chunks until the visitor breaks or the
    /// chunk ceiling is reached. Returns whether the visitor broke.
    fn walk_chunks<F>(&self, start: NaiveDate, mut visitor: F) -> bool
    where
        F: FnMut(NaiveDate, &[Window]) -> ControlFlow<()>,
    {
        let mut chunk_start = start;
        for _ in 0..self.limits.max_chunks {
            let Some(chunk_end) =
                chunk_start.checked_add_days(Days::new(u64::from(self.limits.chunk_days)))
            else {
                break;
            };
            if self.walk_days(chunk_start, chunk_end, &mut visitor).is_break() {
                return true;
            }
            chunk_start = match chunk_start
                .checked_add_days(Days::new(u64::from(self.limits.stride_days)))
            {
                Some(next) => next,
                None => break,
            };
        }

        tracing::warn!(
            %start,
            max_chunks = self.limits.max_chunks,
            "forward search exhausted without a result"
        );
        false
    }

    /// Whether `instant` falls inside an open window.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` if `instant` cannot be parsed.
    pub fn is_open_at(&self, instant: &str) -> Result<bool> {
        let at = self.parse_instant(instant)?;
        Ok(self.is_open_at_datetime(at))
    }

    /// [`Schedule::is_open_at`] for an already parsed datetime.
    pub fn is_open_at_datetime(&self, at: NaiveDateTime) -> bool {
        let second = second_of_day(at);
        self.walk_days(at.date(), at.date(), |_, windows| {
            if windows.iter().any(|w| w.contains(second)) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .is_break()
    }

    /// Open seconds between two instants.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` if either instant cannot be parsed.
    pub fn open_duration(&self, from: &str, to: &str) -> Result<u64> {
        let to = self.parse_instant(to)?;
        let from = self.parse_instant(from)?;
        Ok(self.open_duration_between(from, to))
    }

    /// [`Schedule::open_duration`] for already parsed datetimes.
    ///
    /// The first day is counted from `from`'s time and the last day up to
    /// `to`'s time; a `to` at exactly midnight counts its whole day. Days in
    /// between end at second 86399 (exclusive). A `from` on a later day than
    /// `to` yields 0.
    pub fn open_duration_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> u64 {
        let (from_day, to_day) = (from.date(), to.date());
        if from_day > to_day {
            return 0;
        }

        let (from_time, to_time) = (second_of_day(from), second_of_day(to));
        let mut total = 0u64;

        let _ = self.walk_days(from_day, to_day, |date, windows| {
            let lower = if date == from_day { from_time } else { 0 };
            let upper = if date == to_day && to_time > 0 {
                to_time
            } else {
                END_OF_DAY
            };

            for window in windows {
                if lower <= window.to && upper >= window.from {
                    let end = upper.min(window.to + 1);
                    let start = lower.max(window.from);
                    total += u64::from(end.saturating_sub(start));
                }
            }
            ControlFlow::Continue(())
        });

        total
    }

    /// The instant at which `seconds` of open time will have elapsed after
    /// `from`, or `None` if the search limits are exhausted first.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` if `from` cannot be parsed.
    pub fn future_open_instant(&self, seconds: u64, from: &str) -> Result<Option<NaiveDateTime>> {
        let from = self.parse_instant(from)?;
        Ok(self.future_open_instant_from(seconds, from))
    }

    /// [`Schedule::future_open_instant`] for an already parsed datetime.
    ///
    /// A window that is consumed whole adds `to - from + 1` seconds; the hit
    /// inside the final window lands at `from + (target - accumulated)`.
    pub fn future_open_instant_from(
        &self,
        seconds: u64,
        from: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        let from_day = from.date();
        let from_time = second_of_day(from);
        let mut accumulated = 0u64;
        let mut found = None;

        self.walk_chunks(from_day, |date, windows| {
            let lower = if date == from_day { from_time } else { 0 };

            for window in windows {
                let mut start = window.from;
                if lower > 0 {
                    if window.to <= lower {
                        continue;
                    }
                    if lower > window.from && lower < window.to {
                        start = lower;
                    }
                }

                let duration = u64::from(window.to - start);
                if duration + accumulated < seconds {
                    accumulated += duration + 1;
                } else {
                    let offset = u64::from(start) + (seconds - accumulated);
                    found = i64::try_from(offset)
                        .ok()
                        .map(|offset| date.and_time(NaiveTime::MIN) + Duration::seconds(offset));
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        });

        found
    }

    /// The next `count` days with any open time, starting at `from`'s day.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` if `from` cannot be parsed.
    pub fn next_open_days(&self, count: usize, from: &str) -> Result<OpenDays> {
        let from = self.parse_instant(from)?;
        Ok(self.next_open_days_from(count, from.date()))
    }

    /// [`Schedule::next_open_days`] for an already parsed date.
    pub fn next_open_days_from(&self, count: usize, from: NaiveDate) -> OpenDays {
        let mut days = OpenDays::new();
        if count == 0 {
            return days;
        }

        self.walk_chunks(from, |date, windows| {
            if !windows.is_empty() {
                days.insert(date, windows.to_vec());
            }
            if days.len() >= count {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        days
    }
}
