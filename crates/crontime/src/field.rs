//! Rule fields: the seven positions of a cron line and their canonical range lists.

use std::fmt;

use serde::Serialize;

use crate::range::Range;

const MONTH_ALIASES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const DAY_OF_WEEK_ALIASES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// One position of a rule line, in raw-text order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    DayOfWeek,
    Year,
}

impl FieldKind {
    /// All kinds in raw-text order: `second minute hour day month dayOfWeek year`.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Second,
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::Day,
        FieldKind::Month,
        FieldKind::DayOfWeek,
        FieldKind::Year,
    ];

    /// Position in raw-text order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn min(self) -> u32 {
        match self {
            FieldKind::Second | FieldKind::Minute | FieldKind::Hour => 0,
            FieldKind::Day | FieldKind::Month | FieldKind::DayOfWeek => 1,
            FieldKind::Year => 1900,
        }
    }

    pub fn max(self) -> u32 {
        match self {
            FieldKind::Second | FieldKind::Minute => 59,
            FieldKind::Hour => 23,
            FieldKind::Day => 31,
            FieldKind::Month => 12,
            FieldKind::DayOfWeek => 7,
            FieldKind::Year => 3000,
        }
    }

    /// Name used in rule records and error messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Second => "second",
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::Day => "day",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "dayOfWeek",
            FieldKind::Year => "year",
        }
    }

    /// Three-letter aliases, indexed from `min()`.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            FieldKind::Month => &MONTH_ALIASES,
            FieldKind::DayOfWeek => &DAY_OF_WEEK_ALIASES,
            _ => &[],
        }
    }

    /// Resolve a case-insensitive alias (`"Mar"` → `"3"`); other text is
    /// returned unchanged.
    pub(crate) fn resolve_alias(self, term: &str) -> String {
        let lower = term.to_ascii_lowercase();
        match self.aliases().iter().position(|alias| *alias == lower) {
            Some(idx) => (self.min() + idx as u32).to_string(),
            None => term.to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A canonical list of ranges: ascending, pairwise disjoint, non-adjacent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Field(Vec<Range>);

impl Field {
    /// The `*` field: every value of the kind.
    pub fn full(kind: FieldKind) -> Self {
        Field(vec![Range::new(kind.min(), kind.max())])
    }

    /// Build a canonical field from arbitrary values: deduplicated, sorted, and
    /// merged into maximal consecutive runs.
    pub fn from_values(mut values: Vec<u32>) -> Self {
        values.sort_unstable();
        values.dedup();

        let mut runs: Vec<Range> = Vec::new();
        for value in values {
            match runs.last_mut() {
                Some(run) if run.to + 1 == value => run.to = value,
                _ => runs.push(Range::new(value, value)),
            }
        }
        Field(runs)
    }

    pub fn ranges(&self) -> &[Range] {
        &self.0
    }

    pub fn first(&self) -> Option<&Range> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Range> {
        self.0.last()
    }

    /// True when `value` lies in at least one range.
    pub fn matches(&self, value: u32) -> bool {
        self.0.iter().any(|range| range.contains(value))
    }

    /// True when this is exactly `[[min, max]]` for the kind.
    pub fn is_full(&self, kind: FieldKind) -> bool {
        self.0.as_slice() == [Range::new(kind.min(), kind.max())]
    }
}
