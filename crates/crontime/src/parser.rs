//! Rule parsing: cron-like text or named fields → seven canonical [`Field`]s.
//!
//! Raw rule text holds up to seven whitespace-separated tokens:
//!
//! ```text
//! * * * * * * *
//! | | | | | | |
//! | | | | | | +-- Year          (1900-3000)
//! | | | | | +---- Day of week   (1-7, 1 = Monday, mon-sun)
//! | | | | +------ Month         (1-12, jan-dec)
//! | | | +-------- Day of month  (1-31)
//! | | +---------- Hour          (0-23)
//! | +------------ Minute        (0-59)
//! +-------------- Second        (0-59, optional)
//! ```
//!
//! Text with fewer than seven tokens is read as the six-field form (no
//! seconds), so `"* 9-16 * * mon-fri"` means "every second of hours 9 to 16,
//! Monday to Friday". Each token is `*` or a comma-separated list of terms:
//! a value (`5`, `mar`), a range (`10-20`, `mon-fri`), or a step (`*/15`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CronTimeError, Result};
use crate::field::{Field, FieldKind};

/// A rule record as supplied by callers.
///
/// `raw`, when non-empty, replaces every named field. `open` accepts any
/// boolean-like JSON value and defaults to `true` when absent; an explicit
/// `null` counts as present and coerces to `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub open: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl RuleSpec {
    /// A rule given as raw cron text.
    pub fn raw(text: impl Into<String>) -> Self {
        RuleSpec {
            raw: Some(text.into()),
            ..RuleSpec::default()
        }
    }

    /// Set the open flag from any boolean-like value.
    pub fn with_open(mut self, open: impl Into<Value>) -> Self {
        self.open = Some(open.into());
        self
    }

    /// Mark the rule as closing time instead of opening it.
    pub fn closed(self) -> Self {
        self.with_open(false)
    }

    /// Set one named field.
    pub fn with_field(mut self, kind: FieldKind, text: impl Into<String>) -> Self {
        *self.field_slot(kind) = Some(text.into());
        self
    }

    fn field_slot(&mut self, kind: FieldKind) -> &mut Option<String> {
        match kind {
            FieldKind::Second => &mut self.second,
            FieldKind::Minute => &mut self.minute,
            FieldKind::Hour => &mut self.hour,
            FieldKind::Day => &mut self.day,
            FieldKind::Month => &mut self.month,
            FieldKind::DayOfWeek => &mut self.day_of_week,
            FieldKind::Year => &mut self.year,
        }
    }

    fn named_field(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Second => self.second.as_deref(),
            FieldKind::Minute => self.minute.as_deref(),
            FieldKind::Hour => self.hour.as_deref(),
            FieldKind::Day => self.day.as_deref(),
            FieldKind::Month => self.month.as_deref(),
            FieldKind::DayOfWeek => self.day_of_week.as_deref(),
            FieldKind::Year => self.year.as_deref(),
        }
    }

    /// The resolved open flag.
    pub fn is_open(&self) -> bool {
        self.open.as_ref().map_or(true, coerce_bool)
    }

    /// The seven field texts after raw-text normalization, in raw order.
    /// Missing or empty entries become `*`.
    pub fn field_texts(&self) -> [String; 7] {
        let tokens: Option<Vec<&str>> = self
            .raw
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                let mut tokens: Vec<&str> = raw.split_whitespace().collect();
                // Six-field form: seconds omitted.
                if tokens.len() < 7 {
                    tokens.insert(0, "*");
                }
                tokens.resize(7, "*");
                tokens
            });

        FieldKind::ALL.map(|kind| {
            let text = match &tokens {
                Some(tokens) => tokens[kind.index()],
                None => self.named_field(kind).unwrap_or(""),
            };
            if text.is_empty() {
                "*".to_string()
            } else {
                text.to_string()
            }
        })
    }
}

/// Keep a present key as `Some`, including `null`.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Boolean-like coercion: `true`, `1`, `"1"`, `"true"`, `"on"`, `"yes"` are
/// true; everything else is false.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Parse a rule record into its open flag and seven fields (raw order).
pub fn parse_spec(spec: &RuleSpec) -> Result<(bool, [Field; 7])> {
    let texts = spec.field_texts();
    let mut fields: Vec<Field> = Vec::with_capacity(7);
    for (kind, text) in FieldKind::ALL.into_iter().zip(texts.iter()) {
        fields.push(parse_field(kind, text)?);
    }
    let fields: [Field; 7] = fields
        .try_into()
        .map_err(|_| CronTimeError::invalid("rule must have seven fields"))?;
    Ok((spec.is_open(), fields))
}

/// Parse one field text (`*`, or comma-separated values, ranges and steps).
pub fn parse_field(kind: FieldKind, text: &str) -> Result<Field> {
    if text == "*" {
        return Ok(Field::full(kind));
    }

    let mut values: Vec<u32> = Vec::new();
    for term in text.split(',') {
        if let Some((from, to)) = term.split_once('-') {
            let from = bounded(kind, &kind.resolve_alias(from));
            let to = bounded(kind, &kind.resolve_alias(to));
            match (from, to) {
                (Some(from), Some(to)) if from <= to => values.extend(from..=to),
                _ => return Err(invalid_term(kind, term)),
            }
        } else if let Some(step) = term.strip_prefix("*/") {
            let step = digits(step)
                .filter(|n| *n != 0 && *n >= kind.min() && *n < kind.max())
                .ok_or_else(|| invalid_term(kind, term))?;
            values.extend((kind.min()..=kind.max()).filter(|i| i % step == 0));
        } else {
            let value =
                bounded(kind, &kind.resolve_alias(term)).ok_or_else(|| invalid_term(kind, term))?;
            values.push(value);
        }
    }

    Ok(Field::from_values(values))
}

/// A non-empty all-digit string.
fn digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// A digit string within the kind's bounds.
fn bounded(kind: FieldKind, text: &str) -> Option<u32> {
    digits(text).filter(|v| (kind.min()..=kind.max()).contains(v))
}

fn invalid_term(kind: FieldKind, term: &str) -> CronTimeError {
    CronTimeError::invalid(format!("invalid {} interval: '{}'", kind, term))
}
