//! # crontime
//!
//! Cron-style availability windows for business-hours features.
//!
//! A [`Schedule`] is an ordered list of cron-like rules, each tagged *open* or
//! *closed*. For every calendar day the rules that apply to that day are folded,
//! in order, into a sorted list of disjoint second-of-day [`Window`]s. Four
//! queries are built on top of that day walk:
//!
//! - [`Schedule::is_open_at`]: is an instant inside an open window?
//! - [`Schedule::open_duration`]: open seconds between two instants
//! - [`Schedule::future_open_instant`]: when will N open seconds have elapsed?
//! - [`Schedule::next_open_days`]: the next N days with any open time
//!
//! ## Quick start
//!
//! ```rust
//! use crontime::{RuleSpec, Schedule};
//!
//! let schedule = Schedule::new(&[
//!     RuleSpec::raw("* 9-16 * * mon-fri"),
//!     RuleSpec::raw("* 12 * * thu-fri").closed(),
//! ])
//! .unwrap();
//!
//! assert_eq!(schedule.open_duration("2020-06-29 00:00", "2020-06-29 23:59").unwrap(), 28800);
//! assert!(!schedule.is_open_at("2020-07-03 12:30:00").unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: rule text / named fields → typed [`Field`]s
//! - [`field`]: canonical range lists and per-field bounds/aliases
//! - [`windows`]: hour/minute/second fields → second-of-day windows
//! - [`algebra`]: open/closed fold of windows into one disjoint day list
//! - [`rule`]: a parsed rule with its cached windows and day check
//! - [`schedule`]: day walk and the four queries
//! - [`instant`]: instant text ("now", "mon 9:20", "2020-06-30") → datetime
//! - [`config`]: forward-search limits
//! - [`error`]: Error types

pub mod algebra;
pub mod config;
pub mod error;
pub mod field;
pub mod instant;
pub mod parser;
pub mod range;
pub mod rule;
pub mod schedule;
pub mod windows;

pub use algebra::DayWindows;
pub use config::SearchLimits;
pub use error::CronTimeError;
pub use field::{Field, FieldKind};
pub use instant::InstantParser;
pub use parser::RuleSpec;
pub use range::{Range, Window};
pub use rule::{Level, Rule};
pub use schedule::{OpenDays, Schedule};
