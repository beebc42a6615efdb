//! Window derivation: a rule's hour/minute/second fields → second-of-day windows.
//!
//! Full minute and second fields are special-cased so that `"* 9-16"` yields a
//! single window instead of 8 × 60 × 60 one-second fragments.

use crate::field::{Field, FieldKind};
use crate::range::{self, Window};

const SECONDS_PER_HOUR: u32 = 3600;
const SECONDS_PER_MINUTE: u32 = 60;

fn second_of_day(hour: u32, minute: u32, second: u32) -> u32 {
    hour * SECONDS_PER_HOUR + minute * SECONDS_PER_MINUTE + second
}

/// Derive the ordered, disjoint windows covered by the given fields.
///
/// Windows are generated in ascending hour/minute/second order and then
/// neighbours with `to + 1 == from` are joined.
pub fn derive_windows(second: &Field, minute: &Field, hour: &Field) -> Vec<Window> {
    let full_seconds = second.is_full(FieldKind::Second);
    let full_minutes = minute.is_full(FieldKind::Minute);

    let mut windows: Vec<Window> = Vec::new();
    for hours in hour.ranges() {
        if full_minutes && full_seconds {
            windows.push(Window::new(
                second_of_day(hours.from, 0, 0),
                second_of_day(hours.to, 59, 59),
            ));
            continue;
        }

        for h in hours.from..=hours.to {
            for minutes in minute.ranges() {
                if full_seconds {
                    windows.push(Window::new(
                        second_of_day(h, minutes.from, 0),
                        second_of_day(h, minutes.to, 59),
                    ));
                    continue;
                }

                for m in minutes.from..=minutes.to {
                    for seconds in second.ranges() {
                        windows.push(Window::new(
                            second_of_day(h, m, seconds.from),
                            second_of_day(h, m, seconds.to),
                        ));
                    }
                }
            }
        }
    }

    range::join_adjacent(windows)
}
