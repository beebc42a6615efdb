//! Interval algebra: fold open/closed window contributions into one day's
//! disjoint window list.
//!
//! Open contributions absorb every window they touch and are then appended.
//! Closed contributions carve into the windows they overlap and are never
//! appended themselves. Both resolve one window at a time and rescan the list
//! after every mutation.

use crate::range::Window;

/// How a closed contribution relates to a window it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// Only shares a boundary second or is merely adjacent; left alone.
    Out,
    /// Covers the whole window.
    Over,
    /// Strictly inside the window; splits it in two.
    In,
    /// Covers one end of the window.
    Cross,
}

fn classify(closed: &Window, window: &Window) -> Overlap {
    if closed.from >= window.to || closed.to <= window.from {
        Overlap::Out
    } else if closed.from <= window.from && closed.to >= window.to {
        Overlap::Over
    } else if closed.from > window.from && closed.to < window.to {
        Overlap::In
    } else {
        Overlap::Cross
    }
}

/// The working window list of a single day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayWindows {
    windows: Vec<Window>,
}

impl DayWindows {
    pub fn new() -> Self {
        DayWindows::default()
    }

    /// Drop every window, ready for the next day.
    pub fn reset(&mut self) {
        self.windows.clear();
    }

    /// Fold one contribution into the list.
    pub fn fold(&mut self, contribution: Window, open: bool) {
        if open {
            self.open(contribution);
        } else {
            self.close(contribution);
        }
    }

    fn open(&mut self, mut contribution: Window) {
        while let Some(idx) = self.windows.iter().position(|w| contribution.touches(w)) {
            let absorbed = self.windows.remove(idx);
            contribution.from = contribution.from.min(absorbed.from);
            contribution.to = contribution.to.max(absorbed.to);
        }
        self.windows.push(contribution);
    }

    fn close(&mut self, closed: Window) {
        let mut idx = 0;
        while idx < self.windows.len() {
            let window = self.windows[idx];
            if !closed.touches(&window) {
                idx += 1;
                continue;
            }

            match classify(&closed, &window) {
                Overlap::Out => {
                    idx += 1;
                    continue;
                }
                Overlap::Over => {
                    self.windows.remove(idx);
                }
                Overlap::In => {
                    self.windows[idx].to = closed.from - 1;
                    self.windows.push(Window::new(closed.to + 1, window.to));
                }
                Overlap::Cross => {
                    if closed.from > window.from {
                        self.windows[idx].to = closed.from - 1;
                    } else if closed.to < window.to {
                        self.windows[idx].from = closed.to + 1;
                    }
                }
            }
            idx = 0;
        }
    }

    /// Windows in fold order (not necessarily sorted).
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Sort the windows ascending by `from` and return them.
    pub fn finish(&mut self) -> &[Window] {
        self.windows.sort_unstable();
        &self.windows
    }

    /// Seconds covered by all windows.
    pub fn covered_seconds(&self) -> u64 {
        self.windows.iter().map(|w| u64::from(w.span())).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn into_vec(mut self) -> Vec<Window> {
        self.windows.sort_unstable();
        self.windows
    }
}
