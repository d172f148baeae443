//! Rate Window Module
//!
//! Fixed-window request counter for one (client, route class) pair.

// == Admission ==
/// Outcome of counting one request against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// Over budget; the window reopens after this many milliseconds
    Rejected { retry_after_ms: u64 },
}

// == Rate Window ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    /// Unix milliseconds at which the current window opened
    pub window_start: u64,
    /// Requests counted in the current window, rejected ones included
    pub count: u32,
}

impl RateWindow {
    /// Opens a window at `now_ms` holding the request that opened it.
    pub fn open(now_ms: u64) -> Self {
        Self {
            window_start: now_ms,
            count: 1,
        }
    }

    /// Whether the window has run its full length at `now_ms`.
    pub fn has_ended(&self, now_ms: u64, window_ms: u64) -> bool {
        now_ms.saturating_sub(self.window_start) >= window_ms
    }

    /// Counts one request and decides whether it fits the budget.
    ///
    /// A request arriving after the window ended starts a fresh window.
    /// Fixed windows let up to `2 * max_requests` through around a window
    /// boundary.
    pub fn record(&mut self, now_ms: u64, window_ms: u64, max_requests: u32) -> Admission {
        if self.has_ended(now_ms, window_ms) {
            *self = Self::open(now_ms);
        } else {
            self.count = self.count.saturating_add(1);
        }

        if self.count <= max_requests {
            Admission::Allowed
        } else {
            Admission::Rejected {
                retry_after_ms: self.retry_after_ms(now_ms, window_ms),
            }
        }
    }

    /// Milliseconds until the window ends, never below 1.
    pub fn retry_after_ms(&self, now_ms: u64, window_ms: u64) -> u64 {
        self.window_start
            .saturating_add(window_ms)
            .saturating_sub(now_ms)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_admits_up_to_max() {
        let mut window = RateWindow::open(0);
        assert_eq!(window.count, 1);

        assert_eq!(window.record(10, 1_000, 3), Admission::Allowed);
        assert_eq!(window.record(20, 1_000, 3), Admission::Allowed);
        assert_eq!(
            window.record(400, 1_000, 3),
            Admission::Rejected { retry_after_ms: 600 }
        );
    }

    #[test]
    fn test_window_reopens_at_boundary() {
        let mut window = RateWindow::open(0);
        window.record(1, 1_000, 1);

        assert!(window.has_ended(1_000, 1_000));
        assert_eq!(window.record(1_000, 1_000, 1), Admission::Allowed);
        assert_eq!(window.window_start, 1_000);
        assert_eq!(window.count, 1);
    }

    #[test]
    fn test_retry_after_is_at_least_one_ms() {
        let window = RateWindow::open(0);
        assert_eq!(window.retry_after_ms(5_000, 1_000), 1);
    }
}
