//! Fixed-interval tick scheduling
//!
//! The presentation loop calls [`Ticker::due`] on every frame; it returns
//! true at most once per interval. This keeps the capture tick independent of
//! whatever event loop hosts it.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true if a tick should run at `now`, and records it
    ///
    /// The first call is always due.
    pub fn due(&mut self, now: Instant) -> bool {
        let due = self
            .last
            .map(|last| now.saturating_duration_since(last) >= self.interval)
            .unwrap_or(true);
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Time left until the next tick is due
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_is_due() {
        let mut ticker = Ticker::new(Duration::from_millis(50));
        assert!(ticker.due(Instant::now()));
    }

    #[test]
    fn test_interval_gating() {
        let mut ticker = Ticker::new(Duration::from_millis(50));
        let t0 = Instant::now();
        assert!(ticker.due(t0));
        assert!(!ticker.due(t0 + Duration::from_millis(20)));
        assert_eq!(
            ticker.time_until_next(t0 + Duration::from_millis(20)),
            Duration::from_millis(30)
        );
        assert!(ticker.due(t0 + Duration::from_millis(50)));
        assert!(!ticker.due(t0 + Duration::from_millis(99)));
        assert!(ticker.due(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_overdue_reports_zero_wait() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        let t0 = Instant::now();
        ticker.due(t0);
        assert_eq!(ticker.time_until_next(t0 + Duration::from_secs(1)), Duration::ZERO);
    }
}
