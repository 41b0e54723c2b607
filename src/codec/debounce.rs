//! Cancellable, clock-driven debounce for location writes.

use std::time::{Duration, Instant};

/// Holds at most one pending value. Each `schedule` replaces the pending
/// value and restarts the quiet period, so a burst collapses into one write
/// carrying the latest arguments.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    /// Take the pending value once `delay` has passed since the last schedule.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(due) if now >= due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_latest() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(500));
        d.schedule(1, start);
        d.schedule(2, start + Duration::from_millis(100));
        d.schedule(3, start + Duration::from_millis(200));
        assert_eq!(d.poll(start + Duration::from_millis(600)), None);
        assert_eq!(d.poll(start + Duration::from_millis(700)), Some(3));
        assert!(!d.is_pending());
        assert_eq!(d.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn flush_and_cancel() {
        let now = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(500));
        d.schedule("a", now);
        assert_eq!(d.deadline(), Some(now + Duration::from_millis(500)));
        assert_eq!(d.flush(), Some("a"));
        assert_eq!(d.flush(), None);
        d.schedule("b", now);
        d.cancel();
        assert!(!d.is_pending());
        assert_eq!(d.poll(now + Duration::from_secs(1)), None);
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let now = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.schedule(7, now);
        assert_eq!(d.poll(now), Some(7));
    }
}
