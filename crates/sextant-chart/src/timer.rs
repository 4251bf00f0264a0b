//! Single-shot click accumulation timer.
//!
//! The timer never runs on its own thread: the host asks for
//! [`ClickTimer::deadline`], wakes up at that instant and calls
//! [`ClickTimer::poll`] on the same event loop that delivers pointer events.

use std::time::{Duration, Instant};

use sextant_core::math::Vec2;

/// Clicks gathered while the timer was armed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClick {
    /// Number of clicks received before expiry.
    pub count: u32,
    /// Position of the most recent click.
    pub position: Vec2,
    /// Every click position, oldest first.
    pub positions: Vec<Vec2>,
}

/// Cancellable, restartable single-shot timer carrying click state.
#[derive(Debug, Clone)]
pub struct ClickTimer {
    delay: Duration,
    deadline: Option<Instant>,
    pending: Option<PendingClick>,
}

impl ClickTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Record a click. Arms the timer, or extends it when already armed, and
    /// returns the accumulated click count.
    pub fn register(&mut self, position: Vec2, now: Instant) -> u32 {
        let pending = self.pending.get_or_insert_with(|| PendingClick {
            count: 0,
            position,
            positions: Vec::new(),
        });
        pending.count += 1;
        pending.position = position;
        pending.positions.push(position);

        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        tracing::debug!(count = pending.count, ?deadline, "click timer armed");
        pending.count
    }

    /// Take the accumulated clicks if the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<PendingClick> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Disarm without firing, returning whatever was pending.
    pub fn cancel(&mut self) -> Option<PendingClick> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn pending(&self) -> Option<&PendingClick> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_click_fires_after_delay() {
        let start = Instant::now();
        let mut timer = ClickTimer::new(Duration::from_millis(200));
        assert_eq!(timer.register(Vec2::new(1.0, 2.0), start), 1);

        assert!(timer.poll(start + Duration::from_millis(199)).is_none());
        let fired = timer.poll(start + Duration::from_millis(200)).unwrap();
        assert_eq!(fired.count, 1);
        assert_eq!(fired.position, Vec2::new(1.0, 2.0));
        assert!(!timer.is_armed());
        assert!(timer.poll(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_second_click_extends_deadline() {
        let start = Instant::now();
        let mut timer = ClickTimer::new(Duration::from_millis(200));
        timer.register(Vec2::ZERO, start);
        let second = start + Duration::from_millis(150);
        assert_eq!(timer.register(Vec2::new(5.0, 5.0), second), 2);
        assert_eq!(timer.deadline(), Some(second + Duration::from_millis(200)));

        assert!(timer.poll(start + Duration::from_millis(250)).is_none());
        let fired = timer.poll(start + Duration::from_millis(400)).unwrap();
        assert_eq!(fired.count, 2);
        assert_eq!(fired.position, Vec2::new(5.0, 5.0));
        assert_eq!(fired.positions, vec![Vec2::ZERO, Vec2::new(5.0, 5.0)]);
    }

    #[test]
    fn test_cancel_disarms() {
        let start = Instant::now();
        let mut timer = ClickTimer::new(Duration::from_millis(10));
        timer.register(Vec2::ZERO, start);
        assert_eq!(timer.cancel().map(|p| p.count), Some(1));
        assert!(timer.poll(start + Duration::from_secs(1)).is_none());
    }
}
