//! Debounced saving.
//!
//! Rapid control edits are coalesced into one save once the input has been
//! quiet for the configured delay. Time is supplied by the host
//! (`performance.now()`), so no timers live here: the host calls
//! [`Debouncer::poll`] from its frame or timeout callback.

#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// (Re)start the quiet period from `now_ms`.
    pub fn schedule(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// `true` exactly once when the quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Milliseconds until the pending save fires, for scheduling a timeout.
    pub fn remaining(&self, now_ms: f64) -> Option<f64> {
        self.deadline.map(|d| (d - now_ms).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesces_bursts() {
        let mut d = Debouncer::new(500.0);
        d.schedule(0.0);
        d.schedule(200.0);
        d.schedule(400.0);
        assert!(!d.poll(800.0));
        assert_eq!(d.remaining(800.0), Some(100.0));
        assert!(d.poll(900.0));
        assert!(!d.poll(2000.0));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_drops_pending_save() {
        let mut d = Debouncer::new(500.0);
        d.schedule(0.0);
        d.cancel();
        assert!(!d.poll(1000.0));
        assert_eq!(d.remaining(0.0), None);
    }
}
