//! Restartable one-shot timers for hover and resize coalescing.
//!
//! The viewers run single-threaded and cooperative: nothing here sleeps or
//! spawns. A `Debounce` records a deadline when armed and reports it once
//! when polled past it; the host drives time explicitly, which also makes
//! the timing behavior fully deterministic in tests.

use std::time::{Duration, Instant};

/// A cancelable, restartable one-shot timer.
///
/// Arming always replaces any pending deadline, so only the last of a rapid
/// burst of arms results in a fire.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// A timer that fires `delay` after the most recent arm.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start (or restart) the timer from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire if the deadline has passed. Fires at most once per arm.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_unarmed_never_fires() {
        let mut timer = Debounce::new(DELAY);
        assert!(!timer.is_armed());
        assert!(!timer.poll(Instant::now()));
    }

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut timer = Debounce::new(DELAY);
        timer.arm(start);

        assert!(!timer.poll(start + Duration::from_millis(99)));
        assert!(timer.poll(start + DELAY));
        // Already fired; stays quiet until re-armed.
        assert!(!timer.poll(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_cancel_before_deadline() {
        let start = Instant::now();
        let mut timer = Debounce::new(DELAY);
        timer.arm(start);
        timer.cancel();

        assert!(!timer.is_armed());
        assert!(!timer.poll(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_rearm_restarts_the_window() {
        let start = Instant::now();
        let mut timer = Debounce::new(DELAY);

        // A burst of arms coalesces into a single fire measured from the
        // last arm.
        timer.arm(start);
        timer.arm(start + Duration::from_millis(50));
        timer.arm(start + Duration::from_millis(90));

        assert!(!timer.poll(start + Duration::from_millis(150)));
        assert!(timer.poll(start + Duration::from_millis(190)));
    }
}
