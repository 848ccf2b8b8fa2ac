//! Show completion tracking
//!
//! The show is over once every drone has reached the rally sphere and the
//! full formation has stayed up for the configured hold period. Reached
//! flags are monotonic, so the clock starts at the first all-reached
//! observation and never restarts.

use std::time::{Duration, Instant};

use log::info;

/// Watches for the end of the show.
///
/// Fed one observation after each central pass by whichever thread drives
/// the central loop.
pub struct CompletionMonitor {
    hold: Duration,
    all_reached_at: Option<Instant>,
}

impl CompletionMonitor {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            all_reached_at: None,
        }
    }

    /// Feed one all-reached observation; returns true once the show is over.
    ///
    /// The first `true` observation starts the hold clock. The clock is
    /// never cleared afterwards.
    pub fn observe(&mut self, all_reached: bool) -> bool {
        if all_reached && self.all_reached_at.is_none() {
            self.all_reached_at = Some(Instant::now());
            info!(
                "full formation on the rally sphere, holding for {:.0?}",
                self.hold
            );
        }
        match self.all_reached_at {
            Some(since) => since.elapsed() >= self.hold,
            None => false,
        }
    }

    /// When the full formation was first observed, if it has been yet.
    pub fn formation_since(&self) -> Option<Instant> {
        self.all_reached_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_not_complete_before_formation() {
        let mut monitor = CompletionMonitor::new(Duration::ZERO);
        assert!(!monitor.observe(false));
        assert!(monitor.formation_since().is_none());
    }

    #[test]
    fn test_zero_hold_completes_on_first_formation() {
        let mut monitor = CompletionMonitor::new(Duration::ZERO);
        assert!(monitor.observe(true));
        assert!(monitor.formation_since().is_some());
    }

    #[test]
    fn test_hold_clock_starts_once_and_elapses() {
        let mut monitor = CompletionMonitor::new(Duration::from_millis(30));
        assert!(!monitor.observe(true));
        let started = monitor.formation_since();
        assert!(started.is_some());

        // A later observation must not restart the clock
        assert!(!monitor.observe(true));
        assert_eq!(monitor.formation_since(), started);

        thread::sleep(Duration::from_millis(40));
        assert!(monitor.observe(true));
    }

    #[test]
    fn test_long_hold_stays_incomplete() {
        let mut monitor = CompletionMonitor::new(Duration::from_secs(3600));
        assert!(!monitor.observe(true));
        assert!(!monitor.observe(true));
        assert!(monitor.formation_since().is_some());
    }
}
