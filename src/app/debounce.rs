/// Timer-based debounce for high-frequency inputs (pan, zoom, typing).
/// Every change restarts the delay window; the pending recomputation fires
/// once when the window elapses, so a superseded change can never apply a
/// stale result.
///
/// Time is an explicit `f64` seconds argument (egui's input clock), which
/// keeps the struct pure and testable without real timers.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay_secs: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub const DEFAULT_DELAY_SECS: f64 = 0.05;

    pub fn new(delay_secs: f64) -> Self {
        Self {
            delay_secs,
            deadline: None,
        }
    }

    /// Records an input change at `now`, restarting the settle window.
    pub fn note_change(&mut self, now: f64) {
        self.deadline = Some(now + self.delay_secs);
    }

    /// Forces the next `should_fire` to report true immediately. Used when
    /// an input change must not wait out the settle window (e.g. the
    /// viewport was measured for the first time).
    pub fn fire_now(&mut self, now: f64) {
        self.deadline = Some(now);
    }

    /// True exactly once per settled burst: when the deadline has passed,
    /// the pending flag is consumed.
    pub fn should_fire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Seconds until the pending deadline, if any. The UI uses this to
    /// request a repaint at the right moment instead of polling every frame.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.deadline.map(|deadline| (deadline - now).max(0.0))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_fire_before_the_delay() {
        let mut debounce = Debouncer::new(0.05);
        debounce.note_change(1.0);
        assert!(!debounce.should_fire(1.02));
        assert!(debounce.should_fire(1.05));
    }

    #[test]
    fn fires_exactly_once_per_burst() {
        let mut debounce = Debouncer::new(0.05);
        debounce.note_change(1.0);
        assert!(debounce.should_fire(1.1));
        assert!(!debounce.should_fire(1.2));
    }

    #[test]
    fn new_changes_restart_the_window() {
        let mut debounce = Debouncer::new(0.05);
        debounce.note_change(1.0);
        debounce.note_change(1.04);
        // The original deadline has passed, but the burst has not settled.
        assert!(!debounce.should_fire(1.05));
        assert!(debounce.should_fire(1.09));
    }

    #[test]
    fn fire_now_bypasses_the_delay() {
        let mut debounce = Debouncer::new(0.05);
        debounce.fire_now(2.0);
        assert!(debounce.should_fire(2.0));
    }

    #[test]
    fn remaining_reports_time_to_deadline() {
        let mut debounce = Debouncer::new(0.05);
        assert_eq!(debounce.remaining(0.0), None);
        debounce.note_change(1.0);
        let remaining = debounce.remaining(1.02).unwrap();
        assert!((remaining - 0.03).abs() < 1e-9);
    }
}
