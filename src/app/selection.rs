//! Periodic selection-change check that drives preview updates

use std::time::{Duration, Instant};

/// Polls the selected map's display name on a fixed interval and reports when it
/// changed. Only the name is compared, so two files with the same name in
/// different folders count as the same selection.
pub struct SelectionWatcher {
    interval: Duration,
    running: bool,
    next_poll: Option<Instant>,
    /// `None` until the first poll, then the last name seen (`Some(None)` = nothing selected)
    previous: Option<Option<String>>,
}

impl SelectionWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            next_poll: None,
            previous: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin polling. The first poll after a start always reports a change.
    pub fn start(&mut self) {
        self.running = true;
        self.next_poll = None;
        self.previous = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Check `current` if a tick is due. Returns true when the selection changed.
    pub fn poll(&mut self, now: Instant, current: Option<&str>) -> bool {
        if !self.running {
            return false;
        }
        if let Some(due) = self.next_poll {
            if now < due {
                return false;
            }
        }
        self.next_poll = Some(now + self.interval);

        let changed = match &self.previous {
            Some(prev) => prev.as_deref() != current,
            None => true,
        };
        if changed {
            self.previous = Some(current.map(str::to_owned));
        }
        changed
    }

    /// Time left until the next tick, for scheduling a repaint
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_poll
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn first_poll_reports_change_then_waits_for_interval() {
        let mut w = SelectionWatcher::new(TICK);
        w.start();
        let t0 = Instant::now();
        assert!(w.poll(t0, None));
        // Changed, but the next tick isn't due yet
        assert!(!w.poll(t0 + Duration::from_millis(50), Some("A.udk")));
        assert!(w.poll(t0 + TICK, Some("A.udk")));
        assert!(!w.poll(t0 + TICK * 2, Some("A.udk")));
    }

    #[test]
    fn compares_by_name_only() {
        let mut w = SelectionWatcher::new(TICK);
        w.start();
        let t0 = Instant::now();
        assert!(w.poll(t0, Some("Same.udk")));
        // Same name from another folder is not a change
        assert!(!w.poll(t0 + TICK, Some("Same.udk")));
        assert!(w.poll(t0 + TICK * 2, None));
    }

    #[test]
    fn stopped_watcher_never_fires() {
        let mut w = SelectionWatcher::new(TICK);
        let t0 = Instant::now();
        assert!(!w.poll(t0, Some("A.udk")));
        w.start();
        assert!(w.poll(t0, Some("A.udk")));
        w.stop();
        assert!(!w.is_running());
        assert!(!w.poll(t0 + TICK * 5, Some("B.udk")));
    }

    #[test]
    fn until_next_counts_down() {
        let mut w = SelectionWatcher::new(TICK);
        w.start();
        let t0 = Instant::now();
        assert_eq!(w.until_next(t0), Duration::ZERO);
        w.poll(t0, None);
        assert_eq!(w.until_next(t0 + Duration::from_millis(30)), Duration::from_millis(70));
        assert_eq!(w.until_next(t0 + TICK * 3), Duration::ZERO);
    }
}
