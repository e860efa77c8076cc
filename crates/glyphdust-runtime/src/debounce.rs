//! Trailing-edge debouncer for container size notifications

use glyphdust_core::CanvasSize;
use std::time::{Duration, Instant};

/// Default quiet period before a resize is applied
pub const RESIZE_QUIET_PERIOD: Duration = Duration::from_millis(150);

fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier).unwrap_or(Duration::ZERO)
}

/// Coalesces bursts of size notifications into one.
///
/// Every notification restarts the quiet period and the latest size wins.
/// Time is always passed in, so callers (and tests) own the clock.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet: Duration,
    pending: Option<CanvasSize>,
    last_event: Option<Instant>,
    last_applied: Option<CanvasSize>,
    connected: bool,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_event: None,
            last_applied: None,
            connected: true,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record a size notification. Returns false when it was ignored
    /// (observer disconnected, or same size as the applied one with nothing pending).
    pub fn observe(&mut self, size: CanvasSize, now: Instant) -> bool {
        if !self.connected {
            return false;
        }
        if self.pending.is_none() && self.last_applied == Some(size) {
            return false;
        }
        self.pending = Some(size);
        self.last_event = Some(now);
        true
    }

    /// The settled size, once the quiet period has elapsed since the last notification
    pub fn poll(&mut self, now: Instant) -> Option<CanvasSize> {
        let last_event = self.last_event?;
        if duration_since_or_zero(now, last_event) < self.quiet {
            return None;
        }
        let size = self.pending.take()?;
        self.last_event = None;
        self.last_applied = Some(size);
        Some(size)
    }

    /// Time left until the pending size settles
    pub fn time_until_apply(&self, now: Instant) -> Option<Duration> {
        self.pending?;
        let elapsed = duration_since_or_zero(now, self.last_event?);
        Some(self.quiet.saturating_sub(elapsed))
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_applied(&self) -> Option<CanvasSize> {
        self.last_applied
    }

    /// Stop observing; pending and future notifications are dropped
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.pending = None;
        self.last_event = None;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn two_events_in_window_settle_once_with_last_size() {
        let t0 = Instant::now();
        let mut d = ResizeDebouncer::default();
        assert!(d.observe(CanvasSize::new(800, 600), t0));
        assert!(d.observe(CanvasSize::new(1024, 300), t0 + ms(100)));

        assert_eq!(d.poll(t0 + ms(200)), None);
        assert_eq!(d.time_until_apply(t0 + ms(200)), Some(ms(50)));
        assert_eq!(d.poll(t0 + ms(250)), Some(CanvasSize::new(1024, 300)));
        assert_eq!(d.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn separated_events_settle_separately() {
        let t0 = Instant::now();
        let mut d = ResizeDebouncer::default();
        d.observe(CanvasSize::new(100, 100), t0);
        assert_eq!(d.poll(t0 + ms(150)), Some(CanvasSize::new(100, 100)));
        d.observe(CanvasSize::new(200, 100), t0 + ms(400));
        assert_eq!(d.poll(t0 + ms(560)), Some(CanvasSize::new(200, 100)));
    }

    #[test]
    fn same_size_after_settle_is_ignored() {
        let t0 = Instant::now();
        let mut d = ResizeDebouncer::default();
        d.observe(CanvasSize::new(100, 100), t0);
        d.poll(t0 + ms(150));
        assert!(!d.observe(CanvasSize::new(100, 100), t0 + ms(300)));
        assert!(!d.has_pending());
    }

    #[test]
    fn disconnect_drops_pending() {
        let t0 = Instant::now();
        let mut d = ResizeDebouncer::default();
        d.observe(CanvasSize::new(100, 100), t0);
        d.disconnect();
        assert_eq!(d.poll(t0 + ms(500)), None);
        assert!(!d.observe(CanvasSize::new(10, 10), t0 + ms(600)));
        assert!(!d.is_connected());
    }

    proptest! {
        #[test]
        fn bursts_collapse_to_last_size(
            gaps in proptest::collection::vec(0u64..150, 1..20),
            sizes in proptest::collection::vec((1u32..2000, 1u32..2000), 20),
        ) {
            let t0 = Instant::now();
            let mut d = ResizeDebouncer::default();
            let mut now = t0;
            let mut last = CanvasSize::default();
            let mut applied = 0;
            for (gap, (w, h)) in gaps.iter().zip(sizes.iter()) {
                now += ms(*gap);
                if d.poll(now).is_some() {
                    applied += 1;
                }
                last = CanvasSize::new(*w, *h);
                d.observe(last, now);
            }
            prop_assert_eq!(applied, 0);
            prop_assert_eq!(d.poll(now + ms(150)), Some(last));
        }
    }
}
