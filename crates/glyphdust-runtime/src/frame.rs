//! Frame scheduling primitive and the controller-owned frame loop handle

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(pub u64);

/// Host frame scheduling, in the style of `requestAnimationFrame`.
///
/// A request is one-shot: once reported by `take_due` it is gone and must be
/// requested again for the next frame.
pub trait FrameScheduler {
    /// Ask for a frame after `now`
    fn request_frame(&mut self, now: Instant) -> FrameRequest;

    /// Withdraw a pending request. Unknown or already-delivered ids are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Remove and return every request that is due at `now`, oldest first
    fn take_due(&mut self, now: Instant) -> Vec<FrameRequest>;

    /// Number of requests still pending
    fn pending(&self) -> usize;
}

/// Delivers requested frames at a fixed interval (60 Hz by default)
#[derive(Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    next_id: u64,
    requests: BTreeMap<FrameRequest, Instant>,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 1,
            requests: BTreeMap::new(),
        }
    }

    pub fn with_hz(hz: f64) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / hz))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::with_hz(60.0)
    }
}

impl FrameScheduler for IntervalScheduler {
    fn request_frame(&mut self, now: Instant) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.requests.insert(request, now + self.interval);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.requests.remove(&request);
    }

    fn take_due(&mut self, now: Instant) -> Vec<FrameRequest> {
        let due: Vec<FrameRequest> = self
            .requests
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &due {
            self.requests.remove(id);
        }
        due
    }

    fn pending(&self) -> usize {
        self.requests.len()
    }
}

/// The single animation loop: at most one outstanding frame request.
///
/// Started lazily on the first build and never duplicated.
#[derive(Debug, Default)]
pub struct FrameLoop {
    pending: Option<FrameRequest>,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames delivered since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start the loop. Returns false (and requests nothing) if already running.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler, now: Instant) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(scheduler.request_frame(now));
        log::debug!("[runtime] frame loop started");
        true
    }

    /// Whether `request` is this loop's frame. If so it is consumed and the
    /// next frame is requested.
    pub fn accept(
        &mut self,
        request: FrameRequest,
        scheduler: &mut dyn FrameScheduler,
        now: Instant,
    ) -> bool {
        if self.pending != Some(request) {
            return false;
        }
        self.frames += 1;
        self.pending = Some(scheduler.request_frame(now));
        true
    }

    /// Cancel the outstanding request, if any
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(request) = self.pending.take() {
            scheduler.cancel_frame(request);
            log::debug!("[runtime] frame loop stopped after {} frame(s)", self.frames);
        }
    }
}
