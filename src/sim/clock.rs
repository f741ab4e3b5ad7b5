//! Frame-rate limiter
//!
//! requestAnimationFrame fires at whatever rate the display runs. The
//! simulation advances at most one tick per frame, and only once enough
//! wall time has accumulated for one interval.

/// Elapsed-time accumulator gating ticks to a target rate
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    /// Tick interval in milliseconds
    interval: f64,
    /// Timestamp of the previous frame (ms), None before the first frame
    then: Option<f64>,
    /// Wall time not yet consumed by a tick (ms)
    elapsed: f64,
}

impl FrameLimiter {
    pub fn new(fps: f32) -> Self {
        let fps = if fps > 0.0 { fps as f64 } else { 60.0 };
        Self {
            interval: 1000.0 / fps,
            then: None,
            elapsed: 0.0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval
    }

    /// Feed the current frame timestamp; true means run one tick now.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let delta = match self.then {
            Some(then) => (now_ms - then).max(0.0),
            None => 0.0,
        };
        self.then = Some(now_ms);
        self.elapsed += delta;

        if self.elapsed > self.interval {
            self.elapsed -= self.interval;
            // One tick per frame; leftover debt is dropped, not replayed
            self.elapsed = self.elapsed.min(self.interval);
            true
        } else {
            false
        }
    }

    /// Forget accumulated time (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.then = None;
        self.elapsed = 0.0;
    }
}
