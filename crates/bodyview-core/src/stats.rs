//! Frame statistics - stopwatch and frames-per-second

use std::time::{Duration, Instant};

/// Frames per second over a measured interval. Zero when nothing was measured.
pub fn compute_fps(frames: u32, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        f64::from(frames) / seconds
    } else {
        0.0
    }
}

/// Start/stop interval timer driven by externally supplied instants
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Stopwatch {
    /// A stopped stopwatch with nothing accumulated
    pub fn new() -> Self {
        Self::default()
    }

    /// True between `start` and `stop`
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start measuring. No-op if already running.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Stop measuring and bank the running interval
    pub fn stop(&mut self, now: Instant) {
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(started_at);
        }
    }

    /// Stop and discard everything measured
    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Total measured time, including the running interval
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self.accumulated + now.saturating_duration_since(started_at),
            None => self.accumulated,
        }
    }
}

/// Counters behind the status line
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames delivered since the FPS interval started
    pub frames_since_update: u32,
    /// Stream time of the latest frame relative to the first one
    pub elapsed_since_start: Duration,
    /// Most recently computed frame rate
    pub fps: f64,
    /// Earliest instant the status line may change again
    pub next_status_update: Option<Instant>,
}
