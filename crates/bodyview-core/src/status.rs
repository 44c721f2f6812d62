//! Status line - text model and the update cadence rule
//!
//! The status line changes at most once per interval (one second by
//! default). Between updates the current text is sticky, so a message such
//! as "no sensor" is not overwritten by the next frame.

use std::fmt;
use std::time::{Duration, Instant};

use crate::stats::{compute_fps, FrameStats, Stopwatch};

/// Text shown in the status line
#[derive(Debug, Clone, PartialEq)]
pub enum StatusText {
    /// Sensor opened, no frame yet
    Initializing,
    /// No sensor could be acquired at startup
    NoSensor,
    /// Normal operation
    Running {
        /// Frames per second over the last interval
        fps: f64,
        /// Stream time since the first frame
        elapsed: Duration,
    },
}

impl fmt::Display for StatusText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing sensor..."),
            Self::NoSensor => write!(f, "No sensor found"),
            Self::Running { fps, elapsed } => {
                write!(f, "{:.1} FPS, elapsed {}", fps, format_elapsed(*elapsed))
            }
        }
    }
}

/// Format a duration as `HH:MM:SS.mmm`; hours are not wrapped
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Frame statistics plus the text they produce
#[derive(Debug, Clone)]
pub struct StatusBoard {
    text: StatusText,
    stats: FrameStats,
    stopwatch: Stopwatch,
    interval: Duration,
}

impl StatusBoard {
    /// Create a board showing `text`, updating at most once per `interval`
    pub fn new(text: StatusText, interval: Duration) -> Self {
        Self {
            text,
            stats: FrameStats::default(),
            stopwatch: Stopwatch::new(),
            interval,
        }
    }

    /// Current text
    pub fn text(&self) -> &StatusText {
        &self.text
    }

    /// Current statistics
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Replace the text immediately, outside the cadence
    ///
    /// The text stays up for one full interval before frames may replace it.
    pub fn set_text(&mut self, text: StatusText, now: Instant) {
        self.text = text;
        self.stats.next_status_update = Some(now + self.interval);
    }

    /// True once the sticky window of the current text has passed
    pub fn is_due(&self, now: Instant) -> bool {
        self.stats.next_status_update.map_or(true, |deadline| now >= deadline)
    }

    /// Account for one delivered frame. Returns true if the text changed.
    pub fn on_frame(&mut self, now: Instant, stream_elapsed: Duration) -> bool {
        self.stats.frames_since_update = self.stats.frames_since_update.saturating_add(1);
        self.stats.elapsed_since_start = stream_elapsed;

        let mut updated = false;
        if self.is_due(now) {
            let mut fps = 0.0;
            if self.stopwatch.is_running() {
                self.stopwatch.stop(now);
                fps = compute_fps(self.stats.frames_since_update, self.stopwatch.elapsed(now));
                self.stopwatch.reset();
            }

            self.stats.fps = fps;
            self.stats.next_status_update = Some(now + self.interval);
            self.text = StatusText::Running {
                fps,
                elapsed: stream_elapsed,
            };
            updated = true;
        }

        // Measure FPS over whole intervals only
        if !self.stopwatch.is_running() {
            self.stats.frames_since_update = 0;
            self.stopwatch.start(now);
        }

        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> StatusBoard {
        StatusBoard::new(StatusText::Initializing, Duration::from_secs(1))
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00.000");
        assert_eq!(format_elapsed(Duration::from_millis(65_250)), "00:01:05.250");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 7)), "03:00:07.000");
    }

    #[test]
    fn test_running_text_format() {
        let text = StatusText::Running {
            fps: 29.96,
            elapsed: Duration::from_millis(1_500),
        };
        assert_eq!(text.to_string(), "30.0 FPS, elapsed 00:00:01.500");
    }

    #[test]
    fn test_first_frame_reports_zero_fps() {
        let t0 = Instant::now();
        let mut board = board();

        assert!(board.on_frame(t0, Duration::ZERO));
        assert_eq!(
            board.text(),
            &StatusText::Running {
                fps: 0.0,
                elapsed: Duration::ZERO
            }
        );
    }

    #[test]
    fn test_fps_measured_over_interval() {
        let t0 = Instant::now();
        let mut board = StatusBoard::new(StatusText::Initializing, Duration::from_secs(2));
        board.on_frame(t0, Duration::ZERO);

        // 30 more frames, the last one exactly at the 2 s deadline
        for i in 1..=30u32 {
            let dt = Duration::from_secs(2) * i / 30;
            board.on_frame(t0 + dt, dt);
        }

        assert_eq!(board.stats().fps, 15.0);
    }

    #[test]
    fn test_text_is_sticky_within_interval() {
        let t0 = Instant::now();
        let mut board = board();
        board.on_frame(t0, Duration::ZERO);
        let first = board.text().to_string();

        assert!(!board.on_frame(t0 + Duration::from_millis(400), Duration::from_millis(400)));
        assert_eq!(board.text().to_string(), first);

        assert!(board.on_frame(t0 + Duration::from_millis(1100), Duration::from_millis(1100)));
        assert_ne!(board.text().to_string(), first);
    }

    #[test]
    fn test_set_text_is_sticky_for_one_interval() {
        let t0 = Instant::now();
        let mut board = board();
        board.on_frame(t0, Duration::ZERO);

        // Old deadline has long passed when the message is posted
        let posted = t0 + Duration::from_millis(1200);
        board.set_text(StatusText::NoSensor, posted);
        assert!(!board.is_due(posted));

        assert!(!board.on_frame(posted + Duration::from_millis(33), Duration::from_millis(1233)));
        assert_eq!(board.text().to_string(), "No sensor found");

        assert!(board.on_frame(posted + Duration::from_secs(1), Duration::from_millis(2200)));
        assert!(board.text().to_string().contains("FPS"));
    }
}
