//! Frame intake - receives body frames from the sensor and publishes snapshots
//!
//! `on_frame_arrived` runs on whatever thread the sensor delivers from. The
//! body buffer is published copy-on-write through an [`ArcSwap`], so the
//! render tick always reads a complete snapshot and never one that is being
//! overwritten. Statistics and the status line sit behind a short mutex.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::body::BodySlots;
use crate::clock::Clock;
use crate::sensor::{BodyFrameReference, FrameArrivedHandler};
use crate::stats::FrameStats;
use crate::status::{StatusBoard, StatusText};

/// Delivery counters, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeCounters {
    /// Frame events received
    pub delivered: u64,
    /// Frames whose body data was copied in
    pub acquired: u64,
    /// Frames that were gone or unusable by the time they were processed
    pub dropped: u64,
}

struct IntakeState {
    start_time: Option<Duration>,
    board: StatusBoard,
    counters: IntakeCounters,
}

/// Receives body-frame events and owns the shared body snapshot
pub struct FrameIntake {
    clock: Arc<dyn Clock>,
    bodies: ArcSwap<BodySlots>,
    state: Mutex<IntakeState>,
}

impl FrameIntake {
    /// Create an intake for a sensor tracking up to `body_count` bodies
    pub fn new(body_count: usize, status_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            bodies: ArcSwap::from_pointee(BodySlots::new(body_count)),
            state: Mutex::new(IntakeState {
                start_time: None,
                board: StatusBoard::new(StatusText::Initializing, status_interval),
                counters: IntakeCounters::default(),
            }),
        }
    }

    /// Wrap this intake in a handler suitable for [`crate::Sensor::open_body_reader`]
    pub fn handler(self: &Arc<Self>) -> FrameArrivedHandler {
        let intake = Arc::clone(self);
        Box::new(move |reference: &dyn BodyFrameReference| {
            intake.on_frame_arrived(reference)
        })
    }

    /// Process one delivered frame
    ///
    /// A frame that can no longer be acquired is skipped and the previous
    /// body snapshot stays in place.
    pub fn on_frame_arrived(&self, reference: &dyn BodyFrameReference) {
        let relative_time = reference.relative_time();
        let now = self.clock.now();

        {
            let mut state = self.state.lock();
            let start = *state.start_time.get_or_insert(relative_time);
            let elapsed = relative_time.saturating_sub(start);
            state.counters.delivered += 1;
            if state.board.on_frame(now, elapsed) {
                trace!("Status updated: {}", state.board.text());
            }
        }

        let acquired = match reference.acquire_frame() {
            Ok(Some(frame)) => {
                // Single writer: clone the current snapshot, refresh, publish
                let mut next = BodySlots::clone(&self.bodies.load());
                match frame.refresh_body_data(&mut next) {
                    Ok(()) => {
                        self.bodies.store(Arc::new(next));
                        true
                    }
                    Err(e) => {
                        debug!("Discarding body frame: {}", e);
                        false
                    }
                }
            }
            Ok(None) => {
                trace!("Body frame no longer available");
                false
            }
            Err(e) => {
                trace!("Body frame acquisition failed: {}", e);
                false
            }
        };

        let mut state = self.state.lock();
        if acquired {
            state.counters.acquired += 1;
        } else {
            state.counters.dropped += 1;
        }
    }

    /// Latest complete body snapshot
    pub fn bodies(&self) -> Arc<BodySlots> {
        self.bodies.load_full()
    }

    /// Current status line
    pub fn status_text(&self) -> String {
        self.state.lock().board.text().to_string()
    }

    /// Current frame statistics
    pub fn stats(&self) -> FrameStats {
        *self.state.lock().board.stats()
    }

    /// Delivery counters
    pub fn counters(&self) -> IntakeCounters {
        self.state.lock().counters
    }

    /// Post a status message that frames will not overwrite for one interval
    pub fn set_status(&self, text: StatusText) {
        let now = self.clock.now();
        self.state.lock().board.set_text(text, now);
    }
}
