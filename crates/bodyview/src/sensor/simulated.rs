//! Simulated depth sensor
//!
//! Frames are produced on a background thread at the configured rate and
//! handed to the registered handler, the way a hardware driver delivers them
//! from its own thread. The producer waits on a stop channel between frames,
//! so closing the reader wakes it immediately.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bodyview_core::{
    BodyFrame, BodyFrameReader, BodyFrameReference, CoordinateMapper, FrameArrivedHandler, Sensor,
    SensorConfig, SensorError,
};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use super::mapper::PinholeMapper;
use super::scene::SimulatedScene;

type SensorResult<T> = std::result::Result<T, SensorError>;

/// A sensor that animates synthetic bodies
pub struct SimulatedSensor {
    scene: SimulatedScene,
    mapper: Arc<PinholeMapper>,
    drop_every: u32,
    open: bool,
}

impl SimulatedSensor {
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            scene: SimulatedScene::new(config),
            mapper: Arc::new(PinholeMapper::depth_camera()),
            drop_every: config.drop_every,
            open: false,
        }
    }
}

impl Sensor for SimulatedSensor {
    fn name(&self) -> &str {
        "Simulated depth sensor"
    }

    fn open(&mut self) -> SensorResult<()> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        if self.open {
            debug!("Closing simulated sensor");
        }
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn body_count(&self) -> usize {
        self.scene.body_count()
    }

    fn depth_frame_size(&self) -> (u32, u32) {
        PinholeMapper::DEPTH_FRAME_SIZE
    }

    fn coordinate_mapper(&self) -> Arc<dyn CoordinateMapper> {
        self.mapper.clone()
    }

    fn open_body_reader(
        &mut self,
        mut handler: FrameArrivedHandler,
    ) -> SensorResult<Box<dyn BodyFrameReader>> {
        if !self.open {
            return Err(SensorError::NotAvailable("sensor is not open".to_string()));
        }

        let scene = self.scene.clone();
        let drop_every = self.drop_every;
        let period = scene.frame_period();
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let thread = thread::Builder::new()
            .name("simulated-sensor".to_string())
            .spawn(move || {
                let mut index: u64 = 0;
                loop {
                    let reference = SimulatedFrameReference {
                        relative_time: scene.relative_time(index),
                        frame: (!is_dropped(index, drop_every)).then(|| scene.frame(index)),
                    };
                    handler(&reference);
                    index += 1;

                    match stop_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("Simulated sensor stopped after {} frames", index);
            })
            .map_err(|e| SensorError::NotAvailable(format!("failed to start producer: {}", e)))?;

        info!("Simulated body stream started ({:?} per frame)", period);

        Ok(Box::new(SimulatedFrameReader {
            stop: Some(stop_tx),
            thread: Some(thread),
        }))
    }
}

/// Every `drop_every`-th frame is gone before it can be acquired
fn is_dropped(index: u64, drop_every: u32) -> bool {
    drop_every > 0 && index > 0 && index % drop_every as u64 == 0
}

struct SimulatedFrameReference {
    relative_time: Duration,
    frame: Option<BodyFrame>,
}

impl BodyFrameReference for SimulatedFrameReference {
    fn relative_time(&self) -> Duration {
        self.relative_time
    }

    fn acquire_frame(&self) -> SensorResult<Option<BodyFrame>> {
        self.frame
            .clone()
            .map(Some)
            .ok_or(SensorError::FrameUnavailable)
    }
}

/// Registration of a handler with the producer thread
pub struct SimulatedFrameReader {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl BodyFrameReader for SimulatedFrameReader {
    fn close(&mut self) {
        // Dropping the sender disconnects the channel and wakes the producer
        self.stop.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Simulated sensor thread panicked");
            }
        }
    }

    fn is_open(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for SimulatedFrameReader {
    fn drop(&mut self) {
        self.close();
    }
}
