//! Sensor acquisition
//!
//! Only the simulated sensor ships with BodyView; a hardware driver plugs in
//! through the same [`Sensor`] trait.

mod mapper;
mod scene;
mod simulated;

pub use mapper::PinholeMapper;
pub use scene::SimulatedScene;
pub use simulated::{SimulatedFrameReader, SimulatedSensor};

use bodyview_core::{Sensor, SensorConfig};
use tracing::{info, warn};

/// Open the default sensor. `None` means no sensor is available.
pub fn acquire(config: &SensorConfig) -> Option<Box<dyn Sensor>> {
    if !config.enabled {
        info!("Sensor disabled by configuration");
        return None;
    }

    let mut sensor: Box<dyn Sensor> = Box::new(SimulatedSensor::new(config));
    match sensor.open() {
        Ok(()) => {
            info!(
                "Opened sensor '{}' ({} body slots, depth {:?})",
                sensor.name(),
                sensor.body_count(),
                sensor.depth_frame_size()
            );
            Some(sensor)
        }
        Err(e) => {
            warn!("Failed to open sensor '{}': {}", sensor.name(), e);
            None
        }
    }
}
