//! Sensor collaborator - the capabilities BodyView consumes from a depth sensor
//!
//! Body tracking itself is not implemented here. A sensor delivers body
//! frames through a registered handler, exposes a coordinate mapper from
//! camera space to depth (display) space, and has an open/close lifecycle.

use std::sync::Arc;
use std::time::Duration;

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::body::{Body, BodySlots};

/// 3D point in camera space, meters
pub type CameraSpacePoint = Vec3;

/// 2D point in depth (display) space, pixels
pub type DepthSpacePoint = Vec2;

/// Sensor errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// No sensor is attached or it could not be opened
    #[error("Sensor not available: {0}")]
    NotAvailable(String),

    /// The frame was released before it could be acquired
    #[error("Frame no longer available")]
    FrameUnavailable,

    /// Body buffer does not match the sensor's body count
    #[error("Body buffer has {actual} slots, sensor reports {expected}")]
    CapacityMismatch {
        /// Slots the sensor delivers
        expected: usize,
        /// Slots in the destination buffer
        actual: usize,
    },
}

/// Result type for sensor operations
pub type Result<T> = std::result::Result<T, SensorError>;

/// Maps camera-space joint positions into depth space
pub trait CoordinateMapper: Send + Sync {
    /// Project a camera-space point. Points the camera cannot see map to
    /// non-finite coordinates.
    fn map_camera_point_to_depth_space(&self, point: CameraSpacePoint) -> DepthSpacePoint;
}

/// One sampled snapshot of every body slot
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFrame {
    /// Sensor-relative timestamp
    pub relative_time: Duration,
    /// One entry per body slot
    pub bodies: Vec<Option<Body>>,
}

impl BodyFrame {
    /// Overwrite `slots` with this frame's bodies
    ///
    /// Fails without touching `slots` if the slot counts differ.
    pub fn refresh_body_data(&self, slots: &mut BodySlots) -> Result<()> {
        if slots.capacity() != self.bodies.len() {
            return Err(SensorError::CapacityMismatch {
                expected: self.bodies.len(),
                actual: slots.capacity(),
            });
        }
        slots.slots_mut().clone_from_slice(&self.bodies);
        Ok(())
    }
}

/// Handle to a delivered frame that may already be gone
pub trait BodyFrameReference {
    /// Sensor-relative timestamp of the frame
    fn relative_time(&self) -> Duration;

    /// Acquire the frame. `Ok(None)` and `Err` both mean it is not available.
    fn acquire_frame(&self) -> Result<Option<BodyFrame>>;
}

/// Callback invoked for every delivered frame, possibly off the render thread
pub type FrameArrivedHandler = Box<dyn FnMut(&dyn BodyFrameReference) + Send>;

/// Registration of a [`FrameArrivedHandler`]; delivery stops on close or drop
pub trait BodyFrameReader: Send {
    /// Unregister the handler and wait for in-flight delivery to finish
    fn close(&mut self);

    /// True until `close` is called
    fn is_open(&self) -> bool;
}

/// A body-tracking depth sensor
pub trait Sensor: Send {
    /// Human readable identifier
    fn name(&self) -> &str;

    /// Start the device
    fn open(&mut self) -> Result<()>;

    /// Stop the device. Readers must be closed first.
    fn close(&mut self);

    /// True between `open` and `close`
    fn is_open(&self) -> bool;

    /// Maximum number of simultaneously tracked bodies
    fn body_count(&self) -> usize;

    /// Extent of depth space in pixels
    fn depth_frame_size(&self) -> (u32, u32);

    /// Camera-to-depth-space mapper
    fn coordinate_mapper(&self) -> Arc<dyn CoordinateMapper>;

    /// Register `handler` for body frames
    fn open_body_reader(&mut self, handler: FrameArrivedHandler) -> Result<Box<dyn BodyFrameReader>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::JointMap;

    #[test]
    fn test_refresh_overwrites_all_slots() {
        let mut slots = BodySlots::new(2);
        slots.slots_mut()[0] = Some(Body::default());

        let frame = BodyFrame {
            relative_time: Duration::from_millis(33),
            bodies: vec![None, Some(Body::tracked(3, JointMap::default()))],
        };
        frame.refresh_body_data(&mut slots).unwrap();

        assert!(slots.slots()[0].is_none());
        assert_eq!(slots.tracked_count(), 1);
    }

    #[test]
    fn test_refresh_rejects_capacity_mismatch() {
        let mut slots = BodySlots::new(6);
        slots.slots_mut()[0] = Some(Body::tracked(1, JointMap::default()));
        let frame = BodyFrame {
            relative_time: Duration::ZERO,
            bodies: vec![None; 2],
        };

        let err = frame.refresh_body_data(&mut slots).unwrap_err();
        assert_eq!(
            err,
            SensorError::CapacityMismatch {
                expected: 2,
                actual: 6
            }
        );
        assert_eq!(slots.tracked_count(), 1);
    }
}
