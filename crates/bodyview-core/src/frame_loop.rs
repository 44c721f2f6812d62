//! Frame loop - one render tick of the overlay
//!
//! Per tick: clear, draw every tracked body through the policy, then the
//! status line last so it is always on top. Without a sensor only the
//! status line is drawn; that state is entered once at startup and kept
//! for the life of the process.

use std::sync::Arc;

use glam::Vec2;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::intake::FrameIntake;
use crate::policy::SkeletonRenderPolicy;
use crate::sensor::CoordinateMapper;
use crate::status::StatusText;

/// Top-left corner of the status line
pub const STATUS_POSITION: Vec2 = Vec2::new(5.0, 5.0);

/// Whether a sensor was acquired at startup
pub enum SensorState {
    /// No sensor; permanent for the process lifetime
    Absent,
    /// Sensor open and delivering into `intake`
    Present {
        /// Shared frame intake
        intake: Arc<FrameIntake>,
        /// Camera-to-depth-space mapper
        mapper: Arc<dyn CoordinateMapper>,
    },
}

/// What a tick drew
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// Bodies passed to the policy
    pub bodies_drawn: usize,
    /// Status line drawn last
    pub status: String,
}

/// Ties frame intake, coordinate mapping and the render policy together
pub struct FrameLoop {
    sensor: SensorState,
    policy: SkeletonRenderPolicy,
    clear_color: Color,
    status_color: Color,
}

impl FrameLoop {
    /// Create a loop over the given sensor state
    pub fn new(sensor: SensorState, policy: SkeletonRenderPolicy) -> Self {
        Self {
            sensor,
            policy,
            clear_color: Color::BLACK,
            status_color: Color::WHITE,
        }
    }

    /// True if a sensor was acquired
    pub fn has_sensor(&self) -> bool {
        matches!(self.sensor, SensorState::Present { .. })
    }

    /// The frame intake, if a sensor is present
    pub fn intake(&self) -> Option<&Arc<FrameIntake>> {
        match &self.sensor {
            SensorState::Present { intake, .. } => Some(intake),
            SensorState::Absent => None,
        }
    }

    /// Draw one frame
    pub fn tick<C: Canvas + ?Sized>(&self, canvas: &mut C) -> TickSummary {
        canvas.clear(self.clear_color);

        let (bodies_drawn, status) = match &self.sensor {
            SensorState::Absent => (0, StatusText::NoSensor.to_string()),
            SensorState::Present { intake, mapper } => {
                let bodies = intake.bodies();
                let mut drawn = 0;
                for body in bodies.tracked() {
                    self.policy.render_body(body, mapper.as_ref(), canvas);
                    drawn += 1;
                }
                (drawn, intake.status_text())
            }
        };

        canvas.draw_text(STATUS_POSITION, &status, self.status_color);

        TickSummary {
            bodies_drawn,
            status,
        }
    }
}
