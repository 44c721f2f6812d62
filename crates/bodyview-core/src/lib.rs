//! BodyView Core - Domain Model and Frame Pipeline
//!
//! This crate contains everything in BodyView that does not touch the GPU:
//! - Body, joint, bone and hand-state model
//! - Sensor collaborator traits (frame delivery, coordinate mapping)
//! - Frame intake, FPS statistics and the status cadence rule
//! - The skeleton render policy and the per-tick orchestration
//! - Configuration and logging configuration

#![warn(missing_docs)]

pub use glam::{Vec2, Vec3};
use thiserror::Error;

pub mod body;
pub mod bone;
pub mod canvas;
pub mod clock;
pub mod color;
pub mod config;
pub mod frame_loop;
pub mod intake;
pub mod logging;
pub mod policy;
pub mod sensor;
pub mod stats;
pub mod status;

// --- Re-exports grouped by category ---

// Body model
pub use body::{Body, BodySlots, HandState, Joint, JointMap, JointType, TrackingState};
pub use bone::{Bone, BoneGroup, BONES};

// Sensor collaborator
pub use sensor::{
    BodyFrame, BodyFrameReader, BodyFrameReference, CameraSpacePoint, CoordinateMapper,
    DepthSpacePoint, FrameArrivedHandler, Sensor, SensorError,
};

// Drawing
pub use canvas::{Canvas, DrawCommand, DrawList};
pub use color::Color;
pub use policy::{BoneStyle, RenderStyle, SkeletonRenderPolicy};

// Frame pipeline
pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_loop::{FrameLoop, SensorState, TickSummary};
pub use intake::{FrameIntake, IntakeCounters};
pub use stats::{compute_fps, FrameStats, Stopwatch};
pub use status::{StatusBoard, StatusText};

// Configuration & Logging
pub use config::{SensorConfig, StatusConfig, ViewerConfig, WindowConfig, RATE_RANGE_HZ};
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration file could not be read or written
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid TOML for `ViewerConfig`
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration values are out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
