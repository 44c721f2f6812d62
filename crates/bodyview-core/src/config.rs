//! Viewer configuration
//!
//! Loaded from a TOML file; every section and field is optional and falls
//! back to its default.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::logging::LogConfig;
use crate::policy::RenderStyle;
use crate::{CoreError, Result};

/// Accepted range for frame and redraw rates, Hz
pub const RATE_RANGE_HZ: RangeInclusive<f32> = 1.0..=1000.0;

/// Window and primitive-renderer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Inner width; defaults to the sensor's depth frame width
    pub width: Option<u32>,
    /// Inner height; defaults to the sensor's depth frame height
    pub height: Option<u32>,
    /// Segments of the circle triangle fan
    pub circle_segments: u32,
    /// Redraw rate cap; 0 redraws as fast as events allow
    pub target_fps: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "BodyView".to_string(),
            width: None,
            height: None,
            circle_segments: 32,
            target_fps: 60.0,
        }
    }
}

/// Status line settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Minimum time between status line updates, milliseconds
    pub update_interval_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000,
        }
    }
}

impl StatusConfig {
    /// Update interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

/// Sensor selection and simulated-sensor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Try to acquire a sensor at startup
    pub enabled: bool,
    /// Maximum simultaneously tracked bodies
    pub body_count: usize,
    /// Bodies the simulated sensor animates
    pub simulated_bodies: usize,
    /// Frames per second delivered by the simulated sensor
    pub frame_rate: f32,
    /// Every n-th simulated frame is released before it can be acquired; 0 never
    pub drop_every: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            body_count: 6,
            simulated_bodies: 2,
            frame_rate: 30.0,
            drop_every: 45,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// `[window]`
    pub window: WindowConfig,
    /// `[style]`
    pub style: RenderStyle,
    /// `[status]`
    pub status: StatusConfig,
    /// `[sensor]`
    pub sensor: SensorConfig,
    /// `[logging]`
    pub logging: LogConfig,
}

impl ViewerConfig {
    /// Default location in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("BodyView").join("bodyview.toml"))
    }

    /// Parse from TOML text and validate
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load `path` if it exists, otherwise defaults. Invalid files are
    /// reported and replaced by defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Ignoring config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.window.circle_segments < 3 {
            return Err(CoreError::InvalidConfig(format!(
                "window.circle_segments must be at least 3, got {}",
                self.window.circle_segments
            )));
        }
        if self.status.update_interval_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "status.update_interval_ms must be positive".to_string(),
            ));
        }
        if self.sensor.body_count == 0 {
            return Err(CoreError::InvalidConfig(
                "sensor.body_count must be positive".to_string(),
            ));
        }
        if self.sensor.simulated_bodies > self.sensor.body_count {
            return Err(CoreError::InvalidConfig(format!(
                "sensor.simulated_bodies ({}) exceeds sensor.body_count ({})",
                self.sensor.simulated_bodies, self.sensor.body_count
            )));
        }
        if !RATE_RANGE_HZ.contains(&self.sensor.frame_rate) {
            return Err(CoreError::InvalidConfig(format!(
                "sensor.frame_rate must be within {:?}, got {}",
                RATE_RANGE_HZ, self.sensor.frame_rate
            )));
        }
        let target_fps = self.window.target_fps;
        if target_fps != 0.0 && !RATE_RANGE_HZ.contains(&target_fps) {
            return Err(CoreError::InvalidConfig(format!(
                "window.target_fps must be 0 (uncapped) or within {:?}, got {}",
                RATE_RANGE_HZ, target_fps
            )));
        }
        Ok(())
    }
}
