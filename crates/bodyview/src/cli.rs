//! Command line arguments

use std::path::PathBuf;

use anyhow::{Context, Result};
use bodyview_core::ViewerConfig;
use clap::Parser;
use tracing::info;

/// Live skeleton overlay for depth-sensor body tracking
#[derive(Parser, Debug, Default)]
#[command(name = "BodyView", version, about)]
pub struct Cli {
    /// Configuration file (TOML); defaults to the platform config directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start without acquiring a sensor
    #[arg(long)]
    pub no_sensor: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Segments of each joint and hand circle
    #[arg(long, value_name = "N")]
    pub circle_segments: Option<u32>,
}

impl Cli {
    /// Load the configuration and apply command line overrides
    ///
    /// An explicit `--config` must exist and parse; the default location
    /// silently falls back to defaults.
    pub fn resolve_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => match ViewerConfig::default_path() {
                Some(path) => ViewerConfig::load_or_default(&path),
                None => ViewerConfig::default(),
            },
        };

        if self.no_sensor {
            config.sensor.enabled = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(segments) = self.circle_segments {
            config.window.circle_segments = segments;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Log the effective settings
    pub fn log_summary(config: &ViewerConfig) {
        info!(
            "Sensor {}, {} circle segments, status every {:?}",
            if config.sensor.enabled {
                "enabled"
            } else {
                "disabled"
            },
            config.window.circle_segments,
            config.status.interval()
        );
    }
}
