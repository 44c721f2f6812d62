//! BodyView - Live skeleton overlay for depth-sensor body tracking
//!
//! The application crate: winit shell, egui text overlay, simulated sensor,
//! command line and logging setup. Domain logic lives in `bodyview-core`,
//! GPU drawing in `bodyview-render`.

pub mod app;
pub mod cli;
pub mod logging_setup;
pub mod overlay;
pub mod sensor;

pub use app::App;
pub use cli::Cli;
