//! BodyView - Live skeleton overlay for depth-sensor body tracking

use anyhow::Result;
use bodyview::{logging_setup, App, Cli};
use clap::Parser;
use tracing::info;
use winit::event_loop::EventLoop;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let _log_guard = logging_setup::init(&config.logging)?;

    info!("==========================================");
    info!("===      BodyView Session Started      ===");
    info!("==========================================");
    Cli::log_summary(&config);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.take_error() {
        return Err(e);
    }

    info!("BodyView exited cleanly");
    Ok(())
}
