//! Application shell: window, GPU state and the per-frame redraw
//!
//! The sensor is acquired before the event loop starts, so the window can
//! be sized to its depth frame. GPU state is created on the first
//! `resumed` and torn down in `exiting`, after the sensor has stopped
//! delivering.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bodyview_core::{
    BodyFrameReader, Color, DrawList, FrameIntake, FrameLoop, Sensor, SensorState,
    SkeletonRenderPolicy, SystemClock, ViewerConfig,
};
use bodyview_render::{ShapeRenderer, WgpuBackend};
use tracing::{debug, error, info, trace, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::overlay::TextOverlay;
use crate::sensor::{self, PinholeMapper};

/// Everything that lives on the GPU, in teardown order
struct GpuState {
    shapes: ShapeRenderer,
    overlay: TextOverlay,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    backend: WgpuBackend,
    window: Arc<Window>,
}

/// Sensor handles owned by the application
struct SensorHandles {
    sensor: Box<dyn Sensor>,
    reader: Box<dyn BodyFrameReader>,
}

/// The BodyView application
pub struct App {
    config: ViewerConfig,
    sensor: Option<SensorHandles>,
    frame_loop: Option<FrameLoop>,
    depth_frame_size: (u32, u32),
    gpu: Option<GpuState>,
    draw_list: DrawList,
    frame_interval: Option<Duration>,
    next_frame: Instant,
    frames_rendered: u64,
    error: Option<anyhow::Error>,
}

impl App {
    /// Acquire the sensor and start frame delivery
    pub fn new(config: ViewerConfig) -> Self {
        let (handles, state, depth_frame_size) = start_sensor(&config);
        let frame_loop = FrameLoop::new(state, SkeletonRenderPolicy::new(config.style.clone()));
        if !frame_loop.has_sensor() {
            info!("Running without a sensor");
        }

        let frame_interval = frame_interval(config.window.target_fps);

        Self {
            config,
            sensor: handles,
            frame_loop: Some(frame_loop),
            depth_frame_size,
            gpu: None,
            draw_list: DrawList::new(),
            frame_interval,
            next_frame: Instant::now(),
            frames_rendered: 0,
            error: None,
        }
    }

    /// True if a sensor is delivering frames
    pub fn has_sensor(&self) -> bool {
        self.frame_loop.as_ref().is_some_and(FrameLoop::has_sensor)
    }

    /// Inner window size: configured, or the sensor's depth frame extents
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.config.window.width.unwrap_or(self.depth_frame_size.0),
            self.config.window.height.unwrap_or(self.depth_frame_size.1),
        )
    }

    /// Fatal error that ended the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<GpuState> {
        let (width, height) = self.window_size();
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let backend = WgpuBackend::new_blocking().context("Failed to initialize GPU")?;
        info!(
            "Using adapter '{}' ({:?})",
            backend.adapter_info.name, backend.adapter_info.backend
        );

        let surface = backend.create_surface(window.clone())?;
        let size = window.inner_size();
        let surface_config = backend.surface_config(&surface, size.width, size.height)?;
        surface.configure(&backend.device, &surface_config);

        let shapes = ShapeRenderer::new(
            backend.device.clone(),
            surface_config.format,
            self.config.window.circle_segments,
            surface_config.width,
            surface_config.height,
        );
        let overlay = TextOverlay::new(&window, &backend.device, surface_config.format);

        Ok(GpuState {
            shapes,
            overlay,
            surface,
            surface_config,
            backend,
            window,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        // Minimized
        if size.width == 0 || size.height == 0 {
            return;
        }
        gpu.surface_config.width = size.width;
        gpu.surface_config.height = size.height;
        gpu.surface
            .configure(&gpu.backend.device, &gpu.surface_config);
        gpu.shapes.resize(size.width, size.height);
        debug!("Resized to {}x{}", size.width, size.height);
    }

    fn redraw(&mut self) {
        let (Some(gpu), Some(frame_loop)) = (self.gpu.as_mut(), self.frame_loop.as_ref()) else {
            return;
        };

        self.draw_list.reset();
        let summary = frame_loop.tick(&mut self.draw_list);
        trace!(
            "Tick: {} bodies, {} lines, {} circles",
            summary.bodies_drawn,
            self.draw_list.line_count(),
            self.draw_list.circle_count()
        );

        let queue = gpu.backend.queue.clone();
        let device = gpu.backend.device.clone();
        let clear = gpu
            .shapes
            .submit(&queue, &self.draw_list)
            .unwrap_or(Color::BLACK);

        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                gpu.surface.configure(&device, &gpu.surface_config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("Surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                error!("Failed to acquire surface texture: {}", e);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Skeleton Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            gpu.shapes.draw(&mut pass);
        }

        let overlay_buffers = gpu.overlay.render(
            &gpu.window,
            &device,
            &queue,
            &mut encoder,
            &view,
            [gpu.surface_config.width, gpu.surface_config.height],
            self.draw_list.texts(),
        );

        queue.submit(
            overlay_buffers
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        gpu.window.pre_present_notify();
        frame.present();
        self.frames_rendered += 1;
    }

    /// Stop delivery, release body data and the sensor, then the GPU
    fn shutdown(&mut self) {
        if let Some(SensorHandles {
            mut sensor,
            mut reader,
        }) = self.sensor.take()
        {
            reader.close();
            debug!("Body frame reader closed");

            if let Some(frame_loop) = self.frame_loop.take() {
                if let Some(intake) = frame_loop.intake() {
                    let counters = intake.counters();
                    info!(
                        "Frames delivered: {}, acquired: {}, dropped: {}",
                        counters.delivered, counters.acquired, counters.dropped
                    );
                }
            }

            sensor.close();
            info!("Sensor '{}' closed", sensor.name());
        }
        self.frame_loop = None;

        if let Some(gpu) = self.gpu.take() {
            let GpuState {
                shapes,
                overlay,
                surface,
                surface_config: _,
                backend,
                window,
            } = gpu;
            drop(shapes);
            drop(overlay);
            drop(surface);
            drop(backend);
            drop(window);
            info!("Rendered {} frames", self.frames_rendered);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
                info!("--- Entering main loop ---");
            }
            Err(e) => {
                error!("Startup failed: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.overlay.on_window_event(&gpu.window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                info!("Escape pressed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        match self.frame_interval {
            Some(interval) => {
                let now = Instant::now();
                if now >= self.next_frame {
                    gpu.window.request_redraw();
                    self.next_frame = now + interval;
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
            }
            None => {
                gpu.window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Poll);
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Shutting down");
        self.shutdown();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Redraw period for `target_fps`; `None` when uncapped or not representable
fn frame_interval(target_fps: f32) -> Option<Duration> {
    if target_fps <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / target_fps as f64).ok()
}

/// Acquire the sensor and register the intake with it
///
/// Any failure leaves the application in the no-sensor state for good.
fn start_sensor(config: &ViewerConfig) -> (Option<SensorHandles>, SensorState, (u32, u32)) {
    let Some(mut sensor) = sensor::acquire(&config.sensor) else {
        return (None, SensorState::Absent, PinholeMapper::DEPTH_FRAME_SIZE);
    };

    let depth_frame_size = sensor.depth_frame_size();
    let intake = Arc::new(FrameIntake::new(
        sensor.body_count(),
        config.status.interval(),
        Arc::new(SystemClock),
    ));
    let mapper = sensor.coordinate_mapper();

    match sensor.open_body_reader(intake.handler()) {
        Ok(reader) => (
            Some(SensorHandles { sensor, reader }),
            SensorState::Present { intake, mapper },
            depth_frame_size,
        ),
        Err(e) => {
            warn!("Failed to open body frame reader: {}", e);
            sensor.close();
            (None, SensorState::Absent, PinholeMapper::DEPTH_FRAME_SIZE)
        }
    }
}
