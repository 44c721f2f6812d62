//! wgpu backend: instance, adapter, device and queue

use std::sync::Arc;

use tracing::info;

use crate::{RenderError, Result};

/// wgpu-based rendering backend
pub struct WgpuBackend {
    pub instance: Arc<wgpu::Instance>,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub adapter_info: wgpu::AdapterInfo,
}

impl WgpuBackend {
    /// Create a new wgpu backend
    ///
    /// Modern backends (Vulkan, Metal, DX12) are tried first. GL is only
    /// tried if none of them produced a device, since eager EGL/GLX setup
    /// can fail on headless systems.
    pub async fn new() -> Result<Self> {
        let safe_backends = wgpu::Backends::all() & !wgpu::Backends::GL;
        let primary_result =
            Self::new_with_options(safe_backends, wgpu::PowerPreference::HighPerformance).await;

        if primary_result.is_ok() {
            return primary_result;
        }

        info!("Primary backend initialization failed, attempting GL fallback...");
        Self::new_with_options(wgpu::Backends::GL, wgpu::PowerPreference::HighPerformance).await
    }

    /// Blocking variant of [`WgpuBackend::new`] for callers outside an executor
    pub fn new_blocking() -> Result<Self> {
        pollster::block_on(Self::new())
    }

    /// Create a new wgpu backend with specific options
    pub async fn new_with_options(
        backends: wgpu::Backends,
        power_preference: wgpu::PowerPreference,
    ) -> Result<Self> {
        info!("Initializing wgpu backend ({:?})", backends);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        // Prefer Discrete > Integrated > Virtual > CPU
        let mut adapter = None;
        let mut best_score = -1;
        for candidate in instance.enumerate_adapters(backends) {
            let score = adapter_score(candidate.get_info().device_type);
            if score > best_score {
                best_score = score;
                adapter = Some(candidate);
            }
        }

        if adapter.is_none() {
            adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok();
        }

        let adapter =
            adapter.ok_or_else(|| RenderError::DeviceError("No adapter found".to_string()))?;

        let adapter_info = adapter.get_info();
        info!(
            "Selected adapter: {} ({:?}, {:?})",
            adapter_info.name, adapter_info.device_type, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("BodyView Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                ..Default::default()
            })
            .await
            .map_err(|e: wgpu::RequestDeviceError| RenderError::DeviceError(e.to_string()))?;

        info!("Device created successfully");

        Ok(Self {
            instance: Arc::new(instance),
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }

    /// Create a surface for a window using the backend's instance
    pub fn create_surface(
        &self,
        window: Arc<winit::window::Window>,
    ) -> Result<wgpu::Surface<'static>> {
        self.instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceError(format!("Failed to create surface: {}", e)))
    }

    /// Surface configuration for a `width` x `height` window
    ///
    /// Prefers a non-sRGB format so 8-bit color values reach the screen
    /// unconverted.
    pub fn surface_config(
        &self,
        surface: &wgpu::Surface<'_>,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let caps = surface.get_capabilities(&self.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| {
                RenderError::SurfaceError("Surface is not supported by the adapter".to_string())
            })?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        info!("Surface format {:?}, {}x{}", format, width, height);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    /// Get adapter info
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }
}

fn adapter_score(device_type: wgpu::DeviceType) -> i32 {
    match device_type {
        wgpu::DeviceType::DiscreteGpu => 3,
        wgpu::DeviceType::IntegratedGpu => 2,
        wgpu::DeviceType::VirtualGpu => 1,
        wgpu::DeviceType::Cpu | wgpu::DeviceType::Other => 0,
    }
}
