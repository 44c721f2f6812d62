//! Text overlay drawn with egui on top of the skeleton pass

use bodyview_core::{Color, Vec2};
use winit::event::WindowEvent;
use winit::window::Window;

/// Point size of overlay text
const FONT_SIZE: f32 = 16.0;

/// egui context, input state and renderer for the overlay
pub struct TextOverlay {
    context: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl TextOverlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let context = egui::Context::default();
        let state = egui_winit::State::new(
            context.clone(),
            egui::viewport::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            context,
            state,
            renderer,
        }
    }

    /// Keep egui's view of the window (size, scale factor) current
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Draw `texts` (positions in physical pixels) over `view`
    ///
    /// Returns command buffers that must be submitted before `encoder`.
    #[allow(clippy::too_many_arguments)]
    pub fn render<'a>(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        texts: impl Iterator<Item = (Vec2, &'a str, Color)>,
    ) -> Vec<wgpu::CommandBuffer> {
        let texts: Vec<(Vec2, &str, Color)> = texts.collect();
        let raw_input = self.state.take_egui_input(window);

        let full_output = self.context.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("bodyview_text"),
            ));
            let points_per_pixel = 1.0 / ctx.pixels_per_point();
            for (position, text, color) in &texts {
                painter.text(
                    egui::pos2(position.x * points_per_pixel, position.y * points_per_pixel),
                    egui::Align2::LEFT_TOP,
                    *text,
                    egui::FontId::proportional(FONT_SIZE),
                    to_color32(*color),
                );
            }
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let tris = self.context.tessellate(full_output.shapes, pixels_per_point);
        for (id, delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point,
        };
        let command_buffers =
            self.renderer
                .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer
                .render(&mut render_pass.forget_lifetime(), &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        command_buffers
    }
}

fn to_color32(color: Color) -> egui::Color32 {
    let [r, g, b, a] = color.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}
