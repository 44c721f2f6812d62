//! GPU tests for the ShapeRenderer; skipped where no adapter is available

use bodyview_core::{Canvas, Color, DrawList, Vec2};
use bodyview_render::{ShapeRenderer, UniformBufferAllocator, WgpuBackend};
use wgpu::{CommandEncoderDescriptor, Extent3d, TextureDescriptor, TextureUsages};

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn backend() -> Option<WgpuBackend> {
    match WgpuBackend::new_blocking() {
        Ok(backend) => Some(backend),
        Err(e) => {
            eprintln!("SKIP: no GPU backend available ({})", e);
            None
        }
    }
}

/// Render `list` into a SIZE x SIZE texture and read back RGBA8 pixels
fn render_to_pixels(
    backend: &WgpuBackend,
    renderer: &mut ShapeRenderer,
    list: &DrawList,
) -> Vec<u8> {
    let device = &backend.device;
    let queue = &backend.queue;

    let target = device.create_texture(&TextureDescriptor {
        label: Some("Test Target"),
        size: Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let clear = renderer.submit(queue, list).unwrap_or(Color::BLACK);

    let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
        label: Some("Test Encoder"),
    });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Test Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
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
        renderer.draw(&mut pass);
    }

    let bytes_per_row = SIZE * 4;
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: (bytes_per_row * SIZE) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(SIZE),
            },
        },
        Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(Some(encoder.finish()));

    let slice = readback.slice(..);
    slice.map_async(wgpu::MapMode::Read, |_| {});
    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })
        .unwrap();
    let data = slice.get_mapped_range().to_vec();
    readback.unmap();
    data
}

fn pixel(data: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * SIZE + x) * 4) as usize;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

#[test]
fn test_circle_and_line_pixels() {
    let Some(backend) = backend() else { return };
    let mut renderer = ShapeRenderer::new(backend.device.clone(), FORMAT, 32, SIZE, SIZE);

    let mut list = DrawList::new();
    list.clear(Color::BLACK);
    list.draw_circle(Vec2::new(16.0, 16.0), 8.0, Color::RED);
    list.draw_line(Vec2::new(8.0, 48.0), Vec2::new(56.0, 48.0), Color::WHITE, 6.0);
    list.draw_text(Vec2::new(5.0, 5.0), "ignored", Color::WHITE);

    let data = render_to_pixels(&backend, &mut renderer, &list);
    assert_eq!(renderer.queued(), 2);

    assert_eq!(pixel(&data, 16, 16), [255, 0, 0, 255]);
    assert_eq!(pixel(&data, 32, 48), [255, 255, 255, 255]);
    // Half-width caps extend past both ends
    assert_eq!(pixel(&data, 6, 48), [255, 255, 255, 255]);
    assert_eq!(pixel(&data, 60, 32), [0, 0, 0, 255]);
    assert_eq!(pixel(&data, 32, 20), [0, 0, 0, 255]);
}

#[test]
fn test_upward_line_is_drawn() {
    let Some(backend) = backend() else { return };
    let mut renderer = ShapeRenderer::new(backend.device.clone(), FORMAT, 32, SIZE, SIZE);

    let mut list = DrawList::new();
    list.clear(Color::BLACK);
    list.draw_line(Vec2::new(32.0, 60.0), Vec2::new(32.0, 4.0), Color::GREEN, 4.0);

    let data = render_to_pixels(&backend, &mut renderer, &list);

    assert_eq!(pixel(&data, 32, 30), [0, 128, 0, 255]);
    assert_eq!(pixel(&data, 20, 30), [0, 0, 0, 255]);
}

#[test]
fn test_resize_rescales_projection() {
    let Some(backend) = backend() else { return };
    let mut renderer = ShapeRenderer::new(backend.device.clone(), FORMAT, 32, SIZE * 2, SIZE * 2);
    renderer.resize(SIZE, SIZE);
    assert_eq!(renderer.viewport(), Vec2::new(SIZE as f32, SIZE as f32));

    let mut list = DrawList::new();
    list.draw_circle(Vec2::new(48.0, 48.0), 4.0, Color::BLUE);

    let data = render_to_pixels(&backend, &mut renderer, &list);
    assert_eq!(pixel(&data, 48, 48), [0, 0, 255, 255]);
}

#[test]
fn test_many_shapes_span_uniform_pages() {
    let Some(backend) = backend() else { return };
    let mut renderer = ShapeRenderer::new(backend.device.clone(), FORMAT, 16, SIZE, SIZE);

    let mut list = DrawList::new();
    for i in 0..1000 {
        let p = Vec2::new((i % 64) as f32, (i / 64) as f32 * 4.0);
        list.draw_circle(p, 1.0, Color::CORNFLOWER_BLUE);
    }

    let data = render_to_pixels(&backend, &mut renderer, &list);
    assert_eq!(renderer.queued(), 1000);
    assert_eq!(data.len(), (SIZE * SIZE * 4) as usize);

    // A second frame reuses the same pages
    render_to_pixels(&backend, &mut renderer, &list);
    assert_eq!(renderer.queued(), 1000);
}

#[test]
fn test_allocator_offsets_are_aligned() {
    let Some(backend) = backend() else { return };
    let mut allocator = UniformBufferAllocator::new(backend.device.clone(), "Test Uniforms");
    let alignment = allocator.alignment();

    let mut offsets = Vec::new();
    for _ in 0..4 {
        let allocation = allocator.allocate(&backend.queue, &[0u8; 80]);
        offsets.push((allocation.page_index, allocation.offset));
    }
    assert_eq!(offsets[0], (0, 0));
    assert!(offsets.iter().all(|(_, offset)| offset % alignment == 0));
    assert_eq!(offsets[1].1, 80u64.div_ceil(alignment) * alignment);

    allocator.reset();
    assert_eq!(allocator.allocate(&backend.queue, &[0u8; 80]).offset, 0);
    assert_eq!(allocator.page_count(), 1);
}
