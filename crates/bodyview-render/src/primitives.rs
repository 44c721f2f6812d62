//! Screen-space primitives
//!
//! All placement math lives here so it can be tested without a GPU. Screen
//! space has its origin at the top-left corner with Y pointing down.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

/// Orthographic projection from screen pixels to clip space
///
/// Maps `(0, 0)` to the top-left and `(width, height)` to the bottom-right
/// corner of the target; depth 0..1 maps to 0..1.
pub fn ortho_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_lh(0.0, width, height, 0.0, 0.0, 1.0)
}

/// Triangle list approximating a circle of radius 1 around the origin
#[derive(Debug, Clone, PartialEq)]
pub struct CircleGeometry {
    segments: u32,
    vertices: Vec<[f32; 2]>,
}

impl CircleGeometry {
    /// Build the fan; fewer than 3 segments is clamped to 3
    pub fn new(segments: u32) -> Self {
        let segments = segments.max(3);
        let mut vertices = Vec::with_capacity(segments as usize * 3);
        for i in 0..segments {
            let a0 = TAU * i as f32 / segments as f32;
            let a1 = TAU * (i + 1) as f32 / segments as f32;
            vertices.push([0.0, 0.0]);
            vertices.push([a0.cos(), a0.sin()]);
            vertices.push([a1.cos(), a1.sin()]);
        }
        Self { segments, vertices }
    }

    /// Number of segments
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Vertex positions, three per triangle
    pub fn vertices(&self) -> &[[f32; 2]] {
        &self.vertices
    }

    /// Vertex count
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// Places the shared circle geometry on screen
///
/// The geometry is built once; only the projection follows the viewport.
#[derive(Debug, Clone)]
pub struct CircleStencil {
    geometry: Arc<CircleGeometry>,
    projection: Mat4,
    viewport: Vec2,
}

impl CircleStencil {
    /// Build the unit circle once and a projection for `width` x `height`
    pub fn new(segments: u32, width: f32, height: f32) -> Self {
        Self {
            geometry: Arc::new(CircleGeometry::new(segments)),
            projection: ortho_projection(width, height),
            viewport: Vec2::new(width, height),
        }
    }

    /// Follow a viewport change
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.projection = ortho_projection(width, height);
    }

    /// Shared unit-circle geometry; never rebuilt on resize
    pub fn geometry(&self) -> &Arc<CircleGeometry> {
        &self.geometry
    }

    /// Pixel-to-clip projection for the current viewport
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Clip-space transform for a circle at `center` with `radius` pixels
    pub fn transform(&self, center: Vec2, radius: f32) -> Mat4 {
        self.projection
            * Mat4::from_translation(center.extend(0.0))
            * Mat4::from_scale(Vec3::new(radius, radius, 1.0))
    }
}

/// A line segment drawn as a rotated rectangle over the unit quad
///
/// The rectangle is `length + width` long and `width` thick, centered on the
/// segment, so each end is capped by half the width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSprite {
    /// First endpoint, pixels
    pub start: Vec2,
    /// Distance between the endpoints
    pub length: f32,
    /// Thickness in pixels
    pub width: f32,
    /// Rotation about +Z, radians in `[0, 2π)`
    pub angle: f32,
}

impl LineSprite {
    /// Sprite for the segment `start` to `end`
    pub fn new(start: Vec2, end: Vec2, width: f32) -> Self {
        let delta = end - start;
        Self {
            start,
            length: delta.length(),
            width,
            angle: line_angle(delta),
        }
    }

    /// Screen-space transform of the unit quad `[0, 1] x [0, 1]`
    pub fn transform(&self) -> Mat4 {
        let half = self.width * 0.5;
        Mat4::from_translation(self.start.extend(0.0))
            * Mat4::from_rotation_z(self.angle)
            * Mat4::from_translation(Vec3::new(-half, -half, 0.0))
            * Mat4::from_scale(Vec3::new(self.length + self.width, self.width, 1.0))
    }
}

/// Angle that rotates +X onto `delta`
///
/// `acos` only covers half a turn; segments pointing up the screen take the
/// other half. A zero-length segment keeps angle 0.
fn line_angle(delta: Vec2) -> f32 {
    let Some(dir) = delta.try_normalize() else {
        return 0.0;
    };
    let angle = dir.x.clamp(-1.0, 1.0).acos();
    if dir.y < 0.0 {
        TAU - angle
    } else {
        angle
    }
}
