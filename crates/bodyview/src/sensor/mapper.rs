//! Camera-to-depth-space projection for the simulated sensor

use bodyview_core::{CameraSpacePoint, CoordinateMapper, DepthSpacePoint};

/// Pinhole projection from camera space into the depth image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeMapper {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl PinholeMapper {
    /// Depth image extent of the simulated camera
    pub const DEPTH_FRAME_SIZE: (u32, u32) = (512, 424);

    /// Intrinsics of a 512x424 time-of-flight depth camera
    pub fn depth_camera() -> Self {
        Self {
            fx: 365.5,
            fy: 365.5,
            cx: 256.0,
            cy: 212.0,
        }
    }
}

impl Default for PinholeMapper {
    fn default() -> Self {
        Self::depth_camera()
    }
}

impl CoordinateMapper for PinholeMapper {
    fn map_camera_point_to_depth_space(&self, point: CameraSpacePoint) -> DepthSpacePoint {
        // Behind the camera or garbage in: not projectable
        if !point.is_finite() || point.z <= 0.0 {
            return DepthSpacePoint::splat(f32::NEG_INFINITY);
        }
        // Camera Y is up, depth image Y is down
        DepthSpacePoint::new(
            self.cx + self.fx * point.x / point.z,
            self.cy - self.fy * point.y / point.z,
        )
    }
}
