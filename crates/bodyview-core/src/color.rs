//! RGBA colors and the named palette used by the overlay

use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque color from 8-bit channels
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    #[allow(missing_docs)]
    pub const BLACK: Color = Color::from_rgb8(0, 0, 0);
    #[allow(missing_docs)]
    pub const WHITE: Color = Color::from_rgb8(255, 255, 255);
    #[allow(missing_docs)]
    pub const GRAY: Color = Color::from_rgb8(128, 128, 128);
    #[allow(missing_docs)]
    pub const BLUE: Color = Color::from_rgb8(0, 0, 255);
    #[allow(missing_docs)]
    pub const DARK_BLUE: Color = Color::from_rgb8(0, 0, 139);
    #[allow(missing_docs)]
    pub const CORNFLOWER_BLUE: Color = Color::from_rgb8(100, 149, 237);
    #[allow(missing_docs)]
    pub const RED: Color = Color::from_rgb8(255, 0, 0);
    #[allow(missing_docs)]
    pub const GREEN: Color = Color::from_rgb8(0, 128, 0);
    #[allow(missing_docs)]
    pub const PURPLE: Color = Color::from_rgb8(128, 0, 128);

    /// Components as an array, for uniform upload
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
