//! Canvas - the drawing surface the overlay is expressed against
//!
//! The render policy and the frame loop only ever talk to a [`Canvas`].
//! [`DrawList`] records the calls so the GPU renderer can replay them and
//! tests can inspect them.

use glam::Vec2;

use crate::color::Color;

/// Immediate-mode drawing surface in screen space (origin top-left, Y down)
pub trait Canvas {
    /// Clear the whole target
    fn clear(&mut self, color: Color);
    /// Filled circle
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Line segment of the given width
    fn draw_line(&mut self, start: Vec2, end: Vec2, color: Color, width: f32);
    /// Single line of text with its top-left corner at `position`
    fn draw_text(&mut self, position: Vec2, text: &str, color: Color);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// See [`Canvas::clear`]
    Clear(Color),
    /// See [`Canvas::draw_circle`]
    Circle {
        /// Center in screen space
        center: Vec2,
        /// Radius in pixels
        radius: f32,
        /// Fill color
        color: Color,
    },
    /// See [`Canvas::draw_line`]
    Line {
        /// Start point in screen space
        start: Vec2,
        /// End point in screen space
        end: Vec2,
        /// Line color
        color: Color,
        /// Width in pixels
        width: f32,
    },
    /// See [`Canvas::draw_text`]
    Text {
        /// Top-left corner
        position: Vec2,
        /// The text
        text: String,
        /// Text color
        color: Color,
    },
}

/// A [`Canvas`] that records every call in order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty draw list
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all recorded commands, keeping the allocation
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Recorded commands in call order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The last clear color, if any
    pub fn clear_color(&self) -> Option<Color> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Number of circle commands
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    /// Number of line commands
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    /// Text commands in call order
    pub fn texts(&self) -> impl Iterator<Item = (Vec2, &str, Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text {
                position,
                text,
                color,
            } => Some((*position, text.as_str(), *color)),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_line(&mut self, start: Vec2, end: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            color,
            width,
        });
    }

    fn draw_text(&mut self, position: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            color,
        });
    }
}
