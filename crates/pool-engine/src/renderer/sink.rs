use glam::Vec2;
use serde::Serialize;

use super::color::VectorColor;

/// Ordered draw-call consumer.
///
/// Calls are painted in the order received: earlier calls end up underneath.
pub trait RenderSink {
    /// Filled circle centred on `center`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor);

    /// Filled axis-aligned rectangle centred on `center`.
    fn fill_rect(&mut self, center: Vec2, width: f32, height: f32, color: VectorColor);

    /// Straight stroked segment.
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: VectorColor);

    /// Text label anchored at `pos`.
    fn text(&mut self, label: &str, pos: Vec2, size: f32, color: VectorColor);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Circle { center: [f32; 2], radius: f32, color: VectorColor },
    Rect { center: [f32; 2], width: f32, height: f32, color: VectorColor },
    Line { from: [f32; 2], to: [f32; 2], width: f32, color: VectorColor },
    Text { label: String, pos: [f32; 2], size: f32, color: VectorColor },
}

/// A sink that records draw calls verbatim.
///
/// Used by headless hosts and by tests that assert on draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Serialize the recorded calls for a host that paints them itself.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.commands)
    }
}

impl RenderSink for DrawList {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        self.commands.push(DrawCommand::Circle {
            center: center.to_array(),
            radius,
            color,
        });
    }

    fn fill_rect(&mut self, center: Vec2, width: f32, height: f32, color: VectorColor) {
        self.commands.push(DrawCommand::Rect {
            center: center.to_array(),
            width,
            height,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: VectorColor) {
        self.commands.push(DrawCommand::Line {
            from: from.to_array(),
            to: to.to_array(),
            width,
            color,
        });
    }

    fn text(&mut self, label: &str, pos: Vec2, size: f32, color: VectorColor) {
        self.commands.push(DrawCommand::Text {
            label: label.to_owned(),
            pos: pos.to_array(),
            size,
            color,
        });
    }
}
