//! Plain-text scene renderer

use blocks_engine::prelude::*;
use std::fmt::Write as _;

/// Draws a snapshot as one line per object
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Create a renderer
    pub fn new() -> Self {
        Self
    }

    /// Render every object in ID order
    pub fn render(&self, snapshot: &SceneSnapshot) -> String {
        let mut out = String::new();
        for view in &snapshot.objects {
            let _ = write!(
                out,
                "{:>3} {:<8} at ({:>6.3}, {:>6.3}, {:>6.3}) size {:.2}x{:.2}x{:.2}",
                view.id.index(),
                view.kind.as_str(),
                view.position.x,
                view.position.y,
                view.position.z,
                view.shape.width,
                view.shape.depth,
                view.shape.height,
            );
            if let Some(color) = &view.color {
                let _ = write!(out, " {color}");
            }
            if view.held {
                out.push_str(" (held)");
            }
            out.push('\n');
        }
        out
    }
}
