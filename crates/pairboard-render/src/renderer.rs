//! Renderer trait abstraction.

use kurbo::Size;
use pairboard_core::Whiteboard;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("initialization failed: {0}")]
    InitFailed(String),
    #[error("render failed: {0}")]
    RenderFailed(String),
}

/// Context for a single render frame.
///
/// The renderer is a pure function of this context: it redraws the
/// whole scene from the board's elements, camera, selection, and
/// in-progress action every time any of them change.
pub struct RenderContext<'a> {
    /// The whiteboard to render.
    pub board: &'a Whiteboard,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Canvas background color. Eraser strokes are drawn in this
    /// color, so they must match.
    pub background_color: Color,
    /// Selection chrome color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(board: &'a Whiteboard, viewport_size: Size) -> Self {
        Self {
            board,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(248, 250, 252, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

/// Scene-building backend.
pub trait Renderer {
    /// Rebuild the scene from the given frame context.
    fn build_scene(&mut self, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let board = Whiteboard::new(Size::new(640.0, 480.0));
        let ctx = RenderContext::new(&board, Size::new(640.0, 480.0));
        assert!((ctx.scale_factor - 1.0).abs() < f64::EPSILON);

        let ctx = ctx.with_scale_factor(2.0).with_background(Color::WHITE);
        assert!((ctx.scale_factor - 2.0).abs() < f64::EPSILON);
        assert_eq!(ctx.background_color, Color::WHITE);
    }
}
