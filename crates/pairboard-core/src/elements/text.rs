//! Text element.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default text box extent in world units.
pub const TEXT_BOX_WIDTH: f64 = 200.0;
pub const TEXT_BOX_HEIGHT: f64 = 50.0;
/// Font size used for all whiteboard text.
pub const TEXT_FONT_SIZE: f64 = 24.0;

/// A block of text anchored at the point where the user clicked.
///
/// `p1` is the top-left anchor; `p2` closes a fixed-size box used for
/// bounds and selection. Content may span multiple lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub id: ElementId,
    pub p1: Point,
    pub p2: Point,
    pub content: String,
    pub style: ElementStyle,
}

impl Text {
    /// Create a text element anchored at `anchor`.
    pub fn new(anchor: Point, content: String, style: ElementStyle) -> Self {
        Self {
            id: ElementId::next(),
            p1: anchor,
            p2: anchor + Vec2::new(TEXT_BOX_WIDTH, TEXT_BOX_HEIGHT),
            content,
            style,
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.p1, self.p2)
    }

    /// Content split into display lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}
