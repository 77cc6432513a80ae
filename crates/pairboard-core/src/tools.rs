//! Tool palette for the whiteboard.

use crate::elements::{
    Circle, Element, ElementStyle, FreehandStroke, Line, Rectangle, Rgba, StrokeKind,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default stroke width for the highlighter, regardless of the slider.
const HIGHLIGHTER_BASE_WIDTH: f64 = 10.0;

/// Available tools. Images have no tool of their own: they enter the
/// board through clipboard paste only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    Selection,
    Rectangle,
    Circle,
    Line,
    Text,
    #[default]
    Pencil,
    Highlighter,
    Eraser,
}

impl Tool {
    /// True for tools that create an element on pointer-down and grow
    /// it during the drag.
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, Tool::Selection | Tool::Text)
    }
}

/// Current tool plus the style settings the toolbar exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolManager {
    pub current: Tool,
    /// Stroke color for pens and shapes.
    pub stroke_color: Rgba,
    /// Separate color well for the highlighter (defaults to yellow).
    pub highlighter_color: Rgba,
    /// Stroke width slider value (1-20).
    pub stroke_width: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current: Tool::default(),
            stroke_color: Rgba::black(),
            // #fde047
            highlighter_color: Rgba::new(0xfd, 0xe0, 0x47, 0xff),
            stroke_width: 2.0,
        }
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.current = tool;
    }

    /// Style a new element created with the current tool would get.
    pub fn style_for_current(&self) -> ElementStyle {
        match self.current {
            Tool::Highlighter => {
                ElementStyle::new(self.highlighter_color, HIGHLIGHTER_BASE_WIDTH)
            }
            _ => ElementStyle::new(self.stroke_color, self.stroke_width),
        }
    }

    /// Create the element a pointer-down at `origin` (world space)
    /// starts. `None` for the selection and text tools, which do not
    /// draw.
    pub fn create_element(&self, origin: Point) -> Option<Element> {
        let style = self.style_for_current();
        match self.current {
            Tool::Rectangle => Some(Element::Rectangle(Rectangle::new(origin, style))),
            Tool::Circle => Some(Element::Circle(Circle::new(origin, style))),
            Tool::Line => Some(Element::Line(Line::new(origin, style))),
            Tool::Pencil => Some(Element::Freehand(FreehandStroke::new(
                StrokeKind::Pencil,
                origin,
                style,
            ))),
            Tool::Highlighter => Some(Element::Freehand(FreehandStroke::new(
                StrokeKind::Highlighter,
                origin,
                style,
            ))),
            Tool::Eraser => Some(Element::Freehand(FreehandStroke::new(
                StrokeKind::Eraser,
                origin,
                style,
            ))),
            Tool::Selection | Tool::Text => None,
        }
    }
}
