//! Freehand stroke element (pencil, highlighter, eraser).

use super::{ElementId, ElementStyle};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Width multiplier applied to highlighter strokes at render time.
pub const HIGHLIGHTER_WIDTH_FACTOR: f64 = 4.0;
/// Width multiplier applied to eraser strokes at render time.
pub const ERASER_WIDTH_FACTOR: f64 = 5.0;
/// Opacity applied to highlighter strokes at render time.
pub const HIGHLIGHTER_ALPHA: f64 = 0.4;

/// What produced a freehand stroke.
///
/// The three kinds share geometry and differ only in render-time
/// styling: highlighters are wide and translucent, erasers are wider
/// still and drawn in the canvas background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeKind {
    Pencil,
    Highlighter,
    Eraser,
}

impl StrokeKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrokeKind::Pencil => "pencil",
            StrokeKind::Highlighter => "highlighter",
            StrokeKind::Eraser => "eraser",
        }
    }

    /// Render-time width multiplier for this kind.
    pub fn width_factor(&self) -> f64 {
        match self {
            StrokeKind::Pencil => 1.0,
            StrokeKind::Highlighter => HIGHLIGHTER_WIDTH_FACTOR,
            StrokeKind::Eraser => ERASER_WIDTH_FACTOR,
        }
    }
}

/// A freehand polyline accumulated point-by-point during a drag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreehandStroke {
    pub id: ElementId,
    pub kind: StrokeKind,
    /// Points in world coordinates, in draw order.
    pub points: Vec<Point>,
    pub style: ElementStyle,
}

impl FreehandStroke {
    /// Start a stroke at the gesture origin.
    pub fn new(kind: StrokeKind, origin: Point, style: ElementStyle) -> Self {
        Self {
            id: ElementId::next(),
            kind,
            points: vec![origin],
            style,
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Effective stroke width once the kind's multiplier is applied.
    pub fn render_width(&self) -> f64 {
        self.style.stroke_width * self.kind.width_factor()
    }

    /// Bounding box of all recorded points.
    pub fn bounds(&self) -> Rect {
        let mut points = self.points.iter();
        let Some(first) = points.next() else {
            return Rect::ZERO;
        };
        points.fold(Rect::from_points(*first, *first), |acc, p| {
            acc.union_pt(*p)
        })
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }
        path
    }
}
