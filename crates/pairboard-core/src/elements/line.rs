//! Line element.

use super::{ElementId, ElementStyle};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight line segment with directional endpoints.
///
/// Unlike the box-shaped variants, lines keep their endpoints distinct
/// after normalization: `normalize` orders them so that
/// `start.x < end.x`, or `start.y <= end.y` for vertical lines, rather
/// than applying a min/max swap per axis (which would distort the
/// segment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    pub style: ElementStyle,
}

impl Line {
    /// Create a zero-length line at the gesture origin.
    pub fn new(origin: Point, style: ElementStyle) -> Self {
        Self {
            id: ElementId::next(),
            start: origin,
            end: origin,
            style,
        }
    }

    pub fn length(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    /// Order the endpoints left-to-right (top-to-bottom for verticals).
    pub fn normalize(&mut self) {
        let keep = self.start.x < self.end.x
            || (self.start.x == self.end.x && self.start.y <= self.end.y);
        if !keep {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }
}
