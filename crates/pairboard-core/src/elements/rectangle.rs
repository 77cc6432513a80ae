//! Rectangle element.

use super::{ElementId, ElementStyle};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle stored as two opposite corners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: ElementId,
    /// Corner where the gesture started.
    pub p1: Point,
    /// Opposite corner, tracked by the pointer during drawing.
    pub p2: Point,
    pub style: ElementStyle,
}

impl Rectangle {
    /// Create a zero-size rectangle at the gesture origin.
    pub fn new(origin: Point, style: ElementStyle) -> Self {
        Self {
            id: ElementId::next(),
            p1: origin,
            p2: origin,
            style,
        }
    }

    /// The corners in min/max order as a kurbo rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.p1, self.p2)
    }

    /// Swap corners into `x1 <= x2, y1 <= y2` order.
    pub fn normalize(&mut self) {
        let r = self.as_rect();
        self.p1 = Point::new(r.x0, r.y0);
        self.p2 = Point::new(r.x1, r.y1);
    }

    pub fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }
}
