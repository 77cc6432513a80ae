//! Circle element.

use super::{ElementId, ElementStyle};
use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An ellipse inscribed in the box spanned by two corner points.
///
/// Hit-testing treats the circle as its bounding box rather than true
/// ellipse containment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub id: ElementId,
    pub p1: Point,
    pub p2: Point,
    pub style: ElementStyle,
}

impl Circle {
    /// Create a zero-size circle at the gesture origin.
    pub fn new(origin: Point, style: ElementStyle) -> Self {
        Self {
            id: ElementId::next(),
            p1: origin,
            p2: origin,
            style,
        }
    }

    /// Bounding box in min/max order.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.p1, self.p2)
    }

    pub fn center(&self) -> Point {
        self.as_rect().center()
    }

    /// Horizontal and vertical radii.
    pub fn radii(&self) -> Vec2 {
        let rect = self.as_rect();
        Vec2::new(rect.width() / 2.0, rect.height() / 2.0)
    }

    /// Swap corners into `x1 <= x2, y1 <= y2` order.
    pub fn normalize(&mut self) {
        let r = self.as_rect();
        self.p1 = Point::new(r.x0, r.y0);
        self.p2 = Point::new(r.x1, r.y1);
    }

    pub fn to_path(&self) -> BezPath {
        Ellipse::new(self.center(), self.radii(), 0.0).to_path(0.1)
    }
}
