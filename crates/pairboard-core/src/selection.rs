//! Selection state and drag-offset bookkeeping.

use crate::elements::{Element, ElementId};
use crate::geometry::HitPosition;
use kurbo::{Point, Vec2};

/// Offset data captured when an element is grabbed, so move events can
/// place the element relative to where the user took hold of it
/// instead of snapping its corner to the pointer.
#[derive(Debug, Clone)]
pub enum GrabOffsets {
    /// Two-corner elements: pointer offset from the first corner plus
    /// a snapshot of both corners for resize remapping.
    Shape {
        offset: Vec2,
        corners: (Point, Point),
    },
    /// Freehand strokes: one offset per recorded point.
    Points { offsets: Vec<Vec2> },
}

/// The single selected element and how it was grabbed.
#[derive(Debug, Clone)]
pub struct Selection {
    pub id: ElementId,
    /// Hit position at grab time; a handle means the gesture resizes,
    /// `Inside` means it moves.
    pub grabbed: HitPosition,
    pub offsets: GrabOffsets,
}

impl Selection {
    /// Capture offsets for an element grabbed at `pointer` (world).
    pub fn grab(element: &Element, grabbed: HitPosition, pointer: Point) -> Self {
        let offsets = match element {
            Element::Freehand(stroke) => GrabOffsets::Points {
                offsets: stroke.points.iter().map(|p| *p - pointer).collect(),
            },
            Element::Line(line) => GrabOffsets::Shape {
                offset: pointer - line.start,
                corners: (line.start, line.end),
            },
            Element::Rectangle(e) => Self::shape_offsets(pointer, e.p1, e.p2),
            Element::Circle(e) => Self::shape_offsets(pointer, e.p1, e.p2),
            Element::Text(e) => Self::shape_offsets(pointer, e.p1, e.p2),
            Element::Image(e) => Self::shape_offsets(pointer, e.p1, e.p2),
        };
        Self {
            id: element.id(),
            grabbed,
            offsets,
        }
    }

    fn shape_offsets(pointer: Point, p1: Point, p2: Point) -> GrabOffsets {
        GrabOffsets::Shape {
            offset: pointer - p1,
            corners: (p1, p2),
        }
    }

    /// New corner pair for a move gesture: the grabbed element keeps
    /// its size and follows the pointer at the original grab offset.
    pub fn moved_corners(&self, pointer: Point) -> Option<(Point, Point)> {
        match &self.offsets {
            GrabOffsets::Shape { offset, corners } => {
                let size = corners.1 - corners.0;
                let p1 = pointer - *offset;
                Some((p1, p1 + size))
            }
            GrabOffsets::Points { .. } => None,
        }
    }

    /// New point set for a move gesture on a freehand stroke.
    pub fn moved_points(&self, pointer: Point) -> Option<Vec<Point>> {
        match &self.offsets {
            GrabOffsets::Points { offsets } => {
                Some(offsets.iter().map(|o| pointer + *o).collect())
            }
            GrabOffsets::Shape { .. } => None,
        }
    }

    /// Corner snapshot taken at grab time, for resize remapping.
    pub fn corner_snapshot(&self) -> Option<(Point, Point)> {
        match &self.offsets {
            GrabOffsets::Shape { corners, .. } => Some(*corners),
            GrabOffsets::Points { .. } => None,
        }
    }
}
