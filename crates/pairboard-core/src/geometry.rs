//! Geometry and hit-testing for whiteboard elements.
//!
//! Pure functions relating a world-space cursor position to elements:
//! which element is under the cursor, whether a resize handle was
//! grabbed, and how grabbing a handle remaps an element's corners.

use crate::elements::Element;
use kurbo::Point;

/// Corner/endpoint proximity tolerance in world units.
///
/// Not adjusted for camera zoom: at high zoom the grab target shrinks
/// visually. Known quirk, kept for predictable world-space behavior.
pub const HANDLE_TOLERANCE: f64 = 10.0;

/// Maximum deviation of `dist(a,p) + dist(p,b)` from `dist(a,b)` for a
/// point to count as lying on the segment a-b.
pub const LINE_HIT_EPSILON: f64 = 1.0;

/// Where a hit-test landed on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitPosition {
    /// Corner handles of box-shaped elements.
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Endpoint handles of lines.
    Start,
    End,
    /// Anywhere on the element body.
    Inside,
}

impl HitPosition {
    /// True for grabs that start a resize rather than a move.
    pub fn is_handle(&self) -> bool {
        !matches!(self, HitPosition::Inside)
    }
}

/// Host cursor to show for a hit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    /// Drawing tools.
    Crosshair,
    /// Hovering an element body.
    Move,
    /// Diagonal resize (top-left/bottom-right corners, line endpoints).
    ResizeNwse,
    /// Anti-diagonal resize (top-right/bottom-left corners).
    ResizeNesw,
    /// Space-bar panning.
    Grab,
}

/// Cursor feedback for a hit position.
pub fn cursor_for_position(position: HitPosition) -> CursorStyle {
    match position {
        HitPosition::TopLeft
        | HitPosition::BottomRight
        | HitPosition::Start
        | HitPosition::End => CursorStyle::ResizeNwse,
        HitPosition::TopRight | HitPosition::BottomLeft => CursorStyle::ResizeNesw,
        HitPosition::Inside => CursorStyle::Move,
    }
}

fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn near_point(p: Point, target: Point) -> bool {
    (p.x - target.x).abs() < HANDLE_TOLERANCE && (p.y - target.y).abs() < HANDLE_TOLERANCE
}

/// Hit-test the corners and interior of a two-corner box.
fn box_hit(point: Point, p1: Point, p2: Point) -> Option<HitPosition> {
    if near_point(point, p1) {
        return Some(HitPosition::TopLeft);
    }
    if near_point(point, Point::new(p2.x, p1.y)) {
        return Some(HitPosition::TopRight);
    }
    if near_point(point, Point::new(p1.x, p2.y)) {
        return Some(HitPosition::BottomLeft);
    }
    if near_point(point, p2) {
        return Some(HitPosition::BottomRight);
    }
    let inside = point.x >= p1.x.min(p2.x)
        && point.x <= p1.x.max(p2.x)
        && point.y >= p1.y.min(p2.y)
        && point.y <= p1.y.max(p2.y);
    inside.then_some(HitPosition::Inside)
}

/// Where (if anywhere) a world-space point hits an element.
///
/// Circles are deliberately tested against their bounding box rather
/// than true ellipse containment, and freehand strokes against the
/// bounding box of their points.
pub fn hit_test(element: &Element, point: Point) -> Option<HitPosition> {
    match element {
        Element::Rectangle(e) => box_hit(point, e.p1, e.p2),
        Element::Circle(e) => box_hit(point, e.p1, e.p2),
        Element::Image(e) => box_hit(point, e.p1, e.p2),
        Element::Line(e) => {
            if near_point(point, e.start) {
                return Some(HitPosition::Start);
            }
            if near_point(point, e.end) {
                return Some(HitPosition::End);
            }
            let deviation =
                distance(e.start, e.end) - (distance(e.start, point) + distance(e.end, point));
            (deviation.abs() < LINE_HIT_EPSILON).then_some(HitPosition::Inside)
        }
        Element::Freehand(e) => {
            (!e.is_empty() && e.bounds().contains(point)).then_some(HitPosition::Inside)
        }
        Element::Text(e) => e.as_rect().contains(point).then_some(HitPosition::Inside),
    }
}

/// The topmost element under a world-space point.
///
/// Array order is draw order, so the scan runs back-to-front: the last
/// element whose hit-test succeeds is the one painted on top.
pub fn element_at_point(elements: &[Element], point: Point) -> Option<(&Element, HitPosition)> {
    elements
        .iter()
        .rev()
        .find_map(|e| hit_test(e, point).map(|pos| (e, pos)))
}

/// Remap a grabbed corner/endpoint to the pointer, holding the
/// opposite corner fixed. `corners` is the coordinate snapshot taken
/// when the resize gesture began. Returns `None` for `Inside`, which
/// is a move, not a resize.
pub fn resized_corners(
    grabbed: HitPosition,
    pointer: Point,
    corners: (Point, Point),
) -> Option<(Point, Point)> {
    let (p1, p2) = corners;
    match grabbed {
        HitPosition::TopLeft | HitPosition::Start => Some((pointer, p2)),
        HitPosition::TopRight => Some((
            Point::new(p1.x, pointer.y),
            Point::new(pointer.x, p2.y),
        )),
        HitPosition::BottomLeft => Some((
            Point::new(pointer.x, p1.y),
            Point::new(p2.x, pointer.y),
        )),
        HitPosition::BottomRight | HitPosition::End => Some((p1, pointer)),
        HitPosition::Inside => None,
    }
}

/// Handle positions to draw for a selected element. Box-shaped
/// elements expose their four corners, lines their endpoints; text and
/// freehand strokes are movable but not resizable, so they get none.
pub fn handles_for(element: &Element) -> Vec<(HitPosition, Point)> {
    match element {
        Element::Rectangle(_) | Element::Circle(_) | Element::Image(_) => {
            let b = element.bounds();
            vec![
                (HitPosition::TopLeft, Point::new(b.x0, b.y0)),
                (HitPosition::TopRight, Point::new(b.x1, b.y0)),
                (HitPosition::BottomRight, Point::new(b.x1, b.y1)),
                (HitPosition::BottomLeft, Point::new(b.x0, b.y1)),
            ]
        }
        Element::Line(e) => vec![
            (HitPosition::Start, e.start),
            (HitPosition::End, e.end),
        ],
        Element::Text(_) | Element::Freehand(_) => Vec::new(),
    }
}
