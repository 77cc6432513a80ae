//! Element definitions for the whiteboard.

mod circle;
mod image;
mod line;
mod rectangle;
mod stroke;
mod text;

pub use circle::Circle;
pub use image::{Image, ImageFormat, MAX_PASTE_WIDTH};
pub use line::Line;
pub use rectangle::Rectangle;
pub use stroke::{
    FreehandStroke, StrokeKind, ERASER_WIDTH_FACTOR, HIGHLIGHTER_ALPHA, HIGHLIGHTER_WIDTH_FACTOR,
};
pub use text::{Text, TEXT_BOX_HEIGHT, TEXT_BOX_WIDTH, TEXT_FONT_SIZE};

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for elements.
///
/// An id is the element's origin timestamp in milliseconds, bumped
/// monotonically so a single client never mints the same id twice.
/// Ids are not coordinated across peers: if two clients create an
/// element in the same millisecond the ids collide, and whichever
/// upsert arrives later silently overwrites the other element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Mint a fresh id from the current wall clock.
    pub fn next() -> Self {
        static LAST: AtomicU64 = AtomicU64::new(0);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let prev = LAST
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(0);
        ElementId(now.max(prev + 1))
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a hex color string (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b, 255))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Format as `#rrggbb` (alpha dropped when opaque, `#rrggbbaa` otherwise).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with the alpha channel scaled by `factor`.
    pub fn with_alpha(self, factor: f64) -> Self {
        Self {
            a: (self.a as f64 * factor.clamp(0.0, 1.0)) as u8,
            ..self
        }
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke properties shared by every element variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Stroke color.
    pub stroke_color: Rgba,
    /// Stroke width in world units.
    pub stroke_width: f64,
}

impl ElementStyle {
    pub fn new(stroke_color: Rgba, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width,
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: Rgba::black(),
            stroke_width: 2.0,
        }
    }
}

/// A drawable object on the whiteboard.
///
/// Shape variants carry two corner points that stay unnormalized while
/// a gesture is active; [`Element::normalize`] must run once the
/// gesture ends so broadcast and at-rest elements satisfy
/// `x1 <= x2, y1 <= y2` (lines use a start/end ordering rule instead).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Text(Text),
    Freehand(FreehandStroke),
    Image(Image),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Rectangle(e) => e.id,
            Element::Circle(e) => e.id,
            Element::Line(e) => e.id,
            Element::Text(e) => e.id,
            Element::Freehand(e) => e.id,
            Element::Image(e) => e.id,
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Rectangle(e) => &e.style,
            Element::Circle(e) => &e.style,
            Element::Line(e) => &e.style,
            Element::Text(e) => &e.style,
            Element::Freehand(e) => &e.style,
            Element::Image(e) => &e.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            Element::Rectangle(e) => &mut e.style,
            Element::Circle(e) => &mut e.style,
            Element::Line(e) => &mut e.style,
            Element::Text(e) => &mut e.style,
            Element::Freehand(e) => &mut e.style,
            Element::Image(e) => &mut e.style,
        }
    }

    /// Axis-aligned bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Element::Rectangle(e) => e.as_rect(),
            Element::Circle(e) => e.as_rect(),
            Element::Line(e) => e.bounds(),
            Element::Text(e) => e.as_rect(),
            Element::Freehand(e) => e.bounds(),
            Element::Image(e) => e.as_rect(),
        }
    }

    /// Put corner coordinates into their at-rest order.
    pub fn normalize(&mut self) {
        match self {
            Element::Rectangle(e) => e.normalize(),
            Element::Circle(e) => e.normalize(),
            Element::Line(e) => e.normalize(),
            Element::Image(e) => e.normalize(),
            // Anchored at a single point; nothing to reorder.
            Element::Text(_) | Element::Freehand(_) => {}
        }
    }

    /// Outline path for rendering (empty for text, which is laid out
    /// by the renderer).
    pub fn to_path(&self) -> BezPath {
        match self {
            Element::Rectangle(e) => e.to_path(),
            Element::Circle(e) => e.to_path(),
            Element::Line(e) => e.to_path(),
            Element::Text(_) => BezPath::new(),
            Element::Freehand(e) => e.to_path(),
            Element::Image(e) => e.to_path(),
        }
    }

    /// Apply `f` to every stored coordinate.
    pub fn map_points(&mut self, f: impl Fn(Point) -> Point) {
        match self {
            Element::Rectangle(e) => {
                e.p1 = f(e.p1);
                e.p2 = f(e.p2);
            }
            Element::Circle(e) => {
                e.p1 = f(e.p1);
                e.p2 = f(e.p2);
            }
            Element::Line(e) => {
                e.start = f(e.start);
                e.end = f(e.end);
            }
            Element::Text(e) => {
                e.p1 = f(e.p1);
                e.p2 = f(e.p2);
            }
            Element::Freehand(e) => {
                for p in &mut e.points {
                    *p = f(*p);
                }
            }
            Element::Image(e) => {
                e.p1 = f(e.p1);
                e.p2 = f(e.p2);
            }
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Element::Image(_))
    }

    /// Short variant name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Rectangle(_) => "rectangle",
            Element::Circle(_) => "circle",
            Element::Line(_) => "line",
            Element::Text(_) => "text",
            Element::Freehand(e) => e.kind.name(),
            Element::Image(_) => "image",
        }
    }
}
