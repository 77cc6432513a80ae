//! Image element for pasted raster images.

use super::{ElementId, ElementStyle, Rgba};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Maximum display width for pasted images, in world units. Larger
/// sources are scaled down preserving aspect ratio.
pub const MAX_PASTE_WIDTH: f64 = 500.0;

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A pasted raster image.
///
/// Images exist only on the client that pasted them: the sync adapter
/// never broadcasts them, since the encoded payload would blow the
/// channel's message size ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: ElementId,
    pub p1: Point,
    pub p2: Point,
    /// Source pixel width.
    pub source_width: u32,
    /// Source pixel height.
    pub source_height: u32,
    pub format: ImageFormat,
    /// Source bytes, base64-encoded for JSON serialization.
    pub data_base64: String,
    pub style: ElementStyle,
}

impl Image {
    /// Create an image from raw encoded bytes. Returns `None` when the
    /// bytes are not a recognized format.
    pub fn from_bytes(data: &[u8], source_width: u32, source_height: u32) -> Option<Self> {
        use base64::{engine::general_purpose::STANDARD, Engine};

        let format = ImageFormat::from_magic_bytes(data)?;
        Some(Self {
            id: ElementId::next(),
            p1: Point::ZERO,
            p2: Point::new(source_width as f64, source_height as f64),
            source_width,
            source_height,
            format,
            data_base64: STANDARD.encode(data),
            style: ElementStyle::new(Rgba::transparent(), 0.0),
        })
    }

    /// Decode the stored base64 payload back into image bytes.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        use base64::{engine::general_purpose::STANDARD, Engine};
        STANDARD.decode(&self.data_base64).ok()
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.p1, self.p2)
    }

    pub fn width(&self) -> f64 {
        self.as_rect().width()
    }

    pub fn height(&self) -> f64 {
        self.as_rect().height()
    }

    /// Cap the display width at `max_width`, preserving aspect ratio.
    pub fn fit_width(mut self, max_width: f64) -> Self {
        let rect = self.as_rect();
        if rect.width() > max_width {
            let ratio = max_width / rect.width();
            self.p2 = Point::new(
                rect.x0 + max_width,
                rect.y0 + rect.height() * ratio,
            );
            self.p1 = Point::new(rect.x0, rect.y0);
        }
        self
    }

    /// Center the image on a world point.
    pub fn centered_at(mut self, center: Point) -> Self {
        let half = Vec2::new(self.width() / 2.0, self.height() / 2.0);
        let rect = self.as_rect();
        self.p1 = center - half;
        self.p2 = self.p1 + Vec2::new(rect.width(), rect.height());
        self
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
