//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;

/// Per-notch zoom factor for scroll-wheel zooming.
const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Camera manages the view transform for the infinite canvas.
///
/// Elements are stored in world coordinates; the camera maps them to
/// screen coordinates via `screen = world * scale + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen units.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 1:1).
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Affine transform from world to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.scale,
            (screen_point.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.scale + self.offset.x,
            world_point.y * self.scale + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point visually fixed.
    ///
    /// The world point under `screen_point` is computed before the
    /// scale changes, then the offset is solved so it maps back to the
    /// same screen position afterwards.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let anchor = self.screen_to_world(screen_point);
        self.scale = new_scale;
        self.offset = Vec2::new(
            screen_point.x - anchor.x * new_scale,
            screen_point.y - anchor.y * new_scale,
        );
    }

    /// Zoom one scroll-wheel notch at the pointer. Positive `delta_y`
    /// (scrolling down) zooms out.
    pub fn wheel_zoom(&mut self, screen_point: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        self.zoom_at(screen_point, factor);
    }

    /// Reset to the default pan and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let camera = Camera::new();
        let p = Point::new(123.0, 456.0);
        assert_eq!(camera.screen_to_world(p), p);
        assert_eq!(camera.world_to_screen(p), p);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.scale = 1.5;

        let original = Point::new(123.0, 456.0);
        let back = camera.world_to_screen(camera.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_preserves_anchor() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(40.0, 25.0);
        camera.scale = 1.3;

        let anchor_screen = Point::new(300.0, 200.0);
        let world_before = camera.screen_to_world(anchor_screen);
        camera.zoom_at(anchor_screen, 1.1);
        let world_after = camera.screen_to_world(anchor_screen);

        assert!((world_before.x - world_after.x).abs() < 1e-9);
        assert!((world_before.y - world_after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 1e-6);
        assert!((camera.scale - MIN_ZOOM).abs() < f64::EPSILON);

        camera.scale = 1.0;
        camera.zoom_at(Point::ZERO, 1e6);
        assert!((camera.scale - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_direction() {
        let mut camera = Camera::new();
        camera.wheel_zoom(Point::ZERO, -1.0);
        assert!(camera.scale > 1.0);
        camera.reset();
        camera.wheel_zoom(Point::ZERO, 1.0);
        assert!(camera.scale < 1.0);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 20.0).abs() < f64::EPSILON);
    }
}
