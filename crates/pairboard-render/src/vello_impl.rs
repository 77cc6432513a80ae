//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, Cap, Join, Point, Rect, Stroke, Vec2};
use pairboard_core::elements::{Element, ElementId, StrokeKind, HIGHLIGHTER_ALPHA, TEXT_FONT_SIZE};
use pairboard_core::geometry::{self, HitPosition};
use pairboard_core::store::ElementStore;
use parley::{FontContext, LayoutContext};
use peniko::{Brush, Color, Fill};
use std::collections::HashMap;
use vello::Scene;

/// Padding between a selected element and its dashed box, in world units.
const SELECTION_PADDING: f64 = 4.0;
/// Handle square edge length in screen pixels.
const HANDLE_SIZE: f64 = 8.0;
/// Padding around content in exported scenes, in world units.
const EXPORT_PADDING: f64 = 20.0;

/// Builds Vello scenes from the whiteboard state.
pub struct VelloRenderer {
    /// The scene being built.
    scene: Scene,
    /// Selection chrome color for the current frame.
    selection_color: Color,
    /// Background color for the current frame; eraser strokes use it.
    background_color: Color,
    /// Font context for text rendering (system fonts).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level, for zoom-independent selection chrome.
    zoom: f64,
    /// Decoded image cache, keyed by element id.
    image_cache: HashMap<ElementId, peniko::ImageData>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            background_color: Color::from_rgba8(248, 250, 252, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
            image_cache: HashMap::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets the internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a scene for export: elements only on a white background,
    /// framed to the content bounds. Returns the scene and the scaled
    /// output bounds, or `None` bounds for an empty board. The host
    /// rasterizes the scene and writes the download file.
    pub fn build_export_scene(&mut self, store: &ElementStore, scale: f64) -> (Scene, Option<Rect>) {
        self.scene.reset();
        self.zoom = scale;

        let mut content: Option<Rect> = None;
        for element in store.elements() {
            let bounds = element.bounds();
            content = Some(match content {
                Some(acc) => acc.union(bounds),
                None => bounds,
            });
        }
        let Some(content) = content else {
            return (std::mem::take(&mut self.scene), None);
        };

        let padded = content.inflate(EXPORT_PADDING, EXPORT_PADDING);
        let transform = Affine::scale(scale) * Affine::translate((-padded.x0, -padded.y0));
        let out = Rect::new(0.0, 0.0, padded.width() * scale, padded.height() * scale);

        self.background_color = Color::WHITE;
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::WHITE, None, &out);
        for element in store.elements() {
            self.render_element(element, transform);
        }

        (std::mem::take(&mut self.scene), Some(out))
    }

    fn render_element(&mut self, element: &Element, transform: Affine) {
        match element {
            Element::Freehand(stroke) => {
                if stroke.points.len() < 2 {
                    return;
                }
                let color = match stroke.kind {
                    StrokeKind::Pencil => stroke.style.stroke(),
                    StrokeKind::Highlighter => {
                        stroke.style.stroke_color.with_alpha(HIGHLIGHTER_ALPHA).into()
                    }
                    // Erasing is painting in the background color.
                    StrokeKind::Eraser => self.background_color,
                };
                let pen = Stroke::new(stroke.render_width())
                    .with_caps(Cap::Round)
                    .with_join(Join::Round);
                self.scene
                    .stroke(&pen, transform, color, None, &stroke.to_path());
            }
            Element::Text(text) => self.render_text(text, transform),
            Element::Image(image) => self.render_image(image, transform),
            Element::Rectangle(_) | Element::Circle(_) | Element::Line(_) => {
                let style = element.style();
                let pen = Stroke::new(style.stroke_width)
                    .with_caps(Cap::Round)
                    .with_join(Join::Round);
                self.scene
                    .stroke(&pen, transform, style.stroke(), None, &element.to_path());
            }
        }
    }

    /// Render a text element using Parley layout with the system
    /// sans-serif stack.
    fn render_text(&mut self, text: &pairboard_core::elements::Text, transform: Affine) {
        use parley::layout::PositionedLayoutItem;
        use parley::StyleProperty;

        if text.content.is_empty() {
            return;
        }

        let brush = Brush::Solid(text.style.stroke());

        let mut builder =
            self.layout_cx
                .ranged_builder(&mut self.font_cx, &text.content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(TEXT_FONT_SIZE as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Generic(parley::GenericFamily::SansSerif),
        )));
        let mut layout = builder.build(&text.content);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        // The anchor is the top-left of the text box.
        let text_transform = transform * Affine::translate((text.p1.x, text.p1.y));

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }

    /// Render an image element. An image whose payload fails to decode
    /// is simply not drawn.
    fn render_image(&mut self, image: &pairboard_core::elements::Image, transform: Affine) {
        use std::sync::Arc;

        let data = if let Some(cached) = self.image_cache.get(&image.id) {
            cached.clone()
        } else {
            let Some(raw) = image.decode_bytes() else {
                log::debug!("image {} has an unreadable payload", image.id);
                return;
            };
            let Ok(decoded) = ::image::load_from_memory(&raw) else {
                log::debug!("image {} failed to decode", image.id);
                return;
            };
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            let blob = peniko::Blob::new(Arc::new(rgba.into_vec()));
            let data = peniko::ImageData {
                data: blob,
                format: peniko::ImageFormat::Rgba8,
                width,
                height,
                alpha_type: peniko::ImageAlphaType::Alpha,
            };
            self.image_cache.insert(image.id, data.clone());
            data
        };

        let bounds = image.as_rect();
        let scale_x = bounds.width() / data.width as f64;
        let scale_y = bounds.height() / data.height as f64;
        let image_transform = transform
            * Affine::translate((bounds.x0, bounds.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);
        self.scene.draw_image(&data.into(), image_transform);
    }

    /// Dashed selection box with corner/endpoint handles. Stroke
    /// widths and handle sizes divide by zoom so the chrome keeps a
    /// constant on-screen size.
    fn render_selection(&mut self, element: &Element, transform: Affine) {
        let stroke_width = 1.0 / self.zoom;
        let dash = 4.0 / self.zoom;
        let bounds = element
            .bounds()
            .inflate(SELECTION_PADDING, SELECTION_PADDING);

        let box_stroke = Stroke::new(stroke_width).with_dashes(0.0, [dash, dash]);
        self.scene.stroke(
            &box_stroke,
            transform,
            self.selection_color,
            None,
            &bounds,
        );

        let handle_size = HANDLE_SIZE / self.zoom;
        for (position, point) in geometry::handles_for(element) {
            // Corner handles sit on the padded box, endpoint handles
            // directly on the line ends.
            let point = match position {
                HitPosition::TopLeft => {
                    point + Vec2::new(-SELECTION_PADDING, -SELECTION_PADDING)
                }
                HitPosition::TopRight => point + Vec2::new(SELECTION_PADDING, -SELECTION_PADDING),
                HitPosition::BottomLeft => {
                    point + Vec2::new(-SELECTION_PADDING, SELECTION_PADDING)
                }
                HitPosition::BottomRight => {
                    point + Vec2::new(SELECTION_PADDING, SELECTION_PADDING)
                }
                HitPosition::Start | HitPosition::End | HitPosition::Inside => point,
            };
            self.render_handle(point, handle_size, stroke_width, transform);
        }
    }

    fn render_handle(&mut self, center: Point, size: f64, stroke_width: f64, transform: Affine) {
        let rect = Rect::from_center_size(center, kurbo::Size::new(size, size));
        self.scene
            .fill(Fill::NonZero, transform, Color::WHITE, None, &rect);
        self.scene.stroke(
            &Stroke::new(stroke_width),
            transform,
            self.selection_color,
            None,
            &rect,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;
        self.background_color = ctx.background_color;
        self.zoom = ctx.board.camera.scale;

        let viewport = Rect::new(
            0.0,
            0.0,
            ctx.viewport_size.width,
            ctx.viewport_size.height,
        );
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            ctx.background_color,
            None,
            &viewport,
        );

        // Elements are stored in world space; the camera transform is
        // applied to every draw below.
        let camera_transform = ctx.board.camera.transform();
        for element in ctx.board.store.elements() {
            self.render_element(element, camera_transform);
        }

        // Selection chrome is hidden while text is being written or an
        // element is mid-draw.
        if ctx.board.selection_box_visible() {
            if let Some(element) = ctx.board.selected_element() {
                self.render_selection(element, camera_transform);
            }
        }
    }
}
