//! Whiteboard gesture state machine.
//!
//! [`Whiteboard`] aggregates the element store, camera, and tool
//! palette for one interview session and interprets pointer/keyboard
//! events against them. Entry points return the [`SyncMessage`]s the
//! gesture produced; the host forwards them to the sync adapter, so
//! local mutation and network traffic stay on one auditable path.

use crate::camera::Camera;
use crate::elements::{Element, ElementId, ElementStyle, Image, Text, MAX_PASTE_WIDTH};
use crate::geometry::{self, CursorStyle, HitPosition};
use crate::input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::Selection;
use crate::store::ElementStore;
use crate::sync::SyncMessage;
use crate::tools::{Tool, ToolManager};
use kurbo::{Point, Size, Vec2};
use uuid::Uuid;

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Idle,
    /// Growing a newly created element under the pointer.
    Drawing,
    /// Translating the selected element.
    Moving,
    /// Dragging a corner/endpoint handle of the selected element.
    Resizing,
    /// Text overlay is open.
    Writing,
    /// Dragging the camera.
    Panning,
}

/// In-progress text entry.
///
/// The anchor stays in screen coordinates while the overlay is open,
/// so the host can position it without camera-aware re-rendering; it
/// converts to world coordinates only at commit.
#[derive(Debug, Clone)]
pub struct TextDraft {
    pub screen_anchor: Point,
    pub content: String,
}

/// One whiteboard instance, owned by a single interview session. State
/// lives in memory for the lifetime of that session and is discarded
/// with it.
#[derive(Debug)]
pub struct Whiteboard {
    pub store: ElementStore,
    pub camera: Camera,
    pub tools: ToolManager,
    pub input: InputState,
    session_id: Uuid,
    is_host: bool,
    viewport: Size,
    action: Action,
    selection: Option<Selection>,
    text_draft: Option<TextDraft>,
}

impl Whiteboard {
    pub fn new(viewport: Size) -> Self {
        let session_id = Uuid::new_v4();
        log::debug!("whiteboard created for session {session_id}");
        Self {
            store: ElementStore::new(),
            camera: Camera::new(),
            tools: ToolManager::new(),
            input: InputState::new(),
            session_id,
            is_host: false,
            viewport,
            action: Action::Idle,
            selection: None,
            text_draft: None,
        }
    }

    /// Mark this client as the session host. Hosts get the clear and
    /// export affordances.
    pub fn with_host_role(mut self, is_host: bool) -> Self {
        self.is_host = is_host;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_host(&self) -> bool {
        self.is_host
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The selected element, if it still exists in the store.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_ref().and_then(|s| self.store.get(s.id))
    }

    pub fn text_draft(&self) -> Option<&TextDraft> {
        self.text_draft.as_ref()
    }

    /// Selection chrome is hidden while text is being written or an
    /// element is still being drawn, so a stale box never shows
    /// mid-gesture.
    pub fn selection_box_visible(&self) -> bool {
        self.selection.is_some()
            && !matches!(self.action, Action::Writing | Action::Drawing)
    }

    pub fn can_clear(&self) -> bool {
        self.is_host
    }

    pub fn can_export(&self) -> bool {
        self.is_host
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.set_tool(tool);
        self.selection = None;
    }

    // --- Event entry points ---

    /// Feed a pointer event through the state machine. Returns the
    /// message to broadcast, if the event completed a gesture.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<SyncMessage> {
        self.input.observe_pointer(&event);
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                None
            }
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => {
                self.scroll(position, delta, modifiers);
                None
            }
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        self.input.observe_key(&event);
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton) -> Option<SyncMessage> {
        // Clicking away from an open text overlay commits it; the
        // click itself is consumed.
        if self.action == Action::Writing {
            return self.commit_text();
        }

        if button == MouseButton::Middle
            || (button == MouseButton::Left && self.input.is_space_held())
        {
            self.action = Action::Panning;
            return None;
        }
        if button != MouseButton::Left {
            return None;
        }

        let world = self.camera.screen_to_world(position);
        match self.tools.current {
            Tool::Selection => {
                let grabbed = self
                    .store
                    .element_at(world)
                    .map(|(element, pos)| (Selection::grab(element, pos, world), pos));
                match grabbed {
                    Some((selection, pos)) => {
                        self.action = if pos.is_handle() {
                            Action::Resizing
                        } else {
                            Action::Moving
                        };
                        self.selection = Some(selection);
                    }
                    None => self.selection = None,
                }
                None
            }
            Tool::Text => {
                self.text_draft = Some(TextDraft {
                    screen_anchor: position,
                    content: String::new(),
                });
                self.action = Action::Writing;
                None
            }
            _ => {
                if let Some(element) = self.tools.create_element(world) {
                    self.selection =
                        Some(Selection::grab(&element, HitPosition::Inside, world));
                    self.store.add(element);
                    self.action = Action::Drawing;
                }
                None
            }
        }
    }

    fn pointer_move(&mut self, position: Point) {
        match self.action {
            Action::Panning => {
                let delta = self.input.pointer_delta();
                self.camera.pan(delta);
            }
            Action::Drawing => {
                let world = self.camera.screen_to_world(position);
                if let Some(id) = self.selection.as_ref().map(|s| s.id) {
                    self.store.update(id, |element| {
                        if let Element::Freehand(stroke) = element {
                            stroke.add_point(world);
                        } else {
                            set_second_corner(element, world);
                        }
                    });
                }
            }
            Action::Moving => {
                let world = self.camera.screen_to_world(position);
                let Some(selection) = &self.selection else {
                    return;
                };
                let id = selection.id;
                if let Some(points) = selection.moved_points(world) {
                    self.store.update(id, move |element| {
                        if let Element::Freehand(stroke) = element {
                            stroke.points = points;
                        }
                    });
                } else if let Some((p1, p2)) = selection.moved_corners(world) {
                    self.store.update(id, |element| set_corners(element, p1, p2));
                }
            }
            Action::Resizing => {
                let world = self.camera.screen_to_world(position);
                let Some(selection) = &self.selection else {
                    return;
                };
                let id = selection.id;
                if let Some(corners) = selection.corner_snapshot() {
                    if let Some((p1, p2)) =
                        geometry::resized_corners(selection.grabbed, world, corners)
                    {
                        self.store.update(id, |element| set_corners(element, p1, p2));
                    }
                }
            }
            Action::Idle | Action::Writing => {}
        }
    }

    fn pointer_up(&mut self) -> Option<SyncMessage> {
        let finished = self.action;
        match finished {
            Action::Drawing | Action::Moving | Action::Resizing => {
                if let Some(id) = self.selection.as_ref().map(|s| s.id) {
                    self.store.update(id, |element| element.normalize());
                }
                self.store.commit();
                self.action = Action::Idle;
                // Finished draws and resizes propagate to peers; moves
                // stay local until the element is touched again.
                match finished {
                    Action::Drawing => {
                        self.selected_element().cloned().map(SyncMessage::add)
                    }
                    Action::Resizing => {
                        self.selected_element().cloned().map(SyncMessage::update)
                    }
                    _ => None,
                }
            }
            Action::Panning => {
                self.action = Action::Idle;
                None
            }
            // The overlay stays open until the text commits.
            Action::Writing | Action::Idle => None,
        }
    }

    fn scroll(&mut self, position: Point, delta: Vec2, modifiers: Modifiers) {
        if modifiers.zoom_chord() {
            self.camera.wheel_zoom(position, delta.y);
        } else {
            self.camera.pan(Vec2::new(-delta.x, -delta.y));
        }
    }

    // --- Text entry ---

    /// Replace the draft content (mirrors the host's input overlay).
    pub fn set_text_draft(&mut self, content: String) {
        if let Some(draft) = &mut self.text_draft {
            draft.content = content;
        }
    }

    /// Commit the open text draft: empty text is discarded, anything
    /// else becomes a text element at the world position of the
    /// original screen anchor. The new element is selected and the
    /// active tool falls back to selection.
    pub fn commit_text(&mut self) -> Option<SyncMessage> {
        let draft = self.text_draft.take()?;
        self.action = Action::Idle;

        if draft.content.trim().is_empty() {
            return None;
        }

        let anchor = self.camera.screen_to_world(draft.screen_anchor);
        let element = Element::Text(Text::new(
            anchor,
            draft.content,
            ElementStyle::new(self.tools.stroke_color, 1.0),
        ));
        let message = SyncMessage::add(element.clone());
        let selection = Selection::grab(&element, HitPosition::Inside, anchor);

        self.store.add(element);
        self.store.commit();
        self.tools.set_tool(Tool::Selection);
        self.selection = Some(selection);
        Some(message)
    }

    // --- Clipboard paste ---

    /// Paste an image from the clipboard. The image is scaled to the
    /// paste width cap, centered in the viewport, and committed to
    /// history — but never broadcast: it stays local to this client.
    pub fn paste_image(
        &mut self,
        data: &[u8],
        source_width: u32,
        source_height: u32,
    ) -> Option<ElementId> {
        let image = Image::from_bytes(data, source_width, source_height)?
            .fit_width(MAX_PASTE_WIDTH)
            .centered_at(self.viewport_center_world());
        let id = image.id;
        self.store.add(Element::Image(image));
        self.store.commit();
        Some(id)
    }

    /// Paste plain text from the clipboard as a text element centered
    /// in the viewport. Local-only, like pasted images.
    pub fn paste_text(&mut self, content: &str) -> Option<ElementId> {
        if content.is_empty() {
            return None;
        }
        let element = Element::Text(Text::new(
            self.viewport_center_world(),
            content.to_string(),
            ElementStyle::new(self.tools.stroke_color, 1.0),
        ));
        let id = element.id();
        self.store.add(element);
        self.store.commit();
        Some(id)
    }

    fn viewport_center_world(&self) -> Point {
        self.camera.screen_to_world(Point::new(
            self.viewport.width / 2.0,
            self.viewport.height / 2.0,
        ))
    }

    // --- History and clearing ---

    pub fn undo(&mut self) {
        self.store.undo();
    }

    pub fn redo(&mut self) {
        self.store.redo();
    }

    /// Clear the canvas (host only). Returns the clear message to
    /// broadcast so every peer drops the board too.
    pub fn clear_canvas(&mut self) -> Option<SyncMessage> {
        if !self.is_host {
            log::debug!("ignoring clear from non-host client");
            return None;
        }
        self.store.clear_all();
        self.selection = None;
        Some(SyncMessage::Clear)
    }

    // --- Cursor feedback ---

    /// Cursor the host should show for the current pointer position.
    pub fn cursor_hint(&self) -> CursorStyle {
        if self.input.is_space_held() || self.action == Action::Panning {
            return CursorStyle::Grab;
        }
        match self.tools.current {
            Tool::Selection => {
                let world = self.camera.screen_to_world(self.input.pointer_position);
                self.store
                    .element_at(world)
                    .map(|(_, pos)| geometry::cursor_for_position(pos))
                    .unwrap_or_default()
            }
            _ => CursorStyle::Crosshair,
        }
    }
}

/// Drag the gesture's second corner to `point`.
fn set_second_corner(element: &mut Element, point: Point) {
    match element {
        Element::Rectangle(e) => e.p2 = point,
        Element::Circle(e) => e.p2 = point,
        Element::Line(e) => e.end = point,
        Element::Text(e) => e.p2 = point,
        Element::Image(e) => e.p2 = point,
        Element::Freehand(_) => {}
    }
}

/// Set both corners of a two-corner element.
fn set_corners(element: &mut Element, p1: Point, p2: Point) {
    match element {
        Element::Rectangle(e) => {
            e.p1 = p1;
            e.p2 = p2;
        }
        Element::Circle(e) => {
            e.p1 = p1;
            e.p2 = p2;
        }
        Element::Line(e) => {
            e.start = p1;
            e.end = p2;
        }
        Element::Text(e) => {
            e.p1 = p1;
            e.p2 = p2;
        }
        Element::Image(e) => {
            e.p1 = p1;
            e.p2 = p2;
        }
        Element::Freehand(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::UpsertAction;

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn board() -> Whiteboard {
        Whiteboard::new(Size::new(800.0, 600.0))
    }

    fn press(board: &mut Whiteboard, x: f64, y: f64) -> Option<SyncMessage> {
        board.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        })
    }

    fn drag(board: &mut Whiteboard, x: f64, y: f64) -> Option<SyncMessage> {
        board.handle_pointer(PointerEvent::Move {
            position: Point::new(x, y),
        })
    }

    fn release(board: &mut Whiteboard, x: f64, y: f64) -> Option<SyncMessage> {
        board.handle_pointer(PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        })
    }

    #[test]
    fn test_backwards_rectangle_normalizes_on_release() {
        let mut board = board();
        board.set_tool(Tool::Rectangle);

        press(&mut board, 10.0, 10.0);
        assert_eq!(board.action(), Action::Drawing);
        drag(&mut board, 5.0, 5.0);
        let message = release(&mut board, 5.0, 5.0);

        let Some(SyncMessage::Element { action, element }) = message else {
            panic!("finished draw must broadcast");
        };
        assert_eq!(action, UpsertAction::Add);
        let Element::Rectangle(rect) = element else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.p1, Point::new(5.0, 5.0));
        assert_eq!(rect.p2, Point::new(10.0, 10.0));
        assert!(board.store.can_undo());
        assert_eq!(board.action(), Action::Idle);
    }

    #[test]
    fn test_freehand_accumulates_points() {
        let mut board = board();
        board.set_tool(Tool::Pencil);

        press(&mut board, 0.0, 0.0);
        for i in 1..5 {
            drag(&mut board, i as f64 * 10.0, 0.0);
        }
        let message = release(&mut board, 40.0, 0.0);

        assert!(matches!(
            message,
            Some(SyncMessage::Element {
                action: UpsertAction::Add,
                ..
            })
        ));
        let Element::Freehand(stroke) = &board.store.elements()[0] else {
            panic!("expected stroke");
        };
        assert_eq!(stroke.len(), 5);
    }

    #[test]
    fn test_move_commits_but_does_not_broadcast() {
        let mut board = board();
        board.set_tool(Tool::Rectangle);
        press(&mut board, 0.0, 0.0);
        drag(&mut board, 40.0, 40.0);
        release(&mut board, 40.0, 40.0);

        board.set_tool(Tool::Selection);
        press(&mut board, 20.0, 20.0);
        assert_eq!(board.action(), Action::Moving);
        drag(&mut board, 120.0, 120.0);
        let message = release(&mut board, 120.0, 120.0);
        assert!(message.is_none());

        let bounds = board.store.elements()[0].bounds();
        assert_eq!(bounds.x0, 100.0);
        assert_eq!(bounds.y0, 100.0);
        assert_eq!(bounds.width(), 40.0);
    }

    #[test]
    fn test_resize_from_corner_broadcasts_update() {
        let mut board = board();
        board.set_tool(Tool::Rectangle);
        press(&mut board, 20.0, 20.0);
        drag(&mut board, 60.0, 60.0);
        release(&mut board, 60.0, 60.0);

        board.set_tool(Tool::Selection);
        // Grab the top-left corner and drag it outwards.
        press(&mut board, 21.0, 19.0);
        assert_eq!(board.action(), Action::Resizing);
        drag(&mut board, 0.0, 0.0);
        let message = release(&mut board, 0.0, 0.0);

        assert!(matches!(
            message,
            Some(SyncMessage::Element {
                action: UpsertAction::Update,
                ..
            })
        ));
        let bounds = board.store.elements()[0].bounds();
        assert_eq!(bounds.x0, 0.0);
        assert_eq!(bounds.x1, 60.0);
    }

    #[test]
    fn test_space_drag_pans_camera() {
        let mut board = board();
        board.handle_key(KeyEvent::Pressed("Space".to_string()));
        press(&mut board, 100.0, 100.0);
        assert_eq!(board.action(), Action::Panning);
        drag(&mut board, 130.0, 110.0);
        assert_eq!(board.camera.offset, Vec2::new(30.0, 10.0));
        release(&mut board, 130.0, 110.0);
        assert_eq!(board.action(), Action::Idle);
        assert!(board.store.is_empty());
    }

    #[test]
    fn test_middle_drag_pans_camera() {
        let mut board = board();
        board.handle_pointer(PointerEvent::Down {
            position: Point::new(50.0, 50.0),
            button: MouseButton::Middle,
        });
        assert_eq!(board.action(), Action::Panning);
    }

    #[test]
    fn test_scroll_pans_and_zoom_chord_zooms() {
        let mut board = board();
        board.handle_pointer(PointerEvent::Scroll {
            position: Point::new(0.0, 0.0),
            delta: Vec2::new(5.0, 7.0),
            modifiers: Modifiers::default(),
        });
        assert_eq!(board.camera.offset, Vec2::new(-5.0, -7.0));

        let scale_before = board.camera.scale;
        board.handle_pointer(PointerEvent::Scroll {
            position: Point::new(100.0, 100.0),
            delta: Vec2::new(0.0, -3.0),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        });
        assert!(board.camera.scale > scale_before);
    }

    #[test]
    fn test_text_commit_anchors_in_world_space() {
        let mut board = board();
        // Pan so screen and world coordinates differ.
        board.camera.pan(Vec2::new(100.0, 50.0));
        board.set_tool(Tool::Text);

        press(&mut board, 300.0, 200.0);
        assert_eq!(board.action(), Action::Writing);
        assert!(!board.selection_box_visible());
        board.set_text_draft("let x = 1;".to_string());

        let message = board.commit_text();
        let Some(SyncMessage::Element { element, .. }) = message else {
            panic!("text commit must broadcast");
        };
        let Element::Text(text) = &element else {
            panic!("expected text");
        };
        assert_eq!(text.p1, Point::new(200.0, 150.0));
        assert_eq!(text.content, "let x = 1;");

        // Tool falls back to selection with the new element selected.
        assert_eq!(board.tools.current, Tool::Selection);
        assert_eq!(board.selected_element().map(|e| e.id()), Some(element.id()));
        assert!(board.store.can_undo());
    }

    #[test]
    fn test_empty_text_is_discarded() {
        let mut board = board();
        board.set_tool(Tool::Text);
        press(&mut board, 10.0, 10.0);
        board.set_text_draft("   ".to_string());
        assert!(board.commit_text().is_none());
        assert!(board.store.is_empty());
        assert_eq!(board.action(), Action::Idle);
    }

    #[test]
    fn test_click_elsewhere_commits_open_text() {
        let mut board = board();
        board.set_tool(Tool::Text);
        press(&mut board, 10.0, 10.0);
        board.set_text_draft("hi".to_string());

        // The committing click is consumed; no new draft opens.
        let message = press(&mut board, 400.0, 400.0);
        assert!(matches!(message, Some(SyncMessage::Element { .. })));
        assert!(board.text_draft().is_none());
        assert_eq!(board.store.len(), 1);
    }

    #[test]
    fn test_paste_image_is_scaled_centered_and_local() {
        let mut board = board();
        let id = board.paste_image(PNG_MAGIC, 1000, 500).unwrap();

        let element = board.store.get(id).unwrap();
        let bounds = element.bounds();
        assert!((bounds.width() - 500.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 250.0).abs() < f64::EPSILON);
        // Centered on the 800x600 viewport.
        assert_eq!(bounds.center(), Point::new(400.0, 300.0));
        assert!(board.store.can_undo());
    }

    #[test]
    fn test_paste_text_lands_at_viewport_center() {
        let mut board = board();
        let id = board.paste_text("copied snippet").unwrap();
        let Some(Element::Text(text)) = board.store.get(id) else {
            panic!("expected text");
        };
        assert_eq!(text.p1, Point::new(400.0, 300.0));
    }

    #[test]
    fn test_clear_requires_host() {
        let mut board = board();
        board.set_tool(Tool::Rectangle);
        press(&mut board, 0.0, 0.0);
        drag(&mut board, 10.0, 10.0);
        release(&mut board, 10.0, 10.0);

        assert!(board.clear_canvas().is_none());
        assert_eq!(board.store.len(), 1);

        let mut host = board.with_host_role(true);
        let message = host.clear_canvas();
        assert!(matches!(message, Some(SyncMessage::Clear)));
        assert!(host.store.is_empty());
    }

    #[test]
    fn test_selection_box_hidden_while_drawing() {
        let mut board = board();
        board.set_tool(Tool::Rectangle);
        press(&mut board, 0.0, 0.0);
        assert!(!board.selection_box_visible());
        release(&mut board, 20.0, 20.0);
        assert!(board.selection_box_visible());
    }

    #[test]
    fn test_cursor_hint_over_element() {
        let mut board = board();
        board.set_tool(Tool::Rectangle);
        press(&mut board, 20.0, 20.0);
        drag(&mut board, 80.0, 80.0);
        release(&mut board, 80.0, 80.0);

        board.set_tool(Tool::Selection);
        drag(&mut board, 50.0, 50.0);
        assert_eq!(board.cursor_hint(), CursorStyle::Move);
        drag(&mut board, 200.0, 200.0);
        assert_eq!(board.cursor_hint(), CursorStyle::Default);

        board.set_tool(Tool::Pencil);
        assert_eq!(board.cursor_hint(), CursorStyle::Crosshair);
    }

    #[test]
    fn test_stale_selection_after_remote_overwrite_is_harmless() {
        let mut board = board();
        board.set_tool(Tool::Rectangle);
        press(&mut board, 0.0, 0.0);
        drag(&mut board, 10.0, 10.0);
        release(&mut board, 10.0, 10.0);

        // A remote clear can race a local selection.
        board.store.reset();
        assert!(board.selected_element().is_none());
        drag(&mut board, 5.0, 5.0);
        assert!(release(&mut board, 5.0, 5.0).is_none());
    }
}
