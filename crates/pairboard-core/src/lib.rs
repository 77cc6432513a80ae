//! pairboard Core Library
//!
//! Platform-agnostic state and synchronization logic for the pairboard
//! interview whiteboard: elements, hit-testing, camera, gesture state
//! machine, undo/redo history, and the best-effort sync adapter.

pub mod board;
pub mod camera;
pub mod elements;
pub mod geometry;
pub mod input;
pub mod selection;
pub mod store;
pub mod sync;
pub mod tools;

pub use board::{Action, TextDraft, Whiteboard};
pub use camera::Camera;
pub use elements::{Element, ElementId, ElementStyle, Rgba};
pub use geometry::{CursorStyle, HitPosition};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use selection::Selection;
pub use store::ElementStore;
pub use sync::{ChannelError, EventChannel, SyncAdapter, SyncMessage, UpsertAction};
pub use tools::{Tool, ToolManager};
