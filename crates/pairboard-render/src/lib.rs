//! pairboard Render Library
//!
//! Renderer abstraction for the pairboard whiteboard. The default
//! implementation builds Vello scenes from the element store.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
