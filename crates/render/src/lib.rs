//! Rendering adapter: render surface, perspective projection and the
//! renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate them.
//! - The camera aspect ratio is reassigned whenever the surface is resized.
//! - Applied pixel ratio never exceeds the configured maximum.

mod camera;
mod renderer;
mod surface;

pub use camera::PerspectiveCamera;
pub use renderer::{DebugTextRenderer, Renderer};
pub use surface::{HeadlessContainer, HostContainer, RenderSurface, SurfaceOptions};

pub fn crate_info() -> &'static str {
    "sketch-render v0.1.0"
}
