//! wgpu render backend for sketches.
//!
//! Draws every visible box in the scene as one instanced batch, cleared to
//! the surface's clear color.
//!
//! # Invariants
//! - Renderer never mutates the scene or camera.
//! - The swapchain always matches the surface's drawing-buffer size.
//! - Zero-area surfaces are never configured.

mod gpu;
mod shaders;

pub use gpu::{GpuError, WgpuRenderer};
