//! Scene container: the drawables a sketch renders each frame.
//!
//! # Invariants
//! - Membership is a set; render order never depends on insertion order.
//! - The render loop only reads the scene; callers and callbacks mutate it
//!   between or inside ticks.

mod scene;

pub use scene::{Drawable, Geometry, Material, Scene};

pub fn crate_info() -> &'static str {
    "sketch-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
