//! Shared types and configuration for the sketch workspace.
//!
//! # Invariants
//! - Configuration is immutable once handed to a component.
//! - No process-wide mutable settings.

pub mod config;
pub mod types;

pub use config::{
    CameraConfig, ConfigError, DEFAULT_FIXED_UPDATE_INTERVAL, PowerPreference, SketchConfig,
    SurfaceConfig,
};
pub use types::{BoundingBox, Color, ObjectId, Transform};
