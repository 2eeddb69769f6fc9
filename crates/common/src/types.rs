use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ConfigError;

/// Unique identifier for a drawable object in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set rotation from Euler angles in radians, applied in X, Y, Z order.
    pub fn set_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }
}

/// 24-bit RGB color, `0xRRGGBB`.
///
/// Serialized as a `"#rrggbb"` string so config files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(s);
        if digits.len() != 6 {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }

    /// Channels in `[0, 1]`.
    pub fn to_rgb_f64(self) -> [f64; 3] {
        let r = (self.0 >> 16) & 0xff;
        let g = (self.0 >> 8) & 0xff;
        let b = self.0 & 0xff;
        [r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0]
    }

    pub fn to_rgba_f32(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_rgb_f64();
        [r as f32, g as f32, b as f32, alpha]
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Logical size of a host container, as reported by its bounding-box query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (or negative). Rendering into such a box
    /// produces nothing visible.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_uniqueness() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn set_euler_single_axis_matches_axis_rotation() {
        let mut t = Transform::default();
        t.set_euler(0.0, 1.0, 0.0);
        let expected = Quat::from_rotation_y(1.0);
        assert!(t.rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn color_parses_hex_forms() {
        assert_eq!(Color::from_hex("#eeeeee").unwrap(), Color(0xeeeeee));
        assert_eq!(Color::from_hex("0xff0000").unwrap(), Color(0xff0000));
        assert_eq!(Color::from_hex("00ff00").unwrap(), Color(0x00ff00));
        assert!(Color::from_hex("#eee").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn color_channels() {
        let [r, g, b] = Color(0xff8000).to_rgb_f64();
        assert_eq!(r, 1.0);
        assert!((g - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(b, 0.0);
        assert_eq!(Color(0xeeeeee).to_hex(), "#eeeeee");
    }

    #[test]
    fn bounding_box_empty() {
        assert!(BoundingBox::new(0.0, 100.0).is_empty());
        assert!(BoundingBox::default().is_empty());
        assert!(!BoundingBox::new(10.0, 10.0).is_empty());
    }
}
