use glam::{Mat4, Quat, Vec3};
use sketch_common::CameraConfig;

/// Perspective camera whose aspect ratio follows the render surface.
///
/// Frustum parameters are fixed at construction; only the aspect ratio is
/// reassigned, on every surface resize. Position and rotation belong to
/// callers and may change between ticks. With an identity rotation the camera
/// looks down `-Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub rotation: Quat,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, surface_width: f32, surface_height: f32) -> Self {
        Self {
            position: config.position,
            rotation: Quat::IDENTITY,
            fov_degrees: config.fov,
            aspect: aspect_ratio(surface_width, surface_height),
            near: config.near,
            far: config.far,
        }
    }

    /// Reassign the aspect ratio from new surface dimensions.
    pub fn set_aspect_from(&mut self, width: f32, height: f32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Direction the camera faces.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

fn aspect_ratio(width: f32, height: f32) -> f32 {
    width / height.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_comes_from_surface() {
        let cam = PerspectiveCamera::new(&CameraConfig::default(), 1600.0, 900.0);
        assert!((cam.aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(cam.fov_degrees(), 45.0);
        assert_eq!(cam.near(), 1.0);
        assert_eq!(cam.far(), 1000.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 100.0));
    }

    #[test]
    fn set_aspect_reassigns() {
        let mut cam = PerspectiveCamera::new(&CameraConfig::default(), 800.0, 600.0);
        cam.set_aspect_from(500.0, 1000.0);
        assert_eq!(cam.aspect(), 0.5);
    }

    #[test]
    fn zero_height_keeps_aspect_finite() {
        let cam = PerspectiveCamera::new(&CameraConfig::default(), 0.0, 0.0);
        assert!(cam.aspect().is_finite());
    }

    #[test]
    fn default_camera_sees_origin() {
        let cam = PerspectiveCamera::new(&CameraConfig::default(), 800.0, 600.0);
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }
}
