use sketch_scene::{Geometry, Material, Scene};

use crate::camera::PerspectiveCamera;
use crate::surface::RenderSurface;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The render loop calls `render` exactly once per tick, after all updates.
/// A renderer reads the scene and camera; it never mutates them.
pub trait Renderer {
    /// Draw one frame of `scene` as seen by `camera` into `surface`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, surface: &RenderSurface);

    /// The surface was created or changed size. Backends with size-dependent
    /// resources (swapchains, depth buffers) rebuild them here.
    fn resize(&mut self, surface: &RenderSurface) {
        let _ = surface;
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, surface: &RenderSurface) {
        (**self).render(scene, camera, surface);
    }

    fn resize(&mut self, surface: &RenderSurface) {
        (**self).resize(surface);
    }
}

/// Debug text renderer: draws nothing, describes the frame instead.
///
/// Used by the headless CLI and by tests to observe what the loop rendered
/// and how often.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
    resizes: u64,
    last_frame: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Resize notifications received so far.
    pub fn resizes(&self) -> u64 {
        self.resizes
    }

    /// Text description of the most recent frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    pub fn describe(scene: &Scene, camera: &PerspectiveCamera, surface: &RenderSurface) -> String {
        let (bw, bh) = surface.drawing_buffer_size();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame ({}x{} @{}x, clear={}) ===\n",
            bw,
            bh,
            surface.pixel_ratio(),
            surface.clear_color().to_hex()
        ));
        let dir = camera.forward();
        out.push_str(&format!(
            "Camera: pos=({:.1}, {:.1}, {:.1}) dir=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            dir.x,
            dir.y,
            dir.z,
            camera.fov_degrees(),
            camera.aspect()
        ));
        out.push_str(&format!("Drawables: {}\n", scene.visible().count()));

        for (id, drawable) in scene.visible() {
            let p = drawable.transform.position;
            let (axis, angle) = drawable.transform.rotation.to_axis_angle();
            let shape = match drawable.geometry {
                Geometry::Box {
                    width,
                    height,
                    depth,
                } => format!("box {width}x{height}x{depth}"),
            };
            let material = match drawable.material {
                Material::Normal => "normal".to_string(),
                Material::Solid(color) => color.to_hex(),
            };
            out.push_str(&format!(
                "  [{}] {} {} pos=({:.2}, {:.2}, {:.2}) rot={:.3}rad about ({:.2}, {:.2}, {:.2})\n",
                id.short(),
                shape,
                material,
                p.x,
                p.y,
                p.z,
                angle,
                axis.x,
                axis.y,
                axis.z
            ));
        }

        out
    }
}

impl Renderer for DebugTextRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, surface: &RenderSurface) {
        self.frames += 1;
        if surface.is_degenerate() {
            self.last_frame.clear();
            return;
        }
        self.last_frame = Self::describe(scene, camera, surface);
    }

    fn resize(&mut self, _surface: &RenderSurface) {
        self.resizes += 1;
    }
}
