use std::sync::Arc;

use sketch_common::BoundingBox;
use sketch_render::{HostContainer, RenderSurface};
use winit::window::Window;

/// A winit window acting as the sketch's host container.
///
/// Sizes are reported in logical pixels; the scale factor is the device pixel
/// ratio.
pub struct WindowContainer {
    window: Arc<Window>,
}

impl WindowContainer {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl HostContainer for WindowContainer {
    fn bounding_box(&self) -> BoundingBox {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f32>(self.window.scale_factor());
        BoundingBox::new(logical.width, logical.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn attach(&mut self, surface: &RenderSurface) {
        // The wgpu swapchain is created on the window itself; nothing to mount.
        let (width, height) = surface.drawing_buffer_size();
        tracing::debug!(width, height, "surface attached to window");
    }
}
