use sketch_common::{BoundingBox, Color, PowerPreference, SurfaceConfig};

/// The host element a surface is mounted into.
///
/// A window, a DOM node, or a fixed headless box all fit: the surface only
/// needs to ask for the current size and pixel density, and to attach itself.
pub trait HostContainer {
    /// Current logical size of the container.
    fn bounding_box(&self) -> BoundingBox;

    /// Physical pixels per logical pixel on the host display.
    fn device_pixel_ratio(&self) -> f64;

    /// Mount the drawable surface into the container.
    fn attach(&mut self, surface: &RenderSurface);
}

/// Creation-time options forwarded to the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub antialias: bool,
    pub alpha: bool,
    pub power_preference: PowerPreference,
}

/// The drawable surface, kept in sync with its container.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurface {
    options: SurfaceOptions,
    pixel_ratio: f64,
    clear_color: Color,
    size: BoundingBox,
}

impl RenderSurface {
    /// Create a surface for `container`, size it and attach it.
    ///
    /// The applied pixel ratio is `min(config.max_pixel_ratio, host ratio)`.
    /// A zero-area container yields a degenerate surface that renders nothing;
    /// it is not an error.
    pub fn initialize<C: HostContainer + ?Sized>(container: &mut C, config: &SurfaceConfig) -> Self {
        let host_ratio = container.device_pixel_ratio();
        let mut surface = Self {
            options: SurfaceOptions {
                antialias: config.antialias,
                alpha: config.alpha,
                power_preference: config.power_preference,
            },
            pixel_ratio: config.max_pixel_ratio.min(host_ratio),
            clear_color: config.clear_color,
            size: BoundingBox::default(),
        };
        surface.set_size(container.bounding_box());
        container.attach(&surface);

        tracing::info!(
            width = surface.size.width,
            height = surface.size.height,
            pixel_ratio = surface.pixel_ratio,
            host_ratio,
            "render surface attached"
        );
        if surface.is_degenerate() {
            tracing::warn!("render surface has zero area; nothing will be visible");
        }
        surface
    }

    /// Re-read the container's size and apply it. Returns whether the size
    /// changed.
    pub fn resize<C: HostContainer + ?Sized>(&mut self, container: &C) -> bool {
        let next = container.bounding_box();
        let changed = next != self.size;
        self.set_size(next);
        if changed {
            tracing::debug!(width = next.width, height = next.height, "surface resized");
        }
        changed
    }

    pub fn set_size(&mut self, size: BoundingBox) {
        self.size = BoundingBox::new(size.width.max(0.0), size.height.max(0.0));
    }

    /// Logical size.
    pub fn size(&self) -> BoundingBox {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Physical size of the backing store: logical size times pixel ratio,
    /// rounded down.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let scale = |v: f32| (v as f64 * self.pixel_ratio).floor() as u32;
        (scale(self.size.width), scale(self.size.height))
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn options(&self) -> SurfaceOptions {
        self.options
    }

    pub fn is_degenerate(&self) -> bool {
        self.size.is_empty()
    }
}

/// Fixed-size container for headless runs and tests.
#[derive(Debug, Clone)]
pub struct HeadlessContainer {
    size: BoundingBox,
    device_pixel_ratio: f64,
    attachments: Vec<(u32, u32)>,
}

impl HeadlessContainer {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f64) -> Self {
        Self {
            size: BoundingBox::new(width, height),
            device_pixel_ratio,
            attachments: Vec::new(),
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = BoundingBox::new(width, height);
    }

    /// Drawing buffer sizes of every surface attached so far.
    pub fn attachments(&self) -> &[(u32, u32)] {
        &self.attachments
    }
}

impl HostContainer for HeadlessContainer {
    fn bounding_box(&self) -> BoundingBox {
        self.size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn attach(&mut self, surface: &RenderSurface) {
        self.attachments.push(surface.drawing_buffer_size());
    }
}
