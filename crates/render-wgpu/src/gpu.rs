use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use sketch_common::{Color, PowerPreference, SurfaceConfig};
use sketch_render::{PerspectiveCamera, RenderSurface, Renderer};
use sketch_scene::{Drawable, Material, Scene};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

/// Errors raised while bringing up the GPU backend.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    shading: f32,
}

impl InstanceData {
    fn from_drawable(drawable: &Drawable) -> Self {
        let t = &drawable.transform;
        let scale = t.scale * drawable.geometry.extents();
        let cols = Mat4::from_scale_rotation_translation(scale, t.rotation, t.position)
            .to_cols_array_2d();
        let (color, shading) = match drawable.material {
            Material::Normal => ([1.0; 4], 0.0),
            Material::Solid(color) => (color.to_rgba_f32(1.0), 1.0),
        };
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
            shading,
        }
    }
}

/// Unit cube centered on the origin.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-p, -p, p], [p, -p, p], [p, p, p], [-p, p, p]]),
        ([0.0, 0.0, -1.0], [[p, -p, -p], [-p, -p, -p], [-p, p, -p], [p, p, -p]]),
        ([1.0, 0.0, 0.0], [[p, -p, p], [p, -p, -p], [p, p, -p], [p, p, p]]),
        ([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p, p], [-p, p, p], [-p, p, -p]]),
        ([0.0, 1.0, 0.0], [[-p, p, p], [p, p, p], [p, p, -p], [-p, p, -p]]),
        ([0.0, -1.0, 0.0], [[-p, -p, -p], [p, -p, -p], [p, -p, p], [-p, -p, p]]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (face, (normal, corners)) in faces.into_iter().enumerate() {
        let base = (face * 4) as u16;
        vertices.extend(corners.map(|position| Vertex { position, normal }));
        indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

fn power_preference(pref: PowerPreference) -> wgpu::PowerPreference {
    match pref {
        PowerPreference::Default => wgpu::PowerPreference::None,
        PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
        PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
    }
}

/// Pick a composite mode: a translucent one when `alpha` is requested and
/// available, otherwise opaque, otherwise whatever the surface offers first.
fn choose_alpha_mode(alpha: bool, available: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    let wanted: &[wgpu::CompositeAlphaMode] = if alpha {
        &[
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
    } else {
        &[wgpu::CompositeAlphaMode::Opaque]
    };
    wanted
        .iter()
        .find(|m| available.contains(m))
        .or_else(|| available.first())
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Clear color for the render pass. sRGB targets expect linear values.
fn clear_value(color: Color, srgb_target: bool) -> wgpu::Color {
    let [r, g, b] = color.to_rgb_f64();
    let [r, g, b] = if srgb_target {
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
    } else {
        [r, g, b]
    };
    wgpu::Color { r, g, b, a: 1.0 }
}

fn create_target(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

/// wgpu renderer for a window surface.
///
/// The swapchain is configured at the render surface's drawing-buffer size on
/// every `resize`; until the first non-degenerate resize nothing is drawn.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    configured: bool,
    sample_count: u32,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    depth_view: Option<wgpu::TextureView>,
    msaa_view: Option<wgpu::TextureView>,
}

impl WgpuRenderer {
    /// Create the GPU device and swapchain for `target` (typically a window).
    pub fn new<T>(target: T, config: &SurfaceConfig) -> Result<Self, GpuError>
    where
        T: Into<wgpu::SurfaceTarget<'static>>,
    {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: power_preference(config.power_preference),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("sketch_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        let alpha_mode = choose_alpha_mode(config.alpha, &caps.alpha_modes);

        let msaa_supported = [format, DEPTH_FORMAT].iter().all(|f| {
            adapter
                .get_texture_format_features(*f)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        });
        let sample_count = if config.antialias && msaa_supported {
            MSAA_SAMPLES
        } else {
            if config.antialias {
                tracing::warn!(?format, "antialiasing requested but not supported; disabled");
            }
            1
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: 1,
            height: 1,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("box_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BOX_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("box_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = 64;
        let instance_buffer = Self::create_instance_buffer(&device, instance_capacity);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            ?alpha_mode,
            sample_count,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config: surface_config,
            configured: false,
            sample_count,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            instance_buffer,
            instance_capacity,
            depth_view: None,
            msaa_view: None,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (capacity * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload_instances(&mut self, instances: &[InstanceData]) {
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(&self.device, self.instance_capacity);
            tracing::debug!(capacity = self.instance_capacity, "instance buffer grown");
        }
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    fn configure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        let (w, h) = (self.config.width, self.config.height);
        self.depth_view = Some(create_target(
            &self.device,
            "depth_texture",
            DEPTH_FORMAT,
            w,
            h,
            self.sample_count,
        ));
        self.msaa_view = (self.sample_count > 1).then(|| {
            create_target(
                &self.device,
                "msaa_texture",
                self.config.format,
                w,
                h,
                self.sample_count,
            )
        });
        self.configured = true;
    }
}

impl Renderer for WgpuRenderer {
    fn resize(&mut self, surface: &RenderSurface) {
        let (width, height) = surface.drawing_buffer_size();
        if width == 0 || height == 0 {
            // A zero-sized swapchain is invalid; wait for a real size.
            self.configured = false;
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.configure();
        tracing::debug!(width, height, "swapchain configured");
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, surface: &RenderSurface) {
        if !self.configured || surface.is_degenerate() {
            return;
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.configure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("surface timeout; frame skipped");
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
            }),
        );

        let instances: Vec<InstanceData> = scene
            .visible()
            .map(|(_, drawable)| InstanceData::from_drawable(drawable))
            .collect();
        self.upload_instances(&instances);

        let Some(depth_view) = self.depth_view.as_ref() else {
            return;
        };
        let clear = clear_value(surface.clear_color(), self.config.format.is_srgb());
        let (color_view, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if !instances.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.cube_index_count, 0, 0..instances.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use sketch_common::Transform;
    use sketch_scene::Geometry;

    #[test]
    fn cube_mesh_is_closed_unit_box() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        for v in &vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn instance_scales_unit_cube_to_extents() {
        let drawable = Drawable::new(Geometry::cube(25.0), Material::Normal)
            .with_transform(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        let inst = InstanceData::from_drawable(&drawable);
        assert_eq!(inst.model_0[0], 25.0);
        assert_eq!(inst.model_1[1], 25.0);
        assert_eq!(inst.model_2[2], 25.0);
        assert_eq!(inst.model_3, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(inst.shading, 0.0);
    }

    #[test]
    fn solid_material_carries_color() {
        let mut drawable = Drawable::new(
            Geometry::Box {
                width: 1.0,
                height: 2.0,
                depth: 3.0,
            },
            Material::Solid(Color(0xff0000)),
        );
        drawable.transform.rotation = Quat::IDENTITY;
        let inst = InstanceData::from_drawable(&drawable);
        assert_eq!(inst.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(inst.shading, 1.0);
        assert_eq!(inst.model_2[2], 3.0);
    }

    #[test]
    fn power_preference_maps_all_variants() {
        assert_eq!(
            power_preference(PowerPreference::HighPerformance),
            wgpu::PowerPreference::HighPerformance
        );
        assert_eq!(
            power_preference(PowerPreference::LowPower),
            wgpu::PowerPreference::LowPower
        );
        assert_eq!(
            power_preference(PowerPreference::Default),
            wgpu::PowerPreference::None
        );
    }

    #[test]
    fn alpha_mode_prefers_opaque_without_alpha() {
        use wgpu::CompositeAlphaMode as M;
        assert_eq!(choose_alpha_mode(false, &[M::PreMultiplied, M::Opaque]), M::Opaque);
        assert_eq!(choose_alpha_mode(true, &[M::Opaque, M::PreMultiplied]), M::PreMultiplied);
        assert_eq!(choose_alpha_mode(true, &[M::Inherit]), M::Inherit);
        assert_eq!(choose_alpha_mode(false, &[]), M::Auto);
    }

    #[test]
    fn clear_value_linearizes_for_srgb_targets() {
        let plain = clear_value(Color(0xeeeeee), false);
        assert!((plain.r - 238.0 / 255.0).abs() < 1e-12);
        assert_eq!(plain.a, 1.0);

        let linear = clear_value(Color(0xeeeeee), true);
        assert!(linear.r < plain.r);
        assert!((linear.r - 0.8549).abs() < 1e-3);

        let black = clear_value(Color(0x000000), true);
        assert_eq!((black.r, black.g, black.b), (0.0, 0.0, 0.0));
    }
}
