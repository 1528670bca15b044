//! GPU resources for one tile surface.
//!
//! ```text
//!   Window ─▶ Surface ─▶ Device ─▶ Queue
//!                           │
//!                           ├─▶ RenderPipeline per pass
//!                           ├─▶ Quad / shape / line vertex buffers
//!                           └─▶ Uniform buffer + bind group per draw
//! ```
//!
//! The surface size is re-checked against the window before every draw, not
//! only on resize events; layout changes that never fire a resize still land
//! on the next frame. The explicit `resize` entry point remains as the
//! coarser event-driven trigger.

use std::ops::Range;

use anyhow::{anyhow, Context, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::naga::ShaderStage;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::compile::create_shader_module;
use crate::geometry::{self, QUAD_POSITIONS, QUAD_TEXCOORDS};
use crate::params::LightRig;
use crate::tiles::{build_passes, PassPlan, Refresh, TileSpec, VertexClass};
use crate::types::Antialiasing;
use crate::uniforms::{CircleUniforms, LightUniforms};

/// Decides whether the swapchain needs reconfiguring for a requested size.
/// Kept separate from the GPU plumbing so the policy is testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SurfaceTracker {
    size: PhysicalSize<u32>,
    max_dimension: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResizePlan {
    /// Sizes already agree; draw with no side effects.
    Keep,
    /// Zero-sized target; skip configuration and drawing entirely.
    Skip,
    /// Reconfigure to the new size, then draw.
    Reconfigure(PhysicalSize<u32>),
}

impl SurfaceTracker {
    fn new(size: PhysicalSize<u32>, max_dimension: u32) -> Self {
        Self {
            size,
            max_dimension,
        }
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn plan(&mut self, requested: PhysicalSize<u32>) -> ResizePlan {
        if requested.width == 0 || requested.height == 0 {
            return ResizePlan::Skip;
        }
        if requested == self.size {
            return ResizePlan::Keep;
        }
        if requested.width > self.max_dimension || requested.height > self.max_dimension {
            tracing::warn!(
                requested_width = requested.width,
                requested_height = requested.height,
                max_dimension = self.max_dimension,
                "requested size exceeds GPU max texture dimension; keeping previous size"
            );
            return ResizePlan::Keep;
        }
        self.size = requested;
        ResizePlan::Reconfigure(requested)
    }
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tile msaa color"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

struct Draw {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    refresh: Refresh,
    range: Range<u32>,
}

struct Pass {
    label: &'static str,
    pipeline: wgpu::RenderPipeline,
    vertex_class: VertexClass,
    vertex_buffer: Option<wgpu::Buffer>,
    draws: Vec<Draw>,
}

/// Owns every GPU resource behind one tile surface.
pub struct GpuState {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    tracker: SurfaceTracker,
    sample_count: u32,
    multisample_target: Option<MultisampleTarget>,
    quad_positions: wgpu::Buffer,
    quad_texcoords: wgpu::Buffer,
    passes: Vec<Pass>,
}

impl GpuState {
    /// Builds the full pipeline set for a tile. All shader validation runs
    /// before any pipeline is created, so a broken tile fails here and the
    /// caller can disable it without touching the others.
    pub fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        spec: &TileSpec,
        antialiasing: Antialiasing,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let plans = build_passes(spec);

        let instance = wgpu::Instance::default();
        let window_handle = target
            .window_handle()
            .map_err(|err| anyhow!("failed to acquire window handle: {err}"))?;
        let display_handle = target
            .display_handle()
            .map_err(|err| anyhow!("failed to acquire display handle: {err}"))?;
        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: display_handle.as_raw(),
                raw_window_handle: window_handle.as_raw(),
            })
        }
        .context("failed to create rendering surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let limits = adapter.limits();
        let max_dimension = limits.max_texture_dimension_2d;
        let width = initial_size.width.max(1);
        let height = initial_size.height.max(1);
        if width > max_dimension || height > max_dimension {
            anyhow::bail!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}"
            );
        }

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let sample_count = resolve_sample_count(&adapter, surface_format, antialiasing);
        tracing::info!(?antialiasing, sample_count, "resolved MSAA configuration");

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("tile device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        }))
        .context("failed to create GPU device")?;

        let size = PhysicalSize::new(width, height);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let quad_positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad positions"),
            contents: bytemuck::cast_slice(&QUAD_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_texcoords = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad texcoords"),
            contents: bytemuck::cast_slice(&QUAD_TEXCOORDS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut passes = Vec::with_capacity(plans.len());
        for plan in &plans {
            passes.push(build_pass(&device, surface_format, sample_count, plan)?);
        }

        let multisample_target = (sample_count > 1)
            .then(|| MultisampleTarget::new(&device, surface_format, size, sample_count));

        let mut state = Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            tracker: SurfaceTracker::new(size, max_dimension),
            sample_count,
            multisample_target,
            quad_positions,
            quad_texcoords,
            passes,
        };
        state.refresh_resolution_uniforms();
        Ok(state)
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.tracker.size()
    }

    /// Explicit resize-event path; the per-draw check in [`Self::render`]
    /// covers everything else.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let ResizePlan::Reconfigure(size) = self.tracker.plan(new_size) {
            self.apply_reconfigure(size);
        }
    }

    fn apply_reconfigure(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.multisample_target = (self.sample_count > 1).then(|| {
            MultisampleTarget::new(&self.device, self.config.format, size, self.sample_count)
        });
        self.refresh_resolution_uniforms();
        tracing::debug!(width = size.width, height = size.height, "surface reconfigured");
    }

    /// Rewrites uniform blocks that embed the surface resolution.
    fn refresh_resolution_uniforms(&mut self) {
        let size = self.tracker.size();
        for pass in &self.passes {
            for draw in &pass.draws {
                if let Refresh::CircleResolution { field, seed } = &draw.refresh {
                    let uniforms = CircleUniforms::new(field, *seed, (size.width, size.height));
                    self.queue
                        .write_buffer(&draw.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
                }
            }
        }
    }

    /// Records and submits one frame. `lights` carries the hover animator's
    /// current rig for the interactive tile and is ignored by every other
    /// pass.
    pub fn render(
        &mut self,
        window_size: PhysicalSize<u32>,
        lights: Option<&LightRig>,
    ) -> Result<(), wgpu::SurfaceError> {
        // Size check before every draw, not only on resize events.
        match self.tracker.plan(window_size) {
            ResizePlan::Skip => return Ok(()),
            ResizePlan::Reconfigure(size) => self.apply_reconfigure(size),
            ResizePlan::Keep => {}
        }

        if let Some(rig) = lights {
            for pass in &self.passes {
                for draw in &pass.draws {
                    if let Refresh::Lights { grain, seed } = draw.refresh {
                        let uniforms = LightUniforms::new(rig, grain, seed);
                        self.queue.write_buffer(
                            &draw.uniform_buffer,
                            0,
                            bytemuck::bytes_of(&uniforms),
                        );
                    }
                }
            }
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tile encoder"),
            });

        let (attachment_view, resolve_target) = match &self.multisample_target {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tile pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for pass in &self.passes {
                render_pass.set_pipeline(&pass.pipeline);
                match pass.vertex_class {
                    VertexClass::Quad => {
                        render_pass.set_vertex_buffer(0, self.quad_positions.slice(..));
                        render_pass.set_vertex_buffer(1, self.quad_texcoords.slice(..));
                    }
                    VertexClass::Shapes | VertexClass::Lines => {
                        let buffer = pass
                            .vertex_buffer
                            .as_ref()
                            .expect("bespoke pass always carries a vertex buffer");
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                    }
                }
                for draw in &pass.draws {
                    render_pass.set_bind_group(0, &draw.bind_group, &[]);
                    render_pass.draw(draw.range.clone(), 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn build_pass(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,
    plan: &PassPlan,
) -> Result<Pass> {
    let vertex_module =
        create_shader_module(device, plan.label, ShaderStage::Vertex, plan.vertex_source)?;
    let fragment_module = create_shader_module(
        device,
        plan.label,
        ShaderStage::Fragment,
        plan.fragment_source,
    )?;

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(plan.label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(plan.label),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let (topology, vertex_layouts): (wgpu::PrimitiveTopology, Vec<wgpu::VertexBufferLayout>) =
        match plan.vertex_class {
            VertexClass::Quad => (
                wgpu::PrimitiveTopology::TriangleStrip,
                vec![geometry::position_layout(), geometry::texcoord_layout()],
            ),
            VertexClass::Shapes => (
                wgpu::PrimitiveTopology::TriangleList,
                vec![geometry::position_layout()],
            ),
            VertexClass::Lines => (
                wgpu::PrimitiveTopology::LineList,
                vec![geometry::position_layout()],
            ),
        };

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(plan.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("main"),
            buffers: &vertex_layouts,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Shape fans arrive with mixed winding; draw both faces.
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: sample_count,
            ..wgpu::MultisampleState::default()
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });

    let vertex_buffer = plan.vertex_data.as_ref().map(|data| {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(plan.label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        })
    });

    let mut draws = Vec::with_capacity(plan.draws.len());
    for draw in &plan.draws {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(plan.label),
            contents: &draw.initial,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(plan.label),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        draws.push(Draw {
            uniform_buffer,
            bind_group,
            refresh: draw.refresh.clone(),
            range: draw.range.clone(),
        });
    }

    Ok(Pass {
        label: plan.label,
        pipeline,
        vertex_class: plan.vertex_class,
        vertex_buffer,
        draws,
    })
}

fn resolve_sample_count(
    adapter: &wgpu::Adapter,
    format: wgpu::TextureFormat,
    antialiasing: Antialiasing,
) -> u32 {
    let format_features = adapter.get_texture_format_features(format);
    let mut supported = format_features.flags.supported_sample_counts();
    if !supported.contains(&1) {
        supported.push(1);
    }
    supported.sort_unstable();
    supported.dedup();

    let mut sample_count = match antialiasing {
        Antialiasing::Auto => *supported.last().unwrap_or(&1),
        Antialiasing::Off => 1,
        Antialiasing::Samples(requested) => {
            if supported.contains(&requested) {
                requested
            } else {
                let fallback = supported
                    .iter()
                    .copied()
                    .filter(|&count| count <= requested)
                    .max()
                    .unwrap_or(1);
                tracing::warn!(
                    requested,
                    fallback,
                    ?supported,
                    "requested MSAA sample count not supported; falling back"
                );
                fallback
            }
        }
    };

    if sample_count > 1
        && !format_features
            .flags
            .contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE)
    {
        tracing::warn!(?format, "surface format cannot resolve MSAA; disabling");
        sample_count = 1;
    }
    // Sample counts above 4 need adapter-specific format features we do not
    // request; clamp rather than carry the extra feature flag.
    if sample_count > 4 {
        sample_count = supported
            .iter()
            .copied()
            .filter(|&count| count <= 4)
            .max()
            .unwrap_or(1);
    }
    sample_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_size_reconfigures_then_settles() {
        let mut tracker = SurfaceTracker::new(PhysicalSize::new(800, 600), 8192);
        assert_eq!(
            tracker.plan(PhysicalSize::new(1024, 768)),
            ResizePlan::Reconfigure(PhysicalSize::new(1024, 768))
        );
        // Second check with the same size has no side effects.
        assert_eq!(tracker.plan(PhysicalSize::new(1024, 768)), ResizePlan::Keep);
        assert_eq!(tracker.size(), PhysicalSize::new(1024, 768));
    }

    #[test]
    fn equal_size_is_a_no_op() {
        let mut tracker = SurfaceTracker::new(PhysicalSize::new(800, 600), 8192);
        assert_eq!(tracker.plan(PhysicalSize::new(800, 600)), ResizePlan::Keep);
        assert_eq!(tracker.size(), PhysicalSize::new(800, 600));
    }

    #[test]
    fn zero_size_skips_without_state_change() {
        let mut tracker = SurfaceTracker::new(PhysicalSize::new(800, 600), 8192);
        assert_eq!(tracker.plan(PhysicalSize::new(0, 600)), ResizePlan::Skip);
        assert_eq!(tracker.size(), PhysicalSize::new(800, 600));
    }

    #[test]
    fn oversized_request_keeps_previous_size() {
        let mut tracker = SurfaceTracker::new(PhysicalSize::new(800, 600), 2048);
        assert_eq!(tracker.plan(PhysicalSize::new(4096, 600)), ResizePlan::Keep);
        assert_eq!(tracker.size(), PhysicalSize::new(800, 600));
    }
}
