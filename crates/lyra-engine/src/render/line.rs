use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::coords::Vec2;
use crate::shader::ProgramSource;
use crate::transform::TransformSystem;
use crate::visual::{LineVisual, VisualError, VisualId};

use super::common::{straight_alpha_blend, LineVertex};
use super::{RenderCtx, RenderTarget};

/// Renderer for [`LineVisual`]s.
///
/// Every distinct filter chain assembles to a distinct WGSL module, so render
/// pipelines are cached by assembled source. Per-visual GPU state (the static
/// vertex buffer, the per-frame uniform buffer, the bind group) is keyed by
/// [`VisualId`].
///
/// Each `draw` call records its own render pass with `LoadOp::Load`; visuals
/// composite over whatever the frame already contains, and a failed visual
/// leaves the pass stream untouched for the rest of the frame.
#[derive(Default)]
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: HashMap<String, PipelineEntry>,
    visuals: HashMap<VisualId, VisualEntry>,
}

struct PipelineEntry {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

struct VisualEntry {
    vbo: wgpu::Buffer,
    vertex_count: u32,

    ubo: wgpu::Buffer,
    ubo_capacity: u64, // bytes

    /// Bind group plus the source key it was built against. Rebuilt when the
    /// visual's chain (and so its pipeline) changes or the UBO is recreated.
    bind_group: Option<(String, wgpu::BindGroup)>,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws one visual into `target`.
    ///
    /// Fails with [`VisualError::MissingTransform`] when the visual has no
    /// transform; buffers with fewer than two points are silently skipped
    /// (nothing to stroke). Failures leave no partial state behind.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        visual: &LineVisual,
        system: &TransformSystem,
    ) -> Result<(), VisualError> {
        let program = visual.assemble(system)?;

        if visual.vertices().len() < 2 {
            return Ok(());
        }

        self.invalidate_for_format(ctx.surface_format);
        self.ensure_pipeline(ctx, &program.wgsl);
        self.ensure_visual_entry(ctx, visual);
        self.write_uniforms(ctx, visual.id(), &program);
        self.ensure_bind_group(ctx, visual.id(), &program.wgsl);

        let Some(pipeline) = self.pipelines.get(&program.wgsl) else { return Ok(()) };
        let Some(entry) = self.visuals.get(&visual.id()) else { return Ok(()) };
        let Some((_, bind_group)) = entry.bind_group.as_ref() else { return Ok(()) };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lyra line pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&pipeline.pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, entry.vbo.slice(..));
        rpass.draw(0..entry.vertex_count, 0..1);

        Ok(())
    }

    /// Releases GPU state for a discarded visual.
    ///
    /// Optional; entries for live visuals are reused forever. Call this when
    /// the driver drops a visual so its buffers do not outlive it.
    pub fn forget(&mut self, id: VisualId) {
        self.visuals.remove(&id);
    }

    fn invalidate_for_format(&mut self, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) {
            return;
        }

        // Pipelines target the old surface format; bind groups reference the
        // old layouts. Both are rebuilt lazily against the new format.
        self.pipelines.clear();
        for entry in self.visuals.values_mut() {
            entry.bind_group = None;
        }
        self.pipeline_format = Some(format);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, wgsl: &str) {
        if self.pipelines.contains_key(wgsl) {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lyra line shader"),
            source: wgpu::ShaderSource::Wgsl(wgsl.into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("lyra line bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            // Uniform size varies with the filter chain; let
                            // wgpu validate against the shader at draw time.
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("lyra line pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lyra line pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[LineVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipelines.insert(
            wgsl.to_string(),
            PipelineEntry {
                pipeline,
                bind_group_layout,
            },
        );
    }

    fn ensure_visual_entry(&mut self, ctx: &RenderCtx<'_>, visual: &LineVisual) {
        if self.visuals.contains_key(&visual.id()) {
            return;
        }

        // Geometry is immutable per visual: upload once at entry creation.
        let vertices: Vec<LineVertex> = visual
            .vertices()
            .positions()
            .iter()
            .map(|p| LineVertex { pos: [p.x, p.y] })
            .collect();

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lyra line vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ubo_capacity = Self::uniform_size(visual.filters().len());
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lyra line ubo"),
            size: ubo_capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.visuals.insert(
            visual.id(),
            VisualEntry {
                vbo,
                vertex_count: vertices.len() as u32,
                ubo,
                ubo_capacity,
                bind_group: None,
            },
        );
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, id: VisualId, program: &ProgramSource) {
        let Some(entry) = self.visuals.get_mut(&id) else { return };

        let required = Self::uniform_size(program.filter_params.len());
        if required > entry.ubo_capacity {
            entry.ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("lyra line ubo"),
                size: required,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            entry.ubo_capacity = required;
            entry.bind_group = None;
        }

        let framebuffer = Vec2::new(
            ctx.viewport.width * ctx.scale_factor,
            ctx.viewport.height * ctx.scale_factor,
        );
        let data = program.uniform_data(framebuffer);
        ctx.queue.write_buffer(&entry.ubo, 0, bytemuck::cast_slice(&data));
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>, id: VisualId, wgsl: &str) {
        let Some(pipeline) = self.pipelines.get(wgsl) else { return };
        let Some(entry) = self.visuals.get_mut(&id) else { return };

        if entry.bind_group.as_ref().is_some_and(|(key, _)| key == wgsl) {
            return;
        }

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lyra line bind group"),
            layout: &pipeline.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: entry.ubo.as_entire_binding(),
            }],
        });

        entry.bind_group = Some((wgsl.to_string(), bind_group));
    }

    /// Uniform block size in bytes for a chain with `filters` attachments.
    fn uniform_size(filters: usize) -> u64 {
        // Three header vec4s plus one vec4 slot per filter (minimum one).
        (3 + filters.max(1)) as u64 * 16
    }
}
