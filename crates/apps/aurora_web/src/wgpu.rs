#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use std::collections::HashMap;
    use wasm_bindgen::JsCast;

    use formats::texture::EquirectTexture;
    use gpu::mesh::{MeshVertex, StarInstance, star_instances, tessellate};
    use gpu::pipeline::{PipelineError, RenderPipeline};
    use gpu::renderer::{DrawKind, RenderFrame};
    use gpu::shaders::ShaderProgram;
    use gpu::uniforms::{
        DRAW_UNIFORM_STRIDE, DrawUniform, FrameGlobals, TextureSlot, Uniform, UniformBlock,
        UniformValue,
    };
    use scene::components::{Blend, Geometry, SegmentBuffer, Side, Starfield};
    use scene::entity::NodeId;
    use tracing::debug;

    const DEPTH_FORMAT: ::wgpu::TextureFormat = ::wgpu::TextureFormat::Depth24Plus;
    const INITIAL_DRAW_SLOTS: u64 = 32;

    /// Render state that differs between draws of the same program.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    struct PipelineKey {
        program: ShaderProgram,
        blend: Blend,
        side: Side,
        depth_write: bool,
    }

    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    struct MeshKey {
        radius_bits: u64,
        width_segments: u32,
        height_segments: u32,
    }

    impl From<&Geometry> for MeshKey {
        fn from(geometry: &Geometry) -> Self {
            match *geometry {
                Geometry::Sphere {
                    radius,
                    width_segments,
                    height_segments,
                } => Self {
                    radius_bits: radius.to_bits(),
                    width_segments,
                    height_segments,
                },
            }
        }
    }

    #[derive(Debug)]
    struct GpuMesh {
        vertices: ::wgpu::Buffer,
        indices: ::wgpu::Buffer,
        index_count: u32,
    }

    /// Vertex buffer of a line list or star instances.
    #[derive(Debug)]
    struct GpuBuffer {
        buffer: ::wgpu::Buffer,
        count: u32,
    }

    #[derive(Debug)]
    struct SurfaceMaps {
        _textures: Vec<::wgpu::Texture>,
        views: [Option<::wgpu::TextureView>; 3],
        bind_group: Option<::wgpu::BindGroup>,
    }

    enum Geom {
        Mesh(MeshKey),
        Lines(NodeId),
        Stars(NodeId),
    }

    #[derive(Debug)]
    struct Gpu {
        _instance: &'static ::wgpu::Instance,
        surface: ::wgpu::Surface<'static>,
        device: ::wgpu::Device,
        queue: ::wgpu::Queue,
        config: ::wgpu::SurfaceConfiguration,
        _canvas: web_sys::HtmlCanvasElement,
        depth_view: ::wgpu::TextureView,
        shaders: HashMap<ShaderProgram, ::wgpu::ShaderModule>,
        frame_layout: ::wgpu::BindGroupLayout,
        surface_layout: ::wgpu::BindGroupLayout,
        plain_layout: ::wgpu::PipelineLayout,
        textured_layout: ::wgpu::PipelineLayout,
        globals_buffer: ::wgpu::Buffer,
        draw_buffer: ::wgpu::Buffer,
        draw_slots: u64,
        frame_bind_group: ::wgpu::BindGroup,
        sampler: ::wgpu::Sampler,
        maps: SurfaceMaps,
        pipelines: HashMap<PipelineKey, ::wgpu::RenderPipeline>,
        meshes: HashMap<MeshKey, GpuMesh>,
        lines: HashMap<NodeId, GpuBuffer>,
        stars: HashMap<NodeId, GpuBuffer>,
        point_scale: f32,
    }

    fn backend(context: &str, e: impl std::fmt::Display) -> PipelineError {
        PipelineError::Backend(format!("{context}: {e}"))
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("aurora-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn create_draw_buffer(device: &::wgpu::Device, slots: u64) -> ::wgpu::Buffer {
        device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("aurora-draw-slots"),
            size: slots * DRAW_UNIFORM_STRIDE,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_frame_bind_group(
        device: &::wgpu::Device,
        layout: &::wgpu::BindGroupLayout,
        globals: &::wgpu::Buffer,
        draws: &::wgpu::Buffer,
    ) -> ::wgpu::BindGroup {
        device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("aurora-frame-bg"),
            layout,
            entries: &[
                ::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals.as_entire_binding(),
                },
                ::wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ::wgpu::BindingResource::Buffer(::wgpu::BufferBinding {
                        buffer: draws,
                        offset: 0,
                        size: ::wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                    }),
                },
            ],
        })
    }

    fn uniform_entry(binding: u32, dynamic: bool) -> ::wgpu::BindGroupLayoutEntry {
        ::wgpu::BindGroupLayoutEntry {
            binding,
            visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: ::wgpu::BindingType::Buffer {
                ty: ::wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: None,
            },
            count: None,
        }
    }

    fn texture_entry(binding: u32) -> ::wgpu::BindGroupLayoutEntry {
        ::wgpu::BindGroupLayoutEntry {
            binding,
            visibility: ::wgpu::ShaderStages::FRAGMENT,
            ty: ::wgpu::BindingType::Texture {
                sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: ::wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }
    }

    const MESH_ATTRIBUTES: [::wgpu::VertexAttribute; 3] = [
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 12,
            shader_location: 1,
        },
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x2,
            offset: 24,
            shader_location: 2,
        },
    ];

    const LINE_ATTRIBUTES: [::wgpu::VertexAttribute; 1] = [::wgpu::VertexAttribute {
        format: ::wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    }];

    const STAR_ATTRIBUTES: [::wgpu::VertexAttribute; 2] = [
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32,
            offset: 12,
            shader_location: 1,
        },
    ];

    fn blend_state(blend: Blend) -> ::wgpu::BlendState {
        match blend {
            Blend::Opaque => ::wgpu::BlendState::REPLACE,
            Blend::Alpha => ::wgpu::BlendState::ALPHA_BLENDING,
            Blend::Additive => {
                let component = ::wgpu::BlendComponent {
                    src_factor: ::wgpu::BlendFactor::SrcAlpha,
                    dst_factor: ::wgpu::BlendFactor::One,
                    operation: ::wgpu::BlendOperation::Add,
                };
                ::wgpu::BlendState {
                    color: component,
                    alpha: component,
                }
            }
        }
    }

    fn cull_mode(side: Side) -> Option<::wgpu::Face> {
        match side {
            Side::Front => Some(::wgpu::Face::Back),
            Side::Back => Some(::wgpu::Face::Front),
            Side::Double => None,
        }
    }

    impl Gpu {
        async fn from_canvas(canvas_elem: web_sys::HtmlCanvasElement) -> Result<Self, PipelineError> {
            let width = canvas_elem.width();
            let height = canvas_elem.height();

            // The surface must not outlive its instance; the instance lives
            // for the rest of the page.
            let instance: &'static ::wgpu::Instance = Box::leak(Box::new(
                ::wgpu::Instance::new(&::wgpu::InstanceDescriptor {
                    backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                    ..Default::default()
                }),
            ));

            let surface = instance
                .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
                .map_err(|e| backend("surface error", e))?;

            let adapter = instance
                .request_adapter(&::wgpu::RequestAdapterOptions {
                    power_preference: ::wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .map_err(|e| backend("adapter error", e))?;

            let (device, queue) = adapter
                .request_device(&::wgpu::DeviceDescriptor {
                    label: Some("aurora-wgpu-device"),
                    required_features: ::wgpu::Features::empty(),
                    required_limits: ::wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    ..Default::default()
                })
                .await
                .map_err(|e| backend("device error", e))?;

            // Shaders write final colors; keep them out of sRGB encoding.
            let surface_caps = surface.get_capabilities(&adapter);
            let format = surface_caps
                .formats
                .iter()
                .copied()
                .find(|f| !f.is_srgb())
                .or_else(|| surface_caps.formats.first().copied())
                .ok_or_else(|| backend("surface error", "no supported formats"))?;
            let alpha_mode = surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

            let config = ::wgpu::SurfaceConfiguration {
                usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: width.max(1),
                height: height.max(1),
                desired_maximum_frame_latency: 2,
                present_mode: ::wgpu::PresentMode::Fifo,
                alpha_mode,
                view_formats: vec![],
            };
            surface.configure(&device, &config);
            let depth_view = create_depth_view(&device, &config);

            let shaders = ShaderProgram::ALL
                .into_iter()
                .map(|program| {
                    let module = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
                        label: Some(program.label()),
                        source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(program.source())),
                    });
                    (program, module)
                })
                .collect();

            let frame_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("aurora-frame-bgl"),
                entries: &[uniform_entry(0, false), uniform_entry(1, true)],
            });
            let surface_layout =
                device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                    label: Some("aurora-surface-bgl"),
                    entries: &[
                        texture_entry(0),
                        texture_entry(1),
                        texture_entry(2),
                        ::wgpu::BindGroupLayoutEntry {
                            binding: 3,
                            visibility: ::wgpu::ShaderStages::FRAGMENT,
                            ty: ::wgpu::BindingType::Sampler(::wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

            let plain_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                label: Some("aurora-plain-layout"),
                bind_group_layouts: &[&frame_layout],
                immediate_size: 0,
            });
            let textured_layout =
                device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                    label: Some("aurora-textured-layout"),
                    bind_group_layouts: &[&frame_layout, &surface_layout],
                    immediate_size: 0,
                });

            let globals_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
                label: Some("aurora-globals"),
                size: std::mem::size_of::<FrameGlobals>() as u64,
                usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let draw_buffer = create_draw_buffer(&device, INITIAL_DRAW_SLOTS);
            let frame_bind_group =
                create_frame_bind_group(&device, &frame_layout, &globals_buffer, &draw_buffer);

            let sampler = device.create_sampler(&::wgpu::SamplerDescriptor {
                label: Some("aurora-surface-sampler"),
                address_mode_u: ::wgpu::AddressMode::Repeat,
                address_mode_v: ::wgpu::AddressMode::ClampToEdge,
                mag_filter: ::wgpu::FilterMode::Linear,
                min_filter: ::wgpu::FilterMode::Linear,
                ..Default::default()
            });

            let point_scale = web_sys::window()
                .map(|w| w.device_pixel_ratio() as f32)
                .unwrap_or(1.0);

            Ok(Self {
                _instance: instance,
                surface,
                device,
                queue,
                config,
                _canvas: canvas_elem,
                depth_view,
                shaders,
                frame_layout,
                surface_layout,
                plain_layout,
                textured_layout,
                globals_buffer,
                draw_buffer,
                draw_slots: INITIAL_DRAW_SLOTS,
                frame_bind_group,
                sampler,
                maps: SurfaceMaps {
                    _textures: Vec::new(),
                    views: [None, None, None],
                    bind_group: None,
                },
                pipelines: HashMap::new(),
                meshes: HashMap::new(),
                lines: HashMap::new(),
                stars: HashMap::new(),
                point_scale,
            })
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.config.width = width.max(1);
            self.config.height = height.max(1);
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }

        fn upload(&mut self, slot: TextureSlot, texture: &EquirectTexture) {
            let max_dim = self.device.limits().max_texture_dimension_2d;
            let texture = texture.fit_within(max_dim);
            let size = ::wgpu::Extent3d {
                width: texture.width(),
                height: texture.height(),
                depth_or_array_layers: 1,
            };
            let gpu_texture = self.device.create_texture(&::wgpu::TextureDescriptor {
                label: Some("aurora-surface-map"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: ::wgpu::TextureDimension::D2,
                format: ::wgpu::TextureFormat::Rgba8Unorm,
                usage: ::wgpu::TextureUsages::TEXTURE_BINDING | ::wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            self.queue.write_texture(
                ::wgpu::TexelCopyTextureInfo {
                    texture: &gpu_texture,
                    mip_level: 0,
                    origin: ::wgpu::Origin3d::ZERO,
                    aspect: ::wgpu::TextureAspect::All,
                },
                texture.rgba8(),
                ::wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * texture.width()),
                    rows_per_image: Some(texture.height()),
                },
                size,
            );
            self.maps.views[slot.index()] =
                Some(gpu_texture.create_view(&::wgpu::TextureViewDescriptor::default()));
            self.maps._textures.push(gpu_texture);
            debug!(?slot, width = size.width, height = size.height, "surface map uploaded");

            if let [Some(day), Some(water), Some(night)] = &self.maps.views {
                self.maps.bind_group =
                    Some(self.device.create_bind_group(&::wgpu::BindGroupDescriptor {
                        label: Some("aurora-surface-bg"),
                        layout: &self.surface_layout,
                        entries: &[
                            ::wgpu::BindGroupEntry {
                                binding: 0,
                                resource: ::wgpu::BindingResource::TextureView(day),
                            },
                            ::wgpu::BindGroupEntry {
                                binding: 1,
                                resource: ::wgpu::BindingResource::TextureView(water),
                            },
                            ::wgpu::BindGroupEntry {
                                binding: 2,
                                resource: ::wgpu::BindingResource::TextureView(night),
                            },
                            ::wgpu::BindGroupEntry {
                                binding: 3,
                                resource: ::wgpu::BindingResource::Sampler(&self.sampler),
                            },
                        ],
                    }));
            }
        }

        fn ensure_draw_slots(&mut self, needed: u64) {
            if needed <= self.draw_slots {
                return;
            }
            self.draw_slots = needed.next_power_of_two();
            self.draw_buffer = create_draw_buffer(&self.device, self.draw_slots);
            self.frame_bind_group = create_frame_bind_group(
                &self.device,
                &self.frame_layout,
                &self.globals_buffer,
                &self.draw_buffer,
            );
        }

        fn ensure_pipeline(&mut self, key: PipelineKey) -> Result<(), PipelineError> {
            if self.pipelines.contains_key(&key) {
                return Ok(());
            }
            let module = self
                .shaders
                .get(&key.program)
                .ok_or_else(|| backend("shader missing", key.program.label()))?;
            let (layout, topology, buffers) = match key.program {
                ShaderProgram::Lines => (
                    &self.plain_layout,
                    ::wgpu::PrimitiveTopology::LineList,
                    ::wgpu::VertexBufferLayout {
                        array_stride: 12,
                        step_mode: ::wgpu::VertexStepMode::Vertex,
                        attributes: &LINE_ATTRIBUTES,
                    },
                ),
                ShaderProgram::Stars => (
                    &self.plain_layout,
                    ::wgpu::PrimitiveTopology::TriangleList,
                    ::wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<StarInstance>() as ::wgpu::BufferAddress,
                        step_mode: ::wgpu::VertexStepMode::Instance,
                        attributes: &STAR_ATTRIBUTES,
                    },
                ),
                program => (
                    if program.uses_surface_textures() {
                        &self.textured_layout
                    } else {
                        &self.plain_layout
                    },
                    ::wgpu::PrimitiveTopology::TriangleList,
                    ::wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as ::wgpu::BufferAddress,
                        step_mode: ::wgpu::VertexStepMode::Vertex,
                        attributes: &MESH_ATTRIBUTES,
                    },
                ),
            };

            let pipeline = self
                .device
                .create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
                    label: Some(key.program.label()),
                    layout: Some(layout),
                    vertex: ::wgpu::VertexState {
                        module,
                        entry_point: Some(key.program.vertex_entry()),
                        compilation_options: Default::default(),
                        buffers: &[buffers],
                    },
                    fragment: Some(::wgpu::FragmentState {
                        module,
                        entry_point: Some(key.program.fragment_entry()),
                        compilation_options: Default::default(),
                        targets: &[Some(::wgpu::ColorTargetState {
                            format: self.config.format,
                            blend: Some(blend_state(key.blend)),
                            write_mask: ::wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: ::wgpu::PrimitiveState {
                        topology,
                        strip_index_format: None,
                        front_face: ::wgpu::FrontFace::Ccw,
                        cull_mode: cull_mode(key.side),
                        polygon_mode: ::wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: Some(::wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: key.depth_write,
                        depth_compare: ::wgpu::CompareFunction::LessEqual,
                        stencil: ::wgpu::StencilState::default(),
                        bias: ::wgpu::DepthBiasState::default(),
                    }),
                    multisample: ::wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                });
            debug!(program = key.program.label(), blend = ?key.blend, "render pipeline created");
            self.pipelines.insert(key, pipeline);
            Ok(())
        }

        fn ensure_mesh(&mut self, geometry: &Geometry) -> MeshKey {
            let key = MeshKey::from(geometry);
            if !self.meshes.contains_key(&key) {
                let data = tessellate(geometry);
                let vertices = self.device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                    label: Some("aurora-mesh-vertices"),
                    contents: bytemuck::cast_slice(&data.vertices),
                    usage: ::wgpu::BufferUsages::VERTEX,
                });
                let indices = self.device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                    label: Some("aurora-mesh-indices"),
                    contents: bytemuck::cast_slice(&data.indices),
                    usage: ::wgpu::BufferUsages::INDEX,
                });
                self.meshes.insert(
                    key,
                    GpuMesh {
                        vertices,
                        indices,
                        index_count: data.indices.len() as u32,
                    },
                );
            }
            key
        }

        /// Segment buffers never change once attached, so one upload per node.
        fn ensure_lines(&mut self, node: NodeId, segments: &SegmentBuffer) {
            if self.lines.contains_key(&node) {
                return;
            }
            let vertices = segments.vertices_f32();
            let buffer = self.device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("aurora-line-vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            self.lines.insert(
                node,
                GpuBuffer {
                    buffer,
                    count: segments.vertex_count() as u32,
                },
            );
        }

        fn ensure_stars(&mut self, node: NodeId, starfield: &Starfield) {
            if self.stars.contains_key(&node) {
                return;
            }
            let instances = star_instances(starfield);
            let buffer = self.device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("aurora-star-instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            self.stars.insert(
                node,
                GpuBuffer {
                    buffer,
                    count: instances.len() as u32,
                },
            );
        }

        fn render(&mut self, frame: &RenderFrame<'_>, block: &UniformBlock) -> Result<(), PipelineError> {
            let globals = FrameGlobals::new(block, &frame.lights);
            self.queue
                .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

            let commands = &frame.commands;
            self.ensure_draw_slots(commands.len() as u64);
            let stride = DRAW_UNIFORM_STRIDE as usize;
            let mut slots = vec![0u8; commands.len() * stride];
            let mut plan = Vec::with_capacity(commands.len());
            for (i, command) in commands.iter().enumerate() {
                let uniform = DrawUniform::new(command, self.point_scale);
                let bytes = bytemuck::bytes_of(&uniform);
                slots[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);

                let material = command.material;
                let key = PipelineKey {
                    program: ShaderProgram::for_draw(command),
                    blend: material.blend,
                    side: material.side,
                    depth_write: material.depth_write,
                };
                self.ensure_pipeline(key)?;
                let geom = match &command.kind {
                    DrawKind::Mesh(geometry) => Geom::Mesh(self.ensure_mesh(geometry)),
                    DrawKind::Lines(segments) => {
                        self.ensure_lines(command.node, segments);
                        Geom::Lines(command.node)
                    }
                    DrawKind::Points(starfield) => {
                        self.ensure_stars(command.node, starfield);
                        Geom::Stars(command.node)
                    }
                };
                plan.push((key, geom, (i * stride) as u32));
            }
            if !slots.is_empty() {
                self.queue.write_buffer(&self.draw_buffer, 0, &slots);
            }
            self.lines
                .retain(|id, _| commands.iter().any(|c| c.node == *id));

            let surface_texture = self
                .surface
                .get_current_texture()
                .map_err(|e| backend("surface acquire failed", e))?;
            let view = surface_texture
                .texture
                .create_view(&::wgpu::TextureViewDescriptor::default());
            let mut encoder = self
                .device
                .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                    label: Some("aurora-frame-encoder"),
                });

            {
                let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                    label: Some("aurora-scene-pass"),
                    color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        depth_slice: None,
                        ops: ::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(::wgpu::Color::BLACK),
                            store: ::wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(1.0),
                            store: ::wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                    multiview_mask: None,
                });

                for (key, geom, offset) in &plan {
                    let Some(pipeline) = self.pipelines.get(key) else {
                        continue;
                    };
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(0, &self.frame_bind_group, &[*offset]);
                    if key.program.uses_surface_textures() {
                        let Some(maps) = &self.maps.bind_group else {
                            continue;
                        };
                        rpass.set_bind_group(1, maps, &[]);
                    }
                    match geom {
                        Geom::Mesh(mesh_key) => {
                            let Some(mesh) = self.meshes.get(mesh_key) else {
                                continue;
                            };
                            rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                            rpass.set_index_buffer(mesh.indices.slice(..), ::wgpu::IndexFormat::Uint32);
                            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
                        }
                        Geom::Lines(node) => {
                            let Some(lines) = self.lines.get(node) else {
                                continue;
                            };
                            rpass.set_vertex_buffer(0, lines.buffer.slice(..));
                            rpass.draw(0..lines.count, 0..1);
                        }
                        Geom::Stars(node) => {
                            let Some(stars) = self.stars.get(node) else {
                                continue;
                            };
                            rpass.set_vertex_buffer(0, stars.buffer.slice(..));
                            rpass.draw(0..6, 0..stars.count);
                        }
                    }
                }
            }

            self.queue.submit(std::iter::once(encoder.finish()));
            surface_texture.present();
            Ok(())
        }
    }

    /// [`RenderPipeline`] backed by wgpu on a page canvas.
    #[derive(Debug)]
    pub struct WgpuPipeline {
        uniforms: UniformBlock,
        gpu: Option<Gpu>,
    }

    impl WgpuPipeline {
        pub async fn from_canvas_id(canvas_id: &str) -> Result<Self, PipelineError> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| backend("page error", "document missing"))?;
            let canvas = document
                .get_element_by_id(canvas_id)
                .ok_or_else(|| backend("page error", format!("canvas #{canvas_id} missing")))?
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .map_err(|_| backend("page error", format!("#{canvas_id} is not a canvas")))?;
            Ok(Self {
                uniforms: UniformBlock::default(),
                gpu: Some(Gpu::from_canvas(canvas).await?),
            })
        }

        /// Drawing buffer size in pixels.
        pub fn size(&self) -> (u32, u32) {
            self.gpu
                .as_ref()
                .map_or((1, 1), |gpu| (gpu.config.width, gpu.config.height))
        }

        pub fn resize(&mut self, width: u32, height: u32) {
            if let Some(gpu) = self.gpu.as_mut() {
                gpu.resize(width, height);
            }
        }

        fn gpu_mut(&mut self) -> Result<&mut Gpu, PipelineError> {
            self.gpu.as_mut().ok_or(PipelineError::Disposed)
        }
    }

    impl RenderPipeline for WgpuPipeline {
        fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) -> Result<(), PipelineError> {
            if self.gpu.is_none() {
                return Err(PipelineError::Disposed);
            }
            self.uniforms.set(uniform, value)
        }

        fn upload_texture(
            &mut self,
            slot: TextureSlot,
            texture: &EquirectTexture,
        ) -> Result<(), PipelineError> {
            self.gpu_mut()?.upload(slot, texture);
            Ok(())
        }

        fn submit_frame(&mut self, frame: &RenderFrame<'_>) -> Result<(), PipelineError> {
            let block = self.uniforms;
            let gpu = self.gpu_mut()?;
            if let Some(slot) = TextureSlot::ALL
                .into_iter()
                .find(|slot| gpu.maps.views[slot.index()].is_none())
            {
                return Err(PipelineError::MissingTexture(slot));
            }
            gpu.render(frame, &block)
        }

        fn dispose(&mut self) {
            if self.gpu.take().is_some() {
                debug!("wgpu resources released");
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use formats::texture::EquirectTexture;
    use gpu::pipeline::{PipelineError, RenderPipeline};
    use gpu::renderer::RenderFrame;
    use gpu::uniforms::{TextureSlot, Uniform, UniformValue};

    fn unsupported() -> PipelineError {
        PipelineError::Backend("wgpu rendering is only available on wasm32 targets".to_string())
    }

    #[derive(Debug, Default)]
    pub struct WgpuPipeline;

    impl WgpuPipeline {
        pub async fn from_canvas_id(_canvas_id: &str) -> Result<Self, PipelineError> {
            Err(unsupported())
        }

        pub fn size(&self) -> (u32, u32) {
            (1, 1)
        }

        pub fn resize(&mut self, _width: u32, _height: u32) {}
    }

    impl RenderPipeline for WgpuPipeline {
        fn set_uniform(&mut self, _uniform: Uniform, _value: UniformValue) -> Result<(), PipelineError> {
            Err(unsupported())
        }

        fn upload_texture(
            &mut self,
            _slot: TextureSlot,
            _texture: &EquirectTexture,
        ) -> Result<(), PipelineError> {
            Err(unsupported())
        }

        fn submit_frame(&mut self, _frame: &RenderFrame<'_>) -> Result<(), PipelineError> {
            Err(unsupported())
        }

        fn dispose(&mut self) {}
    }
}

pub use imp::WgpuPipeline;
