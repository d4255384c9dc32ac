//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::scene::{LoadedSprites, Scene, SpriteImage, TextureSlot};
use super::vertex::{Vertex, colors};

/// Map a playfield point (pixels, y down) to normalized device coordinates,
/// letterboxed to keep the playfield aspect inside the viewport.
pub fn playfield_to_ndc(point: [f32; 2], playfield: (f32, f32), viewport: (f32, f32)) -> [f32; 2] {
    let (pw, ph) = (playfield.0.max(1.0), playfield.1.max(1.0));
    let (vw, vh) = (viewport.0.max(1.0), viewport.1.max(1.0));
    let scale = (vw / pw).min(vh / ph);
    let x = (point[0] - pw * 0.5) * scale / (vw * 0.5);
    let y = -(point[1] - ph * 0.5) * scale / (vh * 0.5);
    [x, y]
}

/// GPU copy of one sprite image
struct SpriteTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: SpriteTexture,
    player: Option<SpriteTexture>,
    obstacle: Option<SpriteTexture>,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("skyhop-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
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

        let white = create_sprite_texture(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            "white_texture",
            &[255, 255, 255, 255],
            1,
            1,
        );

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            texture_layout,
            sampler,
            white,
            player: None,
            obstacle: None,
            size: (width, height),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload (or clear with `None`) the image for a sprite slot
    pub fn set_sprite(&mut self, slot: TextureSlot, image: Option<&SpriteImage>) {
        let texture = image.map(|image| {
            create_sprite_texture(
                &self.device,
                &self.queue,
                &self.texture_layout,
                &self.sampler,
                "sprite_texture",
                &image.rgba,
                image.width,
                image.height,
            )
        });
        match slot {
            TextureSlot::Player => self.player = texture,
            TextureSlot::Obstacle => self.obstacle = texture,
            TextureSlot::White => log::warn!("The white texture cannot be replaced"),
        }
    }

    pub fn loaded_sprites(&self) -> LoadedSprites {
        LoadedSprites {
            player: self.player.is_some(),
            obstacle: self.obstacle.is_some(),
        }
    }

    fn bind_group(&self, slot: TextureSlot) -> &wgpu::BindGroup {
        let texture = match slot {
            TextureSlot::White => None,
            TextureSlot::Player => self.player.as_ref(),
            TextureSlot::Obstacle => self.obstacle.as_ref(),
        };
        &texture.unwrap_or(&self.white).bind_group
    }

    /// Upload the scene and render
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let playfield = (scene.width, scene.height);
        let viewport = (self.size.0 as f32, self.size.1 as f32);

        // Convert vertices to NDC, remembering each batch's range
        let mut ndc_vertices = Vec::with_capacity(scene.vertex_count());
        let mut ranges = Vec::with_capacity(scene.batches.len());
        for batch in &scene.batches {
            let start = ndc_vertices.len() as u32;
            ndc_vertices.extend(batch.vertices.iter().map(|v| Vertex {
                position: playfield_to_ndc(v.position, playfield, viewport),
                ..*v
            }));
            ranges.push((batch.texture, start..ndc_vertices.len() as u32));
        }

        let vertex_buffer = (!ndc_vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for (slot, range) in ranges {
                    render_pass.set_bind_group(0, self.bind_group(slot), &[]);
                    render_pass.draw(range, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn create_sprite_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    rgba: &[u8],
    width: u32,
    height: u32,
) -> SpriteTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    SpriteTexture {
        _texture: texture,
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners_fill_matching_viewport() {
        let playfield = (800.0, 600.0);
        let viewport = (1600.0, 1200.0);
        assert_eq!(playfield_to_ndc([0.0, 0.0], playfield, viewport), [-1.0, 1.0]);
        assert_eq!(playfield_to_ndc([800.0, 600.0], playfield, viewport), [1.0, -1.0]);
        assert_eq!(playfield_to_ndc([400.0, 300.0], playfield, viewport), [0.0, 0.0]);
    }

    #[test]
    fn test_ndc_letterboxes_wide_viewport() {
        // Twice as wide as needed: playfield spans half the width
        let left = playfield_to_ndc([0.0, 0.0], (800.0, 600.0), (1600.0, 600.0));
        assert_eq!(left, [-0.5, 1.0]);
    }
}
