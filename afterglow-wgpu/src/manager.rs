//! Frame orchestration for the post-processing chain.
//!
//! Pass order per frame: scene into the depth-backed scene target, FXAA
//! into the post target, luminosity high-pass into the bright target,
//! then per pyramid level a horizontal and a vertical Gaussian blur, the
//! weighted bloom composite, and the final chromatic composite into the
//! caller's output view. With post-processing disabled the scene target
//! is blitted to the output through the same tone mapping.

use afterglow_gpu_shared::shaders;
use afterglow_gpu_shared::uniforms::{
    BloomCompositeParams, BlurParams, CompositeParams, FxaaParams, LuminosityParams,
    BLOOM_COMPOSITE_SLOTS,
};

use crate::error::RenderError;
use crate::passes::render_fullscreen_effect;
use crate::pipeline::{
    create_blit_bind_group_layout, create_effect_bind_group_layout,
    create_fullscreen_effect_pipeline,
};
use crate::pyramid::{BloomPyramid, KERNEL_SIZES, MAX_PYRAMID_LEVELS};
use crate::scene::{Camera, FrameClock, SceneRenderer};
use crate::settings::PostSettings;
use crate::targets::{TargetPool, Viewport, HDR_FORMAT};

/// Smoothstep width above the luminosity threshold.
const LUMINOSITY_SMOOTHING: f32 = 1.0;

/// Owns the post-processing pipelines, uniform buffers, and render
/// targets, and records the full pass chain each frame.
pub struct RenderManager {
    output_format: wgpu::TextureFormat,
    sampler: wgpu::Sampler,

    single_input_bgl: wgpu::BindGroupLayout,
    dual_input_bgl: wgpu::BindGroupLayout,
    bloom_bgl: wgpu::BindGroupLayout,
    blit_bgl: wgpu::BindGroupLayout,

    fxaa_pipeline: wgpu::RenderPipeline,
    luminosity_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    bloom_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,

    fxaa_buffer: wgpu::Buffer,
    luminosity_buffer: wgpu::Buffer,
    /// Per level: [horizontal, vertical] blur params, written at resize.
    blur_buffers: Vec<[wgpu::Buffer; 2]>,
    factors_buffer: wgpu::Buffer,
    composite_buffer: wgpu::Buffer,

    targets: TargetPool,
    pyramid: BloomPyramid,
    settings: PostSettings,
    settings_dirty: bool,
}

fn create_uniform_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl RenderManager {
    /// Create all pipelines and buffers for a pyramid of `pyramid_levels`
    /// blur levels (clamped to `1..=5`). Targets start as 1x1
    /// placeholders; call [`RenderManager::resize`] before the first frame.
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        pyramid_levels: usize,
    ) -> Self {
        let pyramid_levels = pyramid_levels.clamp(1, MAX_PYRAMID_LEVELS);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Effect Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let single_input_bgl = create_effect_bind_group_layout(device, "Effect BGL", 1);
        let dual_input_bgl = create_effect_bind_group_layout(device, "Composite BGL", 2);
        let bloom_bgl = create_effect_bind_group_layout(
            device,
            "Bloom Composite BGL",
            BLOOM_COMPOSITE_SLOTS as u32,
        );
        let blit_bgl = create_blit_bind_group_layout(device);

        let fxaa_pipeline = create_fullscreen_effect_pipeline(
            device,
            "FXAA Pipeline",
            shaders::FXAA_FRAG,
            &single_input_bgl,
            HDR_FORMAT,
        );
        let luminosity_pipeline = create_fullscreen_effect_pipeline(
            device,
            "Luminosity Pipeline",
            shaders::LUMINOSITY_FRAG,
            &single_input_bgl,
            HDR_FORMAT,
        );
        let blur_pipeline = create_fullscreen_effect_pipeline(
            device,
            "Blur Pipeline",
            shaders::BLUR_FRAG,
            &single_input_bgl,
            HDR_FORMAT,
        );
        let bloom_pipeline = create_fullscreen_effect_pipeline(
            device,
            "Bloom Composite Pipeline",
            shaders::BLOOM_COMPOSITE_FRAG,
            &bloom_bgl,
            HDR_FORMAT,
        );
        let composite_pipeline = create_fullscreen_effect_pipeline(
            device,
            "Composite Pipeline",
            shaders::COMPOSITE_FRAG,
            &dual_input_bgl,
            output_format,
        );
        let blit_pipeline = create_blit_pipeline(device, &blit_bgl, output_format);

        let fxaa_buffer = create_uniform_buffer(
            device,
            "FXAA Params",
            std::mem::size_of::<FxaaParams>() as u64,
        );
        let luminosity_buffer = create_uniform_buffer(
            device,
            "Luminosity Params",
            std::mem::size_of::<LuminosityParams>() as u64,
        );
        let blur_buffers = (0..pyramid_levels)
            .map(|i| {
                [
                    create_uniform_buffer(
                        device,
                        &format!("Blur H Params {i}"),
                        std::mem::size_of::<BlurParams>() as u64,
                    ),
                    create_uniform_buffer(
                        device,
                        &format!("Blur V Params {i}"),
                        std::mem::size_of::<BlurParams>() as u64,
                    ),
                ]
            })
            .collect();
        let factors_buffer = create_uniform_buffer(
            device,
            "Bloom Factors",
            std::mem::size_of::<BloomCompositeParams>() as u64,
        );
        let composite_buffer = create_uniform_buffer(
            device,
            "Composite Params",
            std::mem::size_of::<CompositeParams>() as u64,
        );

        let settings = PostSettings::default();
        let pyramid = BloomPyramid::new(
            pyramid_levels,
            settings.bloom_strength,
            settings.bloom_radius,
        );
        let targets = TargetPool::new(device, pyramid_levels);

        log::info!(
            "render manager initialized: output format {output_format:?}, {pyramid_levels} pyramid levels"
        );

        Self {
            output_format,
            sampler,
            single_input_bgl,
            dual_input_bgl,
            bloom_bgl,
            blit_bgl,
            fxaa_pipeline,
            luminosity_pipeline,
            blur_pipeline,
            bloom_pipeline,
            composite_pipeline,
            blit_pipeline,
            fxaa_buffer,
            luminosity_buffer,
            blur_buffers,
            factors_buffer,
            composite_buffer,
            targets,
            pyramid,
            settings,
            settings_dirty: true,
        }
    }

    pub fn output_format(&self) -> wgpu::TextureFormat {
        self.output_format
    }

    pub fn pyramid_levels(&self) -> usize {
        self.targets.num_levels()
    }

    pub fn settings(&self) -> PostSettings {
        self.settings
    }

    /// Replace all settings at once.
    pub fn set_settings(&mut self, settings: PostSettings) {
        let settings = settings.sanitized();
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        self.pyramid
            .set_strength(settings.bloom_strength);
        self.pyramid.set_radius(settings.bloom_radius);
        self.settings_dirty = true;
    }

    pub fn set_bloom(&mut self, strength: f32, radius: f32) {
        let mut s = self.settings;
        s.bloom_strength = strength;
        s.bloom_radius = radius;
        self.set_settings(s);
    }

    pub fn set_luminosity_threshold(&mut self, threshold: f32) {
        let mut s = self.settings;
        s.luminosity_threshold = threshold;
        self.set_settings(s);
    }

    pub fn set_distortion(&mut self, distortion: f32) {
        let mut s = self.settings;
        s.distortion = distortion;
        self.set_settings(s);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let mut s = self.settings;
        s.enabled = enabled;
        self.set_settings(s);
    }

    /// Reallocate targets and rewrite the per-level blur parameters for a
    /// new viewport. A no-op when the viewport is unchanged.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        viewport: Viewport,
    ) -> Result<bool, RenderError> {
        if !self.targets.resize(device, viewport)? {
            return Ok(false);
        }

        let scene = &self.targets.scene;
        queue.write_buffer(
            &self.fxaa_buffer,
            0,
            bytemuck::bytes_of(&FxaaParams {
                resolution: [scene.width as f32, scene.height as f32],
                _pad0: 0.0,
                _pad1: 0.0,
            }),
        );

        // Blur direction, resolution, and kernel radius are fixed per
        // level between resizes.
        for (i, buffers) in self.blur_buffers.iter().enumerate() {
            let level = &self.targets.horizontal[i];
            let resolution = [level.width as f32, level.height as f32];
            for (buffer, direction) in buffers.iter().zip([[1.0, 0.0], [0.0, 1.0]]) {
                queue.write_buffer(
                    buffer,
                    0,
                    bytemuck::bytes_of(&BlurParams {
                        resolution,
                        direction,
                        kernel_radius: KERNEL_SIZES[i],
                        _pad0: 0.0,
                        _pad1: 0.0,
                        _pad2: 0.0,
                    }),
                );
            }
        }

        Ok(true)
    }

    fn flush_settings(&mut self, queue: &wgpu::Queue) {
        if !self.settings_dirty {
            return;
        }
        queue.write_buffer(
            &self.luminosity_buffer,
            0,
            bytemuck::bytes_of(&LuminosityParams {
                threshold: self.settings.luminosity_threshold,
                smoothing: LUMINOSITY_SMOOTHING,
                _pad0: 0.0,
                _pad1: 0.0,
            }),
        );
        queue.write_buffer(
            &self.factors_buffer,
            0,
            bytemuck::bytes_of(&BloomCompositeParams {
                factors: self.pyramid.weight_vectors(),
            }),
        );
        queue.write_buffer(
            &self.composite_buffer,
            0,
            bytemuck::bytes_of(&CompositeParams {
                distortion: self.settings.distortion,
                tone_mapping: 1,
                _pad0: 0.0,
                _pad1: 0.0,
            }),
        );
        self.settings_dirty = false;
    }

    fn effect_bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
        textures: &[&wgpu::TextureView],
    ) -> wgpu::BindGroup {
        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }];
        for (i, view) in textures.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: 1 + i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            });
        }
        entries.push(wgpu::BindGroupEntry {
            binding: 1 + textures.len() as u32,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &entries,
        })
    }

    /// Record one full frame into `encoder`, ending in `output`.
    ///
    /// `output` must use the format the manager was created with.
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        scene: &mut dyn SceneRenderer,
        camera: &Camera,
        clock: &FrameClock,
        output: &wgpu::TextureView,
    ) {
        self.flush_settings(queue);

        scene.render(
            encoder,
            &self.targets.scene.color_view,
            &self.targets.scene.depth_view,
            camera,
            clock,
        );

        if !self.settings.enabled {
            self.blit(device, encoder, &self.targets.scene.color_view, output);
            return;
        }

        // Anti-alias the scene into the post target.
        let fxaa_bg = self.effect_bind_group(
            device,
            "FXAA BG",
            &self.single_input_bgl,
            &self.fxaa_buffer,
            &[&self.targets.scene.color_view],
        );
        render_fullscreen_effect(
            encoder,
            "FXAA Pass",
            &self.fxaa_pipeline,
            &fxaa_bg,
            &self.targets.post.color_view,
        );

        // Extract bright regions at half resolution.
        let luminosity_bg = self.effect_bind_group(
            device,
            "Luminosity BG",
            &self.single_input_bgl,
            &self.luminosity_buffer,
            &[&self.targets.post.color_view],
        );
        render_fullscreen_effect(
            encoder,
            "Luminosity Pass",
            &self.luminosity_pipeline,
            &luminosity_bg,
            &self.targets.bright.color_view,
        );

        // Separable blur per pyramid level. Each level blurs the previous
        // level's vertical output; level 0 blurs the bright target.
        for i in 0..self.targets.num_levels() {
            let input = if i == 0 {
                &self.targets.bright.color_view
            } else {
                &self.targets.vertical[i - 1].color_view
            };

            let h_bg = self.effect_bind_group(
                device,
                "Blur H BG",
                &self.single_input_bgl,
                &self.blur_buffers[i][0],
                &[input],
            );
            render_fullscreen_effect(
                encoder,
                "Blur H Pass",
                &self.blur_pipeline,
                &h_bg,
                &self.targets.horizontal[i].color_view,
            );

            let v_bg = self.effect_bind_group(
                device,
                "Blur V BG",
                &self.single_input_bgl,
                &self.blur_buffers[i][1],
                &[&self.targets.horizontal[i].color_view],
            );
            render_fullscreen_effect(
                encoder,
                "Blur V Pass",
                &self.blur_pipeline,
                &v_bg,
                &self.targets.vertical[i].color_view,
            );
        }

        // Weighted sum of the vertical blurs into the level-0 horizontal
        // target, which is free once the last level has blurred. Unused
        // slots bind the deepest level with a zero factor.
        let num_levels = self.targets.num_levels();
        let blur_views: Vec<&wgpu::TextureView> = (0..BLOOM_COMPOSITE_SLOTS)
            .map(|i| &self.targets.vertical[i.min(num_levels - 1)].color_view)
            .collect();
        let bloom_bg = self.effect_bind_group(
            device,
            "Bloom Composite BG",
            &self.bloom_bgl,
            &self.factors_buffer,
            &blur_views,
        );
        render_fullscreen_effect(
            encoder,
            "Bloom Composite Pass",
            &self.bloom_pipeline,
            &bloom_bg,
            &self.targets.bloom_scratch().color_view,
        );

        // Final composite: anti-aliased scene plus chromatically shifted
        // bloom, tone mapped into the output format.
        let composite_bg = self.effect_bind_group(
            device,
            "Composite BG",
            &self.dual_input_bgl,
            &self.composite_buffer,
            &[
                &self.targets.post.color_view,
                &self.targets.bloom_scratch().color_view,
            ],
        );
        render_fullscreen_effect(
            encoder,
            "Composite Pass",
            &self.composite_pipeline,
            &composite_bg,
            output,
        );
    }

    fn blit(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::TextureView,
        output: &wgpu::TextureView,
    ) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit BG"),
            layout: &self.blit_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        render_fullscreen_effect(
            encoder,
            "Blit Pass",
            &self.blit_pipeline,
            &bind_group,
            output,
        );
    }
}

fn create_blit_pipeline(
    device: &wgpu::Device,
    bgl: &wgpu::BindGroupLayout,
    output_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    create_fullscreen_effect_pipeline(device, "Blit Pipeline", shaders::BLIT_FRAG, bgl, output_format)
}
