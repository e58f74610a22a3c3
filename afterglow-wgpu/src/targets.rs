//! Render target creation and the resizable target pool.
//! Scene target (with depth), anti-alias target, bright-pass target, and the
//! per-level horizontal/vertical blur chain.

use crate::error::RenderError;
use crate::pyramid::MAX_PYRAMID_LEVELS;

/// HDR color format used by every intermediate target.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Depth format for the scene target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A single color texture render target.
pub struct RenderTarget {
    pub color_texture: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Full-resolution scene target: HDR color plus a depth attachment.
pub struct SceneTarget {
    pub color_texture: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Create a single HDR render target.
pub fn create_hdr_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    label: &str,
) -> RenderTarget {
    create_render_target(device, width, height, label, HDR_FORMAT)
}

/// Create a render target with a specific format.
pub fn create_render_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    label: &str,
    format: wgpu::TextureFormat,
) -> RenderTarget {
    let color_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

    RenderTarget {
        color_texture,
        color_view,
        width,
        height,
    }
}

/// Create the scene target with its depth attachment.
pub fn create_scene_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    label: &str,
) -> SceneTarget {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let color_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("{label} Depth")),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

    SceneTarget {
        color_texture,
        color_view,
        depth_texture,
        depth_view,
        width,
        height,
    }
}

// ============================================================
// Viewport and size planning
// ============================================================

/// Logical viewport dimensions plus the display scaling factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Physical pixel extent: logical size times DPR, rounded to the
    /// nearest pixel, never below 1x1.
    pub fn full_extent(&self) -> (u32, u32) {
        let dpr = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        let w = (self.width.max(0.0) * dpr).round() as u32;
        let h = (self.height.max(0.0) * dpr).round() as u32;
        (w.max(1), h.max(1))
    }
}

/// Largest power of two less than or equal to `v`.
pub fn floor_pow2(v: u32) -> u32 {
    if v == 0 {
        return 0;
    }
    1 << (31 - v.leading_zeros())
}

/// Computed target sizes for one viewport. Pure data, so the sizing rules
/// are testable without a GPU device.
#[derive(Clone, Debug, PartialEq)]
pub struct SizePlan {
    /// Full-resolution extent for the scene and anti-alias targets.
    pub full: (u32, u32),
    /// Extent of the bright-pass target and the first pyramid level.
    pub bright: (u32, u32),
    /// Extent per blur level, halving from `bright`, never below 1x1.
    pub levels: Vec<(u32, u32)>,
}

impl SizePlan {
    pub fn for_viewport(viewport: Viewport, num_levels: usize) -> Self {
        let full = viewport.full_extent();

        // Snap to powers of two so the halved chain divides evenly, then
        // take half resolution for the bright pass.
        let bright_w = (floor_pow2(full.0) / 2).max(1);
        let bright_h = (floor_pow2(full.1) / 2).max(1);
        let bright = (bright_w, bright_h);

        let mut levels = Vec::with_capacity(num_levels);
        let (mut w, mut h) = bright;
        for _ in 0..num_levels {
            levels.push((w, h));
            w = (w / 2).max(1);
            h = (h / 2).max(1);
        }

        Self {
            full,
            bright,
            levels,
        }
    }
}

// ============================================================
// Target pool
// ============================================================

/// All render targets the post-processing chain draws into, reallocated
/// together when the viewport changes.
pub struct TargetPool {
    /// Scene target: the only target with a depth attachment.
    pub scene: SceneTarget,
    /// Anti-alias output, also the scene input to the final composite.
    pub post: RenderTarget,
    /// Luminosity high-pass output.
    pub bright: RenderTarget,
    /// Horizontal blur targets, one per pyramid level.
    pub horizontal: Vec<RenderTarget>,
    /// Vertical blur targets, one per pyramid level.
    pub vertical: Vec<RenderTarget>,
    viewport: Option<Viewport>,
    num_levels: usize,
}

impl TargetPool {
    /// Allocate 1x1 placeholders. Callers resize before the first frame.
    pub fn new(device: &wgpu::Device, num_levels: usize) -> Self {
        let num_levels = num_levels.clamp(1, MAX_PYRAMID_LEVELS);
        let mut pool = Self {
            scene: create_scene_target(device, 1, 1, "Scene Target"),
            post: create_hdr_target(device, 1, 1, "Post Target"),
            bright: create_hdr_target(device, 1, 1, "Bright Target"),
            horizontal: Vec::new(),
            vertical: Vec::new(),
            num_levels,
            viewport: None,
        };
        for i in 0..num_levels {
            pool.horizontal
                .push(create_hdr_target(device, 1, 1, &format!("Blur H {i}")));
            pool.vertical
                .push(create_hdr_target(device, 1, 1, &format!("Blur V {i}")));
        }
        pool
    }

    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    /// The bloom composite reuses the level-0 horizontal target as its
    /// output; every horizontal pass has finished reading by then.
    pub fn bloom_scratch(&self) -> &RenderTarget {
        &self.horizontal[0]
    }

    /// Reallocate every target for a new viewport. Returns `Ok(false)`
    /// without touching the GPU when the viewport is unchanged.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        viewport: Viewport,
    ) -> Result<bool, RenderError> {
        if self.viewport == Some(viewport) {
            return Ok(false);
        }

        let plan = SizePlan::for_viewport(viewport, self.num_levels);

        // Texture allocation fails through the device error scope rather
        // than a return value.
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let (fw, fh) = plan.full;
        let scene = create_scene_target(device, fw, fh, "Scene Target");
        let post = create_hdr_target(device, fw, fh, "Post Target");
        let (bw, bh) = plan.bright;
        let bright = create_hdr_target(device, bw, bh, "Bright Target");

        let mut horizontal = Vec::with_capacity(self.num_levels);
        let mut vertical = Vec::with_capacity(self.num_levels);
        for (i, &(w, h)) in plan.levels.iter().enumerate() {
            horizontal.push(create_hdr_target(device, w, h, &format!("Blur H {i}")));
            vertical.push(create_hdr_target(device, w, h, &format!("Blur V {i}")));
        }

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Allocation(error.to_string()));
        }

        self.scene = scene;
        self.post = post;
        self.bright = bright;
        self.horizontal = horizontal;
        self.vertical = vertical;
        self.viewport = Some(viewport);

        log::info!(
            "render targets resized: full {}x{}, bright {}x{}, {} blur levels",
            fw,
            fh,
            bw,
            bh,
            self.num_levels
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_pow2_snaps_down() {
        assert_eq!(floor_pow2(0), 0);
        assert_eq!(floor_pow2(1), 1);
        assert_eq!(floor_pow2(2), 2);
        assert_eq!(floor_pow2(3), 2);
        assert_eq!(floor_pow2(1023), 512);
        assert_eq!(floor_pow2(1024), 1024);
        assert_eq!(floor_pow2(1025), 1024);
    }

    #[test]
    fn full_extent_applies_dpr_with_rounding() {
        let v = Viewport::new(800.0, 600.0, 1.5);
        assert_eq!(v.full_extent(), (1200, 900));

        // 1279.5 rounds up.
        let v = Viewport::new(853.0, 480.0, 1.5);
        assert_eq!(v.full_extent(), (1280, 720));
    }

    #[test]
    fn full_extent_never_collapses_to_zero() {
        assert_eq!(Viewport::new(0.0, 0.0, 2.0).full_extent(), (1, 1));
        assert_eq!(Viewport::new(-10.0, 5.0, 1.0).full_extent(), (1, 5));
        assert_eq!(Viewport::new(100.0, 100.0, 0.0).full_extent(), (100, 100));
        assert_eq!(
            Viewport::new(100.0, 100.0, f32::NAN).full_extent(),
            (100, 100)
        );
    }

    #[test]
    fn size_plan_halves_power_of_two_base() {
        let plan = SizePlan::for_viewport(Viewport::new(1024.0, 768.0, 1.0), 5);
        assert_eq!(plan.full, (1024, 768));
        assert_eq!(plan.bright, (512, 256));
        assert_eq!(
            plan.levels,
            vec![(512, 256), (256, 128), (128, 64), (64, 32), (32, 16)]
        );
    }

    #[test]
    fn size_plan_levels_clamp_at_one_pixel() {
        let plan = SizePlan::for_viewport(Viewport::new(16.0, 4.0, 1.0), 5);
        assert_eq!(plan.bright, (8, 2));
        assert_eq!(plan.levels, vec![(8, 2), (4, 1), (2, 1), (1, 1), (1, 1)]);
    }

    #[test]
    fn size_plan_respects_level_count() {
        let plan = SizePlan::for_viewport(Viewport::new(1024.0, 1024.0, 1.0), 3);
        assert_eq!(plan.levels, vec![(512, 512), (256, 256), (128, 128)]);
    }

    #[test]
    fn size_plan_is_deterministic() {
        let v = Viewport::new(1920.0, 1080.0, 2.0);
        assert_eq!(SizePlan::for_viewport(v, 5), SizePlan::for_viewport(v, 5));
    }

    #[test]
    fn size_plan_levels_never_increase() {
        let plan = SizePlan::for_viewport(Viewport::new(1920.0, 1080.0, 1.25), 5);
        for pair in plan.levels.windows(2) {
            assert!(pair[1].0 <= pair[0].0);
            assert!(pair[1].1 <= pair[0].1);
        }
    }
}
