use bytemuck::{Pod, Zeroable};

/// Number of blur textures the bloom composite shader binds. The pipeline
/// may run fewer pyramid levels; unused slots get a zero factor.
pub const BLOOM_COMPOSITE_SLOTS: usize = 5;

/// FXAA parameters — bind group 0, binding 0 of the anti-alias pass.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct FxaaParams {
    /// Input texture size in physical pixels.
    pub resolution: [f32; 2],
    pub _pad0: f32,
    pub _pad1: f32,
}

/// Luminosity high-pass parameters. Pixels whose relative luminance falls
/// below `threshold` contribute zero; `smoothing` is the smoothstep width
/// above the threshold.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct LuminosityParams {
    pub threshold: f32,
    pub smoothing: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

/// Separable Gaussian blur parameters. `direction` is (1,0) for the
/// horizontal pass and (0,1) for the vertical pass; `kernel_radius` is the
/// per-level tap count and also the Gaussian sigma.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct BlurParams {
    /// Target size in pixels at this pyramid level.
    pub resolution: [f32; 2],
    pub direction: [f32; 2],
    pub kernel_radius: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

/// Bloom composite parameters — one blend factor per pyramid level, packed
/// into the x component of a vec4 (uniform array stride is 16 bytes).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct BloomCompositeParams {
    pub factors: [[f32; 4]; BLOOM_COMPOSITE_SLOTS],
}

/// Final composite parameters. The chromatic shift amount applied to the
/// bloom texture is `0.0002 + distortion`, growing with distance from the
/// viewport center. `tone_mapping` of 0 disables ACES.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CompositeParams {
    pub distortion: f32,
    pub tone_mapping: u32,
    pub _pad0: f32,
    pub _pad1: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    // WebGPU requires uniform buffer sizes to be what the WGSL side
    // declares; these pin the layouts against accidental field edits.

    #[test]
    fn uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<FxaaParams>(), 16);
        assert_eq!(std::mem::size_of::<LuminosityParams>(), 16);
        assert_eq!(std::mem::size_of::<BlurParams>(), 32);
        assert_eq!(std::mem::size_of::<BloomCompositeParams>(), 80);
        assert_eq!(std::mem::size_of::<CompositeParams>(), 16);
    }

    #[test]
    fn uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<FxaaParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<LuminosityParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<BlurParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<BloomCompositeParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<CompositeParams>() % 16, 0);
    }
}
