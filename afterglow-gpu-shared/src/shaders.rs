/// Embedded WGSL shader source strings for the post-processing chain.
/// All fragment stages pair with [`FULLSCREEN_VERT`] and sample explicit
/// LOD 0 so no pass depends on mip selection or derivatives.

pub const FULLSCREEN_VERT: &str = include_str!("../shaders/fullscreen.wgsl");
pub const FXAA_FRAG: &str = include_str!("../shaders/fxaa.wgsl");
pub const LUMINOSITY_FRAG: &str = include_str!("../shaders/luminosity.wgsl");
pub const BLUR_FRAG: &str = include_str!("../shaders/blur.wgsl");
pub const BLOOM_COMPOSITE_FRAG: &str = include_str!("../shaders/bloom_composite.wgsl");
pub const COMPOSITE_FRAG: &str = include_str!("../shaders/composite.wgsl");
pub const BLIT_FRAG: &str = include_str!("../shaders/blit.wgsl");

/// All embedded shaders with display names, for validation tooling.
pub const ALL: &[(&str, &str)] = &[
    ("fullscreen", FULLSCREEN_VERT),
    ("fxaa", FXAA_FRAG),
    ("luminosity", LUMINOSITY_FRAG),
    ("blur", BLUR_FRAG),
    ("bloom_composite", BLOOM_COMPOSITE_FRAG),
    ("composite", COMPOSITE_FRAG),
    ("blit", BLIT_FRAG),
];
