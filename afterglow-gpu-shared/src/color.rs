//! CPU mirrors of the per-pixel color math in `shaders/`, kept in sync
//! with the WGSL so the threshold and tone-mapping behavior is testable
//! without a device.

/// Relative luminance weights used by the luminosity high-pass.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Relative luminance of a linear RGB triple.
pub fn relative_luminance(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_WEIGHTS[0] + rgb[1] * LUMA_WEIGHTS[1] + rgb[2] * LUMA_WEIGHTS[2]
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bright-pass contribution of a pixel: 0 at or below `threshold`,
/// ramping to 1 over `smoothing`. Mirrors `luminosity.wgsl`.
pub fn luminosity_alpha(rgb: [f32; 3], threshold: f32, smoothing: f32) -> f32 {
    smoothstep(
        threshold,
        threshold + smoothing,
        relative_luminance(rgb),
    )
}

/// Narkowicz ACES filmic approximation for one channel. Mirrors the
/// `aces_film` function in `composite.wgsl` and `blit.wgsl`.
pub fn aces_film(x: f32) -> f32 {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    ((x * (a * x + b)) / (x * (c * x + d) + e)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_above_threshold_contributes() {
        let alpha = luminosity_alpha([1.0, 1.0, 1.0], 0.1, 1.0);
        assert!(alpha > 0.0);
    }

    #[test]
    fn black_contributes_nothing() {
        assert_eq!(luminosity_alpha([0.0, 0.0, 0.0], 0.1, 1.0), 0.0);
    }

    #[test]
    fn pixels_at_or_below_threshold_contribute_nothing() {
        // Gray with luminance exactly 0.1.
        assert_eq!(luminosity_alpha([0.1, 0.1, 0.1], 0.1, 1.0), 0.0);
        assert_eq!(luminosity_alpha([0.05, 0.05, 0.05], 0.1, 1.0), 0.0);
    }

    #[test]
    fn alpha_ramps_monotonically_above_threshold() {
        let lo = luminosity_alpha([0.3, 0.3, 0.3], 0.1, 1.0);
        let hi = luminosity_alpha([0.8, 0.8, 0.8], 0.1, 1.0);
        assert!(lo > 0.0);
        assert!(hi > lo);
    }

    #[test]
    fn luminance_weights_favor_green() {
        let g = relative_luminance([0.0, 1.0, 0.0]);
        assert!(g > relative_luminance([1.0, 0.0, 0.0]));
        assert!(g > relative_luminance([0.0, 0.0, 1.0]));
        assert!((relative_luminance([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn aces_maps_black_to_black_and_saturates() {
        assert_eq!(aces_film(0.0), 0.0);
        assert!(aces_film(100.0) > 0.99);
        assert!(aces_film(100.0) <= 1.0);
    }

    #[test]
    fn aces_is_monotonic_over_the_working_range() {
        let mut prev = aces_film(0.0);
        for i in 1..=100 {
            let next = aces_film(i as f32 * 0.05);
            assert!(next >= prev);
            prev = next;
        }
    }
}
