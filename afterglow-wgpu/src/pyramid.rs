//! Bloom pyramid shape and per-level blend weights.

use afterglow_gpu_shared::uniforms::BLOOM_COMPOSITE_SLOTS;

/// Maximum number of blur levels in the pyramid.
pub const MAX_PYRAMID_LEVELS: usize = BLOOM_COMPOSITE_SLOTS;

/// Per-level Gaussian kernel radius. The radius also serves as sigma, so
/// deeper (smaller) levels blur wider relative to their resolution.
pub const KERNEL_SIZES: [f32; MAX_PYRAMID_LEVELS] = [3.0, 5.0, 7.0, 9.0, 11.0];

/// Base blend factor per level before strength and radius shaping.
pub const BASE_FACTORS: [f32; MAX_PYRAMID_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// Bloom pyramid parameters: level count plus the strength/radius pair
/// that shapes the per-level composite weights.
///
/// `radius` rebalances the pyramid: at 0 the base factors apply as-is
/// (tight bloom dominated by the sharpest level), at 1 each factor is
/// replaced by `1.2 - factor` (wide halo dominated by the deep levels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomPyramid {
    levels: usize,
    strength: f32,
    radius: f32,
}

impl BloomPyramid {
    pub fn new(levels: usize, strength: f32, radius: f32) -> Self {
        Self {
            levels: levels.clamp(1, MAX_PYRAMID_LEVELS),
            strength: strength.clamp(0.0, 1.0),
            radius: radius.clamp(0.0, 1.0),
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength.clamp(0.0, 1.0);
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.clamp(0.0, 1.0);
    }

    /// Composite weight for one level: `strength * lerp(f, 1.2 - f, radius)`
    /// where `f` is the level's base factor. Levels at or past the
    /// configured count weigh zero.
    pub fn weight(&self, level: usize) -> f32 {
        if level >= self.levels {
            return 0.0;
        }
        let f = BASE_FACTORS[level];
        self.strength * (f + (1.2 - f - f) * self.radius)
    }

    /// All weights packed for the composite uniform, one per vec4 slot.
    /// Levels past `self.levels` get zero so their bound texture (a
    /// repeat of the deepest level) contributes nothing.
    pub fn weight_vectors(&self) -> [[f32; 4]; BLOOM_COMPOSITE_SLOTS] {
        let mut out = [[0.0; 4]; BLOOM_COMPOSITE_SLOTS];
        for (level, slot) in out.iter_mut().enumerate().take(self.levels) {
            slot[0] = self.weight(level);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn kernel_sizes_are_odd_and_increasing() {
        for pair in KERNEL_SIZES.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        for k in KERNEL_SIZES {
            assert_eq!((k as u32) % 2, 1);
        }
    }

    #[test]
    fn default_settings_produce_expected_weights() {
        // strength 0.3, radius 0.75: w = 0.3 * (f + (1.2 - 2f) * 0.75)
        let p = BloomPyramid::new(5, 0.3, 0.75);
        let expected = [0.12, 0.15, 0.18, 0.21, 0.24];
        for (level, e) in expected.into_iter().enumerate() {
            assert_close(p.weight(level), e);
        }
    }

    #[test]
    fn radius_zero_keeps_base_factors() {
        let p = BloomPyramid::new(5, 1.0, 0.0);
        for (level, f) in BASE_FACTORS.into_iter().enumerate() {
            assert_close(p.weight(level), f);
        }
    }

    #[test]
    fn radius_one_inverts_the_profile() {
        let p = BloomPyramid::new(5, 1.0, 1.0);
        for (level, f) in BASE_FACTORS.into_iter().enumerate() {
            assert_close(p.weight(level), 1.2 - f);
        }
    }

    #[test]
    fn small_radius_favors_sharp_levels() {
        let p = BloomPyramid::new(5, 0.5, 0.25);
        assert!(p.weight(0) > p.weight(4));
    }

    #[test]
    fn weight_vectors_zero_unused_slots() {
        let p = BloomPyramid::new(3, 0.5, 0.5);
        let v = p.weight_vectors();
        assert!(v[0][0] > 0.0);
        assert!(v[2][0] > 0.0);
        assert_eq!(v[3][0], 0.0);
        assert_eq!(v[4][0], 0.0);
        // Only the x lane is populated.
        for slot in v {
            assert_eq!(&slot[1..], &[0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn weight_is_zero_past_configured_levels() {
        let p = BloomPyramid::new(3, 0.5, 0.5);
        assert!(p.weight(2) > 0.0);
        assert_eq!(p.weight(3), 0.0);
        assert_eq!(p.weight(42), 0.0);
    }

    #[test]
    fn constructor_clamps_out_of_range_inputs() {
        let p = BloomPyramid::new(0, -1.0, 2.0);
        assert_eq!(p.levels(), 1);
        assert_eq!(p.strength(), 0.0);
        assert_eq!(p.radius(), 1.0);

        let p = BloomPyramid::new(99, 7.0, -0.5);
        assert_eq!(p.levels(), MAX_PYRAMID_LEVELS);
        assert_eq!(p.strength(), 1.0);
        assert_eq!(p.radius(), 0.0);
    }
}
