//! User-facing post-processing settings.

/// Tunable parameters of the post-processing chain. Values are accepted
/// as given and clamped to their valid ranges by [`PostSettings::sanitized`]
/// before they reach the GPU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostSettings {
    /// Relative luminance below which a pixel contributes no bloom.
    pub luminosity_threshold: f32,
    /// Overall bloom intensity, 0..=1.
    pub bloom_strength: f32,
    /// Bloom profile balance, 0 (tight) ..= 1 (wide halo).
    pub bloom_radius: f32,
    /// Extra chromatic shift added to the built-in minimum.
    pub distortion: f32,
    /// When false the scene skips anti-aliasing, bloom, and the
    /// chromatic shift; tone mapping still applies.
    pub enabled: bool,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            luminosity_threshold: 0.1,
            bloom_strength: 0.3,
            bloom_radius: 0.75,
            distortion: 0.00125,
            enabled: true,
        }
    }
}

impl PostSettings {
    /// Copy with every field clamped to its valid range.
    pub fn sanitized(&self) -> Self {
        fn finite_or(v: f32, fallback: f32) -> f32 {
            if v.is_finite() {
                v
            } else {
                fallback
            }
        }
        Self {
            luminosity_threshold: finite_or(self.luminosity_threshold, 0.1).max(0.0),
            bloom_strength: finite_or(self.bloom_strength, 0.3).clamp(0.0, 1.0),
            bloom_radius: finite_or(self.bloom_radius, 0.75).clamp(0.0, 1.0),
            distortion: finite_or(self.distortion, 0.0).max(0.0),
            enabled: self.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = PostSettings::default();
        assert_eq!(s.luminosity_threshold, 0.1);
        assert_eq!(s.bloom_strength, 0.3);
        assert_eq!(s.bloom_radius, 0.75);
        assert_eq!(s.distortion, 0.00125);
        assert!(s.enabled);
    }

    #[test]
    fn sanitized_clamps_ranges() {
        let s = PostSettings {
            luminosity_threshold: -1.0,
            bloom_strength: 2.0,
            bloom_radius: -0.5,
            distortion: -0.1,
            enabled: true,
        }
        .sanitized();
        assert_eq!(s.luminosity_threshold, 0.0);
        assert_eq!(s.bloom_strength, 1.0);
        assert_eq!(s.bloom_radius, 0.0);
        assert_eq!(s.distortion, 0.0);
    }

    #[test]
    fn sanitized_replaces_non_finite_values() {
        let s = PostSettings {
            luminosity_threshold: f32::NAN,
            bloom_strength: f32::INFINITY,
            bloom_radius: f32::NEG_INFINITY,
            distortion: f32::NAN,
            enabled: false,
        }
        .sanitized();
        assert_eq!(s.luminosity_threshold, 0.1);
        assert_eq!(s.bloom_strength, 0.3);
        assert_eq!(s.bloom_radius, 0.75);
        assert_eq!(s.distortion, 0.0);
        assert!(!s.enabled);
    }

    #[test]
    fn sanitized_is_identity_on_defaults() {
        let s = PostSettings::default();
        assert_eq!(s.sanitized(), s);
    }
}
