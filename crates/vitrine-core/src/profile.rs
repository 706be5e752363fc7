//! Per-variant spawn constants.

/// Construction-time constants for one background variant.
///
/// These map surface area to a population size and bound the per-entity
/// random sampling. They are fixed at variant construction and never
/// mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantProfile {
    /// Divisor mapping surface area (device pixels) to entity count.
    pub density_divisor: f32,
    /// Hard population cap, for very large surfaces.
    pub max_count: usize,
    /// Inclusive hue range in degrees sampled per entity.
    pub hue_range: (f32, f32),
    /// Speed multiplier range sampled per entity.
    pub speed_range: (f32, f32),
}

impl VariantProfile {
    pub const fn new(
        density_divisor: f32,
        max_count: usize,
        hue_range: (f32, f32),
        speed_range: (f32, f32),
    ) -> Self {
        Self {
            density_divisor,
            max_count,
            hue_range,
            speed_range,
        }
    }
}
