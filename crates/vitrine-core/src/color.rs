//! Color math for background painting.
//!
//! Surfaces accumulate linear-ish RGB with f32 channels so alpha blending
//! and additive glow stay cheap; conversion to terminal colors happens once
//! per cell at present time.

/// An RGB color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels, the form palette constants are written in.
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn scale(self, k: f32) -> Rgb {
        let k = k.max(0.0);
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }

    /// Perceived brightness, used for braille dot thresholds.
    pub fn luma(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Clamp channels to [0, 1] and widen to 8-bit.
    pub fn to_u8(self) -> (u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

/// Hue/saturation/lightness/alpha, the form entity palettes are sampled in.
///
/// Hue is in degrees, saturation and lightness in [0, 1], alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub fn rgb(self) -> Rgb {
        hsl_to_rgb(self.h, self.s, self.l)
    }
}

/// Convert HSL to RGB. Hue in degrees, s/l in [0, 1].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    if s == 0.0 {
        return Rgb::new(l, l, l);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = (h / 360.0).rem_euclid(1.0);

    Rgb::new(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5).to_u8(), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5).to_u8(), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5).to_u8(), (0, 0, 255));
    }

    #[test]
    fn hsl_grayscale_when_unsaturated() {
        let (r, g, b) = hsl_to_rgb(123.0, 0.0, 0.4).to_u8();
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn hue_wraps_past_full_circle() {
        assert_eq!(
            hsl_to_rgb(360.0 + 120.0, 1.0, 0.5).to_u8(),
            hsl_to_rgb(120.0, 1.0, 0.5).to_u8()
        );
    }

    #[test]
    fn hsla_carries_alpha_alongside_its_rgb() {
        let c = Hsla::new(240.0, 1.0, 0.5, 0.3);
        assert_eq!(c.rgb().to_u8(), (0, 0, 255));
        assert_eq!(c.a, 0.3);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgb::new(0.2, 0.4, 0.6);
        let b = Rgb::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
