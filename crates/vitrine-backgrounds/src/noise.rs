//! Animated noise: per-pixel grain over a slow sine interference pattern.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::color::Rgb;
use vitrine_engine::{Background, FrameContext, Surface};

/// Grain amplitude on the 8-bit value scale.
const GRAIN: f32 = 50.0;
/// Interference pattern amplitude.
const PATTERN: f32 = 20.0;

/// Brightness of one pixel, on a 0..=255 scale. `noise01` is the pixel's
/// random sample for this frame.
fn field_value(x: f32, y: f32, t: f32, noise01: f32) -> f32 {
    let grain = noise01 * GRAIN;
    let pattern = ((x * 0.01 + t * 0.01).sin() + (y * 0.01 + t * 0.005).cos()) * PATTERN;
    (grain + pattern).clamp(0.0, 255.0)
}

/// Dark blue base tinted by the field value, blue rising fastest.
fn shade(value: f32) -> Rgb {
    Rgb::new(
        (30.0 + value * 0.2) / 255.0,
        (30.0 + value * 0.2) / 255.0,
        (50.0 + value * 0.4) / 255.0,
    )
}

/// The field is stateless: every pixel is recomputed each frame from the
/// simulation time and a fresh random sample.
pub struct Noise;

impl Noise {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Noise {
    fn rebuild(&mut self, _width: f32, _height: f32, _rng: &mut StdRng) {}

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        let mut y = 0.0;
        while y < ctx.height {
            let mut x = 0.0;
            while x < ctx.width {
                let value = field_value(x, y, ctx.t, rng.r#gen::<f32>());
                surface.blend_pixel(x, y, shade(value), 1.0);
                x += 1.0;
            }
            y += 1.0;
        }
    }
}
