//! Aurora curtains: a stateless wave field under a drifting star layer.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(25_000.0, 60, (110.0, 290.0), (0.02, 0.08));

/// One sine component of the curtain field.
struct Band {
    base_y: f32,
    amplitude: f32,
    frequency: f32,
    drift: f32,
    phase: f32,
    hue_offset: f32,
}

const BANDS: [Band; 3] = [
    Band { base_y: 0.3, amplitude: 0.08, frequency: 0.045, drift: 0.010, phase: 0.0, hue_offset: 0.0 },
    Band { base_y: 0.42, amplitude: 0.11, frequency: 0.030, drift: 0.014, phase: 2.1, hue_offset: 60.0 },
    Band { base_y: 0.55, amplitude: 0.07, frequency: 0.060, drift: 0.008, phase: 4.2, hue_offset: 120.0 },
];

/// Curtain thickness as a fraction of surface height.
const THICKNESS: f32 = 0.12;

#[derive(Debug)]
struct DriftStar {
    x: f32,
    y: f32,
    drift: f32,
    phase: f32,
}

impl DriftStar {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (s0, s1) = PROFILE.speed_range;
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height * 0.8),
            drift: rng.gen_range(s0..s1),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }
}

impl Entity for DriftStar {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        self.x += self.drift * ctx.dt;
        if self.x > ctx.width {
            self.x -= ctx.width;
        }
        self.phase = (self.phase + 0.02 * ctx.dt).rem_euclid(std::f32::consts::TAU);
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let a = 0.25 + 0.5 * self.phase.sin().powi(2);
        surface.blend_pixel(self.x, self.y, Rgb::WHITE, a);
    }
}

pub struct Aurora {
    stars: Population<DriftStar>,
}

impl Aurora {
    pub fn new() -> Self {
        Self { stars: Population::new() }
    }

    /// Curtain center line for one band at one pixel column.
    fn band_center(band: &Band, x: f32, t: f32, height: f32) -> f32 {
        height * band.base_y
            + (x * band.frequency + t * band.drift + band.phase).sin() * height * band.amplitude
    }
}

impl Default for Aurora {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Aurora {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        self.stars
            .rebuild(width, height, &PROFILE, rng, |rng| DriftStar::spawn(width, height, rng));
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill_vertical_gradient(Rgb::from_u8(2, 4, 14), Rgb::from_u8(6, 12, 24));

        let reach = ctx.height * THICKNESS;
        let (h0, _) = PROFILE.hue_range;
        let mut x = 0.0;
        while x < ctx.width {
            for band in &BANDS {
                let center = Self::band_center(band, x, ctx.t, ctx.height);
                // Palette cycles green through blue to violet along the wave.
                let hue = h0 + band.hue_offset + 25.0 * (x * 0.01 + ctx.t * 0.005).sin();
                let color = hsl_to_rgb(hue, 0.85, 0.5);
                let mut y = center - reach;
                while y < center + reach {
                    let falloff = 1.0 - ((y - center) / reach).abs();
                    surface.add_pixel(x, y, color, falloff * falloff * 0.22);
                    y += 1.0;
                }
            }
            x += 1.0;
        }

        self.stars.step(surface, ctx, rng);
    }
}
