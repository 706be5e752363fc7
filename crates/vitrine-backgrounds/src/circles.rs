//! Drifting soft discs that swell near the pointer.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(14_000.0, 60, (150.0, 330.0), (0.1, 0.5));

/// Pointer proximity that triggers growth, in device pixels.
const TRIGGER_RADIUS: f32 = 150.0;
const GROWTH: f32 = 3.0;
const EASE: f32 = 0.1;

#[derive(Debug)]
struct Disc {
    x: f32,
    y: f32,
    base_radius: f32,
    radius: f32,
    dx: f32,
    dy: f32,
    hue: f32,
}

impl Disc {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (h0, h1) = PROFILE.hue_range;
        let (s0, s1) = PROFILE.speed_range;
        let base_radius = rng.gen_range(2.0..6.0);
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height.max(1.0)),
            base_radius,
            radius: base_radius,
            dx: rng.gen_range(-1.0..1.0) * rng.gen_range(s0..s1),
            dy: rng.gen_range(-1.0..1.0) * rng.gen_range(s0..s1),
            hue: rng.gen_range(h0..h1),
        }
    }
}

impl Entity for Disc {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        self.x += self.dx * ctx.dt;
        self.y += self.dy * ctx.dt;
        let margin = self.radius;
        if self.x < -margin {
            self.x += ctx.width + 2.0 * margin;
        } else if self.x > ctx.width + margin {
            self.x -= ctx.width + 2.0 * margin;
        }
        if self.y < -margin {
            self.y += ctx.height + 2.0 * margin;
        } else if self.y > ctx.height + margin {
            self.y -= ctx.height + 2.0 * margin;
        }

        let target = if ctx.pointer.distance_to(self.x, self.y) < TRIGGER_RADIUS {
            self.base_radius * GROWTH
        } else {
            self.base_radius
        };
        self.radius += (target - self.radius) * EASE * ctx.dt;
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let color = hsl_to_rgb(self.hue, 0.7, 0.55);
        surface.glow(self.x, self.y, self.radius * 2.0, color, 0.3);
        surface.fill_circle(self.x, self.y, self.radius, color, 0.5);
    }
}

pub struct Circles {
    pop: Population<Disc>,
}

impl Circles {
    pub fn new() -> Self {
        Self { pop: Population::new() }
    }
}

impl Default for Circles {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Circles {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        self.pop
            .rebuild(width, height, &PROFILE, rng, |rng| Disc::spawn(width, height, rng));
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill(Rgb::from_u8(12, 10, 24));
        self.pop.step(surface, ctx, rng);
    }
}
