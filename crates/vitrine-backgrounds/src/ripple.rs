//! Expanding rings, seeded at random and under the pointer.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(20_000.0, 40, (170.0, 260.0), (0.6, 1.6));

/// Per-frame chance of a spontaneous ring.
const RANDOM_CHANCE: f64 = 0.03;
/// Minimum simulation time between pointer-seeded rings.
const POINTER_INTERVAL: f32 = 6.0;

#[derive(Debug)]
struct Ring {
    x: f32,
    y: f32,
    radius: f32,
    max_radius: f32,
    growth: f32,
    hue: f32,
}

impl Ring {
    fn spawn_at(x: f32, y: f32, rng: &mut StdRng) -> Self {
        let (h0, h1) = PROFILE.hue_range;
        let (s0, s1) = PROFILE.speed_range;
        Self {
            x,
            y,
            radius: 0.5,
            max_radius: rng.gen_range(12.0..36.0),
            growth: rng.gen_range(s0..s1),
            hue: rng.gen_range(h0..h1),
        }
    }

    fn spawn_random(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let x = rng.gen_range(0.0..width.max(1.0));
        let y = rng.gen_range(0.0..height.max(1.0));
        Self::spawn_at(x, y, rng)
    }
}

impl Entity for Ring {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        self.radius += self.growth * ctx.dt;
        if self.radius >= self.max_radius {
            Fate::Despawn
        } else {
            Fate::Keep
        }
    }

    fn draw(&self, surface: &mut Surface) {
        let alpha = (1.0 - self.radius / self.max_radius).clamp(0.0, 1.0);
        let color = hsl_to_rgb(self.hue, 0.8, 0.6);
        surface.stroke_circle(self.x, self.y, self.radius, 1.0, color, alpha);
    }
}

pub struct Ripple {
    rings: Population<Ring>,
    // Pointer spawns land here and are drained next frame, where an RNG
    // is available.
    pending: Vec<(f32, f32)>,
    last_pointer_spawn: f32,
}

impl Ripple {
    pub fn new() -> Self {
        Self {
            rings: Population::new(),
            pending: Vec::new(),
            last_pointer_spawn: f32::NEG_INFINITY,
        }
    }
}

impl Default for Ripple {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Ripple {
    fn rebuild(&mut self, _width: f32, _height: f32, _rng: &mut StdRng) {
        // Rings are transient; a resize simply drops them all.
        self.rings = Population::new();
        self.pending.clear();
        self.last_pointer_spawn = f32::NEG_INFINITY;
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill_vertical_gradient(Rgb::from_u8(6, 14, 28), Rgb::from_u8(8, 24, 40));

        for (x, y) in self.pending.drain(..) {
            self.rings.spawn(Ring::spawn_at(x, y, rng));
        }
        if rng.gen_bool(RANDOM_CHANCE) {
            self.rings.spawn(Ring::spawn_random(ctx.width, ctx.height, rng));
        }
        self.rings.step(surface, ctx, rng);
    }

    fn wants_pointer(&self) -> bool {
        true
    }

    fn pointer_moved(&mut self, x: f32, y: f32, t: f32) {
        if t - self.last_pointer_spawn >= POINTER_INTERVAL {
            self.pending.push((x, y));
            self.last_pointer_spawn = t;
        }
    }
}
