//! Rising bubbles over a deep-water gradient.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(10_000.0, 80, (185.0, 215.0), (0.2, 0.7));

#[derive(Debug)]
struct Bubble {
    x: f32,
    y: f32,
    radius: f32,
    rise: f32,
    wobble_amp: f32,
    wobble_phase: f32,
    hue: f32,
}

impl Bubble {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (h0, h1) = PROFILE.hue_range;
        let (s0, s1) = PROFILE.speed_range;
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height.max(1.0)),
            radius: rng.gen_range(1.0..4.0),
            rise: rng.gen_range(s0..s1),
            wobble_amp: rng.gen_range(0.2..1.2),
            wobble_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            hue: rng.gen_range(h0..h1),
        }
    }
}

impl Entity for Bubble {
    fn update(&mut self, ctx: &FrameContext, rng: &mut StdRng) -> Fate {
        self.y -= self.rise * ctx.dt;
        self.x += (ctx.t * 0.08 + self.wobble_phase).sin() * self.wobble_amp * 0.2 * ctx.dt;
        // Fully above the top edge: re-enter from below with a fresh column.
        if self.y < -2.0 * self.radius {
            self.y = ctx.height + 2.0 * self.radius;
            self.x = rng.gen_range(0.0..ctx.width.max(1.0));
        }
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let body = hsl_to_rgb(self.hue, 0.7, 0.6);
        surface.fill_circle(self.x, self.y, self.radius, body, 0.35);
        // Off-center highlight stands in for the radial gradient.
        surface.fill_circle(
            self.x - self.radius * 0.35,
            self.y - self.radius * 0.35,
            self.radius * 0.4,
            Rgb::WHITE,
            0.5,
        );
    }
}

pub struct Bubbles {
    pop: Population<Bubble>,
}

impl Bubbles {
    pub fn new() -> Self {
        Self { pop: Population::new() }
    }
}

impl Default for Bubbles {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Bubbles {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        self.pop
            .rebuild(width, height, &PROFILE, rng, |rng| Bubble::spawn(width, height, rng));
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill_vertical_gradient(Rgb::from_u8(4, 18, 38), Rgb::from_u8(10, 42, 74));
        self.pop.step(surface, ctx, rng);
    }
}
