//! Depth-projected starfield with a spiral dust disc.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(6_000.0, 240, (200.0, 290.0), (0.004, 0.012));

/// Maximum star depth; stars fly toward the viewer and reset here.
const MAX_Z: f32 = 1.0;

#[derive(Debug)]
struct ZStar {
    // Normalized [-1, 1] plane coordinates, projected through z.
    nx: f32,
    ny: f32,
    z: f32,
    speed: f32,
}

impl ZStar {
    fn spawn(rng: &mut StdRng) -> Self {
        let (s0, s1) = PROFILE.speed_range;
        Self {
            nx: rng.gen_range(-1.0..1.0),
            ny: rng.gen_range(-1.0..1.0),
            z: rng.gen_range(0.05..MAX_Z),
            speed: rng.gen_range(s0..s1),
        }
    }

    fn projected(&self, width: f32, height: f32) -> (f32, f32, f32) {
        let scale = 0.5 / self.z.max(0.01);
        let x = width * 0.5 + self.nx * scale * width * 0.5;
        let y = height * 0.5 + self.ny * scale * height * 0.5;
        (x, y, 1.0 - self.z / MAX_Z)
    }
}

impl Entity for ZStar {
    fn update(&mut self, ctx: &FrameContext, rng: &mut StdRng) -> Fate {
        self.z -= self.speed * ctx.dt;
        // Flew past the viewer: reset to the far plane on a fresh ray.
        if self.z <= 0.0 {
            self.z = MAX_Z;
            self.nx = rng.gen_range(-1.0..1.0);
            self.ny = rng.gen_range(-1.0..1.0);
        }
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let (x, y, closeness) = self.projected(surface.width(), surface.height());
        let brightness = 0.25 + 0.75 * closeness;
        surface.blend_pixel(x, y, Rgb::WHITE, brightness);
        if closeness > 0.75 {
            surface.glow(x, y, 2.0, Rgb::WHITE, 0.3);
        }
    }
}

#[derive(Debug)]
struct Dust {
    angle: f32,
    dist: f32,
    orbit: f32,
    hue: f32,
}

impl Dust {
    fn spawn(rng: &mut StdRng) -> Self {
        let (h0, h1) = PROFILE.hue_range;
        Self {
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
            dist: rng.gen_range(0.05..0.5),
            orbit: rng.gen_range(0.002..0.008),
            hue: rng.gen_range(h0..h1),
        }
    }
}

impl Entity for Dust {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        // Inner dust orbits faster, which maintains the spiral.
        self.angle = (self.angle + self.orbit / self.dist.max(0.05) * ctx.dt)
            .rem_euclid(std::f32::consts::TAU);
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let (cx, cy) = (surface.width() * 0.5, surface.height() * 0.5);
        let reach = surface.width().min(surface.height());
        // Spiral arm: the angular offset grows with distance.
        let arm = self.angle + self.dist * 4.0;
        let x = cx + arm.cos() * self.dist * reach;
        let y = cy + arm.sin() * self.dist * reach * 0.55;
        surface.blend_pixel(x, y, hsl_to_rgb(self.hue, 0.6, 0.6), 0.5);
    }
}

struct Nebula {
    nx: f32,
    ny: f32,
    radius: f32,
    hue: f32,
}

pub struct Galaxy {
    stars: Population<ZStar>,
    dust: Population<Dust>,
    nebulae: Vec<Nebula>,
}

impl Galaxy {
    pub fn new() -> Self {
        Self {
            stars: Population::new(),
            dust: Population::new(),
            nebulae: Vec::new(),
        }
    }
}

impl Default for Galaxy {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Galaxy {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        self.stars
            .rebuild(width, height, &PROFILE, rng, |rng| ZStar::spawn(rng));
        let dust_profile = VariantProfile::new(
            PROFILE.density_divisor * 2.0,
            120,
            PROFILE.hue_range,
            PROFILE.speed_range,
        );
        self.dust
            .rebuild(width, height, &dust_profile, rng, |rng| Dust::spawn(rng));
        self.nebulae = (0..4)
            .map(|_| Nebula {
                nx: rng.gen_range(-0.6..0.6),
                ny: rng.gen_range(-0.6..0.6),
                radius: rng.gen_range(0.1..0.25),
                hue: rng.gen_range(250.0..320.0),
            })
            .collect();
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill(Rgb::from_u8(3, 2, 12));
        let (cx, cy) = (ctx.width * 0.5, ctx.height * 0.5);
        let reach = ctx.width.min(ctx.height);

        for n in &self.nebulae {
            surface.glow(
                cx + n.nx * reach,
                cy + n.ny * reach,
                n.radius * reach,
                hsl_to_rgb(n.hue, 0.7, 0.3),
                0.2,
            );
        }

        self.dust.step(surface, ctx, rng);
        self.stars.step(surface, ctx, rng);

        surface.glow(cx, cy, reach * 0.12, hsl_to_rgb(45.0, 0.6, 0.7), 0.5);
    }
}
