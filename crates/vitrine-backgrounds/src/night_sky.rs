//! Twinkling stars, a cratered moon and the occasional shooting star.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::Rgb;
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(8_000.0, 150, (0.0, 360.0), (0.02, 0.08));

/// Minimum simulation time between shooting-star spawns.
const SHOOT_COOLDOWN: f32 = 40.0;
/// Spawn chance per frame once the cooldown has elapsed.
const SHOOT_CHANCE: f64 = 0.04;
const TRAIL_LEN: usize = 14;

#[derive(Debug)]
struct Star {
    x: f32,
    y: f32,
    size: f32,
    phase: f32,
    twinkle: f32,
}

impl Star {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (s0, s1) = PROFILE.speed_range;
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height.max(1.0)),
            size: rng.gen_range(0.5..2.0),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            twinkle: rng.gen_range(s0..s1),
        }
    }
}

impl Entity for Star {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        self.phase = (self.phase + self.twinkle * ctx.dt).rem_euclid(std::f32::consts::TAU);
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let a = 0.3 + 0.7 * self.phase.sin().powi(2);
        surface.blend_pixel(self.x, self.y, Rgb::WHITE, a);
        if self.size > 1.4 {
            surface.glow(self.x, self.y, self.size * 1.6, Rgb::WHITE, a * 0.25);
        }
    }
}

#[derive(Debug)]
struct ShootingStar {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    trail: Vec<(f32, f32)>,
}

impl ShootingStar {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        Self {
            x: rng.gen_range(0.0..width * 0.7),
            y: rng.gen_range(0.0..height * 0.3),
            vx: rng.gen_range(2.5..4.5),
            vy: rng.gen_range(0.8..1.8),
            trail: Vec::with_capacity(TRAIL_LEN),
        }
    }

    fn off_surface(&self, width: f32, height: f32) -> bool {
        self.x > width + 2.0 || self.y > height + 2.0
    }
}

impl Entity for ShootingStar {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        self.trail.insert(0, (self.x, self.y));
        self.trail.truncate(TRAIL_LEN);
        self.x += self.vx * ctx.dt;
        self.y += self.vy * ctx.dt;
        if self.off_surface(ctx.width, ctx.height) || self.trail.is_empty() {
            Fate::Despawn
        } else {
            Fate::Keep
        }
    }

    fn draw(&self, surface: &mut Surface) {
        surface.blend_pixel(self.x, self.y, Rgb::WHITE, 1.0);
        surface.glow(self.x, self.y, 2.5, Rgb::from_u8(200, 220, 255), 0.5);
        for (i, &(tx, ty)) in self.trail.iter().enumerate() {
            let fade = 1.0 - i as f32 / TRAIL_LEN as f32;
            surface.blend_pixel(tx, ty, Rgb::from_u8(180, 200, 255), fade * 0.7);
        }
    }
}

pub struct NightSky {
    stars: Population<Star>,
    shooting: Population<ShootingStar>,
    moon: (f32, f32, f32),
    craters: Vec<(f32, f32, f32)>,
    next_shot_at: f32,
}

impl NightSky {
    pub fn new() -> Self {
        Self {
            stars: Population::new(),
            shooting: Population::new(),
            moon: (0.0, 0.0, 0.0),
            craters: Vec::new(),
            next_shot_at: SHOOT_COOLDOWN,
        }
    }
}

impl Default for NightSky {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for NightSky {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        self.stars
            .rebuild(width, height, &PROFILE, rng, |rng| Star::spawn(width, height, rng));
        self.shooting = Population::new();
        let r = (height * 0.09).max(3.0);
        self.moon = (width * 0.78, height * 0.2, r);
        self.craters = (0..3)
            .map(|_| {
                (
                    rng.gen_range(-0.5..0.5) * r,
                    rng.gen_range(-0.5..0.5) * r,
                    rng.gen_range(0.12..0.25) * r,
                )
            })
            .collect();
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill_vertical_gradient(Rgb::from_u8(2, 4, 16), Rgb::from_u8(12, 18, 40));

        self.stars.step(surface, ctx, rng);

        let (mx, my, mr) = self.moon;
        surface.fill_circle(mx, my, mr, Rgb::from_u8(228, 230, 215), 0.95);
        for &(dx, dy, cr) in &self.craters {
            surface.fill_circle(mx + dx, my + dy, cr, Rgb::from_u8(195, 198, 182), 0.85);
        }
        surface.glow(mx, my, mr * 2.2, Rgb::from_u8(110, 115, 105), 0.25);

        if ctx.t >= self.next_shot_at && rng.gen_bool(SHOOT_CHANCE) {
            self.shooting.spawn(ShootingStar::spawn(ctx.width, ctx.height, rng));
            self.next_shot_at = ctx.t + SHOOT_COOLDOWN;
        }
        self.shooting.step(surface, ctx, rng);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use vitrine_engine::Pointer;

    use super::*;

    fn ctx(t: f32) -> FrameContext {
        FrameContext {
            t,
            dt: 1.0,
            width: 160.0,
            height: 96.0,
            pointer: Pointer::OFF_SURFACE,
        }
    }

    #[test]
    fn shooting_star_despawns_once_off_surface() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut s = ShootingStar::spawn(160.0, 96.0, &mut rng);
        s.x = 159.0;
        s.y = 10.0;
        let c = ctx(0.0);
        let mut fate = Fate::Keep;
        for _ in 0..10 {
            fate = s.update(&c, &mut rng);
            if fate == Fate::Despawn {
                break;
            }
        }
        assert_eq!(fate, Fate::Despawn);
        assert!(s.off_surface(160.0, 96.0));
    }

    #[test]
    fn trail_grows_to_its_cap_and_leads_with_the_newest_point() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut s = ShootingStar::spawn(160.0, 96.0, &mut rng);
        s.x = 0.0;
        s.y = 0.0;
        s.vx = 0.1;
        s.vy = 0.1;
        let c = ctx(0.0);
        for _ in 0..TRAIL_LEN + 5 {
            s.update(&c, &mut rng);
        }
        assert_eq!(s.trail.len(), TRAIL_LEN);
        // Newest point first; it trails just behind the head.
        let (tx, ty) = s.trail[0];
        assert!((s.x - tx).abs() <= 0.1 + 1e-5);
        assert!((s.y - ty).abs() <= 0.1 + 1e-5);
    }

    #[test]
    fn shooting_stars_respect_the_cooldown() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut surface = Surface::new(80, 24).unwrap();
        let mut bg = NightSky::new();
        bg.rebuild(surface.width(), surface.height(), &mut rng);

        // Before the cooldown has elapsed nothing can spawn.
        bg.frame(&mut surface, &ctx(1.0), &mut rng);
        assert_eq!(bg.shooting.len(), 0);
    }
}
