//! Falling, spinning confetti squares.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(9_000.0, 120, (0.0, 360.0), (0.4, 1.4));

#[derive(Debug)]
struct Piece {
    x: f32,
    y: f32,
    size: f32,
    fall: f32,
    angle: f32,
    spin: f32,
    sway_phase: f32,
    hue: f32,
}

impl Piece {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (h0, h1) = PROFILE.hue_range;
        let (s0, s1) = PROFILE.speed_range;
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(-height.max(1.0)..height.max(1.0)),
            size: rng.gen_range(2.0..5.0),
            fall: rng.gen_range(s0..s1),
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
            spin: rng.gen_range(-0.15..0.15),
            sway_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            hue: rng.gen_range(h0..h1),
        }
    }
}

impl Entity for Piece {
    fn update(&mut self, ctx: &FrameContext, rng: &mut StdRng) -> Fate {
        self.y += self.fall * ctx.dt;
        self.x += (ctx.t * 0.1 + self.sway_phase).sin() * 0.3 * ctx.dt;
        self.angle = (self.angle + self.spin * ctx.dt).rem_euclid(std::f32::consts::TAU);
        // Past the bottom edge: restart above the top with a fresh column.
        if self.y > ctx.height + self.size {
            self.y = -self.size - rng.gen_range(0.0..ctx.height * 0.2);
            self.x = rng.gen_range(0.0..ctx.width.max(1.0));
        }
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let color = hsl_to_rgb(self.hue, 0.85, 0.6);
        surface.fill_rect_rotated(self.x, self.y, self.size, self.size, self.angle, color, 0.9);
    }
}

pub struct Confetti {
    pop: Population<Piece>,
}

impl Confetti {
    pub fn new() -> Self {
        Self { pop: Population::new() }
    }
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Confetti {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        self.pop
            .rebuild(width, height, &PROFILE, rng, |rng| Piece::spawn(width, height, rng));
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill(Rgb::from_u8(16, 14, 22));
        self.pop.step(surface, ctx, rng);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use vitrine_engine::Pointer;

    use super::*;

    #[test]
    fn piece_restarts_above_the_top_after_falling_out() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut p = Piece::spawn(300.0, 120.0, &mut rng);
        p.y = 120.0 + p.size + 0.1;
        let ctx = FrameContext {
            t: 0.0,
            dt: 1.0,
            width: 300.0,
            height: 120.0,
            pointer: Pointer::OFF_SURFACE,
        };
        p.update(&ctx, &mut rng);
        assert!(p.y <= -p.size);
        assert!((0.0..300.0).contains(&p.x));
    }

    #[test]
    fn rotation_stays_within_one_turn() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut p = Piece::spawn(300.0, 120.0, &mut rng);
        p.spin = 0.15;
        let ctx = FrameContext {
            t: 0.0,
            dt: 1.0,
            width: 300.0,
            height: 120.0,
            pointer: Pointer::OFF_SURFACE,
        };
        for _ in 0..100 {
            p.update(&ctx, &mut rng);
        }
        assert!((0.0..std::f32::consts::TAU).contains(&p.angle));
    }
}
