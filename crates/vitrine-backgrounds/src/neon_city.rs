//! A flickering skyline: buildings, street lights and drifting haze.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(30_000.0, 20, (280.0, 340.0), (0.05, 0.2));

const WINDOW_SIZE: f32 = 2.0;
const WINDOW_GAP: f32 = 4.0;
/// Per-window chance per frame of toggling its light.
const FLICKER_CHANCE: f64 = 0.002;

#[derive(Debug)]
struct Window {
    dx: f32,
    dy: f32,
    lit: bool,
}

/// Composite skyline entity. The footprint and window grid are fixed at
/// construction; only each window's `lit` state mutates afterwards.
#[derive(Debug)]
struct Building {
    x: f32,
    width: f32,
    height: f32,
    windows: Vec<Window>,
}

impl Building {
    fn spawn(x: f32, surface_height: f32, rng: &mut StdRng) -> Self {
        let width = rng.gen_range(14.0..26.0);
        let height = rng.gen_range(surface_height * 0.25..surface_height * 0.7);
        let mut windows = Vec::new();
        let mut dy = 3.0;
        while dy + WINDOW_SIZE < height - 2.0 {
            let mut dx = 2.0;
            while dx + WINDOW_SIZE < width - 2.0 {
                windows.push(Window {
                    dx,
                    dy,
                    lit: rng.gen_bool(0.4),
                });
                dx += WINDOW_GAP;
            }
            dy += WINDOW_GAP;
        }
        Self { x, width, height, windows }
    }
}

impl Entity for Building {
    fn update(&mut self, _ctx: &FrameContext, rng: &mut StdRng) -> Fate {
        for w in &mut self.windows {
            if rng.gen_bool(FLICKER_CHANCE) {
                w.lit = !w.lit;
            }
        }
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let top = surface.height() - self.height;
        surface.fill_rect(self.x, top, self.width, self.height, Rgb::from_u8(10, 8, 18), 1.0);
        let warm = Rgb::from_u8(255, 214, 140);
        for w in &self.windows {
            if w.lit {
                surface.fill_rect(self.x + w.dx, top + w.dy, WINDOW_SIZE, WINDOW_SIZE, warm, 0.9);
            }
        }
    }
}

#[derive(Debug)]
struct Haze {
    x: f32,
    y: f32,
    radius: f32,
    drift: f32,
    hue: f32,
}

impl Haze {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (h0, h1) = PROFILE.hue_range;
        let (s0, s1) = PROFILE.speed_range;
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(height * 0.4..height.max(1.0)),
            radius: rng.gen_range(4.0..12.0),
            drift: rng.gen_range(s0..s1),
            hue: rng.gen_range(h0..h1),
        }
    }
}

impl Entity for Haze {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        self.x += self.drift * ctx.dt;
        if self.x > ctx.width + self.radius {
            self.x = -self.radius;
        }
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        surface.glow(self.x, self.y, self.radius, hsl_to_rgb(self.hue, 0.6, 0.4), 0.12);
    }
}

struct StreetLight {
    x: f32,
    hue: f32,
    flicker_phase: f32,
}

pub struct NeonCity {
    buildings: Population<Building>,
    haze: Population<Haze>,
    lights: Vec<StreetLight>,
}

impl NeonCity {
    pub fn new() -> Self {
        Self {
            buildings: Population::new(),
            haze: Population::new(),
            lights: Vec::new(),
        }
    }
}

impl Default for NeonCity {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for NeonCity {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        let count = ((width / 22.0) as usize).clamp(3, 14);
        let mut index = 0;
        self.buildings.rebuild_exact(count, rng, |rng| {
            let x = width * index as f32 / count as f32 + rng.gen_range(-3.0..3.0);
            index += 1;
            Building::spawn(x.max(0.0), height, rng)
        });
        self.haze
            .rebuild(width, height, &PROFILE, rng, |rng| Haze::spawn(width, height, rng));
        self.lights = (0..count / 2 + 1)
            .map(|i| StreetLight {
                x: width * (i as f32 + 0.5) / (count / 2 + 1) as f32,
                hue: rng.gen_range(290.0..350.0),
                flicker_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill_vertical_gradient(Rgb::from_u8(14, 6, 28), Rgb::from_u8(30, 10, 40));

        self.buildings.step(surface, ctx, rng);

        let ground = ctx.height - 1.0;
        for light in &self.lights {
            let flicker = 0.7 + 0.3 * (ctx.t * 0.3 + light.flicker_phase).sin().powi(2);
            surface.glow(
                light.x,
                ground,
                8.0,
                hsl_to_rgb(light.hue, 0.9, 0.55),
                0.5 * flicker,
            );
        }

        self.haze.step(surface, ctx, rng);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use vitrine_engine::Pointer;

    use super::*;

    #[test]
    fn window_grid_stays_inside_the_footprint() {
        let mut rng = StdRng::seed_from_u64(41);
        let b = Building::spawn(10.0, 96.0, &mut rng);
        assert!(!b.windows.is_empty());
        for w in &b.windows {
            assert!(w.dx + WINDOW_SIZE <= b.width);
            assert!(w.dy + WINDOW_SIZE <= b.height);
        }
    }

    #[test]
    fn only_lit_state_changes_after_construction() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut b = Building::spawn(10.0, 96.0, &mut rng);
        let footprint = (b.x, b.width, b.height, b.windows.len());
        let positions: Vec<(f32, f32)> = b.windows.iter().map(|w| (w.dx, w.dy)).collect();

        let ctx = FrameContext {
            t: 0.0,
            dt: 1.0,
            width: 160.0,
            height: 96.0,
            pointer: Pointer::OFF_SURFACE,
        };
        for _ in 0..500 {
            b.update(&ctx, &mut rng);
        }
        assert_eq!((b.x, b.width, b.height, b.windows.len()), footprint);
        let after: Vec<(f32, f32)> = b.windows.iter().map(|w| (w.dx, w.dy)).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn haze_wraps_horizontally() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut h = Haze::spawn(160.0, 96.0, &mut rng);
        h.x = 160.0 + h.radius + 1.0;
        let ctx = FrameContext {
            t: 0.0,
            dt: 1.0,
            width: 160.0,
            height: 96.0,
            pointer: Pointer::OFF_SURFACE,
        };
        h.update(&ctx, &mut rng);
        assert_eq!(h.x, -h.radius);
    }
}
