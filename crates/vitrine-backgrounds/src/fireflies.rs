//! Fireflies drifting through a moonlit clearing.
//!
//! Layer order: night gradient, twinkling stars, moon, ground silhouette,
//! trees, then the fireflies themselves as additive glows on top.

use log::debug;
use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::VariantProfile;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

const PROFILE: VariantProfile = VariantProfile::new(12_000.0, 70, (45.0, 70.0), (0.1, 0.4));

/// Toroidal wrap margin so glows never pop at the edge.
const WRAP_MARGIN: f32 = 6.0;

#[derive(Debug)]
struct Firefly {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    pulse_phase: f32,
    pulse_speed: f32,
    hue: f32,
}

impl Firefly {
    fn spawn(width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (h0, h1) = PROFILE.hue_range;
        let (s0, s1) = PROFILE.speed_range;
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height.max(1.0)),
            vx: rng.gen_range(-1.0..1.0) * rng.gen_range(s0..s1),
            vy: rng.gen_range(-1.0..1.0) * rng.gen_range(s0..s1),
            pulse_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            pulse_speed: rng.gen_range(0.03..0.09),
            hue: rng.gen_range(h0..h1),
        }
    }

    fn brightness(&self, t: f32) -> f32 {
        0.45 + 0.55 * (t * self.pulse_speed + self.pulse_phase).sin().powi(2)
    }
}

impl Entity for Firefly {
    fn update(&mut self, ctx: &FrameContext, rng: &mut StdRng) -> Fate {
        // Random walk: jitter the velocity, clamp its magnitude.
        self.vx += rng.gen_range(-0.02..0.02) * ctx.dt;
        self.vy += rng.gen_range(-0.02..0.02) * ctx.dt;
        let (_, max_speed) = PROFILE.speed_range;
        let speed = (self.vx * self.vx + self.vy * self.vy).sqrt();
        if speed > max_speed {
            self.vx *= max_speed / speed;
            self.vy *= max_speed / speed;
        }
        self.x += self.vx * ctx.dt;
        self.y += self.vy * ctx.dt;

        let span_x = ctx.width + 2.0 * WRAP_MARGIN;
        let span_y = ctx.height + 2.0 * WRAP_MARGIN;
        if self.x < -WRAP_MARGIN {
            self.x += span_x;
        } else if self.x > ctx.width + WRAP_MARGIN {
            self.x -= span_x;
        }
        if self.y < -WRAP_MARGIN {
            self.y += span_y;
        } else if self.y > ctx.height + WRAP_MARGIN {
            self.y -= span_y;
        }
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        // Brightness is resampled in `Fireflies::frame` via the glow pass;
        // the entity draw paints the core point.
        let color = hsl_to_rgb(self.hue, 0.9, 0.6);
        surface.blend_pixel(self.x, self.y, color, 0.9);
    }
}

/// One branch segment of a tree silhouette, fixed at construction.
#[derive(Debug)]
struct Branch {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    width: f32,
}

/// Composite silhouette entity: the branch sub-collection is generated
/// once at construction and never mutated afterwards.
#[derive(Debug)]
struct Tree {
    branches: Vec<Branch>,
}

impl Tree {
    fn grow(x: f32, ground_y: f32, height: f32, rng: &mut StdRng) -> Self {
        let mut branches = Vec::new();
        Self::grow_branch(&mut branches, x, ground_y, -std::f32::consts::FRAC_PI_2, height, 3.0, 0, rng);
        Self { branches }
    }

    fn grow_branch(
        branches: &mut Vec<Branch>,
        x: f32,
        y: f32,
        angle: f32,
        length: f32,
        width: f32,
        depth: u8,
        rng: &mut StdRng,
    ) {
        if depth > 4 || length < 2.0 {
            return;
        }
        let x1 = x + angle.cos() * length;
        let y1 = y + angle.sin() * length;
        branches.push(Branch { x0: x, y0: y, x1, y1, width });
        for side in [-1.0f32, 1.0] {
            let spread = rng.gen_range(0.3..0.7) * side;
            Self::grow_branch(
                branches,
                x1,
                y1,
                angle + spread,
                length * rng.gen_range(0.6..0.75),
                (width * 0.6).max(0.5),
                depth + 1,
                rng,
            );
        }
    }

    fn draw(&self, surface: &mut Surface) {
        for b in &self.branches {
            surface.line(b.x0, b.y0, b.x1, b.y1, b.width, Rgb::from_u8(6, 10, 8), 0.95);
        }
    }
}

struct StaticStar {
    x: f32,
    y: f32,
    phase: f32,
}

pub struct Fireflies {
    pop: Population<Firefly>,
    trees: Vec<Tree>,
    stars: Vec<StaticStar>,
    moon: (f32, f32, f32),
    ground_y: f32,
}

impl Fireflies {
    pub fn new() -> Self {
        Self {
            pop: Population::new(),
            trees: Vec::new(),
            stars: Vec::new(),
            moon: (0.0, 0.0, 0.0),
            ground_y: 0.0,
        }
    }
}

impl Default for Fireflies {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Fireflies {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        self.ground_y = height * 0.88;
        self.moon = (width * 0.8, height * 0.18, (height * 0.07).max(3.0));

        self.stars = (0..(width * 0.12) as usize)
            .map(|_| StaticStar {
                x: rng.gen_range(0.0..width.max(1.0)),
                y: rng.gen_range(0.0..self.ground_y),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();

        let tree_count = ((width / 60.0) as usize).clamp(2, 8);
        self.trees = (0..tree_count)
            .map(|i| {
                let x = width * (i as f32 + 0.5) / tree_count as f32
                    + rng.gen_range(-8.0..8.0);
                let h = rng.gen_range(height * 0.2..height * 0.4);
                Tree::grow(x, self.ground_y, h, rng)
            })
            .collect();

        self.pop
            .rebuild(width, height, &PROFILE, rng, |rng| Firefly::spawn(width, height, rng));
        debug!(
            "fireflies scene: {} flies, {} trees, {} stars",
            self.pop.len(),
            self.trees.len(),
            self.stars.len()
        );
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill_vertical_gradient(Rgb::from_u8(4, 8, 20), Rgb::from_u8(10, 22, 30));

        for s in &self.stars {
            let a = 0.3 + 0.4 * (ctx.t * 0.05 + s.phase).sin().powi(2);
            surface.blend_pixel(s.x, s.y, Rgb::WHITE, a);
        }

        let (mx, my, mr) = self.moon;
        surface.fill_circle(mx, my, mr, Rgb::from_u8(225, 228, 210), 0.95);
        surface.fill_circle(mx - mr * 0.3, my - mr * 0.2, mr * 0.2, Rgb::from_u8(190, 194, 178), 0.8);
        surface.fill_circle(mx + mr * 0.25, my + mr * 0.3, mr * 0.15, Rgb::from_u8(190, 194, 178), 0.8);
        surface.glow(mx, my, mr * 2.5, Rgb::from_u8(120, 125, 110), 0.25);

        surface.fill_rect(0.0, self.ground_y, ctx.width, ctx.height - self.ground_y, Rgb::from_u8(5, 12, 8), 1.0);
        for tree in &self.trees {
            tree.draw(surface);
        }

        self.pop.step(surface, ctx, rng);
        // Additive glow pass over the firefly cores.
        for fly in self.pop.iter() {
            let color = hsl_to_rgb(fly.hue, 0.9, 0.55);
            surface.glow(fly.x, fly.y, 3.5, color, fly.brightness(ctx.t) * 0.6);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use vitrine_engine::Pointer;

    use super::*;

    fn ctx() -> FrameContext {
        FrameContext {
            t: 0.0,
            dt: 1.0,
            width: 200.0,
            height: 100.0,
            pointer: Pointer::OFF_SURFACE,
        }
    }

    #[test]
    fn firefly_wraps_on_every_edge() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut fly = Firefly::spawn(200.0, 100.0, &mut rng);
        fly.x = -WRAP_MARGIN - 1.0;
        fly.y = 100.0 + WRAP_MARGIN + 1.0;
        fly.vx = 0.0;
        fly.vy = 0.0;
        fly.update(&ctx(), &mut rng);
        assert!(fly.x > 100.0, "wrapped to the right half: {}", fly.x);
        assert!(fly.y < 50.0, "wrapped to the top half: {}", fly.y);
    }

    #[test]
    fn tree_branches_are_fixed_after_construction() {
        let mut rng = StdRng::seed_from_u64(9);
        let tree = Tree::grow(50.0, 90.0, 30.0, &mut rng);
        assert!(!tree.branches.is_empty());
        // Trunk starts at the ground and grows upward.
        let trunk = &tree.branches[0];
        assert_eq!(trunk.y0, 90.0);
        assert!(trunk.y1 < trunk.y0);
    }

    #[test]
    fn rebuild_replaces_scenery_wholesale() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut bg = Fireflies::new();
        bg.rebuild(200.0, 100.0, &mut rng);
        let flies = bg.pop.len();
        assert!(flies > 0);
        assert!(!bg.trees.is_empty());

        bg.rebuild(200.0, 100.0, &mut rng);
        assert_eq!(bg.pop.len(), flies);
    }
}
