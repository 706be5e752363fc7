//! Three colored lights chasing the pointer over a grid floor.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_core::color::{Rgb, hsl_to_rgb};
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};

/// Smooth-follow easing per frame.
const FOLLOW: f32 = 0.05;
/// Cardinality is fixed, not area-derived; hues come from the light index.
const LIGHT_COUNT: usize = 3;
const ORBIT_SPEED_RANGE: (f32, f32) = (0.02, 0.05);
const GRID_STEP: f32 = 16.0;

#[derive(Debug)]
struct Light {
    x: f32,
    y: f32,
    hue: f32,
    orbit_phase: f32,
    orbit_speed: f32,
    orbit_radius: f32,
}

impl Light {
    fn spawn(index: usize, width: f32, height: f32, rng: &mut StdRng) -> Self {
        let (s0, s1) = ORBIT_SPEED_RANGE;
        Self {
            x: width * 0.5,
            y: height * 0.5,
            hue: index as f32 * 120.0 + rng.gen_range(-15.0..15.0),
            orbit_phase: index as f32 * std::f32::consts::TAU / LIGHT_COUNT as f32,
            orbit_speed: rng.gen_range(s0..s1),
            orbit_radius: rng.gen_range(10.0..22.0),
        }
    }

    fn target(&self, ctx: &FrameContext) -> (f32, f32) {
        // An off-surface pointer parks the lights at the center.
        let on_surface = ctx.pointer.x >= 0.0
            && ctx.pointer.y >= 0.0
            && ctx.pointer.x <= ctx.width
            && ctx.pointer.y <= ctx.height;
        let (bx, by) = if on_surface {
            (ctx.pointer.x, ctx.pointer.y)
        } else {
            (ctx.width * 0.5, ctx.height * 0.5)
        };
        let angle = ctx.t * self.orbit_speed + self.orbit_phase;
        (bx + angle.cos() * self.orbit_radius, by + angle.sin() * self.orbit_radius)
    }
}

impl Entity for Light {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        let (tx, ty) = self.target(ctx);
        self.x += (tx - self.x) * FOLLOW * ctx.dt;
        self.y += (ty - self.y) * FOLLOW * ctx.dt;
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let reach = surface.width().min(surface.height()) * 0.5;
        surface.glow(self.x, self.y, reach, hsl_to_rgb(self.hue, 0.9, 0.5), 0.45);
    }
}

pub struct Spotlight {
    lights: Population<Light>,
}

impl Spotlight {
    pub fn new() -> Self {
        Self { lights: Population::new() }
    }
}

impl Default for Spotlight {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Spotlight {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        let mut index = 0;
        self.lights.rebuild_exact(LIGHT_COUNT, rng, |rng| {
            let light = Light::spawn(index, width, height, rng);
            index += 1;
            light
        });
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill(Rgb::from_u8(8, 8, 12));
        self.lights.step(surface, ctx, rng);

        // Grid overlay sits above the lights.
        let grid = Rgb::from_u8(40, 40, 52);
        let mut x = 0.0;
        while x < ctx.width {
            surface.line(x, 0.0, x, ctx.height, 1.0, grid, 0.25);
            x += GRID_STEP;
        }
        let mut y = 0.0;
        while y < ctx.height {
            surface.line(0.0, y, ctx.width, y, 1.0, grid, 0.25);
            y += GRID_STEP;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use vitrine_engine::Pointer;

    use super::*;

    fn ctx(pointer: Pointer) -> FrameContext {
        FrameContext {
            t: 0.0,
            dt: 1.0,
            width: 160.0,
            height: 96.0,
            pointer,
        }
    }

    #[test]
    fn light_eases_toward_the_pointer() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut light = Light::spawn(0, 160.0, 96.0, &mut rng);
        let c = ctx(Pointer::new(140.0, 20.0));
        let start = light.x;
        for _ in 0..300 {
            light.update(&c, &mut rng);
        }
        assert!(light.x > start);
        // Converges to within the orbit radius of the pointer.
        assert!((light.x - 140.0).abs() <= light.orbit_radius + 1.0);
        assert!((light.y - 20.0).abs() <= light.orbit_radius + 1.0);
    }

    #[test]
    fn off_surface_pointer_parks_lights_at_center() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut light = Light::spawn(0, 160.0, 96.0, &mut rng);
        light.x = 10.0;
        light.y = 10.0;
        let c = ctx(Pointer::OFF_SURFACE);
        for _ in 0..300 {
            light.update(&c, &mut rng);
        }
        assert!((light.x - 80.0).abs() <= light.orbit_radius + 1.0);
        assert!((light.y - 48.0).abs() <= light.orbit_radius + 1.0);
    }
}
