//! Vertical lines swaying like kelp, each segment trailing the one above.

use rand::Rng;
use rand::rngs::StdRng;
use vitrine_engine::{Background, Entity, Fate, FrameContext, Population, Surface};
use vitrine_core::color::{Hsla, Rgb};

/// One line per this many device pixels of width.
const LINE_SPACING: f32 = 30.0;
/// Segment points per line.
const SEGMENTS: usize = 10;
/// How strongly each point trails the point above it.
const TRAIL: f32 = 0.1;
const HUE_RANGE: (f32, f32) = (180.0, 240.0);
const SPEED_RANGE: (f32, f32) = (1.0, 3.0);

#[derive(Debug)]
struct SwayLine {
    points: Vec<(f32, f32)>,
    color: Hsla,
    speed: f32,
}

impl SwayLine {
    fn spawn(x: f32, height: f32, rng: &mut StdRng) -> Self {
        let points = (0..SEGMENTS)
            .map(|i| (x, height / SEGMENTS as f32 * i as f32))
            .collect();
        let hue = rng.gen_range(HUE_RANGE.0..HUE_RANGE.1);
        Self {
            points,
            color: Hsla::new(hue, 0.8, 0.6, 0.5),
            speed: rng.gen_range(SPEED_RANGE.0..SPEED_RANGE.1),
        }
    }
}

impl Entity for SwayLine {
    fn update(&mut self, ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
        self.points[0].0 += (ctx.t * 0.02 * self.speed).sin() * 2.0 * ctx.dt;
        // Each point eases toward the one above, so the sway ripples down.
        for i in 1..self.points.len() {
            let above = self.points[i - 1].0;
            self.points[i].0 += (above - self.points[i].0) * TRAIL * ctx.dt;
        }
        Fate::Keep
    }

    fn draw(&self, surface: &mut Surface) {
        let rgb = self.color.rgb();
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            surface.line(x0, y0, x1, y1, 2.0, rgb, self.color.a);
        }
    }
}

pub struct Lines {
    pop: Population<SwayLine>,
}

impl Lines {
    pub fn new() -> Self {
        Self { pop: Population::new() }
    }
}

impl Default for Lines {
    fn default() -> Self {
        Self::new()
    }
}

impl Background for Lines {
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng) {
        // Cardinality follows width, not area: one line per spacing step.
        let count = (width / LINE_SPACING).floor().max(1.0) as usize;
        let mut index = 0;
        self.pop.rebuild_exact(count, rng, |rng| {
            let x = width / count as f32 * index as f32;
            index += 1;
            SwayLine::spawn(x, height, rng)
        });
    }

    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        surface.fill_vertical_gradient(Rgb::from_u8(15, 23, 42), Rgb::from_u8(30, 41, 59));
        self.pop.step(surface, ctx, rng);
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
            width: 300.0,
            height: 100.0,
            pointer: Pointer::OFF_SURFACE,
        }
    }

    #[test]
    fn line_count_follows_width_over_spacing() {
        let mut rng = StdRng::seed_from_u64(61);
        let mut bg = Lines::new();
        bg.rebuild(300.0, 100.0, &mut rng);
        assert_eq!(bg.pop.len(), 10);

        bg.rebuild(29.0, 100.0, &mut rng);
        assert_eq!(bg.pop.len(), 1);
    }

    #[test]
    fn segments_trail_the_swaying_head() {
        let mut rng = StdRng::seed_from_u64(61);
        let mut line = SwayLine::spawn(50.0, 100.0, &mut rng);
        // Displace the head; at t = 0 the sway term is zero, so updates
        // only propagate the displacement down the trail.
        line.points[0].0 = 70.0;
        let c = ctx(0.0);
        for _ in 0..300 {
            line.update(&c, &mut rng);
        }
        let head = line.points[0].0;
        let tail = line.points.last().unwrap().0;
        assert!((head - tail).abs() < 1.0, "tail {tail} never caught up to head {head}");
    }

    #[test]
    fn points_span_the_surface_height() {
        let mut rng = StdRng::seed_from_u64(61);
        let line = SwayLine::spawn(50.0, 100.0, &mut rng);
        assert_eq!(line.points.len(), SEGMENTS);
        assert_eq!(line.points[0].1, 0.0);
        assert!(line.points.last().unwrap().1 < 100.0);
    }
}
