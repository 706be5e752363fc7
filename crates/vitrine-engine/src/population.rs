//! Entity populations and their lifecycle.

use rand::rngs::StdRng;
use vitrine_core::VariantProfile;

use crate::context::FrameContext;
use crate::surface::Surface;

/// Whether an entity stays alive after its update step.
///
/// Long-lived entities wrap or respawn inside `update` and always return
/// `Keep`; transient entities (ripples, shooting stars) return `Despawn`
/// once their completion predicate holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Keep,
    Despawn,
}

/// One simulated visual unit.
///
/// `update` mutates internal state only, as a function of previous state,
/// the frame context and per-entity constants sampled at construction.
/// `draw` reads state and paints, never mutating.
pub trait Entity {
    fn update(&mut self, ctx: &FrameContext, rng: &mut StdRng) -> Fate;
    fn draw(&self, surface: &mut Surface);
}

/// Population size for a surface: `clamp(floor(w*h/density), 0, max)`.
pub fn spawn_count(width: f32, height: f32, profile: &VariantProfile) -> usize {
    let raw = (width * height / profile.density_divisor).floor();
    if raw <= 0.0 {
        return 0;
    }
    (raw as usize).min(profile.max_count)
}

/// An ordered collection of entities of one kind.
///
/// Insertion order is fixed and defines back-to-front draw layering. The
/// population is rebuilt wholesale on resize; no entity survives.
#[derive(Debug)]
pub struct Population<E> {
    entities: Vec<E>,
}

impl<E> Default for Population<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Population<E> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    /// Append one entity at the front of the draw order's end (drawn last,
    /// i.e. on top). Used for host-driven transients such as pointer
    /// ripples.
    pub fn spawn(&mut self, entity: E) {
        self.entities.push(entity);
    }
}

impl<E: Entity> Population<E> {
    /// Discard all entities and construct a fresh set sized from the
    /// surface area and the variant profile.
    pub fn rebuild(
        &mut self,
        width: f32,
        height: f32,
        profile: &VariantProfile,
        rng: &mut StdRng,
        mut spawn: impl FnMut(&mut StdRng) -> E,
    ) {
        let count = spawn_count(width, height, profile);
        self.entities.clear();
        self.entities.extend((0..count).map(|_| spawn(rng)));
    }

    /// Discard all entities and construct exactly `count` fresh ones, for
    /// kinds whose cardinality is not area-derived (trees, buildings).
    pub fn rebuild_exact(
        &mut self,
        count: usize,
        rng: &mut StdRng,
        mut spawn: impl FnMut(&mut StdRng) -> E,
    ) {
        self.entities.clear();
        self.entities.extend((0..count).map(|_| spawn(rng)));
    }

    /// One frame step: update then draw every entity in insertion order,
    /// then drop entities that completed this frame. A completing entity
    /// is drawn exactly once on its completion frame and never afterward.
    pub fn step(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng) {
        let mut keep = Vec::with_capacity(self.entities.len());
        for entity in &mut self.entities {
            let fate = entity.update(ctx, rng);
            entity.draw(surface);
            keep.push(fate == Fate::Keep);
        }
        let mut i = 0;
        self.entities.retain(|_| {
            let k = keep[i];
            i += 1;
            k
        });
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    const PROFILE: VariantProfile = VariantProfile::new(10_000.0, 500, (0.0, 360.0), (0.5, 2.5));

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Despawns after a fixed number of updates.
    struct Probe {
        updates_left: u32,
    }

    impl Entity for Probe {
        fn update(&mut self, _ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
            if self.updates_left == 0 {
                return Fate::Despawn;
            }
            self.updates_left -= 1;
            Fate::Keep
        }

        fn draw(&self, _surface: &mut Surface) {}
    }

    fn ctx() -> FrameContext {
        FrameContext {
            t: 0.0,
            dt: 1.0,
            width: 800.0,
            height: 600.0,
            pointer: crate::Pointer::OFF_SURFACE,
        }
    }

    #[test]
    fn count_follows_area_over_density() {
        assert_eq!(spawn_count(800.0, 600.0, &PROFILE), 48);
        assert_eq!(spawn_count(0.0, 600.0, &PROFILE), 0);
        assert_eq!(spawn_count(50.0, 50.0, &PROFILE), 0);

        let capped = VariantProfile::new(10.0, 100, (0.0, 360.0), (0.5, 2.5));
        assert_eq!(spawn_count(800.0, 600.0, &capped), 100);
    }

    #[test]
    fn rebuild_replaces_wholesale() {
        let mut rng = rng();
        let mut pop: Population<Probe> = Population::new();
        pop.rebuild(800.0, 600.0, &PROFILE, &mut rng, |_| Probe { updates_left: 10 });
        assert_eq!(pop.len(), 48);

        // Same dimensions: equal count, but every entity is fresh.
        pop.rebuild(800.0, 600.0, &PROFILE, &mut rng, |_| Probe { updates_left: 99 });
        assert_eq!(pop.len(), 48);
        assert!(pop.iter().all(|p| p.updates_left == 99));
    }

    #[test]
    fn transient_is_dropped_the_frame_it_completes() {
        let mut rng = rng();
        let mut surface = Surface::new(10, 5).unwrap();
        let mut pop: Population<Probe> = Population::new();
        pop.spawn(Probe { updates_left: 2 });

        let ctx = ctx();
        pop.step(&mut surface, &ctx, &mut rng);
        pop.step(&mut surface, &ctx, &mut rng);
        assert_eq!(pop.len(), 1);

        // Third update reports completion; entity is gone afterwards.
        pop.step(&mut surface, &ctx, &mut rng);
        assert_eq!(pop.len(), 0);

        // Further steps have nothing left to draw.
        pop.step(&mut surface, &ctx, &mut rng);
        assert_eq!(pop.len(), 0);
    }

    #[test]
    fn draw_order_is_insertion_order() {
        use std::cell::RefCell;

        thread_local! {
            static ORDER: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
        }

        struct Tagged(u32);
        impl Entity for Tagged {
            fn update(&mut self, _ctx: &FrameContext, _rng: &mut StdRng) -> Fate {
                Fate::Keep
            }
            fn draw(&self, _surface: &mut Surface) {
                ORDER.with(|o| o.borrow_mut().push(self.0));
            }
        }

        let mut rng = rng();
        let mut surface = Surface::new(10, 5).unwrap();
        let mut pop = Population::new();
        for i in 0..4 {
            pop.spawn(Tagged(i));
        }
        pop.step(&mut surface, &ctx(), &mut rng);
        ORDER.with(|o| assert_eq!(*o.borrow(), vec![0, 1, 2, 3]));
    }
}
