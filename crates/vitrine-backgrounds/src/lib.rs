//! The background variants.
//!
//! Each module is one self-contained scene: plain entity records with
//! [`vitrine_engine::Entity`] impls, plus one [`Background`] impl that owns
//! the populations and paints the base layers. Variants never talk to the
//! terminal; they only paint into the engine's surface.

mod aurora;
mod bubbles;
mod circles;
mod confetti;
mod fireflies;
mod galaxy;
mod lines;
mod neon_city;
mod night_sky;
mod noise;
mod ripple;
mod spotlight;

pub use aurora::Aurora;
pub use bubbles::Bubbles;
pub use circles::Circles;
pub use confetti::Confetti;
pub use fireflies::Fireflies;
pub use galaxy::Galaxy;
pub use lines::Lines;
pub use neon_city::NeonCity;
pub use night_sky::NightSky;
pub use noise::Noise;
pub use ripple::Ripple;
pub use spotlight::Spotlight;

use vitrine_core::BackgroundKind;
use vitrine_engine::Background;

/// Construct the variant for a catalog entry.
pub fn catalog(kind: BackgroundKind) -> Box<dyn Background> {
    match kind {
        BackgroundKind::Bubbles => Box::new(Bubbles::new()),
        BackgroundKind::Circles => Box::new(Circles::new()),
        BackgroundKind::Confetti => Box::new(Confetti::new()),
        BackgroundKind::Fireflies => Box::new(Fireflies::new()),
        BackgroundKind::Galaxy => Box::new(Galaxy::new()),
        BackgroundKind::Lines => Box::new(Lines::new()),
        BackgroundKind::NightSky => Box::new(NightSky::new()),
        BackgroundKind::Noise => Box::new(Noise::new()),
        BackgroundKind::Ripple => Box::new(Ripple::new()),
        BackgroundKind::Spotlight => Box::new(Spotlight::new()),
        BackgroundKind::NeonCity => Box::new(NeonCity::new()),
        BackgroundKind::Aurora => Box::new(Aurora::new()),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use vitrine_engine::{FrameContext, Pointer, Surface};

    use super::*;

    /// Every catalog entry builds, rebuilds and paints a frame without
    /// touching pixels outside the surface.
    #[test]
    fn every_variant_paints_a_frame() {
        for kind in BackgroundKind::ALL {
            let mut rng = StdRng::seed_from_u64(1);
            let mut surface = Surface::new(40, 12).unwrap();
            let mut bg = catalog(kind);
            bg.rebuild(surface.width(), surface.height(), &mut rng);
            let ctx = FrameContext {
                t: 1.0,
                dt: 1.0,
                width: surface.width(),
                height: surface.height(),
                pointer: Pointer::OFF_SURFACE,
            };
            bg.frame(&mut surface, &ctx, &mut rng);
        }
    }

    #[test]
    fn only_ripple_asks_for_pointer_events() {
        for kind in BackgroundKind::ALL {
            let bg = catalog(kind);
            assert_eq!(bg.wants_pointer(), kind == BackgroundKind::Ripple, "{kind:?}");
        }
    }
}
