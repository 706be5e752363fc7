//! Per-frame simulation context.

/// Shared pointer position in device pixels.
///
/// Defaults to a point well off the surface so proximity-reactive entities
/// stay untriggered until the host reports a real pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub const OFF_SURFACE: Pointer = Pointer { x: -100.0, y: -100.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::OFF_SURFACE
    }
}

/// Everything an entity may read during one update step.
///
/// Simulation time advances by a fixed `dt` per frame callback; the engine
/// never measures wall time.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Accumulated simulation time.
    pub t: f32,
    /// Fixed time increment for this frame.
    pub dt: f32,
    /// Surface width in device pixels.
    pub width: f32,
    /// Surface height in device pixels.
    pub height: f32,
    /// Shared pointer position, off-surface by default.
    pub pointer: Pointer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pointer_is_off_surface() {
        let p = Pointer::default();
        assert_eq!(p, Pointer::OFF_SURFACE);
        assert!(p.distance_to(0.0, 0.0) > 140.0);
    }
}
