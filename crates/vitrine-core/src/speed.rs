//! Animation speed settings.

use serde::{Deserialize, Serialize};

/// Global animation speed for a mounted background.
///
/// Simulation time advances by a fixed increment per frame callback, never
/// by measured wall time, so a slow terminal renders the same animation in
/// slow motion instead of skipping ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Fixed simulation-time increment per frame.
    pub fn time_step(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 2.0,
        }
    }

    /// Cycle slow -> medium -> fast -> slow.
    pub fn next(self) -> AnimationSpeed {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }
}
