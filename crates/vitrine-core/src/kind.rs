//! The catalog of shipped background variants.

use serde::{Deserialize, Serialize};

/// One background variant in the showcase catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundKind {
    #[default]
    Bubbles,
    Circles,
    Confetti,
    Fireflies,
    Galaxy,
    Lines,
    NightSky,
    Noise,
    Ripple,
    Spotlight,
    NeonCity,
    Aurora,
}

impl BackgroundKind {
    /// Catalog order, which is also the showcase cycling order.
    pub const ALL: [BackgroundKind; 12] = [
        BackgroundKind::Bubbles,
        BackgroundKind::Circles,
        BackgroundKind::Confetti,
        BackgroundKind::Fireflies,
        BackgroundKind::Galaxy,
        BackgroundKind::Lines,
        BackgroundKind::NightSky,
        BackgroundKind::Noise,
        BackgroundKind::Ripple,
        BackgroundKind::Spotlight,
        BackgroundKind::NeonCity,
        BackgroundKind::Aurora,
    ];

    /// Display label for the showcase overlay.
    pub fn name(self) -> &'static str {
        match self {
            BackgroundKind::Bubbles => "Bubbles",
            BackgroundKind::Circles => "Drifting Circles",
            BackgroundKind::Confetti => "Confetti",
            BackgroundKind::Fireflies => "Fireflies",
            BackgroundKind::Galaxy => "Galaxy",
            BackgroundKind::Lines => "Swaying Lines",
            BackgroundKind::NightSky => "Night Sky",
            BackgroundKind::Noise => "Noise Field",
            BackgroundKind::Ripple => "Ripples",
            BackgroundKind::Spotlight => "Spotlight",
            BackgroundKind::NeonCity => "Neon City",
            BackgroundKind::Aurora => "Aurora",
        }
    }

    /// Next variant in catalog order, wrapping at the end.
    pub fn next(self) -> BackgroundKind {
        let i = self.index();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Previous variant in catalog order, wrapping at the start.
    pub fn prev(self) -> BackgroundKind {
        let i = self.index();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }
}
