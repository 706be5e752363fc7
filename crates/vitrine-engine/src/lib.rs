//! The per-background animation engine.
//!
//! Every vitrine background is driven by the same machinery: a resizable
//! pixel [`Surface`] bound to the host terminal, a [`Population`] of
//! independently-updated entities that is rebuilt wholesale on resize, and
//! a frame loop with an explicit Running/Stopped state machine. The
//! [`Engine`] wires the three to one host-provided surface, starts the loop
//! on mount and guarantees full teardown on unmount.
//!
//! Scheduling and host notifications are injected ([`Scheduler`],
//! [`EventSource`]) so the loop can be stepped deterministically in tests
//! without a real terminal.

mod context;
mod engine;
mod error;
mod events;
mod population;
mod scheduler;
mod surface;

pub use context::{FrameContext, Pointer};
pub use engine::{Background, Engine, LoopState};
pub use error::EngineError;
pub use events::{EventSource, HostEvents, Subscription};
pub use population::{Entity, Fate, Population, spawn_count};
pub use scheduler::{FrameHandle, ManualScheduler, Scheduler, TickScheduler};
pub use surface::{PIXELS_PER_COL, PIXELS_PER_ROW, Surface, SurfaceWidget};
