//! Engine error types.

use thiserror::Error;

/// Errors raised while binding an engine to its drawing surface.
///
/// A missing or zero-area surface is fatal for that engine instance: the
/// engine never transitions to Running and performs no subscriptions.
/// After a successful mount nothing is surfaced as a recoverable error;
/// painting is best-effort.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("drawing surface has zero area ({cols}x{rows} cells)")]
    EmptySurface { cols: u16, rows: u16 },
}
