//! Core types shared by the vitrine engine, backgrounds and showcase.
//!
//! This crate holds the leaf-level vocabulary: the background catalog,
//! animation speed, per-variant spawn profiles and color math. It has no
//! rendering dependencies so entity update logic can be tested on its own.

mod kind;
mod profile;
mod speed;

pub mod color;

pub use kind::BackgroundKind;
pub use profile::VariantProfile;
pub use speed::AnimationSpeed;
