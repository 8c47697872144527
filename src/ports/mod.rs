//! Ports Layer - Trait definitions for external dependencies
//!
//! The analyzer's only outside dependency is randomness for bootstrap
//! resampling; it is injected through `RandomSource`.

pub mod random;

pub use random::{RandomSource, RngSource};
