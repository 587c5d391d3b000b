//! Environment collaborators consumed by the engine.
//!
//! The engine reads nothing from the outside world except randomness, which
//! is injected through the [`RngOracle`] trait so encounters stay replayable.

pub mod rng;

pub use rng::{MAX_LUCK_SAMPLES, PcgRng, RngOracle, compute_seed};
