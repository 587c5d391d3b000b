//! Attack math and outcome records.
//!
//! The functions here are pure: they take stat totals and pre-drawn random
//! values and return numbers. The hook-driven pipeline that draws the rolls
//! and mutates state lives on the engine
//! ([`CombatEngine::resolve_attack`](crate::engine::CombatEngine::resolve_attack)).
//!
//! - `hit_chance`: accuracy vs avoidability, attenuated by distance
//! - `damage_factor`: offense vs defense saturation curve
//! - `attribute_multiplier`: stacked weaknesses and resistances

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{DamageRoll, attribute_multiplier, damage_factor, variance_factor};
pub use hit::{distance_factor, effective_distance, hit_chance};
pub use result::{AttackChain, AttackResult};
