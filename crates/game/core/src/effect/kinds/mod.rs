//! Reusable effect building blocks.
//!
//! Content never implements [`Effect`](super::Effect) directly; it composes
//! these blocks. Each block is a plain struct keyed by an [`EffectKey`] and
//! carrying an optional duration, so the same block serves as a passive
//! (no duration), a timed buff, or a single-attack effect (`Some(0)`).
//!
//! - `stat`: [`StatModifier`], [`AttackBonus`], [`RevertBonus`], [`Momentum`]
//! - `reaction`: [`CounterAttack`], [`FollowUpAttack`], [`RepeatAttack`],
//!   [`ParryStance`], [`Guardian`], [`Ambush`], [`Thorns`], [`Forewarned`]
//! - `affliction`: [`InflictOnHit`], [`InflictStatus`], [`Cleanse`],
//!   [`StatusSurge`], [`DotSiphon`]
//! - `sustain`: [`Regeneration`], [`ManaOnHit`], [`Restore`], [`HealingBoost`],
//!   [`Meditation`], [`TimeWarp`]

mod affliction;
mod reaction;
mod stat;
mod sustain;

pub use affliction::{Cleanse, DotSiphon, InflictOnHit, InflictStatus, StatusSurge};
pub use reaction::{
    Ambush, CounterAttack, FollowUpAttack, Forewarned, Guardian, ParryStance, RepeatAttack,
    Thorns,
};
pub use stat::{AttackBonus, Momentum, RevertBonus, StatModifier};
pub use sustain::{HealingBoost, ManaOnHit, Meditation, Regeneration, Restore, TimeWarp};

/// Adds `with_duration` / `single_attack` builders to blocks that carry a
/// `duration: Option<u32>` field.
macro_rules! timed {
    ($($block:ty),+ $(,)?) => {
        $(
            impl $block {
                /// Expire after `turns` end-of-turn ticks of the owner.
                pub fn with_duration(mut self, turns: u32) -> Self {
                    self.duration = Some(turns);
                    self
                }

                /// Live for a single attack (removed by the post-attack cleanup).
                pub fn single_attack(mut self) -> Self {
                    self.duration = Some(0);
                    self
                }
            }
        )+
    };
}

timed!(
    StatModifier,
    AttackBonus,
    Momentum,
    CounterAttack,
    FollowUpAttack,
    RepeatAttack,
    ParryStance,
    Guardian,
    Ambush,
    Thorns,
    Forewarned,
    InflictOnHit,
    StatusSurge,
    DotSiphon,
    Regeneration,
    ManaOnHit,
    HealingBoost,
    Meditation,
);
