//! Combat configuration constants and tunable parameters.
//!
//! Structural limits are associated constants; every balance knob lives in a
//! parameter group so content can override it from `config.toml`.

/// Action-timer and turn-cost parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingParams {
    /// Timer value at which an entity becomes eligible to act.
    pub max_action_timer: f64,
    /// Timer spent by a basic attack before hook multipliers.
    pub basic_action_usage: f64,
    /// Timer spent by a defend action.
    pub defend_usage: f64,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            max_action_timer: 100.0,
            basic_action_usage: 100.0,
            defend_usage: 100.0,
        }
    }
}

/// Hit-chance curve parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitParams {
    /// Steepness `C` of the accuracy/avoidability sigmoid.
    pub steepness: f64,
    /// Exponent applied to the effective distance in the distance factor.
    pub distance_exponent: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            steepness: 1.0,
            distance_exponent: 1.0,
        }
    }
}

/// Damage curve parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    /// Fraction `K` of offense dealt when offense equals defense.
    pub parity_fraction: f64,
    /// Exponent `C` applied to the offense/defense ratio.
    pub ratio_exponent: f64,
    /// Half-width of the random variance band (0.1 = ±10%).
    pub variance: f64,
    /// Damage multiplier applied while the defender is defending.
    pub defend_multiplier: f64,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            parity_fraction: 0.5,
            ratio_exponent: 2.0,
            variance: 0.1,
            defend_multiplier: 0.5,
        }
    }
}

/// Mana gain parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManaParams {
    /// Mana granted to the attacker after a basic attack.
    pub basic_attack_gain: u32,
    /// Mana refunded when a defending entity absorbs its first hit.
    pub defend_gain: u32,
}

impl Default for ManaParams {
    fn default() -> Self {
        Self {
            basic_attack_gain: 5,
            defend_gain: 5,
        }
    }
}

/// Status condition tolerance parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusParams {
    /// Starting maximum tolerance for every status condition.
    pub base_tolerance: f64,
    /// Tolerance removed each time a status is resisted.
    pub resist_tolerance_loss: f64,
    /// Growth factor applied to max tolerance when a status wears off.
    pub tolerance_growth: f64,
    /// Extension constant `p` for probabilistic duration extension.
    pub extension_probability: f64,
}

impl Default for StatusParams {
    fn default() -> Self {
        Self {
            base_tolerance: 100.0,
            resist_tolerance_loss: 25.0,
            tolerance_growth: 1.25,
            extension_probability: 0.5,
        }
    }
}

/// Aggro bookkeeping parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AggroParams {
    /// Multiplicative decay applied at the end of the owner's turn.
    pub decay: f64,
    /// Aggro added per point of damage dealt.
    pub per_damage: f64,
    /// Weights below this are dropped from the map.
    pub floor: f64,
}

impl Default for AggroParams {
    fn default() -> Self {
        Self {
            decay: 0.8,
            per_damage: 1.0,
            floor: 1e-6,
        }
    }
}

/// Reposition cost parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RepositionParams {
    /// Action time spent per distance step per target.
    pub cost_per_step: f64,
    /// Fixed overhead paid by any successful reposition.
    pub base_cost: f64,
}

impl Default for RepositionParams {
    fn default() -> Self {
        Self {
            cost_per_step: 10.0,
            base_cost: 20.0,
        }
    }
}

/// Complete combat configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub timing: TimingParams,
    pub hit: HitParams,
    pub damage: DamageParams,
    pub mana: ManaParams,
    pub status: StatusParams,
    pub aggro: AggroParams,
    pub reposition: RepositionParams,
    /// Upper bound on bonus attacks processed while resolving one action.
    pub max_bonus_attacks: usize,
}

impl CombatConfig {
    // ===== compile-time structural limits =====
    /// Maximum entities in one encounter (both teams combined).
    pub const MAX_ENTITIES: usize = 32;
    /// Largest distance between two opposing entities.
    pub const MAX_DISTANCE: u8 = 4;
    /// Largest distance change a single reposition may request.
    pub const MAX_REPOSITION_STEP: i8 = 2;
    /// Enchantments that may be stacked on one entity.
    pub const MAX_ENCHANTMENTS: usize = 8;

    /// Rejected decisions tolerated per turn before the actor defends.
    pub const MAX_DECISION_ATTEMPTS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_BONUS_ATTACKS: usize = 16;

    pub fn new() -> Self {
        Self {
            timing: TimingParams::default(),
            hit: HitParams::default(),
            damage: DamageParams::default(),
            mana: ManaParams::default(),
            status: StatusParams::default(),
            aggro: AggroParams::default(),
            reposition: RepositionParams::default(),
            max_bonus_attacks: Self::DEFAULT_MAX_BONUS_ATTACKS,
        }
    }

    pub fn with_max_bonus_attacks(mut self, max_bonus_attacks: usize) -> Self {
        self.max_bonus_attacks = max_bonus_attacks;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
