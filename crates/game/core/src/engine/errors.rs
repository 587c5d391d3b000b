//! Recoverable action failures.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::EntityId;

/// Why a decision could not be carried out.
///
/// Every variant is reported before any state is touched, so the caller can
/// pick another decision for the same turn.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("not enough mana: need {required}, have {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("invalid targets for this action")]
    InvalidTargets,

    #[error("movement is restricted")]
    MovementRestricted,

    #[error("reposition by {amount} is out of bounds")]
    RepositionOutOfBounds { amount: i8 },

    #[error("not enough action time: need {required:.1}, have {available:.1}")]
    InsufficientActionTime { required: f64, available: f64 },

    #[error("unknown skill index {index}")]
    UnknownSkill { index: usize },

    #[error("{actor} is not the current actor")]
    NotCurrentActor { actor: EntityId },

    #[error("the encounter is already decided")]
    EncounterOver,
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            InsufficientMana { .. } | InsufficientActionTime { .. } => ErrorSeverity::Recoverable,
            MovementRestricted => ErrorSeverity::Recoverable,
            InvalidTargets | RepositionOutOfBounds { .. } | UnknownSkill { .. } => {
                ErrorSeverity::Validation
            }
            NotCurrentActor { .. } => ErrorSeverity::Validation,
            EncounterOver => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            InsufficientMana { .. } => "FAILURE_MANA",
            InvalidTargets => "FAILURE_TARGETS",
            MovementRestricted => "FAILURE_MOVEMENT_RESTRICTED",
            RepositionOutOfBounds { .. } => "FAILURE_REPOSITION_BOUNDS",
            InsufficientActionTime { .. } => "FAILURE_ACTION_TIME",
            UnknownSkill { .. } => "FAILURE_UNKNOWN_SKILL",
            NotCurrentActor { .. } => "FAILURE_NOT_CURRENT_ACTOR",
            EncounterOver => "FAILURE_ENCOUNTER_OVER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_severity() {
        let mana = ActionError::InsufficientMana {
            required: 10,
            available: 3,
        };
        assert_eq!(mana.error_code(), "FAILURE_MANA");
        assert!(mana.severity().is_recoverable());
        assert_eq!(ActionError::InvalidTargets.error_code(), "FAILURE_TARGETS");
        assert_eq!(
            ActionError::InvalidTargets.severity(),
            ErrorSeverity::Validation
        );
    }
}
