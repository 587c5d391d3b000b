//! Shared error classification.
//!
//! Domain errors such as [`ActionError`](crate::engine::ActionError) live next
//! to the operations that raise them and implement [`CombatError`], so a
//! driver can decide whether to retry, re-plan, or stop.
//!
//! Only conditions a well-behaved driver can hit are errors. Breaking the
//! calling contract (acting with a dead entity, attacking an ally, skipping
//! the turn sequence) panics.

/// How a driver should react to a rejected request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed later, or a cheaper one now
    /// (not enough mana or action time, rooted in place).
    Recoverable,
    /// The request itself is malformed: unknown skill, wrong target side,
    /// not this entity's turn.
    Validation,
    /// The encounter is decided; nothing more can be submitted.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Classification every combat error exposes alongside its message.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier used in logs and assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
