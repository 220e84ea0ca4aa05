use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid bet of {amount}: {reason}")]
    InvalidBet { amount: u64, reason: String },
    #[error("Illegal action {action}: {reason}")]
    IllegalAction { action: String, reason: String },
    #[error("Invalid ruleset: {0}")]
    InvalidRuleset(String),
    /// The shoe ran out mid-round. Penetration checks before each deal
    /// should make this unreachable.
    #[error("Shoe is empty")]
    EmptyShoe,
}

impl EngineError {
    pub(crate) fn invalid_bet(amount: u64, reason: impl Into<String>) -> Self {
        EngineError::InvalidBet {
            amount,
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal(action: impl ToString, reason: impl Into<String>) -> Self {
        EngineError::IllegalAction {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}
