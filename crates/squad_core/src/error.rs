use std::fmt;
use thiserror::Error;

/// What kind of entity a lookup or insertion was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Team,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Team => write!(f, "team"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Duplicate {kind}: {name}")]
    Duplicate { kind: EntityKind, name: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("Invalid lineup: {0}")]
    InvalidLineup(String),

    #[error("Invalid player: {0}")]
    InvalidPlayer(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unsupported formation: {0}")]
    UnsupportedFormation(String),

    #[error("Squad is full: maximum {max} players")]
    SquadFull { max: usize },

    #[error("Insufficient budget: price {price}, available {budget}")]
    InsufficientBudget { price: u32, budget: u32 },

    #[error("Invalid match config: {0}")]
    InvalidConfig(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn duplicate(kind: EntityKind, name: impl Into<String>) -> Self {
        CoreError::Duplicate { kind, name: name.into() }
    }

    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        CoreError::NotFound { kind, name: name.into() }
    }

    /// Whether retrying with corrected input can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::Io(_) | CoreError::InsufficientBudget { .. } | CoreError::InvalidLineup(_)
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Deserialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CoreError::duplicate(EntityKind::Player, "Pedri");
        assert_eq!(err.to_string(), "Duplicate player: Pedri");

        let err = CoreError::not_found(EntityKind::Team, "Getafe");
        assert_eq!(err.to_string(), "team not found: Getafe");

        let err = CoreError::InsufficientBudget { price: 120, budget: 100 };
        assert_eq!(err.to_string(), "Insufficient budget: price 120, available 100");
    }

    #[test]
    fn test_serde_json_error_maps_to_deserialization() {
        let err: CoreError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CoreError::Deserialization(_)));
        assert!(!err.is_recoverable());
    }
}
