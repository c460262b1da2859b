//! Error types shared by the stores, the quiz session and the HTTP layer.

use thiserror::Error;

/// Failures reported by the word and level stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A required field was missing or blank.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The id or name no longer exists in the store.
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// A custom level with this name already exists.
    #[error("level name already in use: {0}")]
    DuplicateName(String),

    /// The backing storage could not be read or written.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn word_not_found(id: &str) -> Self {
        StoreError::NotFound {
            kind: "word",
            key: id.to_string(),
        }
    }

    pub fn level_not_found(name: &str) -> Self {
        StoreError::NotFound {
            kind: "level",
            key: name.to_string(),
        }
    }

    /// Returns `true` when the failure means the store itself is unreachable,
    /// as opposed to a problem with the request.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Validation(msg) => msg.clone(),
            StoreError::NotFound { kind, .. } => {
                format!("The {kind} no longer exists. Reload and try again.")
            }
            StoreError::DuplicateName(name) => {
                format!("A level named \"{name}\" already exists.")
            }
            StoreError::Unavailable(_) => {
                "Could not reach the word store. Check the connection and retry.".to_string()
            }
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(format!("sqlite: {err}"))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Unavailable(format!("corrupt stored data: {err}"))
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Unavailable(format!("storage task failed: {err}"))
    }
}

/// Failures of the quiz session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A standard session was requested with no stored words.
    #[error("no words available to quiz")]
    NoWords,

    /// None of the level's word ids exist any more.
    #[error("custom level has no existing words")]
    EmptyLevel,

    /// The submitted answer was blank after trimming.
    #[error("answer is empty")]
    EmptyAnswer,

    /// The action is not allowed in the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_connectivity() {
        assert!(StoreError::Unavailable("disk".into()).is_connectivity());
        assert!(!StoreError::Validation("x".into()).is_connectivity());
        assert!(!StoreError::word_not_found("1").is_connectivity());
        assert!(!StoreError::DuplicateName("basic".into()).is_connectivity());
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::level_not_found("basic");
        assert_eq!(err.to_string(), "level not found: basic");
    }

    #[test]
    fn test_io_error_maps_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_session_error_wraps_store_error() {
        let err: SessionError = StoreError::word_not_found("7").into();
        assert_eq!(err.to_string(), "word not found: 7");
    }
}
