use crate::routing::DestinationId;
use thiserror::Error;

/// Errors raised while building, binding or navigating between destinations.
///
/// Every variant is a local, recoverable condition. The `Flow` logs them and
/// turns the offending request into a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Tab '{0}' was not found in the tab set")]
    TabNotFound(String),

    #[error("No interactor registered for '{0}' with the requested request and result types")]
    InteractorNotFound(String),

    #[error("Child destination '{0}' was not found")]
    ChildDestinationNotFound(DestinationId),

    #[error("Interactor '{interactor}' does not support {requested} requests")]
    UnsupportedInteractorActionType {
        interactor: String,
        requested: &'static str,
    },

    #[error("No interface action bound for interaction '{0}'")]
    MissingInterfaceAction(String),

    #[error("No {kind} assistant registered for interaction '{interaction}'")]
    MissingInterfaceActionAssistant {
        interaction: String,
        kind: &'static str,
    },

    #[error("Interaction '{0}' already has a bound action on this destination")]
    DuplicateUserInteractionTypeUsed(String),

    #[error("Type mismatch during '{operation}': expected {expected}")]
    IncompatibleType {
        operation: String,
        expected: String,
    },

    #[error("Destination '{0}' is not registered in the flow")]
    DestinationNotFound(DestinationId),

    #[error("No provider registered for destination type '{0}'")]
    MissingProvider(String),

    #[error("No group can host a '{presentation}' presentation from the current destination")]
    NoHostGroup { presentation: String },

    #[error("Stack '{0}' has no destination above its root to pop")]
    NothingToPop(DestinationId),

    #[error("Interactor request failed: {0}")]
    InteractorFailed(String),

    #[error("A destination path must contain at least one presentation")]
    EmptyPath,

    #[error("Custom presentation handler rejected the request")]
    CustomPresentationRejected,
}

/// Errors that can occur while loading options or navigation scripts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid script: {0}")]
    InvalidScript(String),
}
