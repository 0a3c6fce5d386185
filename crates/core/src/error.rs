//! Error types for event construction and dispatch

use crate::events::EventKind;

/// Why an event was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEventReason {
    /// The kind was the `None` sentinel
    NoneKind,
    /// The handler name was empty
    EmptyHandlerName,
}

impl std::fmt::Display for InvalidEventReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoneKind => f.write_str("kind is the None sentinel"),
            Self::EmptyHandlerName => f.write_str("handler name is empty"),
        }
    }
}

/// Caller-visible errors from the event core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// Constructing, registering or dispatching an invalid event
    #[error("Invalid event: {0}")]
    InvalidEvent(InvalidEventReason),
}

/// Result type for event core operations
pub type EventResult<T> = Result<T, EventError>;

/// Failure raised by a single subscriber's handler
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// The subscriber exposes no handler with this name
    #[error("No handler named '{0}'")]
    Missing(String),

    /// The handler ran and reported a failure
    #[error("Handler failed: {0}")]
    Failed(String),

    /// The handler panicked
    #[error("Handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Convenience constructor for [`HandlerError::Failed`]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// A handler failure attributed to one subscriber during one dispatch
///
/// These never reach the producer; they are logged and collected in the
/// [`DispatchReport`](crate::events::DispatchReport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Subscriber '{subscriber}' failed handling {kind} via '{handler}': {source}")]
pub struct HandlerInvocationError {
    /// Name of the failing subscriber
    pub subscriber: String,
    /// Kind of the event being dispatched
    pub kind: EventKind,
    /// Handler name that was invoked
    pub handler: String,
    /// Underlying failure
    #[source]
    pub source: HandlerError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EventError::InvalidEvent(InvalidEventReason::NoneKind);
        assert_eq!(err.to_string(), "Invalid event: kind is the None sentinel");

        let err = HandlerInvocationError {
            subscriber: "looter".to_string(),
            kind: EventKind::PlayerDied,
            handler: "on_player_died".to_string(),
            source: HandlerError::Missing("on_player_died".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Subscriber 'looter' failed handling player_died via 'on_player_died': \
             No handler named 'on_player_died'"
        );
    }
}
