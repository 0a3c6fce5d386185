//! Event value object

use std::sync::Arc;

use super::EventKind;
use crate::error::{EventError, EventResult, InvalidEventReason};

/// An immutable occurrence record: a kind plus the name of the handler
/// subscribers must expose to receive it
///
/// Two events are equal iff both fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    kind: EventKind,
    handler_name: Arc<str>,
}

impl Event {
    /// Create an event
    ///
    /// # Errors
    /// `InvalidEvent` if `kind` is `None` or `handler_name` is empty.
    pub fn new(kind: EventKind, handler_name: impl Into<Arc<str>>) -> EventResult<Self> {
        let handler_name = handler_name.into();
        validate(kind, &handler_name)?;
        Ok(Self { kind, handler_name })
    }

    /// Create an event using the kind's conventional handler name
    ///
    /// # Errors
    /// `InvalidEvent` if `kind` is `None`.
    pub fn for_kind(kind: EventKind) -> EventResult<Self> {
        Self::new(kind, kind.default_handler())
    }

    /// The event's kind, never `None`
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Name of the handler operation meant to receive this event
    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }
}

pub(crate) fn validate(kind: EventKind, handler_name: &str) -> EventResult<()> {
    if kind.is_none() {
        return Err(EventError::InvalidEvent(InvalidEventReason::NoneKind));
    }
    if handler_name.is_empty() {
        return Err(EventError::InvalidEvent(
            InvalidEventReason::EmptyHandlerName,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_round_trip() {
        for kind in EventKind::ALL {
            for name in ["on_event", "x", "handleWhisper:"] {
                let event = Event::new(kind, name).unwrap();
                assert_eq!(event.kind(), kind);
                assert_eq!(event.handler_name(), name);
            }
        }
    }

    #[test]
    fn test_none_kind_rejected() {
        for name in ["on_event", ""] {
            assert_eq!(
                Event::new(EventKind::None, name),
                Err(EventError::InvalidEvent(InvalidEventReason::NoneKind))
            );
        }
        assert!(Event::for_kind(EventKind::None).is_err());
    }

    #[test]
    fn test_empty_handler_rejected() {
        assert_eq!(
            Event::new(EventKind::BotStart, ""),
            Err(EventError::InvalidEvent(
                InvalidEventReason::EmptyHandlerName
            ))
        );
    }

    #[test]
    fn test_for_kind_uses_default_handler() {
        let event = Event::for_kind(EventKind::MessageReceived).unwrap();
        assert_eq!(event.handler_name(), "on_message_received");
    }

    #[test]
    fn test_equality_over_both_fields() {
        let a = Event::new(EventKind::BotStop, "on_stop").unwrap();
        let b = Event::new(EventKind::BotStop, String::from("on_stop")).unwrap();
        let c = Event::new(EventKind::BotStop, "on_halt").unwrap();
        let d = Event::new(EventKind::BotStart, "on_stop").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
