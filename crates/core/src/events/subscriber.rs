//! Subscriber capability and the two ways of building one
//!
//! - [`HandlerTable`]: handlers looked up by name at dispatch time
//! - [`BotListener`]: one typed method per kind, wrapped in [`Listener`]
//!
//! # Example
//!
//! ```ignore
//! use gnomebot_core::events::{EventKind, HandlerTable};
//!
//! let looter = HandlerTable::new("looter")
//!     .on("on_player_died", |event| {
//!         tracing::info!("{} - stop looting", event.kind());
//!         Ok(())
//!     })
//!     .into_ref();
//!
//! registry.register(EventKind::PlayerDied, looter)?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Event, EventKind};
use crate::error::HandlerError;

/// Something that can be notified of events
///
/// Identity is `Arc` pointer identity: registering the same `Arc` twice for
/// a kind is deduplicated, two separately allocated subscribers are not.
pub trait Subscriber: Send + Sync + 'static {
    /// Name used in logs and failure reports
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Invoke the handler called `handler` with `event`
    ///
    /// Return [`HandlerError::Missing`] when no such handler exists.
    fn invoke(&self, handler: &str, event: &Event) -> Result<(), HandlerError>;
}

/// Shared reference to a registered subscriber
pub type SubscriberRef = Arc<dyn Subscriber>;

/// Boxed named handler
pub type HandlerFn = Box<dyn Fn(&Event) -> Result<(), HandlerError> + Send + Sync>;

/// Subscriber whose handlers are resolved by name
pub struct HandlerTable {
    name: String,
    handlers: HashMap<String, HandlerFn>,
}

impl HandlerTable {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    /// Add (or replace) the handler called `handler`
    pub fn on<F>(mut self, handler: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(handler.into(), Box::new(callback));
        self
    }

    /// Add the handler under the kind's conventional name
    pub fn on_kind<F>(self, kind: EventKind, callback: F) -> Self
    where
        F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(kind.default_handler(), callback)
    }

    /// Whether a handler with this name exists
    pub fn handles(&self, handler: &str) -> bool {
        self.handlers.contains_key(handler)
    }

    /// Wrap in an `Arc` ready for registration
    pub fn into_ref(self) -> SubscriberRef {
        Arc::new(self)
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerTable")
            .field("name", &self.name)
            .field("handlers", &names)
            .finish()
    }
}

impl Subscriber for HandlerTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, handler: &str, event: &Event) -> Result<(), HandlerError> {
        match self.handlers.get(handler) {
            Some(callback) => callback(event),
            None => Err(HandlerError::Missing(handler.to_string())),
        }
    }
}

/// Typed listener with one method per event kind
///
/// Every method defaults to a no-op. Wrap an implementation in [`Listener`]
/// to register it; it answers each kind's conventional handler name
/// (see [`EventKind::default_handler`]).
pub trait BotListener: Send + Sync + 'static {
    /// Name used in logs and failure reports
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// A plugin finished loading
    fn on_plugin_loaded(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Plugin settings changed and should be reloaded
    fn on_plugin_config(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The player character died
    fn on_player_died(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The player character was located in the world
    fn on_player_found(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The bot started running
    fn on_bot_start(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The bot stopped running
    fn on_bot_stop(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }

    /// A chat message arrived
    fn on_message_received(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }

    /// A private whisper arrived
    fn on_whisper_received(&self, _event: &Event) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Adapter registering a [`BotListener`] as a [`Subscriber`]
#[derive(Debug)]
pub struct Listener<L>(pub L);

impl<L: BotListener> Listener<L> {
    /// Wrap `listener` in an `Arc` ready for registration
    pub fn shared(listener: L) -> SubscriberRef {
        Arc::new(Self(listener))
    }
}

impl<L: BotListener> Subscriber for Listener<L> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn invoke(&self, handler: &str, event: &Event) -> Result<(), HandlerError> {
        let kind = EventKind::ALL
            .into_iter()
            .find(|kind| kind.default_handler() == handler)
            .ok_or_else(|| HandlerError::Missing(handler.to_string()))?;

        let listener = &self.0;
        match kind {
            EventKind::PluginLoaded => listener.on_plugin_loaded(event),
            EventKind::PluginConfig => listener.on_plugin_config(event),
            EventKind::PlayerDied => listener.on_player_died(event),
            EventKind::PlayerFound => listener.on_player_found(event),
            EventKind::BotStart => listener.on_bot_start(event),
            EventKind::BotStop => listener.on_bot_stop(event),
            EventKind::MessageReceived => listener.on_message_received(event),
            EventKind::WhisperReceived => listener.on_whisper_received(event),
            EventKind::None => Err(HandlerError::Missing(handler.to_string())),
        }
    }
}
