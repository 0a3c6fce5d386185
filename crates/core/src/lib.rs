//! gnomebot core - Event notification
//!
//! This crate contains the event taxonomy, the subscriber registry and the
//! dispatcher that the bot host uses to notify plugins.
//!
//! # Modules
//!
//! - [`events`] - event kinds, events, subscribers, registry and dispatch
//! - [`config`] - TOML configuration for the core and for plugins
//! - [`error`] - error types

pub mod config;
pub mod error;
pub mod events;

// Re-export commonly used items
pub use events::{
    BotListener, DispatchReport, Dispatcher, Event, EventKind, EventMask, HandlerTable, Listener,
    Registry, Subscriber, SubscriberRef, SubscriptionKey,
};

// Re-export error types
pub use error::{EventError, EventResult, HandlerError, HandlerInvocationError, InvalidEventReason};

// Re-export config types
pub use config::{ConfigError, ConfigResult, CoreConfig, PluginConfig};
