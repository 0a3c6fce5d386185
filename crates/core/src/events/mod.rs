//! Bot Event System
//!
//! The host raises typed events (plugin lifecycle, player state, bot
//! start/stop, chat) and plugins are notified through a named handler.
//!
//! # Architecture
//!
//! ```text
//! producer → Event(kind, handler) → Dispatcher → Registry snapshot → Subscriber::invoke
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gnomebot_core::events::{Dispatcher, Event, EventKind, HandlerTable, Registry};
//!
//! let registry = Arc::new(Registry::new());
//! let dispatcher = Dispatcher::new(Arc::clone(&registry));
//!
//! let announcer = HandlerTable::new("announcer")
//!     .on("on_bot_start", |event| {
//!         tracing::info!("bot started ({})", event.kind());
//!         Ok(())
//!     })
//!     .into_ref();
//! registry.register(EventKind::BotStart, announcer)?;
//!
//! dispatcher.dispatch(&Event::new(EventKind::BotStart, "on_bot_start")?)?;
//! ```

mod dispatcher;
mod event;
mod kind;
mod registry;
mod subscriber;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use event::Event;
pub use kind::{EventKind, EventMask, UnknownEventKind};
pub use registry::{Registry, SubscriptionKey};
pub use subscriber::{BotListener, HandlerFn, HandlerTable, Listener, Subscriber, SubscriberRef};
