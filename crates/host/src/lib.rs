//! gnomebot host - Lifecycle boundary
//!
//! This crate owns the event core for one bot process: it initialises
//! logging, constructs the registry at startup, attaches and detaches
//! plugins, raises events on behalf of game-state logic and clears
//! everything at shutdown.

pub mod error;
pub mod lifecycle;
pub mod logging;

pub use error::{HostError, HostResult};
pub use lifecycle::{Host, PluginHandle};
pub use logging::init_logging;

pub use gnomebot_core as event_core;
