//! Host lifecycle - startup, plugin attach/detach, event raising, shutdown
//!
//! The registry and dispatcher stay private to the host so nothing can
//! register or deliver once the host has shut down.
//!
//! # Example
//!
//! ```ignore
//! use gnomebot_host::Host;
//! use gnomebot_core::{EventKind, EventMask, Listener};
//!
//! let host = Host::start_in(base_dir)?;
//! let handle = host.attach(EventMask::BOT | EventMask::PLAYER, Listener::shared(AutoLoot::new()))?;
//!
//! host.raise(EventKind::BotStart)?;
//! // ...
//! host.detach(&handle);
//! host.shutdown();
//! ```

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::instrument;

use gnomebot_core::{
    CoreConfig, DispatchReport, Dispatcher, Event, EventKind, EventMask, Registry, SubscriberRef,
    SubscriptionKey,
};

use crate::error::{HostError, HostResult};
use crate::logging::init_logging;

/// A plugin attached to the host
///
/// Returned by [`Host::attach`]; pass it to [`Host::detach`] at unload.
#[derive(Clone)]
pub struct PluginHandle {
    subscriber: SubscriberRef,
    keys: Vec<SubscriptionKey>,
}

impl PluginHandle {
    /// Name of the attached subscriber
    pub fn name(&self) -> &str {
        self.subscriber.name()
    }

    /// Registrations made on attach
    pub fn keys(&self) -> &[SubscriptionKey] {
        &self.keys
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("name", &self.name())
            .field("keys", &self.keys)
            .finish()
    }
}

/// Owner of the event core for one bot process
#[derive(Debug)]
pub struct Host {
    config: CoreConfig,
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
    /// Held for reading while attaching, for writing while shutting down
    running: RwLock<bool>,
}

impl Host {
    /// Start a host with `config` and an empty registry
    ///
    /// Does not touch logging; see [`Host::start_in`] for the full startup.
    #[instrument(skip_all)]
    pub fn startup(config: CoreConfig) -> Self {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::with_config(Arc::clone(&registry), &config);

        tracing::info!("Event host started (config v{})", config.version);

        Self {
            config,
            registry,
            dispatcher,
            running: RwLock::new(true),
        }
    }

    /// Load `{base}/configs/core.toml`, initialise logging and start
    ///
    /// A default config is written if none exists.
    #[instrument(skip_all)]
    pub fn start_in(base: &Path) -> HostResult<Self> {
        let config = CoreConfig::load(base)?;
        init_logging(&config);
        Ok(Self::startup(config))
    }

    /// The config this host was started with
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Total number of registrations across all plugins
    pub fn registration_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of subscribers registered for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.registry.subscriber_count(kind)
    }

    /// `false` once [`Host::shutdown`] has run
    pub fn is_running(&self) -> bool {
        *self.running.read()
    }

    fn ensure_running(&self) -> HostResult<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(HostError::ShutDown)
        }
    }

    /// Register `subscriber` for every kind in `mask`
    ///
    /// Registration happens under the running lock, so an attach racing
    /// [`Host::shutdown`] either lands before the registry is cleared or
    /// fails with `ShutDown`.
    #[instrument(skip_all, fields(plugin = subscriber.name()))]
    pub fn attach(&self, mask: EventMask, subscriber: SubscriberRef) -> HostResult<PluginHandle> {
        let running = self.running.read();
        if !*running {
            return Err(HostError::ShutDown);
        }
        let keys = self.registry.register_mask(mask, &subscriber);
        drop(running);

        tracing::info!(
            "Attached plugin '{}' for {} kind(s)",
            subscriber.name(),
            keys.len()
        );
        Ok(PluginHandle { subscriber, keys })
    }

    /// Remove the registrations made when `handle` was attached
    ///
    /// Other handles for the same subscriber keep theirs, except for kinds
    /// both masks share: registration is deduplicated, so those handles
    /// hold the same key. Returns how many registrations were removed.
    /// Detaching twice is a no-op.
    #[instrument(skip_all, fields(plugin = handle.name()))]
    pub fn detach(&self, handle: &PluginHandle) -> usize {
        let removed = handle
            .keys
            .iter()
            .filter(|key| self.registry.remove(**key))
            .count();
        if removed > 0 {
            tracing::info!("Detached plugin '{}'", handle.name());
        }
        removed
    }

    /// Dispatch `event` to its subscribers
    ///
    /// An emit racing [`Host::shutdown`] may still reach subscribers it
    /// captured before the registry was cleared.
    ///
    /// # Errors
    /// `ShutDown` after shutdown, `Event` if the event is invalid.
    pub fn emit(&self, event: &Event) -> HostResult<DispatchReport> {
        self.ensure_running()?;
        Ok(self.dispatcher.dispatch(event)?)
    }

    /// Dispatch an event of `kind` with its conventional handler name
    pub fn raise(&self, kind: EventKind) -> HostResult<DispatchReport> {
        self.ensure_running()?;
        Ok(self.dispatcher.raise(kind)?)
    }

    /// Stop the host and clear the registry
    ///
    /// Idempotent. Attaching or raising afterwards fails with `ShutDown`.
    #[instrument(skip_all)]
    pub fn shutdown(&self) {
        {
            let mut running = self.running.write();
            if !*running {
                return;
            }
            *running = false;
        }
        self.registry.clear();
        tracing::info!("Event host shutdown complete");
    }
}
