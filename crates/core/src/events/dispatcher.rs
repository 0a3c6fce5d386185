//! Event dispatcher - synchronous fan-out to registered subscribers
//!
//! ```text
//! producer → Dispatcher::dispatch → Registry snapshot → subscriber.invoke(handler, event)
//! ```
//!
//! The registry lock is held only while taking the snapshot. Handlers run
//! outside it, so they may register or unregister without deadlocking, and
//! a concurrent unregister never removes a subscriber from a dispatch that
//! already took its snapshot.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::event::validate;
use super::{Event, EventKind, Registry};
use crate::config::CoreConfig;
use crate::error::{EventResult, HandlerError, HandlerInvocationError};

/// Outcome of a single dispatch call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Subscribers whose handler returned successfully
    pub delivered: usize,
    /// Subscribers whose handler was missing, failed or panicked
    pub failures: Vec<HandlerInvocationError>,
    /// Handlers that ran past the slow handler threshold
    pub slow: usize,
}

impl DispatchReport {
    /// Number of subscribers the event was offered to
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    /// `true` if no subscriber failed
    ///
    /// Slow handlers do not make a dispatch unclean.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Delivers events to the subscribers registered for their kind
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    slow_handler_threshold: Duration,
}

impl Dispatcher {
    /// Default time after which a single handler is reported as slow
    pub const DEFAULT_SLOW_HANDLER_THRESHOLD: Duration = Duration::from_millis(5);

    /// Create a dispatcher over `registry`
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            slow_handler_threshold: Self::DEFAULT_SLOW_HANDLER_THRESHOLD,
        }
    }

    /// Create a dispatcher using the thresholds in `config`
    pub fn with_config(registry: Arc<Registry>, config: &CoreConfig) -> Self {
        Self::new(registry)
            .with_slow_handler_threshold(Duration::from_millis(config.slow_handler_warn_ms))
    }

    /// Set the slow handler warning threshold
    pub fn with_slow_handler_threshold(mut self, threshold: Duration) -> Self {
        self.slow_handler_threshold = threshold;
        self
    }

    /// The registry this dispatcher reads from
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Dispatch `event` to every subscriber registered for its kind
    ///
    /// Subscribers are invoked in registration order with the handler named
    /// by the event. A missing handler, a handler error or a panic is logged
    /// and recorded in the report; the remaining subscribers are still
    /// notified. Dispatching a kind with no subscribers is a no-op.
    ///
    /// # Errors
    /// `InvalidEvent` if the event's kind is `None` or its handler name is
    /// empty. No subscriber is invoked in that case.
    pub fn dispatch(&self, event: &Event) -> EventResult<DispatchReport> {
        validate(event.kind(), event.handler_name())?;

        let subscribers = self.registry.subscribers_for(event.kind());
        let mut report = DispatchReport::default();

        if subscribers.is_empty() {
            tracing::trace!("No subscribers for {}", event.kind());
            return Ok(report);
        }

        tracing::trace!(
            "Dispatching {} via '{}' to {} subscriber(s)",
            event.kind(),
            event.handler_name(),
            subscribers.len()
        );

        for subscriber in &subscribers {
            let start = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                subscriber.invoke(event.handler_name(), event)
            }))
            .unwrap_or_else(|panic| Err(HandlerError::Panicked(panic_message(&*panic))));

            let elapsed = start.elapsed();
            if elapsed > self.slow_handler_threshold {
                report.slow += 1;
                tracing::warn!(
                    "Subscriber '{}' took {}ms handling {}",
                    subscriber.name(),
                    elapsed.as_millis(),
                    event.kind()
                );
            }

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(source) => {
                    let error = HandlerInvocationError {
                        subscriber: subscriber.name().to_string(),
                        kind: event.kind(),
                        handler: event.handler_name().to_string(),
                        source,
                    };
                    tracing::warn!("{}", error);
                    report.failures.push(error);
                }
            }
        }

        Ok(report)
    }

    /// Dispatch an event of `kind` using its conventional handler name
    ///
    /// # Errors
    /// `InvalidEvent` if `kind` is `None`.
    pub fn raise(&self, kind: EventKind) -> EventResult<DispatchReport> {
        self.dispatch(&Event::for_kind(kind)?)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;

    use parking_lot::Mutex;

    use super::*;
    use crate::error::{EventError, InvalidEventReason};
    use crate::events::{HandlerTable, SubscriberRef};

    type Log = Arc<Mutex<Vec<String>>>;

    /// Subscriber that records "<name>:<kind>" under `handler`
    fn recorder(name: &str, handler: &str, log: &Log) -> SubscriberRef {
        let log = Arc::clone(log);
        let tag = name.to_string();
        HandlerTable::new(name)
            .on(handler, move |event| {
                log.lock().push(format!("{}:{}", tag, event.kind()));
                Ok(())
            })
            .into_ref()
    }

    fn setup() -> (Arc<Registry>, Dispatcher, Log) {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        (registry, dispatcher, Arc::new(Mutex::new(Vec::new())))
    }

    #[test]
    fn test_invokes_named_handler_once() {
        let (registry, dispatcher, log) = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = HandlerTable::new("s")
            .on("playerDied", move |event| {
                sink.lock().push(event.clone());
                Ok(())
            })
            .into_ref();
        registry.register(EventKind::PlayerDied, sub).unwrap();
        registry
            .register(EventKind::PlayerDied, recorder("r", "other", &log))
            .unwrap();

        let event = Event::new(EventKind::PlayerDied, "playerDied").unwrap();
        let report = dispatcher.dispatch(&event).unwrap();

        assert_eq!(*seen.lock(), vec![event]);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_registration_order() {
        let (registry, dispatcher, log) = setup();
        registry
            .register(EventKind::BotStart, recorder("first", "on_bot_start", &log))
            .unwrap();
        registry
            .register(EventKind::BotStart, recorder("second", "on_bot_start", &log))
            .unwrap();

        let report = dispatcher.raise(EventKind::BotStart).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.delivered, 2);
        assert_eq!(*log.lock(), ["first:bot_start", "second:bot_start"]);
    }

    #[test]
    fn test_unregistered_subscriber_not_invoked() {
        let (registry, dispatcher, log) = setup();
        let sub = recorder("s", "on_bot_stop", &log);
        registry.register(EventKind::BotStop, Arc::clone(&sub)).unwrap();
        registry.unregister(EventKind::BotStop, &sub);

        let report = dispatcher.raise(EventKind::BotStop).unwrap();

        assert_eq!(report.attempted(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_duplicate_registration_invoked_once() {
        let (registry, dispatcher, log) = setup();
        let sub = recorder("s", "on_player_found", &log);
        registry.register(EventKind::PlayerFound, Arc::clone(&sub)).unwrap();
        registry.register(EventKind::PlayerFound, sub).unwrap();

        dispatcher.raise(EventKind::PlayerFound).unwrap();

        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_no_subscribers_is_noop() {
        let (_registry, dispatcher, _log) = setup();
        for kind in EventKind::ALL {
            let report = dispatcher.raise(kind).unwrap();
            assert_eq!(report, DispatchReport::default());
        }
    }

    #[test]
    fn test_none_kind_rejected() {
        let (_registry, dispatcher, _log) = setup();
        assert_eq!(
            dispatcher.raise(EventKind::None),
            Err(EventError::InvalidEvent(InvalidEventReason::NoneKind))
        );
    }

    #[test]
    fn test_failure_isolation() {
        let (registry, dispatcher, log) = setup();
        let failing = HandlerTable::new("failing")
            .on("on_message_received", |_| Err(HandlerError::failed("boom")))
            .into_ref();
        let panicking = HandlerTable::new("panicking")
            .on("on_message_received", |_| panic!("handler exploded"))
            .into_ref();
        let missing = HandlerTable::new("missing").into_ref();

        registry.register(EventKind::MessageReceived, failing).unwrap();
        registry.register(EventKind::MessageReceived, panicking).unwrap();
        registry.register(EventKind::MessageReceived, missing).unwrap();
        registry
            .register(
                EventKind::MessageReceived,
                recorder("last", "on_message_received", &log),
            )
            .unwrap();

        let report = dispatcher.raise(EventKind::MessageReceived).unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(*log.lock(), ["last:message_received"]);

        let sources: Vec<_> = report.failures.iter().map(|f| f.source.clone()).collect();
        assert_eq!(
            sources,
            vec![
                HandlerError::Failed("boom".to_string()),
                HandlerError::Panicked("handler exploded".to_string()),
                HandlerError::Missing("on_message_received".to_string()),
            ]
        );
        assert_eq!(report.failures[0].subscriber, "failing");
        assert_eq!(report.failures[0].kind, EventKind::MessageReceived);
    }

    #[test]
    fn test_handler_may_unregister_during_dispatch() {
        let (registry, dispatcher, log) = setup();
        let victim = recorder("victim", "on_player_died", &log);

        let reg = Arc::clone(&registry);
        let target = Arc::clone(&victim);
        let remover = HandlerTable::new("remover")
            .on("on_player_died", move |_| {
                reg.unregister(EventKind::PlayerDied, &target);
                Ok(())
            })
            .into_ref();

        registry.register(EventKind::PlayerDied, remover).unwrap();
        registry.register(EventKind::PlayerDied, victim).unwrap();

        // Snapshot taken before the removal still includes the victim
        let report = dispatcher.raise(EventKind::PlayerDied).unwrap();
        assert_eq!(report.delivered, 2);
        assert_eq!(*log.lock(), ["victim:player_died"]);

        let report = dispatcher.raise(EventKind::PlayerDied).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_concurrent_unregister_keeps_snapshot() {
        let (registry, dispatcher, log) = setup();
        let gate = Arc::new(Barrier::new(2));
        let resume = Arc::new(Barrier::new(2));

        let (g, r) = (Arc::clone(&gate), Arc::clone(&resume));
        let blocker = HandlerTable::new("blocker")
            .on("on_whisper_received", move |_| {
                g.wait();
                r.wait();
                Ok(())
            })
            .into_ref();
        let second = recorder("second", "on_whisper_received", &log);

        registry.register(EventKind::WhisperReceived, blocker).unwrap();
        registry
            .register(EventKind::WhisperReceived, Arc::clone(&second))
            .unwrap();

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| dispatcher.raise(EventKind::WhisperReceived));

            // Dispatch is in flight inside the first handler
            gate.wait();
            assert!(registry.unregister(EventKind::WhisperReceived, &second));
            resume.wait();

            let report = handle.join().unwrap().unwrap();
            assert_eq!(report.delivered, 2);
        });

        assert_eq!(*log.lock(), ["second:whisper_received"]);
        assert_eq!(registry.subscriber_count(EventKind::WhisperReceived), 1);
    }

    #[test]
    fn test_with_config_threshold() {
        let registry = Arc::new(Registry::new());
        let config = CoreConfig {
            slow_handler_warn_ms: 250,
            ..CoreConfig::default()
        };
        let dispatcher = Dispatcher::with_config(registry, &config);
        assert_eq!(dispatcher.slow_handler_threshold, Duration::from_millis(250));
    }

    #[test]
    fn test_slow_handler_counted_not_failed() {
        let registry = Arc::new(Registry::new());
        let sleeper = HandlerTable::new("sleeper")
            .on_kind(EventKind::BotStop, |_| {
                std::thread::sleep(Duration::from_millis(2));
                Ok(())
            })
            .into_ref();
        registry.register(EventKind::BotStop, sleeper).unwrap();

        let strict = Dispatcher::new(Arc::clone(&registry))
            .with_slow_handler_threshold(Duration::ZERO);
        let report = strict.raise(EventKind::BotStop).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.slow, 1);
        assert!(report.is_clean());

        let lenient =
            Dispatcher::new(registry).with_slow_handler_threshold(Duration::from_secs(60));
        let report = lenient.raise(EventKind::BotStop).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.slow, 0);
    }
}
