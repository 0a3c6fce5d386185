//! Subscriber registry - kind to ordered subscribers
//!
//! Registration order is preserved per kind. Registration is deduplicated by
//! subscriber identity: registering the same `Arc` again for a kind returns
//! the existing key. `unregister` removes every matching entry, which with
//! deduplication is at most one.

use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use super::{EventKind, EventMask, SubscriberRef};
use crate::error::{EventError, EventResult, InvalidEventReason};

new_key_type! {
    /// Key for a single registration, used for removal
    pub struct SubscriptionKey;
}

struct Entry {
    key: SubscriptionKey,
    subscriber: SubscriberRef,
}

#[derive(Default)]
struct RegistryInner {
    /// Key to the kind it was registered for
    keys: SlotMap<SubscriptionKey, EventKind>,
    /// Entries indexed by kind ordinal, in registration order
    by_kind: [Vec<Entry>; EventKind::COUNT],
}

impl RegistryInner {
    fn entries(&self, kind: EventKind) -> &[Entry] {
        &self.by_kind[kind.ordinal() as usize]
    }

    fn entries_mut(&mut self, kind: EventKind) -> &mut Vec<Entry> {
        &mut self.by_kind[kind.ordinal() as usize]
    }

    /// Take every entry for `kind` matching `subscriber` out of the registry
    ///
    /// The entries are returned so the caller can drop them after releasing
    /// the lock; a subscriber's `Drop` may call back into the registry.
    fn take_matching(&mut self, kind: EventKind, subscriber: &SubscriberRef) -> Vec<Entry> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(self.entries_mut(kind))
            .into_iter()
            .partition(|entry| same_subscriber(&entry.subscriber, subscriber));
        *self.entries_mut(kind) = kept;
        for entry in &removed {
            self.keys.remove(entry.key);
        }
        removed
    }
}

/// Identity comparison on the data pointer only
fn same_subscriber(a: &SubscriberRef, b: &SubscriberRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Maps each event kind to the subscribers registered for it
///
/// All methods take `&self`; share the registry through an `Arc`.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subscriber` for `kind`
    ///
    /// Appends to the end of the kind's list. If the same subscriber is
    /// already registered for `kind`, nothing is added and its existing key
    /// is returned.
    ///
    /// # Errors
    /// `InvalidEvent` if `kind` is `None`.
    pub fn register(
        &self,
        kind: EventKind,
        subscriber: SubscriberRef,
    ) -> EventResult<SubscriptionKey> {
        if kind.is_none() {
            return Err(EventError::InvalidEvent(InvalidEventReason::NoneKind));
        }

        let mut inner = self.inner.write();

        if let Some(existing) = inner
            .entries(kind)
            .iter()
            .find(|entry| same_subscriber(&entry.subscriber, &subscriber))
        {
            tracing::debug!(
                "Subscriber '{}' already registered for {}",
                subscriber.name(),
                kind
            );
            return Ok(existing.key);
        }

        let key = inner.keys.insert(kind);
        tracing::debug!("Registering '{}' for {}", subscriber.name(), kind);
        inner.entries_mut(kind).push(Entry { key, subscriber });

        tracing::trace!(
            "{} now has {} subscriber(s)",
            kind,
            inner.entries(kind).len()
        );
        Ok(key)
    }

    /// Register `subscriber` for every kind in `mask`, in ordinal order
    pub fn register_mask(
        &self,
        mask: EventMask,
        subscriber: &SubscriberRef,
    ) -> Vec<SubscriptionKey> {
        mask.kinds()
            .filter_map(|kind| self.register(kind, Arc::clone(subscriber)).ok())
            .collect()
    }

    /// Remove `subscriber` from `kind`
    ///
    /// Removes every matching entry. Returns `false` (not an error) if the
    /// subscriber was not registered for `kind`.
    pub fn unregister(&self, kind: EventKind, subscriber: &SubscriberRef) -> bool {
        let removed = self.inner.write().take_matching(kind, subscriber);
        if !removed.is_empty() {
            tracing::debug!("Unregistered '{}' from {}", subscriber.name(), kind);
        }
        !removed.is_empty()
    }

    /// Remove a single registration by key
    ///
    /// Returns `true` if the registration was found and removed.
    pub fn remove(&self, key: SubscriptionKey) -> bool {
        let (kind, removed) = {
            let mut inner = self.inner.write();
            let Some(kind) = inner.keys.remove(key) else {
                return false;
            };
            let entries = inner.entries_mut(kind);
            let removed = entries
                .iter()
                .position(|entry| entry.key == key)
                .map(|index| entries.remove(index));
            (kind, removed)
        };
        tracing::debug!("Removed subscription from {}", kind);
        drop(removed);
        true
    }

    /// Remove `subscriber` from every kind
    ///
    /// Returns how many registrations were removed.
    pub fn unregister_all(&self, subscriber: &SubscriberRef) -> usize {
        let removed: Vec<Entry> = {
            let mut inner = self.inner.write();
            EventKind::ALL
                .into_iter()
                .flat_map(|kind| inner.take_matching(kind, subscriber))
                .collect()
        };
        let removed = removed.len();
        if removed > 0 {
            tracing::debug!(
                "Unregistered '{}' from {} kind(s)",
                subscriber.name(),
                removed
            );
        }
        removed
    }

    /// Snapshot of the subscribers for `kind`, in registration order
    ///
    /// The returned list is a copy; later registry changes do not affect it.
    pub fn subscribers_for(&self, kind: EventKind) -> Vec<SubscriberRef> {
        self.inner
            .read()
            .entries(kind)
            .iter()
            .map(|entry| Arc::clone(&entry.subscriber))
            .collect()
    }

    /// Number of subscribers registered for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner.read().entries(kind).len()
    }

    /// Total number of registrations across all kinds
    pub fn len(&self) -> usize {
        self.inner.read().keys.len()
    }

    /// `true` if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.inner.read().keys.is_empty()
    }

    /// Remove every registration
    ///
    /// Subscribers are dropped after the lock is released.
    pub fn clear(&self) {
        let old = std::mem::take(&mut *self.inner.write());
        tracing::debug!("Cleared {} registration(s)", old.keys.len());
        drop(old);
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            let names: Vec<_> = inner
                .entries(kind)
                .iter()
                .map(|entry| entry.subscriber.name())
                .collect();
            if !names.is_empty() {
                map.entry(&kind, &names);
            }
        }
        map.finish()
    }
}
