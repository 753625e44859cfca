//! Typed publish/subscribe event bus
//!
//! - Dispatch is keyed by the concrete event type: a published `T` reaches
//!   only listeners subscribed to `T`.
//! - Delivery is synchronous and in subscription order.
//! - A failing or panicking listener is logged and skipped; the rest still run.
//! - Subscribing the same listener instance twice is a no-op.
//!
//! The listener table sits behind an `RwLock` so the bus can be shared by
//! reference with every system. Delivery works on a snapshot of the table, so
//! a listener may subscribe, unsubscribe or publish while being invoked; such
//! changes apply from the next publish on.

mod types;

pub use types::{DestructionCause, DifficultyChanged, DifficultySnapshot, EntityDestroyed};

use crate::ecs::EntityId;
use log::error;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Marker for anything that can be published on the bus
pub trait Event: Any + Send + Sync {
    /// Entity the event is about, if any
    fn source(&self) -> Option<EntityId> {
        None
    }
}

/// Failure reported by a listener
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener could not handle the event
    #[error("listener failed: {0}")]
    Failed(String),
}

impl ListenerError {
    /// Build a failure from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Receives events of type `E`
///
/// Listeners are shared (`&self`); keep mutable state behind atomics or locks.
pub trait Listener<E: Event>: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &E) -> Result<(), ListenerError>;
}

impl<E, F> Listener<E> for F
where
    E: Event,
    F: Fn(&E) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_event(&self, event: &E) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Outcome of one [`EventBus::publish`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Listeners that handled the event
    pub delivered: usize,
    /// Listeners that returned an error or panicked
    pub failed: usize,
}

struct Subscribers<E: Event> {
    entries: Vec<(usize, Arc<dyn Listener<E>>)>,
}

/// Listener identity: the address of the shared allocation
fn identity<T: ?Sized>(listener: &Arc<T>) -> usize {
    Arc::as_ptr(listener).cast::<()>() as usize
}

/// Synchronous, type-keyed event bus
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a listener to events of type `E`
    ///
    /// Returns false if this exact instance was already subscribed.
    pub fn subscribe<E, L>(&self, listener: Arc<L>) -> bool
    where
        E: Event,
        L: Listener<E> + 'static,
    {
        let key = identity(&listener);
        let mut table = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let slot = table
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Subscribers::<E> { entries: Vec::new() }));

        let Some(subscribers) = slot.downcast_mut::<Subscribers<E>>() else {
            return false;
        };
        if subscribers.entries.iter().any(|(k, _)| *k == key) {
            return false;
        }
        let listener: Arc<dyn Listener<E>> = listener;
        subscribers.entries.push((key, listener));
        true
    }

    /// Subscribe a closure, returning its handle for a later unsubscribe
    pub fn subscribe_fn<E, F>(&self, listener: F) -> Arc<F>
    where
        E: Event,
        F: Fn(&E) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        self.subscribe::<E, F>(Arc::clone(&listener));
        listener
    }

    /// Unsubscribe a listener; returns false if it was not subscribed
    pub fn unsubscribe<E, L>(&self, listener: &Arc<L>) -> bool
    where
        E: Event,
        L: Listener<E> + 'static,
    {
        let key = identity(listener);
        let mut table = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let Some(subscribers) = table
            .get_mut(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast_mut::<Subscribers<E>>())
        else {
            return false;
        };

        let before = subscribers.entries.len();
        subscribers.entries.retain(|(k, _)| *k != key);
        before != subscribers.entries.len()
    }

    /// Deliver an event to every current subscriber of its type
    ///
    /// Returns once every listener has been invoked. Publishing with no
    /// subscribers does nothing.
    pub fn publish<E: Event>(&self, event: E) -> Delivery {
        let snapshot: Vec<Arc<dyn Listener<E>>> = {
            let table = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
            match table
                .get(&TypeId::of::<E>())
                .and_then(|slot| slot.downcast_ref::<Subscribers<E>>())
            {
                Some(subscribers) => subscribers.entries.iter().map(|(_, l)| Arc::clone(l)).collect(),
                None => return Delivery::default(),
            }
        };

        let mut delivery = Delivery::default();
        for listener in snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener.on_event(&event))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(err)) => {
                    error!("Listener for {} failed: {}", type_name::<E>(), err);
                    delivery.failed += 1;
                }
                Err(_) => {
                    error!("Listener for {} panicked", type_name::<E>());
                    delivery.failed += 1;
                }
            }
        }
        delivery
    }

    /// Number of listeners subscribed to `E`
    pub fn listener_count<E: Event>(&self) -> usize {
        let table = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        table
            .get(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast_ref::<Subscribers<E>>())
            .map_or(0, |subscribers| subscribers.entries.len())
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
