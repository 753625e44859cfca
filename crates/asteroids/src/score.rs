//! Score keeping from destruction events

use sim_kernel::events::{DestructionCause, EntityDestroyed, EventBus, Listener, ListenerError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Listener summing the score of everything shot down
///
/// Only `Projectile` destructions count; asteroids that drift into a ship or
/// bullets that expire are worth nothing.
#[derive(Debug, Default)]
pub struct ScoreKeeper {
    total: AtomicU32,
    kills: AtomicU32,
}

impl ScoreKeeper {
    /// Create a keeper at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keeper and subscribe it to `events`
    pub fn attach(events: &EventBus) -> Arc<Self> {
        let keeper = Arc::new(Self::new());
        events.subscribe::<EntityDestroyed, _>(Arc::clone(&keeper));
        keeper
    }

    /// Unsubscribe from `events`
    pub fn detach(self: &Arc<Self>, events: &EventBus) -> bool {
        events.unsubscribe::<EntityDestroyed, _>(self)
    }

    /// Points earned so far
    pub fn total(&self) -> u32 {
        self.total.load(Ordering::Relaxed)
    }

    /// Projectile kills so far
    pub fn kills(&self) -> u32 {
        self.kills.load(Ordering::Relaxed)
    }

    /// Back to zero
    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.kills.store(0, Ordering::Relaxed);
    }
}

impl Listener<EntityDestroyed> for ScoreKeeper {
    fn on_event(&self, event: &EntityDestroyed) -> Result<(), ListenerError> {
        if event.cause != DestructionCause::Projectile {
            return Ok(());
        }
        self.total.fetch_add(event.score_value, Ordering::Relaxed);
        self.kills.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
