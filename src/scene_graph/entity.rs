use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

/// Stable per-node identity, distinct from the arena slot.
pub type Entity = u32;

/// Monotonic source of [`Entity`] values.
///
/// One process-wide instance is shared by every [`Scene`](crate::Scene) created
/// with [`Scene::new`](crate::Scene::new). Tests that need deterministic ids build
/// their own counter and call [`EntityCounter::reset`] on it.
#[derive(Debug, Default)]
pub struct EntityCounter {
    next: AtomicU32,
}

impl EntityCounter {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(0),
        }
    }

    pub fn global() -> Arc<EntityCounter> {
        static GLOBAL: OnceLock<Arc<EntityCounter>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(EntityCounter::new())).clone()
    }

    pub fn next(&self) -> Entity {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub fn peek(&self) -> Entity {
        self.next.load(Ordering::Relaxed)
    }

    /// Restarts numbering from zero. Intended for test harnesses only.
    pub fn reset(&self) {
        self.next.store(0, Ordering::Relaxed);
    }
}
