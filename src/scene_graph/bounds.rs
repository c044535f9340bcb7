use std::cell::Cell;

use crate::math::Aabb;

/// One memoized value plus its dirty flag.
#[derive(Debug)]
struct CachedLevel<T: Copy> {
    value: Cell<T>,
    dirty: Cell<bool>,
}

impl<T: Copy> CachedLevel<T> {
    fn new(value: T) -> Self {
        Self {
            value: Cell::new(value),
            dirty: Cell::new(true),
        }
    }

    fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        if self.dirty.get() {
            let value = compute();
            self.value.set(value);
            self.dirty.set(false);
        }
        self.value.get()
    }

    fn invalidate(&self) {
        self.dirty.set(true);
    }

    fn is_dirty(&self) -> bool {
        self.dirty.get()
    }
}

/// Per-node bounding volumes, each cached and invalidated on its own.
///
/// Geometry bounds are pushed by the shape; every other level is derived on
/// read and kept until one of the `invalidate_*` calls marks it stale. `None`
/// means nothing contributes to that level.
#[derive(Debug)]
pub struct BoundsCache {
    geometry: Option<Aabb>,
    render: CachedLevel<Option<Aabb>>,
    local: CachedLevel<Option<Aabb>>,
    world: CachedLevel<Option<Aabb>>,
    world_render: CachedLevel<Option<Aabb>>,
}

impl Default for BoundsCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl BoundsCache {
    pub fn new(geometry: Option<Aabb>) -> Self {
        Self {
            geometry,
            render: CachedLevel::new(None),
            local: CachedLevel::new(None),
            world: CachedLevel::new(None),
            world_render: CachedLevel::new(None),
        }
    }

    pub fn geometry(&self) -> Option<Aabb> {
        self.geometry
    }

    /// Replaces the geometry and drops every level derived from it.
    pub fn set_geometry(&mut self, geometry: Option<Aabb>) {
        self.geometry = geometry;
        self.render.invalidate();
        self.local.invalidate();
        self.world.invalidate();
        self.world_render.invalidate();
    }

    pub fn render(&self, compute: impl FnOnce() -> Option<Aabb>) -> Option<Aabb> {
        self.render.get_or_compute(compute)
    }

    pub fn local(&self, compute: impl FnOnce() -> Option<Aabb>) -> Option<Aabb> {
        self.local.get_or_compute(compute)
    }

    pub fn world(&self, compute: impl FnOnce() -> Option<Aabb>) -> Option<Aabb> {
        self.world.get_or_compute(compute)
    }

    pub fn world_render(&self, compute: impl FnOnce() -> Option<Aabb>) -> Option<Aabb> {
        self.world_render.get_or_compute(compute)
    }

    pub fn invalidate_render(&self) {
        self.render.invalidate();
        self.world_render.invalidate();
    }

    pub fn invalidate_local(&self) {
        self.local.invalidate();
    }

    /// Drops both world-space levels.
    pub fn invalidate_world(&self) {
        self.world.invalidate();
        self.world_render.invalidate();
    }

    pub fn invalidate_world_render(&self) {
        self.world_render.invalidate();
    }

    pub fn is_render_dirty(&self) -> bool {
        self.render.is_dirty()
    }

    pub fn is_local_dirty(&self) -> bool {
        self.local.is_dirty()
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world.is_dirty()
    }

    pub fn clear(&mut self) {
        *self = BoundsCache::default();
    }
}
