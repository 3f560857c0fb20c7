//! World snapshot and its shared guard
//!
//! The world is the only shared mutable resource. Queries borrow a `&World`
//! for their whole duration, so they always see one consistent snapshot;
//! mutation goes through `&mut World` (or the write half of [`SharedWorld`]).

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::shape::{EntityId, Lifecycle, MobileShape, StaticShape};

/// Complete level state: walls, mobile entities, and map extent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: f64,
    pub height: f64,
    /// Walls, in insertion order
    statics: Vec<StaticShape>,
    /// Mobile shapes (sorted by id for deterministic iteration)
    mobiles: Vec<MobileShape>,
    /// Next entity ID
    next_id: u32,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            statics: Vec::new(),
            mobiles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn statics(&self) -> &[StaticShape] {
        &self.statics
    }

    pub fn mobiles(&self) -> &[MobileShape] {
        &self.mobiles
    }

    pub fn add_static(&mut self, wall: StaticShape) {
        self.statics.push(wall);
    }

    /// Whether a wall already starts exactly at `origin`
    pub fn has_static_at(&self, origin: Point) -> bool {
        self.statics.iter().any(|s| s.origin() == origin)
    }

    /// Insert a mobile shape, assigning it a fresh id
    pub fn spawn(&mut self, mut mobile: MobileShape) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        mobile.id = id;
        // Ids grow monotonically, so pushing keeps the vector sorted
        self.mobiles.push(mobile);
        id
    }

    /// Remove a mobile shape; returns it if it was present
    ///
    /// Lookup is a binary search; removal shifts the tail to keep id order.
    pub fn despawn(&mut self, id: EntityId) -> Option<MobileShape> {
        let index = self.index_of(id)?;
        Some(self.mobiles.remove(index))
    }

    pub fn mobile(&self, id: EntityId) -> Option<&MobileShape> {
        self.index_of(id).map(|i| &self.mobiles[i])
    }

    pub fn mobile_mut(&mut self, id: EntityId) -> Option<&mut MobileShape> {
        self.index_of(id).map(|i| &mut self.mobiles[i])
    }

    /// Move a mobile shape's center; returns false for unknown ids
    pub fn move_mobile(&mut self, id: EntityId, center: Point) -> bool {
        match self.mobile_mut(id) {
            Some(m) => {
                m.center = center;
                true
            }
            None => false,
        }
    }

    /// Change a mobile shape's lifecycle; returns the previous state
    pub fn set_lifecycle(&mut self, id: EntityId, state: Lifecycle) -> Option<Lifecycle> {
        let m = self.mobile_mut(id)?;
        Some(std::mem::replace(&mut m.state, state))
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.mobiles.binary_search_by_key(&id, |m| m.id).ok()
    }
}

/// World behind a single read/write guard, shared between the tick and any
/// other reader
#[derive(Debug, Clone)]
pub struct SharedWorld(Arc<RwLock<World>>);

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self(Arc::new(RwLock::new(world)))
    }

    /// Consistent read snapshot held for the guard's lifetime
    pub fn read(&self) -> RwLockReadGuard<'_, World> {
        // Plain data: a poisoned lock still holds a usable world
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, World> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a freshly generated level
    pub fn replace(&self, world: World) -> World {
        std::mem::replace(&mut *self.write(), world)
    }
}
