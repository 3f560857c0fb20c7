//! Shooting: the gun cycle, target acquisition and delayed creature removal

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::shape::{EntityId, Lifecycle};
use super::tracer::RayTracer;
use super::world::World;
use crate::Settings;

/// Gun cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GunPhase {
    #[default]
    Idle,
    Shooting,
    Reloading,
}

/// Gun state machine: `Idle -> Shooting -> Reloading -> Idle`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gun {
    pub phase: GunPhase,
    /// Percent of the shot animation played, in [0, 100)
    pub shooting_progress: f64,
    /// Percent of the reload played, in [0, 100)
    pub reload_progress: f64,
    shooting_ticks: u32,
    reloading_ticks: u32,
    shooting_elapsed: u32,
    reloading_elapsed: u32,
}

impl Gun {
    pub fn new(shooting_ticks: u32, reloading_ticks: u32) -> Self {
        Self {
            phase: GunPhase::Idle,
            shooting_progress: 0.0,
            reload_progress: 0.0,
            shooting_ticks,
            reloading_ticks,
            shooting_elapsed: 0,
            reloading_elapsed: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.gun_shooting_ticks, settings.gun_reloading_ticks)
    }

    /// Start a shot; returns false while the gun is busy
    pub fn trigger(&mut self) -> bool {
        if self.phase != GunPhase::Idle {
            return false;
        }
        self.phase = GunPhase::Shooting;
        self.shooting_elapsed = 0;
        self.reloading_elapsed = 0;
        self.shooting_progress = 0.0;
        self.reload_progress = 0.0;
        true
    }

    /// Advance one tick
    ///
    /// A finished shot rolls into reloading within the same tick.
    pub fn update(&mut self) {
        if self.phase == GunPhase::Shooting {
            if self.shooting_elapsed >= self.shooting_ticks {
                self.phase = GunPhase::Reloading;
            } else {
                self.shooting_progress = percent(self.shooting_elapsed, self.shooting_ticks);
                self.shooting_elapsed += 1;
            }
        }
        if self.phase == GunPhase::Reloading {
            if self.reloading_elapsed >= self.reloading_ticks {
                self.phase = GunPhase::Idle;
            } else {
                self.reload_progress = percent(self.reloading_elapsed, self.reloading_ticks);
                self.reloading_elapsed += 1;
            }
        }
    }
}

fn percent(elapsed: u32, total: u32) -> f64 {
    elapsed as f64 / total as f64 * 100.0
}

/// The creature a shot from `origin` along `angle` would hit
///
/// A creature overlapping the shooter is hit point-blank. Otherwise the
/// bullet marches like a ray; the first thing it meets decides the shot and
/// a wall stops it.
pub fn acquire_target(world: &World, tracer: &RayTracer, origin: Point, angle: f64) -> Option<EntityId> {
    tracer
        .first_along_ray(world, origin, angle)
        .as_mobile()
        .filter(|m| m.is_creature())
        .map(|m| m.id)
}

/// Shot creatures waiting out their grace period before removal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KillQueue {
    killing_ticks: u32,
    /// Remaining ticks per creature (ordered by id for deterministic updates)
    pending: BTreeMap<EntityId, u32>,
}

impl KillQueue {
    pub fn new(killing_ticks: u32) -> Self {
        Self {
            killing_ticks,
            pending: BTreeMap::new(),
        }
    }

    /// Mark a living creature as killed; returns false if it was not alive
    pub fn kill(&mut self, world: &mut World, id: EntityId) -> bool {
        match world.mobile(id).map(|m| m.state) {
            Some(Lifecycle::Alive) => {
                world.set_lifecycle(id, Lifecycle::Killed);
                self.pending.insert(id, self.killing_ticks);
                log::info!("Creature {} was killed", id);
                true
            }
            Some(Lifecycle::Killed) => {
                log::info!("Creature {} is already dead", id);
                false
            }
            Some(Lifecycle::Inert) | None => false,
        }
    }

    /// Count down one tick; returns the creatures removed from the world
    pub fn update(&mut self, world: &mut World) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.pending.retain(|&id, remaining| {
            if *remaining == 0 {
                world.despawn(id);
                log::info!("Creature {} disappeared", id);
                removed.push(id);
                false
            } else {
                *remaining -= 1;
                true
            }
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Whether no living creature remains
pub fn all_creatures_dead(world: &World) -> bool {
    !world.mobiles().iter().any(|m| m.state == Lifecycle::Alive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mapgen::add_border;
    use crate::sim::shape::{MobileShape, StaticShape};

    fn arena() -> World {
        let mut world = World::new(10.0, 10.0);
        add_border(&mut world, 1.0);
        world
    }

    #[test]
    fn test_gun_cycle() {
        let mut gun = Gun::new(2, 3);
        assert!(gun.trigger());
        assert!(!gun.trigger());
        assert_eq!(gun.phase, GunPhase::Shooting);

        gun.update();
        assert_eq!(gun.shooting_progress, 0.0);
        gun.update();
        assert_eq!(gun.shooting_progress, 50.0);
        assert_eq!(gun.phase, GunPhase::Shooting);

        // Shot ends and the first reload tick runs
        gun.update();
        assert_eq!(gun.phase, GunPhase::Reloading);
        assert_eq!(gun.reload_progress, 0.0);

        gun.update();
        gun.update();
        assert!((gun.reload_progress - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(gun.phase, GunPhase::Reloading);
        gun.update();
        assert_eq!(gun.phase, GunPhase::Idle);
        assert!(gun.trigger());
    }

    #[test]
    fn test_idle_gun_update_is_noop() {
        let mut gun = Gun::new(2, 6);
        gun.update();
        assert_eq!(gun.phase, GunPhase::Idle);
        assert_eq!(gun.shooting_progress, 0.0);
    }

    #[test]
    fn test_acquire_target() {
        let mut world = arena();
        let id = world.spawn(MobileShape::creature(Point::new(5.0, 3.0), 0.3, 0.5));
        let tracer = RayTracer::new(0.06, 20.0);
        let origin = Point::new(5.0, 6.0);

        assert_eq!(acquire_target(&world, &tracer, origin, 0.0), Some(id));
        assert_eq!(acquire_target(&world, &tracer, origin, 90.0), None);

        // A wall in between blocks the shot
        world.add_static(StaticShape::cell(4.5, 4.0, 1.0));
        assert_eq!(acquire_target(&world, &tracer, origin, 0.0), None);
    }

    #[test]
    fn test_point_blank_shot() {
        let mut world = arena();
        let id = world.spawn(MobileShape::creature(Point::new(5.0, 5.0), 0.3, 0.5));
        let tracer = RayTracer::new(0.06, 20.0);
        assert_eq!(acquire_target(&world, &tracer, Point::new(5.1, 5.0), 180.0), Some(id));
    }

    #[test]
    fn test_kill_queue_grace_period() {
        let mut world = arena();
        let id = world.spawn(MobileShape::creature(Point::new(5.0, 5.0), 0.3, 0.5));
        let mut queue = KillQueue::new(2);

        assert!(queue.kill(&mut world, id));
        assert!(!queue.kill(&mut world, id));
        assert_eq!(world.mobile(id).map(|m| m.state), Some(Lifecycle::Killed));
        assert!(all_creatures_dead(&world));

        assert!(queue.update(&mut world).is_empty());
        assert!(queue.update(&mut world).is_empty());
        assert_eq!(queue.update(&mut world), vec![id]);
        assert!(world.mobile(id).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_inert_marker_cannot_be_killed() {
        let mut world = arena();
        let id = world.spawn(MobileShape::probe(Point::new(3.0, 3.0), 0.3));
        let mut queue = KillQueue::new(2);
        assert!(!queue.kill(&mut world, id));
        assert_eq!(world.mobile(id).map(|m| m.state), Some(Lifecycle::Inert));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_all_creatures_dead() {
        let mut world = arena();
        assert!(all_creatures_dead(&world));
        world.spawn(MobileShape::probe(Point::new(2.0, 2.0), 0.3));
        assert!(all_creatures_dead(&world));
        world.spawn(MobileShape::creature(Point::new(5.0, 5.0), 0.3, 0.5));
        assert!(!all_creatures_dead(&world));
    }
}
