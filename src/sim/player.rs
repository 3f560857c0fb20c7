//! The player: a disk with a view angle
//!
//! The player is not part of the world's mobile set, so it never intercepts
//! its own rays or blocks its own shots.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{PlacementError, first_overlapping, try_find_free_spot};
use super::geometry::Point;
use super::shape::{MobileShape, Shape};
use super::world::World;
use crate::Settings;
use crate::input::InputKey;
use crate::normalize_degrees;

/// Movement direction relative to the view angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Right,
    Backward,
    Left,
}

impl Direction {
    /// Offset from the view angle (degrees)
    pub fn offset(&self) -> f64 {
        match self {
            Direction::Forward => 0.0,
            Direction::Right => 90.0,
            Direction::Backward => 180.0,
            Direction::Left => -90.0,
        }
    }

    pub fn from_key(key: InputKey) -> Option<Self> {
        match key {
            InputKey::Forward => Some(Direction::Forward),
            InputKey::Right => Some(Direction::Right),
            InputKey::Backward => Some(Direction::Backward),
            InputKey::Left => Some(Direction::Left),
            InputKey::Shoot | InputKey::Reset => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: MobileShape,
    /// Degrees clockwise from north, in [0, 360)
    view_angle: f64,
}

impl Player {
    pub fn new(position: Point, radius: f64, height: f64, view_angle: f64) -> Self {
        Self {
            body: MobileShape::probe(position, radius).with_height(height),
            view_angle: normalize_degrees(view_angle),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Point::default(), settings.player_radius, settings.player_height, 0.0)
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.body.center
    }

    #[inline]
    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    pub fn set_view_angle(&mut self, angle: f64) {
        self.view_angle = normalize_degrees(angle);
    }

    /// Try to move `distance` in `direction`; returns whether the player moved
    pub fn step(&mut self, world: &World, direction: Direction, distance: f64) -> bool {
        let target = self.body.center.shift(distance, self.view_angle + direction.offset());
        let mut candidate = self.body.clone();
        candidate.center = target;

        let blocker = first_overlapping(world, Shape::Mobile(&candidate));
        if !blocker.is_clear() {
            log::debug!("Can't move to {}", target);
            return false;
        }
        self.body.center = target;
        true
    }

    /// Turn by a horizontal mouse motion
    pub fn turn(&mut self, mouse_dx: i32, sensitivity: f64) {
        if mouse_dx != 0 {
            self.set_view_angle(self.view_angle + mouse_dx as f64 * sensitivity);
        }
    }

    /// Drop the player on a random free spot facing a random direction
    pub fn respawn<R: Rng>(
        &mut self,
        world: &World,
        rng: &mut R,
        max_attempts: Option<u32>,
    ) -> Result<(), PlacementError> {
        self.body.center = try_find_free_spot(world, self.body.radius, rng, max_attempts)?;
        self.set_view_angle(rng.random::<f64>() * crate::consts::FULL_TURN);
        log::info!(
            "Player respawned at {} facing {:.1}",
            self.body.center,
            self.view_angle
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mapgen::add_border;
    use crate::sim::shape::StaticShape;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> World {
        let mut world = World::new(10.0, 10.0);
        add_border(&mut world, 1.0);
        world
    }

    #[test]
    fn test_step_directions() {
        let world = arena();
        let mut player = Player::new(Point::new(5.0, 5.0), 0.3, 0.5, 90.0);

        assert!(player.step(&world, Direction::Forward, 1.0));
        assert!((player.position().x - 6.0).abs() < 1e-9);
        assert!(player.step(&world, Direction::Right, 1.0));
        assert!((player.position().y - 6.0).abs() < 1e-9);
        assert!(player.step(&world, Direction::Backward, 1.0));
        assert!((player.position().x - 5.0).abs() < 1e-9);
        assert!(player.step(&world, Direction::Left, 1.0));
        assert!((player.position().y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_blocked_by_wall() {
        let mut world = arena();
        world.add_static(StaticShape::cell(5.0, 3.0, 1.0));
        let mut player = Player::new(Point::new(5.5, 4.5), 0.3, 0.5, 0.0);
        // Disk would reach into the wall's bottom face
        assert!(!player.step(&world, Direction::Forward, 0.3));
        assert_eq!(player.position(), Point::new(5.5, 4.5));
    }

    #[test]
    fn test_step_blocked_by_creature() {
        let mut world = arena();
        world.spawn(MobileShape::creature(Point::new(5.0, 3.0), 0.3, 0.5));
        let mut player = Player::new(Point::new(5.0, 4.0), 0.3, 0.5, 0.0);
        assert!(!player.step(&world, Direction::Forward, 0.5));
        assert!(player.step(&world, Direction::Backward, 0.5));
    }

    #[test]
    fn test_turn_wraps() {
        let mut player = Player::new(Point::new(5.0, 5.0), 0.3, 0.5, 350.0);
        player.turn(40, 0.5);
        assert!((player.view_angle() - 10.0).abs() < 1e-9);
        player.turn(-40, 0.5);
        assert!((player.view_angle() - 350.0).abs() < 1e-9);
        player.turn(0, 0.5);
        assert!((player.view_angle() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_respawn_lands_on_free_spot() {
        let world = arena();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut player = Player::new(Point::default(), 0.3, 0.5, 0.0);
        player.respawn(&world, &mut rng, None).unwrap();
        assert!(first_overlapping(&world, Shape::Mobile(&player.body)).is_clear());
        assert!((0.0..360.0).contains(&player.view_angle()));
    }
}
