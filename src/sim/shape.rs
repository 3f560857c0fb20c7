//! Map entities
//!
//! Two shape kinds share one point-containment contract:
//! - static shapes: axis-aligned rectangles (walls), immovable once placed
//! - mobile shapes: circles (creatures, probes) that move and change state

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Handle issued by the world when a mobile shape is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned rectangle occupying `[x, x+width) × [y, y+length)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticShape {
    origin: Point,
    pub width: f64,
    pub length: f64,
}

impl StaticShape {
    pub fn new(origin: Point, width: f64, length: f64) -> Self {
        Self {
            origin,
            width,
            length,
        }
    }

    /// Unit wall cell at integer grid coordinates
    pub fn cell(x: f64, y: f64, size: f64) -> Self {
        Self::new(Point::new(x, y), size, size)
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The four corners: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Point; 4] {
        let Point { x, y } = self.origin;
        [
            self.origin,
            Point::new(x + self.width, y),
            Point::new(x, y + self.length),
            Point::new(x + self.width, y + self.length),
        ]
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.x < self.origin.x + self.width
            && p.y >= self.origin.y
            && p.y < self.origin.y + self.length
    }
}

/// Lifecycle of a mobile shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Inert marker (spawn probes, decorations); never targeted
    #[default]
    Inert,
    /// Living creature
    Alive,
    /// Shot creature, waiting for its despawn grace period to run out
    Killed,
}

/// Circle with a center, radius and visual height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileShape {
    /// Assigned by [`super::World::spawn`]; probes that never enter the
    /// world keep `EntityId(0)`
    pub id: EntityId,
    pub center: Point,
    pub radius: f64,
    pub height: f64,
    pub state: Lifecycle,
}

impl MobileShape {
    pub fn new(center: Point, radius: f64, height: f64, state: Lifecycle) -> Self {
        Self {
            id: EntityId(0),
            center,
            radius,
            height,
            state,
        }
    }

    /// A living creature
    pub fn creature(center: Point, radius: f64, height: f64) -> Self {
        Self::new(center, radius, height, Lifecycle::Alive)
    }

    /// An inert disk used to test whether a spot is free
    pub fn probe(center: Point, radius: f64) -> Self {
        Self::new(center, radius, 1.0, Lifecycle::Inert)
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) < self.radius
    }

    /// Center shifted by the radius north, east, south and west
    pub fn extremes(&self) -> [Point; 4] {
        [0.0, 90.0, 180.0, 270.0].map(|angle| self.center.shift(self.radius, angle))
    }

    pub fn is_creature(&self) -> bool {
        matches!(self.state, Lifecycle::Alive | Lifecycle::Killed)
    }
}

/// Any query shape
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Static(&'a StaticShape),
    Mobile(&'a MobileShape),
    /// Dimensionless marker; only its position is tested
    Marker(Point),
}

impl Shape<'_> {
    /// Reference position: top-left corner, center, or the marker itself
    pub fn position(&self) -> Point {
        match self {
            Shape::Static(s) => s.origin(),
            Shape::Mobile(m) => m.center,
            Shape::Marker(p) => *p,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Static(s) => s.contains(p),
            Shape::Mobile(m) => m.contains(p),
            Shape::Marker(_) => false,
        }
    }
}

impl<'a> From<&'a StaticShape> for Shape<'a> {
    fn from(s: &'a StaticShape) -> Self {
        Shape::Static(s)
    }
}

impl<'a> From<&'a MobileShape> for Shape<'a> {
    fn from(m: &'a MobileShape) -> Self {
        Shape::Mobile(m)
    }
}
