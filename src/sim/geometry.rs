//! Points in continuous map space
//!
//! Map units are wall-sized cells. Angles are in degrees, clockwise from
//! north, with north pointing toward decreasing y.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::heading;

/// A position on the map
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point `distance` units away along `angle_degrees`
    #[inline]
    pub fn shift(self, distance: f64, angle_degrees: f64) -> Self {
        (self.as_vec() + heading(angle_degrees) * distance).into()
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.as_vec().distance(other.as_vec())
    }

    #[inline]
    pub fn as_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.as_vec()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
