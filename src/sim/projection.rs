//! Screen-space projection helpers for the column renderer
//!
//! Pure functions: the renderer feeds them traced distances and viewer
//! geometry and gets back pixel rows and texture columns.

use super::geometry::Point;
use super::shape::MobileShape;
use crate::consts::ZERO_MARGIN;
use crate::heading;

/// Vertical pixel range of something drawn in one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnExtent {
    pub top: f64,
    pub bottom: f64,
}

impl ColumnExtent {
    fn clamped(top: f64, bottom: f64, screen_height: f64) -> Self {
        Self {
            top: top.clamp(0.0, screen_height),
            bottom: bottom.clamp(0.0, screen_height),
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Ray angle for the column starting at pixel `x`
#[inline]
pub fn column_angle(view_angle: f64, fov: f64, x: u32, screen_width: u32) -> f64 {
    view_angle - fov / 2.0 + x as f64 / screen_width as f64 * fov
}

/// Rows covered by a wall hit at `distance`
pub fn wall_extent(distance: f64, screen_height: f64, screen_distance: f64) -> ColumnExtent {
    let half = screen_height / 2.0;
    ColumnExtent::clamped(
        half * (screen_distance - 1.0 / distance),
        half * (screen_distance + 1.0 / distance),
        screen_height,
    )
}

/// Rows covered by a mobile shape of `height` whose center is `distance` away
///
/// The bottom sits on the floor line of a wall at the same distance.
pub fn mobile_extent(distance: f64, height: f64, screen_height: f64, screen_distance: f64) -> ColumnExtent {
    let half = screen_height / 2.0;
    ColumnExtent::clamped(
        half * (screen_distance + 1.0 / distance - 2.0 * height / distance),
        half * (screen_distance + 1.0 / distance),
        screen_height,
    )
}

/// Foot of the perpendicular from `point` onto the line of sight through
/// `viewer` along `view_angle`
pub fn view_line_intersection(point: Point, view_angle: f64, viewer: Point) -> Point {
    let dir = heading(view_angle);
    if dir.y.abs() <= ZERO_MARGIN {
        // Horizontal line of sight: the perpendicular is vertical
        return Point::new(point.x, viewer.y);
    }
    let from_viewer = point.as_vec() - viewer.as_vec();
    (viewer.as_vec() + dir * from_viewer.dot(dir)).into()
}

/// Texture columns of a mobile's sprite visible between two adjacent rays
///
/// Returns `(left, right)` in texel units, clamped to `texture_width - 1`,
/// or `None` when the right edge falls before the left one.
pub fn sprite_span(
    mobile: &MobileShape,
    viewer: Point,
    angle: f64,
    next_angle: f64,
    texture_width: f64,
) -> Option<(f64, f64)> {
    let left_edge = mobile.center.shift(mobile.radius, angle - 90.0);
    let last = texture_width - 1.0;
    let texel = |ray_angle: f64| {
        let hit = view_line_intersection(mobile.center, ray_angle, viewer);
        (texture_width * left_edge.distance(hit) / (2.0 * mobile.radius)).min(last)
    };

    let left = texel(angle);
    let right = texel(next_angle);
    if right < left {
        log::debug!("Degenerate sprite span {}..{} for {}", left, right, mobile.id);
        return None;
    }
    Some((left, right))
}

/// Fraction of a sprite's height shown for a mobile closer than the screen
pub fn visible_height_fraction(distance: f64, screen_distance: f64) -> f64 {
    if distance < screen_distance {
        distance / screen_distance
    } else {
        1.0
    }
}

/// Darkening factor in [0, 1] for something `distance` away
pub fn shade_factor(distance: f64, view_distance: f64) -> f64 {
    (distance / view_distance).clamp(0.0, 1.0)
}
