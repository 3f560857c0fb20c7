//! Fixed-step ray marching
//!
//! A trace walks from an origin along one angle in increments of `step`,
//! stopping at the first wall and recording every mobile shape it passes
//! through on the way, nearest first.

use super::collision::{Contact, first_containing};
use super::geometry::Point;
use super::projection::column_angle;
use super::shape::{MobileShape, StaticShape};
use super::world::World;
use crate::Settings;

/// Distance reported when no wall lies within view distance
pub const UNBOUNDED: f64 = f64::INFINITY;

/// A mobile shape grazed by a ray
#[derive(Debug, Clone, Copy)]
pub struct Intercept<'w> {
    pub mobile: &'w MobileShape,
    /// Angle of the ray that found it (degrees)
    pub angle: f64,
}

/// Result of tracing one ray
#[derive(Debug, Clone)]
pub struct TraceResult<'w> {
    /// Distance to the wall, or [`UNBOUNDED`]
    pub distance: f64,
    /// The wall that stopped the ray
    pub touched: Option<&'w StaticShape>,
    /// Mobile shapes along the ray, in marching order (nearest first)
    pub intercepts: Vec<Intercept<'w>>,
}

impl<'w> TraceResult<'w> {
    fn hit(distance: f64, wall: &'w StaticShape, intercepts: Vec<Intercept<'w>>) -> Self {
        Self {
            distance,
            touched: Some(wall),
            intercepts,
        }
    }

    fn unbounded(intercepts: Vec<Intercept<'w>>) -> Self {
        Self {
            distance: UNBOUNDED,
            touched: None,
            intercepts,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.touched.is_none()
    }

    /// Intercepts farthest first, for back-to-front compositing
    pub fn intercepts_back_to_front(&self) -> impl Iterator<Item = &Intercept<'w>> {
        self.intercepts.iter().rev()
    }
}

/// One screen column's trace
#[derive(Debug, Clone)]
pub struct ColumnTrace<'w> {
    /// Left pixel of the column
    pub x: u32,
    pub angle: f64,
    pub result: TraceResult<'w>,
}

/// Ray marcher over a world snapshot
#[derive(Debug, Clone, Copy)]
pub struct RayTracer {
    /// Marching increment (map units)
    pub step: f64,
    /// Maximum ray length (map units)
    pub view_distance: f64,
}

impl RayTracer {
    pub fn new(step: f64, view_distance: f64) -> Self {
        debug_assert!(step > 0.0, "tracing step must be positive");
        Self {
            step,
            view_distance,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.tracing_step, settings.view_distance)
    }

    #[inline]
    fn length(&self, steps: u64) -> f64 {
        self.step * steps as f64
    }

    /// Trace one ray from `origin` along `angle` (degrees, clockwise from north)
    pub fn trace<'w>(&self, world: &'w World, origin: Point, angle: f64) -> TraceResult<'w> {
        // Standing inside a wall: zero-length hit
        if let Contact::Static(wall) = first_containing(world, origin) {
            return TraceResult::hit(0.0, wall, Vec::new());
        }

        let max_length = self.view_distance.min(world.width.max(world.height));
        let mut intercepts: Vec<Intercept<'w>> = Vec::new();
        let mut steps = 1;

        while self.length(steps) <= max_length {
            match first_containing(world, origin.shift(self.length(steps), angle)) {
                Contact::Static(wall) => {
                    return TraceResult::hit(self.length(steps), wall, intercepts);
                }
                Contact::Mobile(mobile) => {
                    // Overlapping mobiles can hand the ray back and forth;
                    // each one is recorded at its first sample only
                    if !intercepts.iter().any(|i| i.mobile.id == mobile.id) {
                        intercepts.push(Intercept { mobile, angle });
                    }
                    steps += 1;
                }
                Contact::Clear => steps += 1,
            }
        }

        TraceResult::unbounded(intercepts)
    }

    /// Trace every column of a frame
    ///
    /// Columns are `column_width` pixels wide; each is traced at the angle of
    /// its left pixel.
    pub fn trace_view<'w>(
        &self,
        world: &'w World,
        origin: Point,
        view_angle: f64,
        fov: f64,
        screen_width: u32,
        column_width: u32,
    ) -> Vec<ColumnTrace<'w>> {
        (0..screen_width)
            .step_by(column_width.max(1) as usize)
            .map(|x| {
                let angle = column_angle(view_angle, fov, x, screen_width);
                ColumnTrace {
                    x,
                    angle,
                    result: self.trace(world, origin, angle),
                }
            })
            .collect()
    }

    /// First thing a projectile fired from `origin` along `angle` meets
    ///
    /// Unlike [`RayTracer::trace`], mobile shapes stop the ray and the march
    /// is bounded by view distance alone.
    pub fn first_along_ray<'w>(&self, world: &'w World, origin: Point, angle: f64) -> Contact<'w> {
        let mut contact = first_containing(world, origin);
        let mut steps = 1;
        while contact.is_clear() && self.length(steps) < self.view_distance {
            contact = first_containing(world, origin.shift(self.length(steps), angle));
            steps += 1;
        }
        contact
    }
}
