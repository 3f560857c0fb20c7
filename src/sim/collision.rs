//! Collision detection between walls and mobile entities
//!
//! Walls are axis-aligned rectangles, mobile entities are circles. The
//! circle/rectangle test is a cheap sampled approximation: it can miss a
//! circle that crosses a wall without covering any sampled point (a wall
//! thinner than the radius, for instance). Ray marching re-samples at a
//! small fixed step, which bounds what such a miss can hide.

use rand::Rng;
use thiserror::Error;

use super::geometry::Point;
use super::shape::{MobileShape, Shape, StaticShape};
use super::world::World;

/// Outcome of a world query
#[derive(Debug, Clone, Copy)]
pub enum Contact<'w> {
    Static(&'w StaticShape),
    Mobile(&'w MobileShape),
    Clear,
}

impl<'w> Contact<'w> {
    pub fn is_clear(&self) -> bool {
        matches!(self, Contact::Clear)
    }

    pub fn as_static(&self) -> Option<&'w StaticShape> {
        match *self {
            Contact::Static(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mobile(&self) -> Option<&'w MobileShape> {
        match *self {
            Contact::Mobile(m) => Some(m),
            _ => None,
        }
    }
}

/// Free-space search failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("no free spot of radius {radius} found after {attempts} attempts")]
    NoFreeSpot { radius: f64, attempts: u32 },
}

/// Half-extent test on origins; symmetric for any two rectangles
#[inline]
pub fn rects_overlap(a: &StaticShape, b: &StaticShape) -> bool {
    let (pa, pb) = (a.origin(), b.origin());
    (pa.x - pb.x).abs() * 2.0 < a.width + b.width && (pa.y - pb.y).abs() * 2.0 < a.length + b.length
}

#[inline]
pub fn circles_overlap(a: &MobileShape, b: &MobileShape) -> bool {
    a.center.distance(b.center) < a.radius + b.radius
}

/// Approximate circle/rectangle overlap
///
/// Any one of these is enough:
/// - the circle's center lies inside the rectangle
/// - a rectangle corner lies inside the circle
/// - one of the circle's four axis-extreme points lies inside the rectangle
pub fn circle_rect_overlap(circle: &MobileShape, rect: &StaticShape) -> bool {
    rect.contains(circle.center)
        || rect.corners().into_iter().any(|c| circle.contains(c))
        || circle.extremes().into_iter().any(|p| rect.contains(p))
}

/// Any wall containing `point`, else any mobile shape containing it
///
/// Among several matches of the same kind, which one is returned is
/// unspecified.
pub fn first_containing(world: &World, point: Point) -> Contact<'_> {
    if let Some(s) = world.statics().iter().find(|s| s.contains(point)) {
        return Contact::Static(s);
    }
    match world.mobiles().iter().find(|m| m.contains(point)) {
        Some(m) => Contact::Mobile(m),
        None => Contact::Clear,
    }
}

/// First shape overlapping `shape`
///
/// Walls are searched before mobiles for a wall query; mobiles before walls
/// for a mobile query. A marker degrades to a point query. A mobile shape
/// never overlaps itself (same id), so entities already in the world can be
/// tested at a candidate position.
pub fn first_overlapping<'w>(world: &'w World, shape: Shape<'_>) -> Contact<'w> {
    match shape {
        Shape::Static(rect) => {
            if let Some(s) = world.statics().iter().find(|s| rects_overlap(s, rect)) {
                return Contact::Static(s);
            }
            match world.mobiles().iter().find(|m| circle_rect_overlap(m, rect)) {
                Some(m) => Contact::Mobile(m),
                None => Contact::Clear,
            }
        }
        Shape::Mobile(circle) => {
            let other = |m: &&MobileShape| circle.id.0 == 0 || m.id != circle.id;
            if let Some(m) = world
                .mobiles()
                .iter()
                .filter(other)
                .find(|m| circles_overlap(m, circle))
            {
                return Contact::Mobile(m);
            }
            match world.statics().iter().find(|s| circle_rect_overlap(circle, s)) {
                Some(s) => Contact::Static(s),
                None => Contact::Clear,
            }
        }
        Shape::Marker(p) => first_containing(world, p),
    }
}

/// Draw a random center in `[0, width-radius) × [0, height-radius)`
fn random_spot<R: Rng>(world: &World, radius: f64, rng: &mut R) -> Point {
    Point::new(
        rng.random::<f64>() * (world.width - radius),
        rng.random::<f64>() * (world.height - radius),
    )
}

/// Rejection-sample a spot where a disk of `radius` overlaps nothing
///
/// Never returns on a saturated map; use [`try_find_free_spot`] for a
/// bounded search.
pub fn find_free_spot<R: Rng>(world: &World, radius: f64, rng: &mut R) -> Point {
    loop {
        let spot = random_spot(world, radius, rng);
        if first_overlapping(world, Shape::Mobile(&MobileShape::probe(spot, radius))).is_clear() {
            return spot;
        }
    }
}

/// [`find_free_spot`] with an attempt cap; `None` searches forever
pub fn try_find_free_spot<R: Rng>(
    world: &World,
    radius: f64,
    rng: &mut R,
    max_attempts: Option<u32>,
) -> Result<Point, PlacementError> {
    let Some(max_attempts) = max_attempts else {
        return Ok(find_free_spot(world, radius, rng));
    };
    for attempt in 0..max_attempts {
        let spot = random_spot(world, radius, rng);
        if first_overlapping(world, Shape::Mobile(&MobileShape::probe(spot, radius))).is_clear() {
            log::debug!("Free spot {} found after {} attempts", spot, attempt + 1);
            return Ok(spot);
        }
    }
    log::warn!("Gave up looking for a free spot of radius {} after {} attempts", radius, max_attempts);
    Err(PlacementError::NoFreeSpot {
        radius,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rect(x: f64, y: f64, w: f64, l: f64) -> StaticShape {
        StaticShape::new(Point::new(x, y), w, l)
    }

    fn disk(x: f64, y: f64, r: f64) -> MobileShape {
        MobileShape::creature(Point::new(x, y), r, 1.0)
    }

    #[test]
    fn test_rects_overlap() {
        assert!(rects_overlap(&rect(0.0, 0.0, 1.0, 1.0), &rect(0.5, 0.5, 1.0, 1.0)));
        // Sharing an edge is not an overlap
        assert!(!rects_overlap(&rect(0.0, 0.0, 1.0, 1.0), &rect(1.0, 0.0, 1.0, 1.0)));
        assert!(!rects_overlap(&rect(0.0, 0.0, 1.0, 1.0), &rect(3.0, 3.0, 1.0, 1.0)));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(&disk(0.0, 0.0, 0.5), &disk(0.9, 0.0, 0.5)));
        assert!(!circles_overlap(&disk(0.0, 0.0, 0.5), &disk(1.0, 0.0, 0.5)));
    }

    #[test]
    fn test_circle_rect_center_inside() {
        assert!(circle_rect_overlap(&disk(1.5, 1.5, 0.1), &rect(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_circle_rect_corner_inside_circle() {
        // Circle just off the top-left corner, diagonally
        assert!(circle_rect_overlap(&disk(0.8, 0.8, 0.3), &rect(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_circle_rect_extreme_point_inside() {
        // Circle left of a tall wall, its east extreme pokes in
        assert!(circle_rect_overlap(&disk(0.8, 2.0, 0.3), &rect(1.0, 0.0, 1.0, 5.0)));
    }

    #[test]
    fn test_circle_rect_miss() {
        assert!(!circle_rect_overlap(&disk(5.0, 5.0, 0.3), &rect(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_circle_rect_thin_wall_blind_spot() {
        // The disk straddles a wall thinner than its radius: no corner in the
        // disk, the east extreme lands past the wall, the center is outside.
        let c = disk(0.8, 1.5, 0.3);
        let r = rect(1.0, 1.0, 0.05, 1.0);
        let shared = Point::new(1.02, 1.5);
        assert!(c.contains(shared) && r.contains(shared));
        assert!(!circle_rect_overlap(&c, &r));
    }

    #[test]
    fn test_first_containing_prefers_statics() {
        let mut world = World::new(10.0, 10.0);
        world.add_static(rect(2.0, 2.0, 1.0, 1.0));
        let id = world.spawn(disk(2.5, 2.5, 0.4));

        assert!(matches!(first_containing(&world, Point::new(2.5, 2.5)), Contact::Static(_)));
        // Outside the wall but inside the disk
        world.despawn(id);
        let id = world.spawn(disk(5.0, 5.0, 0.4));
        match first_containing(&world, Point::new(5.1, 5.1)) {
            Contact::Mobile(m) => assert_eq!(m.id, id),
            other => panic!("expected mobile, got {other:?}"),
        }
        assert!(first_containing(&world, Point::new(8.0, 8.0)).is_clear());
    }

    #[test]
    fn test_first_overlapping_static_query_prefers_statics() {
        let mut world = World::new(10.0, 10.0);
        world.add_static(rect(2.0, 2.0, 1.0, 1.0));
        world.spawn(disk(2.9, 2.9, 0.4));
        let query = rect(2.5, 2.5, 1.0, 1.0);
        assert!(matches!(first_overlapping(&world, Shape::Static(&query)), Contact::Static(_)));

        let query = rect(3.0, 3.0, 1.0, 1.0);
        assert!(matches!(first_overlapping(&world, Shape::Static(&query)), Contact::Mobile(_)));
    }

    #[test]
    fn test_first_overlapping_mobile_query_prefers_mobiles() {
        let mut world = World::new(10.0, 10.0);
        world.add_static(rect(2.0, 2.0, 1.0, 1.0));
        world.spawn(disk(1.8, 1.8, 0.3));
        let probe = MobileShape::probe(Point::new(1.9, 1.9), 0.3);
        assert!(matches!(first_overlapping(&world, Shape::Mobile(&probe)), Contact::Mobile(_)));

        let probe = MobileShape::probe(Point::new(3.1, 2.5), 0.3);
        assert!(matches!(first_overlapping(&world, Shape::Mobile(&probe)), Contact::Static(_)));
    }

    #[test]
    fn test_first_overlapping_ignores_self() {
        let mut world = World::new(10.0, 10.0);
        let id = world.spawn(disk(5.0, 5.0, 0.3));
        let mut moved = world.mobile(id).cloned().unwrap();
        moved.center = Point::new(5.1, 5.0);
        assert!(first_overlapping(&world, Shape::Mobile(&moved)).is_clear());
    }

    #[test]
    fn test_first_overlapping_marker_degrades_to_point() {
        let mut world = World::new(10.0, 10.0);
        world.add_static(rect(2.0, 2.0, 1.0, 1.0));
        assert!(matches!(
            first_overlapping(&world, Shape::Marker(Point::new(2.5, 2.5))),
            Contact::Static(_)
        ));
        assert!(first_overlapping(&world, Shape::Marker(Point::new(3.5, 3.5))).is_clear());
    }

    #[test]
    fn test_find_free_spot_on_empty_world() {
        let world = World::new(20.0, 20.0);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let spot = find_free_spot(&world, 0.3, &mut rng);
            assert!(spot.x >= 0.0 && spot.x < 19.7);
            assert!(spot.y >= 0.0 && spot.y < 19.7);
            let probe = MobileShape::probe(spot, 0.3);
            assert!(first_overlapping(&world, Shape::Mobile(&probe)).is_clear());
        }
    }

    #[test]
    fn test_find_free_spot_avoids_walls() {
        let mut world = World::new(4.0, 4.0);
        // Cover everything except the cell at (2, 2)
        for x in 0..4 {
            for y in 0..4 {
                if (x, y) != (2, 2) {
                    world.add_static(StaticShape::cell(x as f64, y as f64, 1.0));
                }
            }
        }
        let mut rng = Pcg32::seed_from_u64(11);
        let spot = find_free_spot(&world, 0.1, &mut rng);
        assert!(spot.x > 2.0 && spot.x < 3.0 && spot.y > 2.0 && spot.y < 3.0);
    }

    #[test]
    fn test_try_find_free_spot_reports_saturation() {
        let mut world = World::new(3.0, 3.0);
        world.add_static(rect(0.0, 0.0, 3.0, 3.0));
        let mut rng = Pcg32::seed_from_u64(3);
        let err = try_find_free_spot(&world, 0.3, &mut rng, Some(50)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::NoFreeSpot {
                radius: 0.3,
                attempts: 50
            }
        );
    }

    fn arb_rect() -> impl Strategy<Value = StaticShape> {
        (-50.0f64..50.0, -50.0f64..50.0, 0.1f64..10.0, 0.1f64..10.0)
            .prop_map(|(x, y, w, l)| rect(x, y, w, l))
    }

    fn arb_disk() -> impl Strategy<Value = MobileShape> {
        (-50.0f64..50.0, -50.0f64..50.0, 0.01f64..10.0).prop_map(|(x, y, r)| disk(x, y, r))
    }

    proptest! {
        #[test]
        fn rect_overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(rects_overlap(&a, &b), rects_overlap(&b, &a));
        }

        #[test]
        fn circle_overlap_is_symmetric(a in arb_disk(), b in arb_disk()) {
            prop_assert_eq!(circles_overlap(&a, &b), circles_overlap(&b, &a));
        }

        #[test]
        fn center_inside_rect_implies_overlap(
            r in arb_rect(),
            fx in 0.01f64..0.99,
            fy in 0.01f64..0.99,
            radius in 0.01f64..5.0,
        ) {
            let o = r.origin();
            let c = disk(o.x + fx * r.width, o.y + fy * r.length, radius);
            prop_assert!(circle_rect_overlap(&c, &r));
        }
    }
}
