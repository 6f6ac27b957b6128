//! Support-function collision pipeline: GJK detection over the Minkowski
//! difference of two colliders, then EPA to extract penetration depth and
//! contact points. Neither algorithm ever materializes the Minkowski
//! difference; both only query the colliders' support functions.

use glam::DVec2;

use crate::components::{Body, Collider};

const GJK_MAX_ITERATIONS: usize = 50;
const EPA_MAX_ITERATIONS: usize = 100;
/// EPA stops once the support point along the closest edge's normal is no
/// farther from the origin than the edge itself, within this tolerance.
const EPA_TOLERANCE: f64 = 1e-4;
/// Extra separation added to the resolved penetration so bodies do not start
/// the next step exactly in contact.
const COLLISION_GAP: f64 = 1e-3;

/// Contact data produced by EPA and consumed by the collision response.
/// `normal` points from body A toward body B and is scaled by penetration
/// depth plus the separation gap.
#[derive(Clone, Copy, Debug)]
pub struct ContactInfo {
    pub normal: DVec2,
    /// World-space contact point on body A.
    pub point_a: DVec2,
    /// World-space contact point on body B.
    pub point_b: DVec2,
}

/// Simplex/polytope over the Minkowski difference of two shapes. Every
/// vertex keeps the contributing world point of each shape, so EPA can
/// recover contact points on the original bodies.
pub struct MinkowskiPolygon {
    points_a: Vec<DVec2>,
    points_b: Vec<DVec2>,
}

impl MinkowskiPolygon {
    fn new() -> Self {
        Self {
            points_a: Vec::new(),
            points_b: Vec::new(),
        }
    }

    fn push(&mut self, a: DVec2, b: DVec2) {
        self.points_a.push(a);
        self.points_b.push(b);
    }

    fn insert(&mut self, index: usize, a: DVec2, b: DVec2) {
        self.points_a.insert(index, a);
        self.points_b.insert(index, b);
    }

    fn remove(&mut self, index: usize) {
        self.points_a.remove(index);
        self.points_b.remove(index);
    }

    /// Minkowski-difference point at `index`.
    fn difference(&self, index: usize) -> DVec2 {
        self.points_a[index] - self.points_b[index]
    }

    fn point_a(&self, index: usize) -> DVec2 {
        self.points_a[index]
    }

    fn point_b(&self, index: usize) -> DVec2 {
        self.points_b[index]
    }

    pub fn len(&self) -> usize {
        self.points_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_a.is_empty()
    }
}

/// Perpendicular of `v` lying on the same side as `toward`. Falls back to
/// the counterclockwise perpendicular when `toward` gives no preference.
fn perpendicular(v: DVec2, toward: DVec2) -> DVec2 {
    let perp = v.perp();
    if perp.dot(toward) < 0.0 {
        -perp
    } else {
        perp
    }
}

fn support_pair(
    collider_a: &Collider,
    body_a: &Body,
    collider_b: &Collider,
    body_b: &Body,
    direction: DVec2,
) -> (DVec2, DVec2) {
    (
        collider_a.support(body_a, direction),
        collider_b.support(body_b, -direction),
    )
}

/// GJK overlap test. Returns the enclosing triangle simplex when the two
/// shapes overlap, `None` otherwise. Iteration exhaustion is reported as no
/// collision; that is a valid terminal outcome, not an error.
pub fn gjk(
    collider_a: &Collider,
    body_a: &Body,
    collider_b: &Collider,
    body_b: &Body,
) -> Option<MinkowskiPolygon> {
    let mut direction = DVec2::X;
    let (support_a, support_b) = support_pair(collider_a, body_a, collider_b, body_b, direction);
    let mut simplex = MinkowskiPolygon::new();
    simplex.push(support_a, support_b);

    // Search back toward the origin from the first support point.
    direction = -(support_a - support_b);
    for _ in 0..GJK_MAX_ITERATIONS {
        // A vanishing direction means the origin sits on the simplex
        // boundary; probe along a fixed axis instead of dividing by zero in
        // the circle support.
        if direction.length_squared() < f64::EPSILON {
            direction = DVec2::Y;
        }
        let (support_a, support_b) =
            support_pair(collider_a, body_a, collider_b, body_b, direction);
        let support_point = support_a - support_b;
        if support_point.dot(direction) < 0.0 {
            // The new point never crossed the origin: the Minkowski
            // difference cannot enclose it.
            return None;
        }
        simplex.push(support_a, support_b);
        if nearest_simplex(&mut simplex, &mut direction) {
            return Some(simplex);
        }
    }
    None
}

fn nearest_simplex(simplex: &mut MinkowskiPolygon, direction: &mut DVec2) -> bool {
    match simplex.len() {
        2 => simplex_line(simplex, direction),
        3 => simplex_triangle(simplex, direction),
        len => panic!("invalid simplex size {len}"),
    }
}

fn simplex_line(simplex: &MinkowskiPolygon, direction: &mut DVec2) -> bool {
    let a = simplex.difference(1);
    let b = simplex.difference(0);
    // Next direction is perpendicular to the segment, on the origin's side.
    *direction = perpendicular(b - a, -a);
    false
}

fn simplex_triangle(simplex: &mut MinkowskiPolygon, direction: &mut DVec2) -> bool {
    let a = simplex.difference(2);
    let b = simplex.difference(1);
    let c = simplex.difference(0);
    let ac = c - a;
    let ab = b - a;
    // Outward normal of the AC edge, away from B.
    let ac_perp = perpendicular(ac, -ab);
    if ac_perp.dot(-a) > 0.0 {
        // Origin lies outside the AC edge; B no longer helps.
        simplex.remove(1);
        *direction = ac_perp;
        return false;
    }
    let ab_perp = perpendicular(ab, -ac);
    if ab_perp.dot(-a) > 0.0 {
        simplex.remove(0);
        *direction = ab_perp;
        return false;
    }
    // Outward of neither edge: the triangle encloses the origin.
    true
}

/// Expand the GJK simplex until the Minkowski-difference boundary edge
/// closest to the origin is found, then derive the contact from that edge.
///
/// Panics when the simplex is not a triangle: that means the detection
/// wiring is broken, not that the physical input is bad.
pub fn epa(
    collider_a: &Collider,
    body_a: &Body,
    collider_b: &Collider,
    body_b: &Body,
    mut polygon: MinkowskiPolygon,
) -> ContactInfo {
    assert!(
        polygon.len() == 3,
        "EPA needs a triangle simplex, got {} points",
        polygon.len()
    );

    for iteration in 0..EPA_MAX_ITERATIONS {
        // Closest polytope edge to the origin, with its outward normal.
        let mut min_distance = f64::MAX;
        let mut min_normal = DVec2::ZERO;
        let mut min_index = 0;
        for i in 0..polygon.len() {
            let j = (i + 1) % polygon.len();
            let a = polygon.difference(i);
            let b = polygon.difference(j);
            let edge = b - a;
            // Duplicate support points span no edge; skip them.
            if edge.length_squared() < f64::EPSILON {
                continue;
            }
            let normal = perpendicular(edge, a).normalize();
            let distance = normal.dot(a);
            if distance < min_distance {
                min_distance = distance;
                min_normal = normal;
                min_index = i;
            }
        }

        let (support_a, support_b) =
            support_pair(collider_a, body_a, collider_b, body_b, min_normal);
        let support_distance = (support_a - support_b).dot(min_normal);

        // The closest edge is final once no support point lies beyond it.
        // The iteration budget forces a best-effort answer on exhaustion.
        if (support_distance - min_distance).abs() <= EPA_TOLERANCE
            || iteration == EPA_MAX_ITERATIONS - 1
        {
            return contact_on_edge(&polygon, min_index, min_normal, min_distance);
        }
        polygon.insert((min_index + 1) % polygon.len(), support_a, support_b);
    }
    unreachable!("EPA returns on its final iteration");
}

fn contact_on_edge(
    polygon: &MinkowskiPolygon,
    index: usize,
    normal: DVec2,
    distance: f64,
) -> ContactInfo {
    let next = (index + 1) % polygon.len();
    let a_i = polygon.point_a(index);
    let a_j = polygon.point_a(next);
    let b_i = polygon.point_b(index);
    let b_j = polygon.point_b(next);
    let s_i = a_i - b_i;
    let s_j = a_j - b_j;
    // Barycentric coordinate of the origin's projection onto the edge:
    // alpha = 0 maps to s_i, alpha = 1 maps to s_j.
    let length_squared = (s_j - s_i).length_squared();
    let alpha = if length_squared > f64::EPSILON {
        (s_j - s_i).dot(-s_i) / length_squared
    } else {
        0.0
    };
    ContactInfo {
        normal: normal * (distance + COLLISION_GAP),
        point_a: a_i * (1.0 - alpha) + a_j * alpha,
        point_b: b_i * (1.0 - alpha) + b_j * alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn body_at(position: DVec2) -> Body {
        Body {
            mass: 1.0,
            position,
            velocity: DVec2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            restitution: 1.0,
            center_of_mass: DVec2::ZERO,
            moment_of_inertia: 1.0,
        }
    }

    fn square(half_extent: f64) -> Collider {
        Collider::Convex {
            vertices: vec![
                DVec2::new(-half_extent, -half_extent),
                DVec2::new(half_extent, -half_extent),
                DVec2::new(half_extent, half_extent),
                DVec2::new(-half_extent, half_extent),
            ],
        }
    }

    #[test]
    fn separated_squares_do_not_collide() {
        let collider = square(1.0);
        let body_a = body_at(DVec2::ZERO);
        assert!(gjk(&collider, &body_a, &collider, &body_at(DVec2::new(5.0, 0.0))).is_none());
        // A thin gap is still a gap.
        assert!(gjk(&collider, &body_a, &collider, &body_at(DVec2::new(2.05, 0.0))).is_none());
        assert!(gjk(&collider, &body_a, &collider, &body_at(DVec2::new(0.0, -2.2))).is_none());
    }

    #[test]
    fn epa_recovers_minimum_translation_depth() {
        let collider = square(1.0);
        let body_a = body_at(DVec2::ZERO);
        // Overlap is 0.25 along X and 1.9 along Y, so the minimum
        // translation vector is 0.25 along X.
        let body_b = body_at(DVec2::new(1.75, 0.1));
        let simplex = gjk(&collider, &body_a, &collider, &body_b).expect("squares overlap");
        let contact = epa(&collider, &body_a, &collider, &body_b, simplex);

        assert_abs_diff_eq!(contact.normal.length(), 0.25 + 1e-3, epsilon = 1e-3);
        let direction = contact.normal.normalize();
        assert_abs_diff_eq!(direction.x.abs(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(direction.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn general_path_agrees_with_circle_closed_form() {
        let collider = Collider::Circle { radius: 1.0 };
        let body_a = body_at(DVec2::ZERO);

        // Centers 2.1 apart: separated for radii 1 + 1.
        assert!(gjk(&collider, &body_a, &collider, &body_at(DVec2::new(2.1, 0.0))).is_none());

        // Centers 1.9 apart: the closed form reports 0.1 of overlap.
        let body_b = body_at(DVec2::new(1.9, 0.0));
        let simplex = gjk(&collider, &body_a, &collider, &body_b).expect("circles overlap");
        let contact = epa(&collider, &body_a, &collider, &body_b, simplex);
        assert_abs_diff_eq!(contact.normal.length(), 0.1 + 1e-3, epsilon = 1e-3);
    }

    #[test]
    fn fully_overlapping_squares_still_resolve() {
        let collider = square(1.0);
        let body = body_at(DVec2::ZERO);
        // Identical squares: the support along the first probe axis lands
        // the origin on the simplex boundary, which exercises the
        // fixed-axis fallback direction.
        let simplex = gjk(&collider, &body, &collider, &body).expect("coincident squares overlap");
        let contact = epa(&collider, &body, &collider, &body, simplex);
        assert!(contact.normal.length().is_finite());
        assert_abs_diff_eq!(contact.normal.length(), 2.0 + 1e-3, epsilon = 1e-2);
    }

    #[test]
    #[should_panic(expected = "EPA needs a triangle simplex")]
    fn epa_rejects_non_triangle_simplex() {
        let collider = square(1.0);
        let body = body_at(DVec2::ZERO);
        let mut simplex = MinkowskiPolygon::new();
        simplex.push(DVec2::new(1.0, 0.0), DVec2::ZERO);
        simplex.push(DVec2::new(0.0, 1.0), DVec2::ZERO);
        epa(&collider, &body, &collider, &body, simplex);
    }
}
