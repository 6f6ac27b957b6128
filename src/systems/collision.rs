//! Per-tick collision system: pair selection, detection, and impulse-based
//! response. Circle pairs take a closed-form path; every other pair goes
//! through GJK/EPA on the colliders' support functions.

use glam::DVec2;
use hecs::Entity;
use log::trace;

use crate::components::{Body, CircleBody, Collider};
use crate::gjk::{epa, gjk, ContactInfo};
use crate::scene::Scene;

/// Below this center distance two circles are treated as coincident and the
/// contact normal falls back to a fixed axis.
const DEGENERATE_DISTANCE: f64 = 1e-9;

/// Detect and resolve all collisions for this tick, mutating `Body`
/// components in place. Pairs are enumerated unordered, each exactly once;
/// every pair is resolved to completion before the next one is examined.
pub fn collision_system(scene: &mut Scene) {
    let mut all = scene.view::<(&Body, &Collider)>();
    let mut circles = scene.view::<(&Body, &Collider, &CircleBody)>();
    all.sort_unstable();
    circles.sort_unstable();
    let others: Vec<Entity> = all
        .iter()
        .copied()
        .filter(|entity| circles.binary_search(entity).is_err())
        .collect();

    for (i, &a) in circles.iter().enumerate() {
        // Circle - circle collisions
        for &b in &circles[i + 1..] {
            collide_circles(scene, a, b);
        }
        // Circle - convex collisions
        for &b in &others {
            collide_bodies(scene, a, b);
        }
    }

    // Convex - convex collisions
    for (i, &a) in others.iter().enumerate() {
        for &b in &others[i + 1..] {
            collide_bodies(scene, a, b);
        }
    }
}

/// Run the general pipeline on one pair: GJK detection, EPA manifold
/// extraction, then the rotational impulse response.
fn collide_bodies(scene: &Scene, a: Entity, b: Entity) {
    let mut body_a = *scene.get::<Body>(a);
    let mut body_b = *scene.get::<Body>(b);
    let contact = {
        let collider_a = scene.get::<Collider>(a);
        let collider_b = scene.get::<Collider>(b);
        gjk(&collider_a, &body_a, &collider_b, &body_b)
            .map(|simplex| epa(&collider_a, &body_a, &collider_b, &body_b, simplex))
    };
    let Some(contact) = contact else {
        return;
    };
    trace!(
        "contact {a:?} <-> {b:?}, depth {:.6}",
        contact.normal.length()
    );
    collision_response(&mut body_a, &mut body_b, &contact);
    *scene.get_mut::<Body>(a) = body_a;
    *scene.get_mut::<Body>(b) = body_b;
}

fn collide_circles(scene: &Scene, a: Entity, b: Entity) {
    let circle_a = *scene.get::<CircleBody>(a);
    let circle_b = *scene.get::<CircleBody>(b);
    let mut body_a = *scene.get::<Body>(a);
    let mut body_b = *scene.get::<Body>(b);
    if circle_response(&circle_a, &circle_b, &mut body_a, &mut body_b) {
        trace!("circle contact {a:?} <-> {b:?}");
        *scene.get_mut::<Body>(a) = body_a;
        *scene.get_mut::<Body>(b) = body_b;
    }
}

/// Closed-form circle-circle overlap test and non-rotational response.
/// Returns whether the circles overlapped.
fn circle_response(
    circle_a: &CircleBody,
    circle_b: &CircleBody,
    body_a: &mut Body,
    body_b: &mut Body,
) -> bool {
    let diff = body_b.position - body_a.position;
    let dist = diff.length();
    let overlap = circle_a.radius + circle_b.radius - dist;
    if overlap <= 0.0 {
        return false;
    }
    // Coincident centers leave the normal undefined; fall back to a fixed
    // axis so the pair still separates.
    let normal = if dist > DEGENERATE_DISTANCE {
        diff / dist
    } else {
        DVec2::X
    };
    let m_a = body_a.mass;
    let m_b = body_b.mass;
    let restitution = body_a.restitution * body_b.restitution;

    let added_velocity = (body_a.velocity - body_b.velocity).dot(normal) * normal / (m_a + m_b);
    body_a.velocity -= added_velocity * (m_b + restitution * m_b);
    body_b.velocity += added_velocity * (m_a + restitution * m_a);

    // Separate until the circles just touch; the heavier body moves less.
    body_a.position -= normal * (overlap * m_b / (m_a + m_b));
    body_b.position += normal * (overlap * m_a / (m_a + m_b));
    true
}

/// Rotational impulse response. The contact normal is scaled by penetration
/// depth and points from body A toward body B.
fn collision_response(body_a: &mut Body, body_b: &mut Body, contact: &ContactInfo) {
    // Lever arms from each center of mass to its contact point.
    let r_a = contact.point_a - body_a.position;
    let r_b = contact.point_b - body_b.position;
    let v_a = body_a.velocity;
    let v_b = body_b.velocity;
    let m_a = body_a.mass;
    let m_b = body_b.mass;
    let i_a = body_a.moment_of_inertia;
    let i_b = body_b.moment_of_inertia;
    let w_a = body_a.angular_velocity;
    let w_b = body_b.angular_velocity;
    let n = contact.normal / contact.normal.length();
    let r_a_n = r_a.perp_dot(n);
    let r_b_n = r_b.perp_dot(n);
    let restitution = body_a.restitution * body_b.restitution;

    // Impulse magnitude for a perfectly elastic contact (standard rigid-body
    // formula with angular terms) and for a perfectly inelastic one (cancels
    // the relative normal velocity); blended by the combined restitution.
    let elastic = 2.0 * ((v_a - v_b).dot(n) + (w_a * r_a - w_b * r_b).perp_dot(n))
        / (1.0 / m_a + 1.0 / m_b + r_a_n * r_a_n / i_a + r_b_n * r_b_n / i_b);
    let inelastic = m_a * m_b * (v_a - v_b).dot(n) / (m_a + m_b);
    let impulse = n * (restitution * elastic + (1.0 - restitution) * inelastic);

    body_a.velocity -= impulse / m_a;
    body_b.velocity += impulse / m_b;
    body_a.angular_velocity -= r_a.perp_dot(impulse) / i_a;
    body_b.angular_velocity += r_b.perp_dot(impulse) / i_b;

    // Shift the bodies out of penetration; the heavier body moves less.
    body_a.position -= contact.normal * (m_b / (m_a + m_b));
    body_b.position += contact.normal * (m_a / (m_a + m_b));
}
