//! Canned demo scene for the headless driver binary.

use glam::DVec2;

use crate::scene::prefabs::{spawn_circle, spawn_convex};
use crate::scene::Scene;

/// Axis-aligned box vertices with one corner at the local origin. Spawning
/// re-centers them around the center of mass.
pub fn box_vertices(width: f64, height: f64) -> Vec<DVec2> {
    vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(width, 0.0),
        DVec2::new(width, height),
        DVec2::new(0.0, height),
    ]
}

/// Build and populate the demo scene: two circles drifting toward a pair of
/// boxes in the middle.
pub fn load_demo_scene(scene: &mut Scene) {
    spawn_circle(
        scene,
        DVec2::new(-5.0, 0.1),
        DVec2::new(2.0, 0.0),
        1.0,
        1.0,
        0.9,
    )
    .expect("demo circle is valid");
    spawn_circle(
        scene,
        DVec2::new(5.0, -0.2),
        DVec2::new(-1.5, 0.0),
        0.8,
        2.0,
        0.9,
    )
    .expect("demo circle is valid");
    spawn_convex(
        scene,
        DVec2::new(0.0, 0.0),
        DVec2::ZERO,
        box_vertices(2.0, 2.0),
        4.0,
        0.5,
    )
    .expect("demo box is valid");
    spawn_convex(
        scene,
        DVec2::new(0.4, 4.0),
        DVec2::new(0.0, -1.0),
        box_vertices(1.5, 1.0),
        1.5,
        0.7,
    )
    .expect("demo box is valid");
}
