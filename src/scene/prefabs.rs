//! Scene-setup collaborators: spawn fully-validated Body + shape + Collider
//! component sets. All physical constants (center of mass, moment of
//! inertia) are computed here, once, so the collision system can assume
//! every body it sees is well-formed.

use glam::DVec2;
use hecs::Entity;
use log::debug;

use crate::components::{Body, CircleBody, Collider, ConvexBody, ShapeError};
use crate::scene::Scene;

/// Spawn a circular body at rest rotationally, with the given linear state.
pub fn spawn_circle(
    scene: &mut Scene,
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    mass: f64,
    restitution: f64,
) -> Result<Entity, ShapeError> {
    if radius <= 0.0 {
        return Err(ShapeError::InvalidRadius(radius));
    }
    if mass <= 0.0 {
        return Err(ShapeError::InvalidMass(mass));
    }
    let circle = CircleBody { radius };
    let entity = scene.create_entity();
    scene.assign(
        entity,
        Body {
            mass,
            position,
            velocity,
            rotation: 0.0,
            angular_velocity: 0.0,
            restitution,
            center_of_mass: circle.center_of_mass(),
            moment_of_inertia: circle.moment_of_inertia(mass),
        },
    );
    scene.assign(entity, circle);
    scene.assign(entity, Collider::Circle { radius });
    debug!("spawned circle r={radius} m={mass} at {position}");
    Ok(entity)
}

/// Spawn a convex polygon body. The vertices may be given in any local
/// frame; they are re-centered around the computed center of mass once,
/// here, so the body's local origin is its center of mass from then on.
pub fn spawn_convex(
    scene: &mut Scene,
    position: DVec2,
    velocity: DVec2,
    vertices: Vec<DVec2>,
    mass: f64,
    restitution: f64,
) -> Result<Entity, ShapeError> {
    if mass <= 0.0 {
        return Err(ShapeError::InvalidMass(mass));
    }
    let mut convex = ConvexBody { vertices };
    let center_of_mass = convex.center_of_mass()?;
    for vertex in &mut convex.vertices {
        *vertex -= center_of_mass;
    }
    let moment_of_inertia = convex.moment_of_inertia(mass, DVec2::ZERO)?;

    let entity = scene.create_entity();
    scene.assign(
        entity,
        Body {
            mass,
            position,
            velocity,
            rotation: 0.0,
            angular_velocity: 0.0,
            restitution,
            center_of_mass,
            moment_of_inertia,
        },
    );
    scene.assign(entity, Collider::Convex {
        vertices: convex.vertices.clone(),
    });
    scene.assign(entity, convex);
    debug!("spawned convex m={mass} I={moment_of_inertia:.4} at {position}");
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn convex_spawn_recenters_vertices() {
        let mut scene = Scene::new();
        let entity = spawn_convex(
            &mut scene,
            DVec2::ZERO,
            DVec2::ZERO,
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.0, 1.0),
            ],
            1.0,
            0.5,
        )
        .unwrap();

        let body = scene.get::<Body>(entity);
        assert_relative_eq!(body.center_of_mass, DVec2::new(0.5, 0.5), epsilon = 1e-12);
        assert_relative_eq!(body.moment_of_inertia, 1.0 / 6.0, epsilon = 1e-12);

        // The stored vertices now sit around the center of mass.
        let convex = scene.get::<ConvexBody>(entity);
        let recentered_com = convex.center_of_mass().unwrap();
        assert_relative_eq!(recentered_com, DVec2::ZERO, epsilon = 1e-12);
    }

    #[test]
    fn invalid_setup_data_is_rejected() {
        let mut scene = Scene::new();
        assert_eq!(
            spawn_circle(&mut scene, DVec2::ZERO, DVec2::ZERO, -1.0, 1.0, 0.5),
            Err(ShapeError::InvalidRadius(-1.0))
        );
        assert_eq!(
            spawn_circle(&mut scene, DVec2::ZERO, DVec2::ZERO, 1.0, 0.0, 0.5),
            Err(ShapeError::InvalidMass(0.0))
        );
        assert_eq!(
            spawn_convex(&mut scene, DVec2::ZERO, DVec2::ZERO, vec![DVec2::ZERO], 1.0, 0.5),
            Err(ShapeError::TooFewVertices(1))
        );
        // Nothing half-spawned is left behind.
        assert!(scene.view::<&Body>().is_empty());
    }
}
