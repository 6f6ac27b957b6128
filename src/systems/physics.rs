use crate::components::Body;
use crate::scene::Scene;

/// Advance every body by one timestep: position by linear velocity, rotation
/// by angular velocity. `dt` is supplied by the caller; the physics core
/// does not own the clock.
pub fn physics_step(scene: &mut Scene, dt: f64) {
    for entity in scene.view::<&Body>() {
        let mut body = scene.get_mut::<Body>(entity);
        let body = &mut *body;
        body.position += body.velocity * dt;
        body.rotation += body.angular_velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec2;

    #[test]
    fn integrates_position_and_rotation() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        scene.assign(
            entity,
            Body {
                mass: 1.0,
                position: DVec2::ZERO,
                velocity: DVec2::new(1.0, 2.0),
                rotation: 0.0,
                angular_velocity: 0.5,
                restitution: 1.0,
                center_of_mass: DVec2::ZERO,
                moment_of_inertia: 1.0,
            },
        );

        physics_step(&mut scene, 0.5);

        let body = scene.get::<Body>(entity);
        assert_relative_eq!(body.position, DVec2::new(0.5, 1.0), epsilon = 1e-12);
        assert_relative_eq!(body.rotation, 0.25, epsilon = 1e-12);
    }
}
