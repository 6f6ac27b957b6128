//! Entity/component store. A thin wrapper over `hecs::World` exposing the
//! three operations the physics core relies on: typed assignment, typed
//! lookup, and multi-component views.

pub mod demo;
pub mod prefabs;

use hecs::{Component, Entity, Query, Ref, RefMut, World};

/// Associates entity identifiers with typed components.
///
/// Component borrows are checked dynamically (like `RefCell`), so `get_mut`
/// only needs `&self`; holding two mutable borrows of the same component on
/// entities that share storage is a panic, not undefined behavior. Component
/// storage never reallocates while a borrow is live.
#[derive(Default)]
pub struct Scene {
    world: World,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        self.world.spawn(())
    }

    /// Create or replace the `T` component of `entity`, returning a mutable
    /// borrow of the stored value.
    pub fn assign<T: Component>(&mut self, entity: Entity, component: T) -> RefMut<'_, T> {
        self.world
            .insert_one(entity, component)
            .expect("assign on a released entity");
        self.world
            .get::<&mut T>(entity)
            .expect("component was just assigned")
    }

    /// Borrow an existing component. A missing component is a programming
    /// error in the scene setup, so this panics rather than returning an
    /// `Option`.
    pub fn get<T: Component>(&self, entity: Entity) -> Ref<'_, T> {
        self.world
            .get::<&T>(entity)
            .expect("entity is missing a required component")
    }

    /// Mutably borrow an existing component. Panics if the component is
    /// missing or already borrowed mutably.
    pub fn get_mut<T: Component>(&self, entity: Entity) -> RefMut<'_, T> {
        self.world
            .get::<&mut T>(entity)
            .expect("entity is missing a required component")
    }

    /// Entities holding every component named by the query `Q`, collected
    /// for the current frame. Order is unspecified but stable as long as no
    /// component is added or removed.
    pub fn view<Q: Query>(&self) -> Vec<Entity> {
        self.world.query::<Q>().iter().map(|(entity, _)| entity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Body, CircleBody, Collider};
    use glam::DVec2;

    fn test_body() -> Body {
        Body {
            mass: 1.0,
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            restitution: 1.0,
            center_of_mass: DVec2::ZERO,
            moment_of_inertia: 1.0,
        }
    }

    #[test]
    fn assign_replaces_existing_component() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        scene.assign(entity, CircleBody { radius: 1.0 });
        scene.assign(entity, CircleBody { radius: 2.0 });
        assert_eq!(scene.get::<CircleBody>(entity).radius, 2.0);
    }

    #[test]
    fn view_filters_on_all_listed_components() {
        let mut scene = Scene::new();
        let circle = scene.create_entity();
        scene.assign(circle, test_body());
        scene.assign(circle, CircleBody { radius: 1.0 });
        scene.assign(circle, Collider::Circle { radius: 1.0 });

        let bare = scene.create_entity();
        scene.assign(bare, test_body());

        let with_collider = scene.view::<(&Body, &Collider)>();
        assert_eq!(with_collider, vec![circle]);

        let with_body = scene.view::<&Body>();
        assert_eq!(with_body.len(), 2);
        assert!(with_body.contains(&circle) && with_body.contains(&bare));
    }

    #[test]
    fn mutation_through_get_mut_is_visible() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        scene.assign(entity, test_body());
        scene.get_mut::<Body>(entity).velocity = DVec2::new(1.0, 2.0);
        assert_eq!(scene.get::<Body>(entity).velocity, DVec2::new(1.0, 2.0));
    }

    #[test]
    #[should_panic(expected = "missing a required component")]
    fn get_panics_on_missing_component() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        let _ = scene.get::<Body>(entity);
    }
}
