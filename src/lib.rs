//! 2D rigid-body physics core: an entity/component scene holding bodies and
//! convex shapes, plus a collision system that runs GJK/EPA detection and
//! impulse-based response once per tick.
//!
//! Everything is single-threaded and step-driven. The caller owns the clock:
//! advance bodies with [`systems::physics_step`], then resolve contacts with
//! [`systems::collision_system`].

pub mod components;
pub mod gjk;
pub mod scene;
pub mod systems;
