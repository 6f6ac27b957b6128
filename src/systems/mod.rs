mod collision;
mod physics;

pub use collision::collision_system;
pub use physics::physics_step;
