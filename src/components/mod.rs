mod physics;

pub use physics::{Body, CircleBody, Collider, ConvexBody, ShapeError};
