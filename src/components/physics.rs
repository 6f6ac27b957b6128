use glam::DVec2;
use thiserror::Error;

/// Errors raised while computing a shape's physical constants at setup time.
/// All variants indicate bad scene data; nothing mid-simulation recovers from
/// them.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("convex polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("convex polygon has zero area")]
    DegenerateArea,
    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),
    #[error("mass must be positive, got {0}")]
    InvalidMass(f64),
}

/// Physical state of one entity. Written in place by the collision system
/// and the integration step; read-only everywhere else.
#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub mass: f64,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Orientation angle in radians.
    pub rotation: f64,
    pub angular_velocity: f64,
    /// Bounciness in [0, 1]; combined between contact pairs by multiplying.
    pub restitution: f64,
    /// Offset of the center of mass in the shape's own frame. `position`
    /// already points at the center of mass in world space.
    pub center_of_mass: DVec2,
    pub moment_of_inertia: f64,
}

impl Body {
    /// Rotate a shape-local point by the body's orientation, then translate
    /// it to the body's world position.
    pub fn local_to_world(&self, point: DVec2) -> DVec2 {
        DVec2::from_angle(self.rotation).rotate(point) + self.position
    }

    pub fn world_to_local(&self, point: DVec2) -> DVec2 {
        DVec2::from_angle(-self.rotation).rotate(point - self.position)
    }
}

/// Circular collision shape.
#[derive(Clone, Copy, Debug)]
pub struct CircleBody {
    pub radius: f64,
}

impl CircleBody {
    /// Center of mass relative to the shape's bounding-box origin.
    pub fn center_of_mass(&self) -> DVec2 {
        DVec2::splat(self.radius)
    }

    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        mass * self.radius * self.radius / 2.0
    }
}

/// Convex polygon collision shape. After setup the vertices are stored in
/// shape-local coordinates relative to the center of mass.
#[derive(Clone, Debug)]
pub struct ConvexBody {
    pub vertices: Vec<DVec2>,
}

impl ConvexBody {
    /// Center of mass from the signed-triangle decomposition: each edge
    /// `(B, C)` spans a triangle with the local origin, and the result is
    /// the area-weighted average of the triangle centroids.
    pub fn center_of_mass(&self) -> Result<DVec2, ShapeError> {
        if self.vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(self.vertices.len()));
        }
        let mut total_area = 0.0;
        let mut weighted_centers = DVec2::ZERO;
        for (i, &b) in self.vertices.iter().enumerate() {
            let c = self.vertices[(i + 1) % self.vertices.len()];
            let area = b.perp_dot(c).abs() / 2.0;
            total_area += area;
            weighted_centers += (b + c) / 3.0 * area;
        }
        if total_area <= f64::EPSILON {
            return Err(ShapeError::DegenerateArea);
        }
        Ok(weighted_centers / total_area)
    }

    /// Moment of inertia about `center_of_mass` for the given total mass.
    /// The vertices do not have to be re-centered already: the parallel-axis
    /// term `m·|com|²` is subtracted at the end.
    pub fn moment_of_inertia(&self, mass: f64, center_of_mass: DVec2) -> Result<f64, ShapeError> {
        if self.vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(self.vertices.len()));
        }
        let mut total_area = 0.0;
        for (i, &b) in self.vertices.iter().enumerate() {
            let c = self.vertices[(i + 1) % self.vertices.len()];
            total_area += b.perp_dot(c).abs() / 2.0;
        }
        if total_area <= f64::EPSILON {
            return Err(ShapeError::DegenerateArea);
        }
        let mut moment_of_inertia = 0.0;
        for (i, &b) in self.vertices.iter().enumerate() {
            let c = self.vertices[(i + 1) % self.vertices.len()];
            let signed_area = b.perp_dot(c) / 2.0;
            let triangle_area = signed_area.abs();
            // Triangles collinear with the reference vertex carry no mass.
            if triangle_area <= f64::EPSILON {
                continue;
            }
            let triangle_mass = mass * triangle_area / total_area;
            moment_of_inertia += triangle_mass
                * (signed_area / triangle_area)
                * (b.length_squared() + c.length_squared() + b.dot(c));
        }
        Ok(moment_of_inertia / 6.0 - mass * center_of_mass.length_squared())
    }
}

/// Shape-agnostic support capability bound to a body's shape. This is the
/// only geometry interface the collision pipeline sees.
#[derive(Clone, Debug)]
pub enum Collider {
    Circle {
        radius: f64,
    },
    /// Vertices in shape-local coordinates around the center of mass.
    Convex {
        vertices: Vec<DVec2>,
    },
}

impl Collider {
    /// Farthest point of the shape along `direction`, in world space.
    /// `direction` must be nonzero but does not need to be normalized.
    pub fn support(&self, body: &Body, direction: DVec2) -> DVec2 {
        match self {
            Collider::Circle { radius } => {
                body.position + direction * (radius / direction.length())
            }
            Collider::Convex { vertices } => {
                let mut largest_product = f64::NEG_INFINITY;
                let mut farthest = body.position;
                for &vertex in vertices {
                    let world_point = body.local_to_world(vertex);
                    let product = direction.dot(world_point);
                    if product > largest_product {
                        largest_product = product;
                        farthest = world_point;
                    }
                }
                farthest
            }
        }
    }
}
