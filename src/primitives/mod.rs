mod plane;
mod sphere;

use crate::core::{Material, Transformed};
use crate::ray_intersection::Intersectable;
use nalgebra::Vector3;
use std::fmt::Debug;
use std::sync::Arc;

pub use plane::*;
pub use sphere::*;

pub trait HasMaterial {
    /// The shared material assigned to this primitive, if any. A primitive
    /// without one is shaded with the plain diffuse fallback.
    fn material(&self) -> Option<&Arc<dyn Material>>;
}

/// A renderable object with its own local coordinate frame. The set of
/// implementers is closed: `Sphere` and `Plane`.
pub trait Primitive: Send + Sync + Debug + Transformed + Intersectable + HasMaterial {
    fn base_color(&self) -> Vector3<f64>;
}
