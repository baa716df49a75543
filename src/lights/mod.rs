mod point;

use crate::primitives::Primitive;
use nalgebra::{Point3, Unit, Vector3};
use std::fmt::Debug;
use std::sync::Arc;

pub use point::PointLight;

/// The color and scalar intensity a light contributes at a surface point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Illumination {
    pub color: Vector3<f64>,
    pub intensity: f64,
}

/// A scene light, evaluated fresh for every shading query. The set of
/// implementers is closed: `PointLight`.
pub trait Light: Send + Sync + Debug {
    fn color(&self) -> Vector3<f64>;

    fn location(&self) -> Point3<f64>;

    /// Evaluates this light at a surface point, including the shadow probe
    /// against every primitive other than the one being shaded. `None`
    /// covers both a shadowed light and a surface facing away from it.
    fn compute_illumination(
        &self,
        hit_point: &Point3<f64>,
        normal: &Unit<Vector3<f64>>,
        objects: &[Arc<dyn Primitive>],
        current_object: &Arc<dyn Primitive>,
    ) -> Option<Illumination>;
}
