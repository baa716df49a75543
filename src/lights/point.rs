use super::{Illumination, Light};
use crate::primitives::Primitive;
use crate::ray_intersection::Ray;
use nalgebra::{Point3, Unit, Vector3};
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

/// An omnidirectional light at a single world-space location.
#[derive(Clone, Debug)]
pub struct PointLight {
    color: Vector3<f64>,
    location: Point3<f64>,
    intensity: f64,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Vector3::from([1.0; 3]),
            location: Point3::origin(),
            intensity: 1.0,
        }
    }
}

impl PointLight {
    pub fn new(color: Vector3<f64>, location: Point3<f64>, intensity: f64) -> Self {
        Self {
            color,
            location,
            intensity,
        }
    }
}

impl Light for PointLight {
    fn color(&self) -> Vector3<f64> {
        self.color
    }

    fn location(&self) -> Point3<f64> {
        self.location
    }

    fn compute_illumination(
        &self,
        hit_point: &Point3<f64>,
        normal: &Unit<Vector3<f64>>,
        objects: &[Arc<dyn Primitive>],
        current_object: &Arc<dyn Primitive>,
    ) -> Option<Illumination> {
        let light_dir = (self.location - hit_point).normalize();
        let light_ray = Ray::new(*hit_point, hit_point + light_dir);

        // Any other primitive that meets the probe ray blocks this light
        // outright, whether or not the blocker sits between the surface
        // and the light.
        let blocked = objects
            .iter()
            .filter(|object| !Arc::ptr_eq(object, current_object))
            .any(|object| object.test_intersection(&light_ray).is_some());
        if blocked {
            return None;
        }

        // Intensity falls off linearly with the incidence angle rather
        // than with its cosine.
        let angle = normal.dot(&light_dir).acos();
        if angle > FRAC_PI_2 {
            return None;
        }

        Some(Illumination {
            color: self.color,
            intensity: self.intensity * (1.0 - angle / FRAC_PI_2),
        })
    }
}
