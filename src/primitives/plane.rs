use super::{HasMaterial, Primitive};
use crate::core::{Material, Transform, TransformDirection, Transformed};
use crate::ray_intersection::{Intersectable, Intersection, Ray};
use nalgebra::{Point3, Unit, Vector3};
use std::f64::EPSILON;
use std::sync::Arc;

/// The local z = 0 plane of infinite extent, with its normal along local
/// +z. Placement and orientation come from the transform.
#[derive(Clone, Debug)]
pub struct Plane {
    base_color: Vector3<f64>,
    transform: Transform,
    material: Option<Arc<dyn Material>>,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            base_color: Vector3::from([1.0; 3]),
            transform: Transform::identity(),
            material: None,
        }
    }
}

impl Plane {
    pub fn new(base_color: Vector3<f64>, transform: Transform) -> Self {
        Self {
            base_color,
            transform,
            material: None,
        }
    }

    pub fn set_base_color(&mut self, base_color: Vector3<f64>) {
        self.base_color = base_color;
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = Some(material);
    }
}

impl Transformed for Plane {
    fn transform(&self) -> &Transform {
        &self.transform
    }
}

impl HasMaterial for Plane {
    fn material(&self) -> Option<&Arc<dyn Material>> {
        self.material.as_ref()
    }
}

impl Intersectable for Plane {
    fn test_intersection(&self, ray: &Ray) -> Option<Intersection> {
        let local_ray = self.transform.apply_ray(ray, TransformDirection::Backward);
        let direction = local_ray.direction.normalize();

        // A ray running parallel to the local z = 0 plane never meets it,
        // no matter how it is offset.
        if direction.z.abs() < EPSILON {
            return None;
        }

        let t = -local_ray.origin.z / direction.z;
        if t <= 0.0 {
            return None;
        }

        let local_point = local_ray.origin + direction * t;

        let point = self
            .transform
            .apply_point(&local_point, TransformDirection::Forward);
        let origin = self
            .transform
            .apply_point(&Point3::origin(), TransformDirection::Forward);
        let normal_tip = self
            .transform
            .apply_point(&Point3::new(0.0, 0.0, 1.0), TransformDirection::Forward);
        let normal = Unit::new_normalize(normal_tip - origin);

        Some(Intersection {
            point,
            normal,
            color: self.base_color,
        })
    }
}

impl Primitive for Plane {
    fn base_color(&self) -> Vector3<f64> {
        self.base_color
    }
}
