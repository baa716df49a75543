use super::{HasMaterial, Primitive};
use crate::core::{Material, Transform, TransformDirection, Transformed};
use crate::ray_intersection::{Intersectable, Intersection, Ray};
use nalgebra::{Point3, Unit, Vector3};
use std::sync::Arc;

/// The unit sphere at the local origin; placement, scale and orientation
/// come entirely from the transform.
#[derive(Clone, Debug)]
pub struct Sphere {
    base_color: Vector3<f64>,
    transform: Transform,
    material: Option<Arc<dyn Material>>,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            base_color: Vector3::from([1.0; 3]),
            transform: Transform::identity(),
            material: None,
        }
    }
}

impl Sphere {
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

impl Transformed for Sphere {
    fn transform(&self) -> &Transform {
        &self.transform
    }
}

impl HasMaterial for Sphere {
    fn material(&self) -> Option<&Arc<dyn Material>> {
        self.material.as_ref()
    }
}

impl Intersectable for Sphere {
    fn test_intersection(&self, ray: &Ray) -> Option<Intersection> {
        let local_ray = self.transform.apply_ray(ray, TransformDirection::Backward);
        let direction = local_ray.direction.normalize();
        let origin = local_ray.origin.coords;

        // With the direction normalized, the quadratic's leading
        // coefficient is 1.
        let b = 2.0 * origin.dot(&direction);
        let c = origin.dot(&origin) - 1.0;

        let discriminant = b * b - 4.0 * c;
        if discriminant <= 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t1 = (-b + root) / 2.0;
        let t2 = (-b - root) / 2.0;

        // Both roots behind the origin means the sphere sits entirely
        // behind the ray. A single negative root is not promoted to an
        // exit-point hit.
        if t1 < 0.0 && t2 < 0.0 {
            return None;
        }

        let local_point = local_ray.origin + direction * t1.min(t2);

        let point = self
            .transform
            .apply_point(&local_point, TransformDirection::Forward);
        let centre = self
            .transform
            .apply_point(&Point3::origin(), TransformDirection::Forward);
        let normal = Unit::new_normalize(point - centre);

        Some(Intersection {
            point,
            normal,
            color: self.base_color,
        })
    }
}

impl Primitive for Sphere {
    fn base_color(&self) -> Vector3<f64> {
        self.base_color
    }
}
