use crate::primitives::Primitive;
use nalgebra::{Point3, Unit, Vector3};
use std::sync::Arc;

/// A ray through world space, stored as the pair of points that define it.
/// The direction is the difference of the two and is not renormalized;
/// intersection code normalizes its own copy where the math needs it.
#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub target: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, target: Point3<f64>) -> Self {
        Self {
            origin,
            target,
            direction: target - origin,
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Point3::origin(), Point3::new(0.0, 0.0, 1.0))
    }
}

/// A world-space surface hit: the intersection point, the outward surface
/// normal and the surface color at that point.
#[derive(Clone, Debug)]
pub struct Intersection {
    pub point: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
    pub color: Vector3<f64>,
}

/// Tests a ray against a primitive's surface. Implementations carry the ray
/// into the primitive's local frame, intersect the canonical geometry there
/// and hand back a world-space hit.
pub trait Intersectable {
    fn test_intersection(&self, ray: &Ray) -> Option<Intersection>;
}

/// The closest hit found by `cast_ray`, along with the primitive that
/// produced it and its distance from the ray origin.
#[derive(Clone, Debug)]
pub struct HitRecord {
    pub object: Arc<dyn Primitive>,
    pub intersection: Intersection,
    pub distance: f64,
}

/// Brute-force closest-hit scan over every primitive, optionally skipping
/// the one a secondary ray originates from. A miss is an ordinary outcome,
/// not an error.
pub fn cast_ray(
    ray: &Ray,
    objects: &[Arc<dyn Primitive>],
    exclude: Option<&Arc<dyn Primitive>>,
) -> Option<HitRecord> {
    let mut closest: Option<HitRecord> = None;
    let mut min_distance = f64::INFINITY;

    for object in objects {
        if let Some(excluded) = exclude {
            if Arc::ptr_eq(object, excluded) {
                continue;
            }
        }

        if let Some(intersection) = object.test_intersection(ray) {
            let distance = (intersection.point - ray.origin).norm();
            if distance < min_distance {
                min_distance = distance;
                closest = Some(HitRecord {
                    object: Arc::clone(object),
                    intersection,
                    distance,
                });
            }
        }
    }

    closest
}
