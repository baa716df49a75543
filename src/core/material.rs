use crate::lights::Light;
use crate::primitives::Primitive;
use crate::ray_intersection::{cast_ray, Ray};
use crate::utils;
use nalgebra::{Point3, Unit, Vector3};
use num_traits::identities::Zero;
use std::fmt::Debug;
use std::sync::Arc;

/// Upper bound on nested reflection casts while shading one camera ray.
pub const MAX_REFLECTION_DEPTH: u8 = 3;

/// Offset applied to specular shadow probes so they start clear of the
/// surface they originate from.
const SHADOW_BIAS: f64 = 0.001;

/// Computes the final surface color at a hit point. `depth` counts the
/// reflection casts already taken for the current camera ray; it starts at
/// zero for every pixel and is threaded through recursive shading calls so
/// pixels can be evaluated independently.
pub trait Material: Send + Sync + Debug {
    #[allow(clippy::too_many_arguments)]
    fn compute_color(
        &self,
        objects: &[Arc<dyn Primitive>],
        lights: &[Arc<dyn Light>],
        current_object: &Arc<dyn Primitive>,
        hit_point: &Point3<f64>,
        normal: &Unit<Vector3<f64>>,
        camera_ray: &Ray,
        depth: u8,
    ) -> Vector3<f64>;
}

/// Direct illumination accumulated over every light and multiplied
/// component-wise by the surface's base color. This is the whole shading
/// model for primitives without an assigned material, and the diffuse term
/// of `SimpleMaterial`. Lights that are shadowed or facing away contribute
/// nothing, so a fully dark surface comes out black.
pub fn diffuse_color(
    objects: &[Arc<dyn Primitive>],
    lights: &[Arc<dyn Light>],
    current_object: &Arc<dyn Primitive>,
    hit_point: &Point3<f64>,
    normal: &Unit<Vector3<f64>>,
    base_color: Vector3<f64>,
) -> Vector3<f64> {
    let mut illumination_sum = Vector3::zero();
    for light in lights {
        if let Some(illumination) =
            light.compute_illumination(hit_point, normal, objects, current_object)
        {
            illumination_sum += illumination.color * illumination.intensity;
        }
    }

    illumination_sum.component_mul(&base_color)
}

/// A diffuse surface with optional mirror reflection and a phong-style
/// specular highlight.
#[derive(Copy, Clone, Debug)]
pub struct SimpleMaterial {
    pub base_color: Vector3<f64>,
    pub reflectivity: f64,
    pub shininess: f64,
}

impl Default for SimpleMaterial {
    fn default() -> Self {
        Self {
            base_color: Vector3::from([1.0; 3]),
            reflectivity: 0.0,
            shininess: 0.0,
        }
    }
}

impl SimpleMaterial {
    pub fn new(base_color: Vector3<f64>, reflectivity: f64, shininess: f64) -> Self {
        Self {
            base_color,
            reflectivity,
            shininess,
        }
    }

    /// Casts the mirror ray and shades whatever it hits first, recursing
    /// into that surface's own material when it has one. Contributes
    /// nothing once the reflection budget for this camera ray is spent.
    #[allow(clippy::too_many_arguments)]
    fn reflection_color(
        &self,
        objects: &[Arc<dyn Primitive>],
        lights: &[Arc<dyn Light>],
        current_object: &Arc<dyn Primitive>,
        hit_point: &Point3<f64>,
        normal: &Unit<Vector3<f64>>,
        incident_ray: &Ray,
        depth: u8,
    ) -> Vector3<f64> {
        let reflection_dir = utils::reflect(&incident_ray.direction, normal);
        let reflection_ray = Ray::new(*hit_point, hit_point + reflection_dir);

        match cast_ray(&reflection_ray, objects, Some(current_object)) {
            Some(hit) if depth < MAX_REFLECTION_DEPTH => match hit.object.material() {
                Some(material) => material.compute_color(
                    objects,
                    lights,
                    &hit.object,
                    &hit.intersection.point,
                    &hit.intersection.normal,
                    &reflection_ray,
                    depth + 1,
                ),
                None => diffuse_color(
                    objects,
                    lights,
                    &hit.object,
                    &hit.intersection.point,
                    &hit.intersection.normal,
                    hit.intersection.color,
                ),
            },
            _ => Vector3::zero(),
        }
    }

    /// Phong-style highlight: for each unobstructed light, the reflection
    /// of the light direction is compared against the view direction and
    /// raised to the shininess exponent. The probe ray starts a small step
    /// off the surface and tests every primitive, the current one included.
    fn specular_color(
        &self,
        objects: &[Arc<dyn Primitive>],
        lights: &[Arc<dyn Light>],
        hit_point: &Point3<f64>,
        normal: &Unit<Vector3<f64>>,
        camera_ray: &Ray,
    ) -> Vector3<f64> {
        let mut specular = Vector3::zero();

        for light in lights {
            let light_dir = (light.location() - hit_point).normalize();
            let start_point = hit_point + light_dir * SHADOW_BIAS;
            let light_ray = Ray::new(start_point, start_point + light_dir);

            let blocked = objects
                .iter()
                .any(|object| object.test_intersection(&light_ray).is_some());

            let mut intensity = 0.0;
            if !blocked {
                let reflection = utils::reflect(&light_ray.direction, normal).normalize();
                let view = camera_ray.direction.normalize();

                let highlight = reflection.dot(&view);
                if highlight > 0.0 {
                    intensity = self.reflectivity * highlight.powf(self.shininess);
                }
            }

            specular += light.color() * intensity;
        }

        specular
    }
}

impl Material for SimpleMaterial {
    #[allow(clippy::too_many_arguments)]
    fn compute_color(
        &self,
        objects: &[Arc<dyn Primitive>],
        lights: &[Arc<dyn Light>],
        current_object: &Arc<dyn Primitive>,
        hit_point: &Point3<f64>,
        normal: &Unit<Vector3<f64>>,
        camera_ray: &Ray,
        depth: u8,
    ) -> Vector3<f64> {
        let diffuse = diffuse_color(
            objects,
            lights,
            current_object,
            hit_point,
            normal,
            self.base_color,
        );

        let reflection = if self.reflectivity > 0.0 {
            self.reflection_color(
                objects,
                lights,
                current_object,
                hit_point,
                normal,
                camera_ray,
                depth,
            )
        } else {
            Vector3::zero()
        };

        // Reflection and diffuse blend as a convex combination. Specular is
        // added on top and may push channels past 1.0; clamping is the
        // canvas's concern.
        let mut color = reflection * self.reflectivity + diffuse * (1.0 - self.reflectivity);

        if self.shininess > 0.0 {
            color += self.specular_color(objects, lights, hit_point, normal, camera_ray);
        }

        color
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lights::PointLight;
    use crate::primitives::{Plane, Sphere};
    use crate::Transform;
    use std::f64::consts::PI;

    fn single_sphere_scene() -> (Vec<Arc<dyn Primitive>>, Vec<Arc<dyn Light>>) {
        let objects: Vec<Arc<dyn Primitive>> = vec![Arc::new(Sphere::default())];
        let lights: Vec<Arc<dyn Light>> = vec![Arc::new(PointLight::new(
            Vector3::from([1.0; 3]),
            Point3::new(0.0, -5.0, 0.0),
            1.0,
        ))];

        (objects, lights)
    }

    #[test]
    fn it_matches_the_diffuse_fallback_when_inert() {
        let (objects, lights) = single_sphere_scene();
        let current = Arc::clone(&objects[0]);

        let base_color = Vector3::new(0.3, 0.6, 0.9);
        let material = SimpleMaterial::new(base_color, 0.0, 0.0);

        let hit_point = Point3::new(0.0, -1.0, 0.0);
        let normal = Unit::new_normalize(Vector3::new(0.0, -1.0, 0.0));
        let camera_ray = Ray::new(Point3::new(0.0, -10.0, 0.0), hit_point);

        let shaded = material.compute_color(
            &objects,
            &lights,
            &current,
            &hit_point,
            &normal,
            &camera_ray,
            0,
        );
        let fallback = diffuse_color(&objects, &lights, &current, &hit_point, &normal, base_color);

        assert_eq!(shaded, fallback);
    }

    #[test]
    fn it_shades_black_without_lights() {
        let objects: Vec<Arc<dyn Primitive>> = vec![Arc::new(Sphere::default())];
        let lights: Vec<Arc<dyn Light>> = Vec::new();
        let current = Arc::clone(&objects[0]);

        let color = diffuse_color(
            &objects,
            &lights,
            &current,
            &Point3::new(0.0, -1.0, 0.0),
            &Unit::new_normalize(Vector3::new(0.0, -1.0, 0.0)),
            Vector3::from([1.0; 3]),
        );

        assert_eq!(color, Vector3::zero());
    }

    #[test]
    fn it_caps_reflection_recursion_between_facing_mirrors() {
        let mirror: Arc<dyn Material> = Arc::new(SimpleMaterial::new(
            Vector3::from([0.9; 3]),
            1.0,
            0.0,
        ));

        let mut floor = Plane::default();
        floor.set_material(Arc::clone(&mirror));

        let mut ceiling = Plane::default();
        ceiling.set_transform(
            Transform::new(
                Vector3::new(0.0, 0.0, 2.0),
                Vector3::new(PI, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 1.0),
            )
            .unwrap(),
        );
        ceiling.set_material(Arc::clone(&mirror));

        let objects: Vec<Arc<dyn Primitive>> = vec![Arc::new(floor), Arc::new(ceiling)];
        let lights: Vec<Arc<dyn Light>> = vec![Arc::new(PointLight::new(
            Vector3::from([1.0; 3]),
            Point3::new(0.0, -5.0, 1.0),
            1.0,
        ))];
        let current = Arc::clone(&objects[0]);

        let hit_point = Point3::origin();
        let normal = Unit::new_normalize(Vector3::new(0.0, 0.0, 1.0));
        let camera_ray = Ray::new(Point3::new(0.0, 0.0, 1.0), hit_point);

        // The mirrors face each other, so only the depth budget stops the
        // ping-ponging reflection from recursing forever.
        let color = mirror.compute_color(
            &objects,
            &lights,
            &current,
            &hit_point,
            &normal,
            &camera_ray,
            0,
        );

        assert!(color.iter().all(|channel| channel.is_finite()));
    }
}
