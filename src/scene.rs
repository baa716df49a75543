use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::core::diffuse_color;
use crate::lights::Light;
use crate::primitives::Primitive;
use crate::ray_intersection::{cast_ray, HitRecord, Ray};
use crate::utils;
use image::RgbaImage;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::info;
use nalgebra::Vector3;
use rand::seq::SliceRandom;
use rand::thread_rng;
use rayon::prelude::*;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// The object graph being rendered: a camera, the primitives and the
/// lights. Topology is fixed while a render runs; objects and lights keep
/// their insertion order for the scene's lifetime.
#[derive(Debug, Default)]
pub struct Scene {
    camera: Camera,
    objects: Vec<Arc<dyn Primitive>>,
    lights: Vec<Arc<dyn Light>>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn add_object(&mut self, object: Arc<dyn Primitive>) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Arc<dyn Light>) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[Arc<dyn Primitive>] {
        &self.objects
    }

    pub fn lights(&self) -> &[Arc<dyn Light>] {
        &self.lights
    }

    /// Closest-hit scan over the whole object list.
    pub fn cast_ray(&self, ray: &Ray) -> Option<HitRecord> {
        cast_ray(ray, &self.objects, None)
    }

    /// Shades one camera ray: the closest hit's material, or the plain
    /// diffuse fallback when the primitive has none. `None` means the ray
    /// escaped the scene. The reflection depth starts at zero here, once
    /// per camera ray.
    pub fn shade_ray(&self, ray: &Ray) -> Option<Vector3<f64>> {
        self.cast_ray(ray).map(|hit| match hit.object.material() {
            Some(material) => material.compute_color(
                &self.objects,
                &self.lights,
                &hit.object,
                &hit.intersection.point,
                &hit.intersection.normal,
                ray,
                0,
            ),
            None => diffuse_color(
                &self.objects,
                &self.lights,
                &hit.object,
                &hit.intersection.point,
                &hit.intersection.normal,
                hit.intersection.color,
            ),
        })
    }

    /// Maps a pixel to normalized device coordinates in [-1, 1]² and
    /// shades its camera ray.
    pub fn screen_raycast(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Vector3<f64>> {
        let norm_x = utils::remap_value(f64::from(x), (0.0, f64::from(width)), (-1.0, 1.0));
        let norm_y = utils::remap_value(f64::from(y), (0.0, f64::from(height)), (-1.0, 1.0));

        self.shade_ray(&self.camera.generate_ray(norm_x, norm_y))
    }

    /// The synchronous render loop: one ray per canvas pixel. Misses leave
    /// the canvas untouched, so the background is whatever the canvas was
    /// initialized to. Runs to completion; there is no per-pixel failure
    /// mode.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        let (width, height) = (canvas.width(), canvas.height());

        let start = Instant::now();
        for x in 0..width {
            for y in 0..height {
                if let Some(color) = self.screen_raycast(x, y, width, height) {
                    canvas.set_pixel(x, y, color.x, color.y, color.z);
                }
            }
        }
        info!(
            "rendered {}x{} pixels in {:.3?}",
            width,
            height,
            start.elapsed()
        );
    }

    /// Renders every pixel across the rayon pool into an image. Pixels are
    /// independent because the reflection depth is threaded through the
    /// shading calls rather than shared.
    pub fn render_to_image(&self, width: u32, height: u32, use_progress: bool) -> RgbaImage {
        let w = width as usize;
        let h = height as usize;

        let mut image_buffer: Vec<u8> = vec![0; w * h * 4];
        for pixel in image_buffer.chunks_exact_mut(4) {
            pixel[3] = 255;
        }
        let image_buffer_lock = RwLock::new(&mut image_buffer);

        let process_pixel = |&index: &usize| {
            let (x, y) = ((index % w) as u32, (index / w) as u32);
            if let Some(color) = self.screen_raycast(x, y, width, height) {
                let buffer_index = index * 4;
                let mut image_buffer = image_buffer_lock.write().unwrap();
                image_buffer[buffer_index] = (color.x.clamp(0.0, 1.0) * 255.0) as u8;
                image_buffer[buffer_index + 1] = (color.y.clamp(0.0, 1.0) * 255.0) as u8;
                image_buffer[buffer_index + 2] = (color.z.clamp(0.0, 1.0) * 255.0) as u8;
            }
        };

        let mut indexes: Vec<usize> = (0..w * h).collect();
        indexes.shuffle(&mut thread_rng());

        let start = Instant::now();
        if use_progress {
            let progress = Self::build_progress_bar(width, height);
            indexes.par_iter().progress_with(progress).for_each(process_pixel);
        } else {
            indexes.par_iter().for_each(process_pixel);
        }
        info!(
            "rendered {}x{} pixels across {} objects in {:.3?}",
            width,
            height,
            self.objects.len(),
            start.elapsed()
        );

        RgbaImage::from_raw(width, height, image_buffer).expect("failed to convert buffer")
    }

    fn build_progress_bar(width: u32, height: u32) -> ProgressBar {
        let progress = ProgressBar::new((width * height).into());
        progress.set_draw_delta(u64::from(width * height / 200));
        progress.set_style(ProgressStyle::default_bar().template(
            "[{elapsed_precise} elapsed] [{eta_precise} left] {bar:40} {pos}/{len} pixels",
        ));

        progress
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::ImageCanvas;
    use crate::core::{SimpleMaterial, Transform};
    use crate::lights::PointLight;
    use crate::primitives::Sphere;
    use more_asserts::assert_lt;
    use nalgebra::Point3;

    fn sphere_and_light_scene() -> Scene {
        let mut camera = Camera::default();
        camera.set_horz_size(0.1);
        camera.update_geometry();

        let mut scene = Scene::new(camera);
        scene.add_object(Arc::new(Sphere::default()));
        scene.add_light(Arc::new(PointLight::new(
            Vector3::from([1.0; 3]),
            Point3::new(0.0, -10.0, 0.0),
            1.0,
        )));

        scene
    }

    #[test]
    fn it_reports_the_hit_closest_to_the_camera() {
        let mut scene = sphere_and_light_scene();

        // A second sphere hides directly behind the first along the view
        // direction; the scan must keep the nearer hit.
        scene.add_object(Arc::new(Sphere::new(
            Vector3::from([1.0; 3]),
            Transform::new(
                Vector3::new(0.0, 5.0, 0.0),
                Vector3::zeros(),
                Vector3::new(1.0, 1.0, 1.0),
            )
            .unwrap(),
        )));

        let ray = scene.camera().generate_ray(0.0, 0.0);
        let hit = scene.cast_ray(&ray).unwrap();

        assert!(Arc::ptr_eq(&hit.object, &scene.objects()[0]));
        assert_lt!((hit.intersection.point - Point3::new(0.0, -1.0, 0.0)).norm(), 1e-9);
        assert_lt!(hit.distance, 10.0);
    }

    #[test]
    fn it_shades_camera_rays_that_hit() {
        let scene = sphere_and_light_scene();

        let color = scene.shade_ray(&scene.camera().generate_ray(0.0, 0.0)).unwrap();

        // The light sits behind the camera, so the facing surface is lit.
        assert!(color.x > 0.0);
    }

    #[test]
    fn it_reports_no_color_for_rays_that_miss() {
        let scene = sphere_and_light_scene();

        // Aim well off to the side of the unit sphere.
        assert!(scene.shade_ray(&scene.camera().generate_ray(1.0, 1.0)).is_none());
    }

    #[test]
    fn it_renders_hits_and_leaves_misses_untouched() {
        let scene = sphere_and_light_scene();

        let mut canvas = ImageCanvas::new(3, 3);
        scene.render(&mut canvas);
        let image = canvas.into_image();

        // The centre pixel sees the sphere; the corner ray misses and its
        // pixel keeps the canvas's initial contents.
        assert_ne!(image.get_pixel(1, 1).0[3], 0);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn it_dispatches_to_materials_when_assigned() {
        let mut camera = Camera::default();
        camera.set_horz_size(0.25);
        camera.update_geometry();

        let mut sphere = Sphere::default();
        sphere.set_material(Arc::new(SimpleMaterial::new(
            Vector3::new(0.0, 1.0, 0.0),
            0.0,
            0.0,
        )));

        let mut scene = Scene::new(camera);
        scene.add_object(Arc::new(sphere));
        scene.add_light(Arc::new(PointLight::new(
            Vector3::from([1.0; 3]),
            Point3::new(0.0, -10.0, 0.0),
            1.0,
        )));

        let color = scene.shade_ray(&scene.camera().generate_ray(0.0, 0.0)).unwrap();

        // The material's green base color wins over the sphere's own white.
        assert_eq!(color.x, 0.0);
        assert!(color.y > 0.0);
    }

    #[test]
    fn it_matches_the_sequential_render_in_parallel() {
        let scene = sphere_and_light_scene();

        let mut canvas = ImageCanvas::new(3, 3);
        scene.render(&mut canvas);
        let sequential = canvas.into_image();

        let parallel = scene.render_to_image(3, 3, false);

        for (x, y, pixel) in parallel.enumerate_pixels() {
            assert_eq!(pixel.0[..3], sequential.get_pixel(x, y).0[..3]);
        }
    }
}
