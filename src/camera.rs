use crate::ray_intersection::Ray;
use nalgebra::{Point3, Vector3};

/// A pinhole camera projecting through a screen placed `length` along the
/// view direction. `update_geometry` must be called after changing any
/// parameter before new rays are generated; the screen basis is the only
/// cached state.
#[derive(Clone, Debug)]
pub struct Camera {
    position: Point3<f64>,
    look_at: Point3<f64>,
    up: Vector3<f64>,
    length: f64,
    horz_size: f64,
    aspect_ratio: f64,

    alignment: Vector3<f64>,
    screen_u: Vector3<f64>,
    screen_v: Vector3<f64>,
    screen_centre: Point3<f64>,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, -10.0, 0.0),
            look_at: Point3::origin(),
            up: Vector3::new(0.0, 0.0, 1.0),
            length: 1.0,
            horz_size: 1.0,
            aspect_ratio: 1.0,

            alignment: Vector3::zeros(),
            screen_u: Vector3::zeros(),
            screen_v: Vector3::zeros(),
            screen_centre: Point3::origin(),
        };
        camera.update_geometry();

        camera
    }
}

impl Camera {
    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn look_at(&self) -> Point3<f64> {
        self.look_at
    }

    pub fn up(&self) -> Vector3<f64> {
        self.up
    }

    pub fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
    }

    pub fn set_look_at(&mut self, look_at: Point3<f64>) {
        self.look_at = look_at;
    }

    pub fn set_up(&mut self, up: Vector3<f64>) {
        self.up = up;
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    pub fn set_horz_size(&mut self, horz_size: f64) {
        self.horz_size = horz_size;
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Recomputes the projection screen basis: the normalized view
    /// direction, the horizontal and vertical screen axes and the screen
    /// centre, with the axes scaled to the screen size and aspect ratio.
    pub fn update_geometry(&mut self) {
        self.alignment = (self.look_at - self.position).normalize();

        self.screen_u = self.alignment.cross(&self.up).normalize();
        self.screen_v = self.screen_u.cross(&self.alignment);

        self.screen_centre = self.position + self.length * self.alignment;

        self.screen_u *= self.horz_size;
        self.screen_v *= self.horz_size / self.aspect_ratio;
    }

    /// Builds the ray from the camera position through the screen point at
    /// the given normalized device coordinates in [-1, 1]².
    pub fn generate_ray(&self, screen_x: f64, screen_y: f64) -> Ray {
        let screen_point = self.screen_centre + self.screen_u * screen_x + self.screen_v * screen_y;

        Ray::new(self.position, screen_point)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_aims_centre_rays_along_the_view_direction() {
        let camera = Camera::default();
        let ray = camera.generate_ray(0.0, 0.0);

        assert_eq!(ray.origin, Point3::new(0.0, -10.0, 0.0));
        assert_eq!(ray.target, Point3::new(0.0, -9.0, 0.0));
        assert_eq!(ray.direction, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn it_builds_an_orthogonal_screen_basis() {
        let mut camera = Camera::default();
        camera.set_position(Point3::new(3.0, -7.0, 2.0));
        camera.set_look_at(Point3::new(-1.0, 0.5, 0.0));
        camera.set_horz_size(0.25);
        camera.set_aspect_ratio(16.0 / 9.0);
        camera.update_geometry();

        let centre = camera.generate_ray(0.0, 0.0).target;
        let right = camera.generate_ray(1.0, 0.0).target;
        let down = camera.generate_ray(0.0, 1.0).target;

        let u = right - centre;
        let v = down - centre;

        assert!(u.dot(&v).abs() < 1e-12);
        assert!((u.norm() - 0.25).abs() < 1e-12);
        assert!((v.norm() - 0.25 / (16.0 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn it_offsets_rays_by_screen_coordinates() {
        let camera = Camera::default();
        let ray = camera.generate_ray(1.0, -1.0);

        // up = +z, so the horizontal axis is +x and the vertical axis +z.
        assert_eq!(ray.target, Point3::new(1.0, -9.0, -1.0));
    }

    #[test]
    fn it_tracks_parameter_changes_after_update() {
        let mut camera = Camera::default();
        camera.set_position(Point3::new(0.0, -5.0, 0.0));
        camera.set_length(2.0);
        camera.update_geometry();

        let ray = camera.generate_ray(0.0, 0.0);

        assert_eq!(ray.origin, Point3::new(0.0, -5.0, 0.0));
        assert_eq!(ray.target, Point3::new(0.0, -3.0, 0.0));
    }
}
