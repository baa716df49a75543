use crate::ray_intersection::Ray;
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};
use std::ops::Mul;
use thiserror::Error;

/// Returned when a requested transform has no inverse, in practice a scale
/// with a zero component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("transform matrix is singular and has no inverse")]
pub struct SingularTransformError;

/// Which way a transform maps: `Forward` takes local coordinates to world
/// space, `Backward` takes world coordinates to the local frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransformDirection {
    Forward,
    Backward,
}

pub trait Transformed {
    fn transform(&self) -> &Transform;
}

/// An affine transform stored as a forward/backward matrix pair. The
/// backward matrix is the exact inverse of the forward matrix at all times;
/// the two are only ever recomputed together.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    forward: Matrix4<f64>,
    backward: Matrix4<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            forward: Matrix4::identity(),
            backward: Matrix4::identity(),
        }
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds a transform from a translation, per-axis rotation angles in
    /// radians and a non-uniform scale.
    pub fn new(
        translation: Vector3<f64>,
        rotation: Vector3<f64>,
        scale: Vector3<f64>,
    ) -> Result<Self, SingularTransformError> {
        let mut transform = Self::identity();
        transform.set(translation, rotation, scale)?;
        Ok(transform)
    }

    /// Rebuilds the forward matrix as T * S * Rx * Ry * Rz and the backward
    /// matrix as its inverse. The multiplication order is load-bearing and
    /// must not be rearranged.
    pub fn set(
        &mut self,
        translation: Vector3<f64>,
        rotation: Vector3<f64>,
        scale: Vector3<f64>,
    ) -> Result<(), SingularTransformError> {
        let translation = Translation3::from(translation).to_homogeneous();
        let scale = Matrix4::new_nonuniform_scaling(&scale);
        let rotation_x =
            Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x).to_homogeneous();
        let rotation_y =
            Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.y).to_homogeneous();
        let rotation_z =
            Rotation3::from_axis_angle(&Vector3::z_axis(), rotation.z).to_homogeneous();

        let forward = translation * scale * rotation_x * rotation_y * rotation_z;
        let backward = forward.try_inverse().ok_or(SingularTransformError)?;

        self.forward = forward;
        self.backward = backward;
        Ok(())
    }

    pub fn forward(&self) -> Matrix4<f64> {
        self.forward
    }

    pub fn backward(&self) -> Matrix4<f64> {
        self.backward
    }

    fn matrix(&self, direction: TransformDirection) -> &Matrix4<f64> {
        match direction {
            TransformDirection::Forward => &self.forward,
            TransformDirection::Backward => &self.backward,
        }
    }

    /// Homogeneous transform of a single point: promoted to w = 1,
    /// multiplied, truncated back to three components.
    pub fn apply_point(&self, point: &Point3<f64>, direction: TransformDirection) -> Point3<f64> {
        self.matrix(direction).transform_point(point)
    }

    /// Transforms both ray endpoints and rebuilds the direction from their
    /// difference.
    pub fn apply_ray(&self, ray: &Ray, direction: TransformDirection) -> Ray {
        Ray::new(
            self.apply_point(&ray.origin, direction),
            self.apply_point(&ray.target, direction),
        )
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        let forward = self.forward * rhs.forward;
        // Inverting the product directly avoids compounding the rounding
        // error already present in the operands' backward matrices. Both
        // operands are invertible, so the product is too; the fallback only
        // covers numerical failure of the inversion.
        let backward = forward
            .try_inverse()
            .unwrap_or_else(|| rhs.backward * self.backward);

        Transform { forward, backward }
    }
}
