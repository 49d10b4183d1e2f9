#![warn(missing_docs)]

//! Math types for the lapidary geometry kernel.
//!
//! Thin wrappers around nalgebra: points, vectors, directions, rigid
//! transforms, and the tolerance constants the kernel compares against.

use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in the 2D cross-section plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 4x4 affine transformation matrix.
///
/// Carving and setting placement only ever compose translations,
/// rotations, and uniform scales, so normals stay meaningful throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Uniform scale by `factor` about the origin.
    pub fn uniform_scale(factor: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = factor;
        m[(1, 1)] = factor;
        m[(2, 2)] = factor;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Rotation about an arbitrary axis through the origin by `angle`
    /// radians, by Rodrigues' formula. Used for tilted stone placements.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
        let mut m = Matrix4::identity();
        m[(0, 0)] = t * x * x + c;
        m[(0, 1)] = t * x * y - s * z;
        m[(0, 2)] = t * x * z + s * y;
        m[(1, 0)] = t * x * y + s * z;
        m[(1, 1)] = t * y * y + c;
        m[(1, 2)] = t * y * z - s * x;
        m[(2, 0)] = t * x * z - s * y;
        m[(2, 1)] = t * y * z + s * x;
        m[(2, 2)] = t * z * z + c;
        Self { matrix: m }
    }

    /// Compose: applying the result applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (rotation/scale only, no translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Transform a surface normal (inverse transpose of the upper 3x3).
    pub fn apply_normal(&self, n: &Vec3) -> Vec3 {
        let m3 = self.matrix.fixed_view::<3, 3>(0, 0);
        match m3.try_inverse() {
            Some(inv) => inv.transpose() * n,
            None => *n,
        }
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default kernel tolerances (1e-6 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two unit vectors point the same way within the angular
    /// tolerance.
    pub fn dirs_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        a.cross(b).norm() < self.angular && a.dot(b) > 0.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn translation_moves_points_but_not_vectors() {
        let t = Transform::translation(2.0, -1.0, 5.0);
        let p = t.apply_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.x, 3.0, max_relative = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 6.0, max_relative = 1e-12);
        let v = t.apply_vec(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v.norm(), 1.0, max_relative = 1e-12);
        assert_relative_eq!(v.x, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn tilt_then_index_rotation_orients_a_cut_normal() {
        // A facet normal starts at +z, tilts 138 degrees about x, then
        // swings 90 degrees about z.
        let tilt = Transform::rotation_x(138.0_f64.to_radians());
        let swing = Transform::rotation_z(90.0_f64.to_radians());
        let n = swing.then(&tilt).apply_vec(&Vec3::z());
        assert_relative_eq!(n.x, 138.0_f64.to_radians().sin(), epsilon = 1e-12);
        assert_relative_eq!(n.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(n.z, 138.0_f64.to_radians().cos(), epsilon = 1e-12);
    }

    #[test]
    fn rotation_y_carries_z_toward_x() {
        let t = Transform::rotation_y(PI / 2.0);
        let v = t.apply_vec(&Vec3::z());
        assert_relative_eq!(v.x, 1.0, max_relative = 1e-12);
        assert_relative_eq!(v.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn uniform_scale_scales_radially() {
        let t = Transform::uniform_scale(2.5);
        let p = t.apply_point(&Point3::new(1.0, -2.0, 4.0));
        assert_relative_eq!(p.x, 2.5, max_relative = 1e-12);
        assert_relative_eq!(p.y, -5.0, max_relative = 1e-12);
        assert_relative_eq!(p.z, 10.0, max_relative = 1e-12);
    }

    #[test]
    fn rotation_about_tilted_axis_matches_axis_aligned() {
        let axis = Dir3::new_normalize(Vec3::z());
        let a = Transform::rotation_about_axis(&axis, PI / 3.0);
        let b = Transform::rotation_z(PI / 3.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((a.apply_point(&p) - b.apply_point(&p)).norm() < 1e-12);
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform::rotation_z(0.7).then(&Transform::translation(1.0, 2.0, 3.0));
        let inv = t.inverse().unwrap();
        let p = Point3::new(5.0, -6.0, 7.0);
        let back = inv.apply_point(&t.apply_point(&p));
        assert!((back - p).norm() < 1e-12);
    }

    #[test]
    fn normals_survive_uniform_scaling_directionally() {
        let t = Transform::uniform_scale(3.0);
        let n = t.apply_normal(&Vec3::z());
        assert!(n.normalize().dot(&Vec3::z()) > 0.999_999);
    }

    #[test]
    fn tolerance_checks() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.points_equal(
            &Point3::new(1.0, 2.0, 3.0),
            &Point3::new(1.0 + 1e-7, 2.0, 3.0)
        ));
        assert!(!tol.points_equal(&Point3::new(1.0, 2.0, 3.0), &Point3::new(1.001, 2.0, 3.0)));
        assert!(tol.is_zero(1e-9));
        assert!(!tol.is_zero(1e-3));
        assert!(tol.dirs_equal(&Vec3::z(), &Vec3::new(0.0, 1e-12, 1.0)));
        assert!(!tol.dirs_equal(&Vec3::z(), &Vec3::x()));
    }
}
