use crate::prelude::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

const UNIT_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Three-dimensional cartesian vector.
///
/// In the geodesy layer a `Vector3d` is either an n-vector (unit normal to the
/// sphere at a point) or the normal of a great-circle plane. Every operation
/// returns a new value so calls can be chained: `v1.cross(&v2).dot(&v3)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3d {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unit vector pointing at the north pole.
    pub const fn north_pole() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn plus(&self, v: &Vector3d) -> Vector3d {
        Vector3d::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    pub fn minus(&self, v: &Vector3d) -> Vector3d {
        Vector3d::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }

    pub fn times(&self, factor: f64) -> Vector3d {
        Vector3d::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn divided_by(&self, divisor: f64) -> AnalysisResult<Vector3d> {
        if divisor == 0.0 {
            return Err(AnalysisError::Arithmetic(format!(
                "division of {} by zero",
                self
            )));
        }
        Ok(Vector3d::new(
            self.x / divisor,
            self.y / divisor,
            self.z / divisor,
        ))
    }

    pub fn dot(&self, v: &Vector3d) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn cross(&self, v: &Vector3d) -> Vector3d {
        Vector3d::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    pub fn negate(&self) -> Vector3d {
        Vector3d::new(-self.x, -self.y, -self.z)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalized copy; unit and zero-length vectors come back unchanged.
    ///
    /// A norm within a few ulps of 1 counts as unit, so re-normalising never
    /// drifts.
    pub fn unit(&self) -> Vector3d {
        let norm = self.length();
        if (norm - 1.0).abs() <= UNIT_TOLERANCE || norm == 0.0 {
            return *self;
        }
        Vector3d::new(self.x / norm, self.y / norm, self.z / norm)
    }

    /// Angle in radians between this vector and `v`.
    ///
    /// Without `sign_reference` the result is unsigned in [0, π]. With it the
    /// result is in (-π, π]: positive when this→v is clockwise looking along
    /// `sign_reference`, negative otherwise.
    pub fn angle_to(&self, v: &Vector3d, sign_reference: Option<&Vector3d>) -> f64 {
        let cross = self.cross(v);
        let mut sin_theta = cross.length();
        let cos_theta = self.dot(v);

        if let Some(reference) = sign_reference {
            if cross.dot(reference) < 0.0 {
                sin_theta = -sin_theta;
            }
        }

        sin_theta.atan2(cos_theta)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl fmt::Display for Vector3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.5}, {:.5}, {:.5}>", self.x, self.y, self.z)
    }
}

impl Add for Vector3d {
    type Output = Vector3d;

    fn add(self, rhs: Vector3d) -> Vector3d {
        self.plus(&rhs)
    }
}

impl Sub for Vector3d {
    type Output = Vector3d;

    fn sub(self, rhs: Vector3d) -> Vector3d {
        self.minus(&rhs)
    }
}

impl Mul<f64> for Vector3d {
    type Output = Vector3d;

    fn mul(self, rhs: f64) -> Vector3d {
        self.times(rhs)
    }
}

impl Neg for Vector3d {
    type Output = Vector3d;

    fn neg(self) -> Vector3d {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn arithmetic_returns_new_values() {
        let a = Vector3d::new(1.0, 2.0, 3.0);
        let b = Vector3d::new(4.0, 5.0, 6.0);
        assert_eq!(a.plus(&b), Vector3d::new(5.0, 7.0, 9.0));
        assert_eq!(b.minus(&a), Vector3d::new(3.0, 3.0, 3.0));
        assert_eq!(a.times(2.0), Vector3d::new(2.0, 4.0, 6.0));
        assert_eq!(a.negate(), -a);
        assert_eq!(a.dot(&b), 32.0);
        assert_eq!(a.cross(&b), Vector3d::new(-3.0, 6.0, -3.0));
        assert_eq!(a, Vector3d::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn division_by_zero_is_an_arithmetic_error() {
        let v = Vector3d::new(1.0, 1.0, 1.0);
        assert!(matches!(
            v.divided_by(0.0),
            Err(AnalysisError::Arithmetic(_))
        ));
        assert_eq!(v.divided_by(2.0).unwrap(), Vector3d::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn unit_is_idempotent_and_leaves_zero_alone() {
        let v = Vector3d::new(3.0, 0.0, 4.0).unit();
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-12);
        assert_eq!(v.unit(), v);
        assert_eq!(Vector3d::zero().unit(), Vector3d::zero());
    }

    #[test]
    fn unit_is_stable_for_inexact_norms() {
        for v in [
            Vector3d::new(1.0, 2.0, 3.0),
            Vector3d::new(-0.3, 0.7, 0.11),
            Vector3d::new(1e-3, -5e2, 7.25),
        ] {
            let once = v.unit();
            assert_eq!(once.unit(), once);
            assert_eq!(once.unit().unit(), once);
        }
    }

    #[test]
    fn angle_to_is_unsigned_without_reference() {
        let x = Vector3d::new(1.0, 0.0, 0.0);
        let y = Vector3d::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(x.angle_to(&y, None), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(y.angle_to(&x, None), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(x.angle_to(&x.negate(), None), PI, epsilon = 1e-12);
    }

    #[test]
    fn angle_to_takes_sign_from_reference() {
        let x = Vector3d::new(1.0, 0.0, 0.0);
        let y = Vector3d::new(0.0, 1.0, 0.0);
        let up = Vector3d::north_pole();
        assert_abs_diff_eq!(x.angle_to(&y, Some(&up)), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(
            x.angle_to(&y, Some(&up.negate())),
            -FRAC_PI_2,
            epsilon = 1e-12
        );
    }
}
