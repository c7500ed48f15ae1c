use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{Vector2, Vector3};

/// A signed angle in radians, always in (-pi, pi].
///
/// Positive angles are counter-clockwise when looking down the relevant axis,
/// which for flat vectors means a left turn.
#[derive(Debug, Clone, Copy, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(f64);

impl Angle {
    pub const PI: Angle = Angle(PI);
    pub const PI_2: Angle = Angle(PI / 2.0);

    pub fn from_radians(radians: f64) -> Self {
        Angle(wrap_angle(radians))
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// The rotation that turns `current` onto `ideal` in the xy plane.
    ///
    /// Zero-length inputs yield a zero angle.
    pub fn correction(current: &Vector2, ideal: &Vector2) -> Self {
        let cross = current.x * ideal.y - current.y * ideal.x;
        let dot = current.dot(ideal);
        Self::from_radians(cross.atan2(dot))
    }

    /// The rotation about `up` that turns `current` onto `ideal`.
    ///
    /// Both vectors are measured after being projected onto the plane
    /// perpendicular to `up`.
    pub fn correction_about(current: &Vector3, ideal: &Vector3, up: &Vector3) -> Self {
        let up = match up.try_normalize(f64::EPSILON) {
            Some(up) => up,
            None => return Angle(0.0),
        };
        let current = current - up * current.dot(&up);
        let ideal = ideal - up * ideal.dot(&up);
        let sine = up.dot(&current.cross(&ideal));
        let cosine = current.dot(&ideal);
        Self::from_radians(sine.atan2(cosine))
    }

    pub fn radians(&self) -> f64 {
        self.0
    }

    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }

    /// Rotate a vector counter-clockwise by this angle.
    pub fn rotate_vector(&self, v: &Vector2) -> Vector2 {
        nalgebra::Rotation2::new(self.0) * v
    }

    pub fn abs(&self) -> f64 {
        self.0.abs()
    }

    pub fn signum(&self) -> f64 {
        self.0.signum()
    }
}

impl std::ops::Add for Angle {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Angle::from_radians(self.0 + other.0)
    }
}

impl std::ops::Sub for Angle {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Angle::from_radians(self.0 - other.0)
    }
}

impl std::ops::Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self {
        Angle::from_radians(-self.0)
    }
}

impl std::ops::Mul<Vector2> for Angle {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        self.rotate_vector(&v)
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:.3} rad", self.0)
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle(0.0)
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        let diff: f64 = (self.radians() - other.radians()).abs();
        const TOLERANCE: f64 = 1e-5;
        !(TOLERANCE..=(2.0 * PI - TOLERANCE)).contains(&diff)
    }
}

fn wrap_angle(angle: f64) -> f64 {
    let mut angle = angle % (2.0 * PI);
    if angle <= -PI {
        angle += 2.0 * PI;
    } else if angle > PI {
        angle -= 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), PI);
        assert_relative_eq!(wrap_angle(2.5 * PI), 0.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn correction_is_positive_for_left_turns() {
        let nose = Vector2::new(1.0, 0.0);
        let left = Vector2::new(0.0, 1.0);
        let right = Vector2::new(0.0, -1.0);
        assert_relative_eq!(Angle::correction(&nose, &left).radians(), PI / 2.0);
        assert_relative_eq!(Angle::correction(&nose, &right).radians(), -PI / 2.0);
    }

    #[test]
    fn correction_of_zero_vector_is_zero() {
        let nose = Vector2::new(1.0, 0.0);
        assert_eq!(Angle::correction(&nose, &Vector2::zeros()).radians(), 0.0);
    }

    #[test]
    fn correction_about_arbitrary_axis() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = Vector3::new(0.0, 0.0, 1.0);

        assert_relative_eq!(Angle::correction_about(&x, &y, &z).radians(), PI / 2.0);
        assert_relative_eq!(Angle::correction_about(&z, &y, &x).radians(), -PI / 2.0);
        assert_relative_eq!(Angle::correction_about(&z, &y, &-x).radians(), PI / 2.0);
    }

    #[test]
    fn angle_sub_wraps() {
        let a = Angle::from_degrees(180.0);
        let b = Angle::from_degrees(-179.0);
        assert_relative_eq!((a - b).degrees(), -1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotate_vector() {
        let r = Angle::from_degrees(90.0) * Vector2::new(1.0, 0.0);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-12);
    }
}
