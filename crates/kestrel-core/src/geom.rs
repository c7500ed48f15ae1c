use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Angle, Vector2, Vector3};

/// Vectors shorter than this have no meaningful direction.
const MIN_DIRECTION_LENGTH: f64 = 1e-9;

/// Drops the vertical component.
pub fn flatten(v: &Vector3) -> Vector2 {
    Vector2::new(v.x, v.y)
}

/// Adds a zero vertical component.
pub fn lift(v: &Vector2) -> Vector3 {
    Vector3::new(v.x, v.y, 0.0)
}

/// Removes the component of `v` along `normal`.
pub fn project_to_plane(v: &Vector3, normal: &Vector3) -> Vector3 {
    let norm_sq = normal.norm_squared();
    if norm_sq == 0.0 {
        return *v;
    }
    v - normal * (v.dot(normal) / norm_sq)
}

/// Distance between two points, measured along the plane with the given normal.
pub fn flat_distance(a: &Vector3, b: &Vector3, plane_normal: &Vector3) -> f64 {
    project_to_plane(&(a - b), plane_normal).norm()
}

/// Distance between two points ignoring height.
pub fn ground_distance(a: &Vector3, b: &Vector3) -> f64 {
    flatten(a).metric_distance(&flatten(b))
}

/// Unit vector pointing the same way as `v`.
///
/// Fails on vectors with no usable length.
pub fn direction(v: &Vector3) -> Result<Vector3> {
    match v.try_normalize(MIN_DIRECTION_LENGTH) {
        Some(unit) => Ok(unit),
        None => bail!("Cannot take the direction of a zero-length vector {:?}", v),
    }
}

/// Flat counterpart of [`direction`].
pub fn direction_2d(v: &Vector2) -> Result<Vector2> {
    match v.try_normalize(MIN_DIRECTION_LENGTH) {
        Some(unit) => Ok(unit),
        None => bail!("Cannot take the direction of a zero-length vector {:?}", v),
    }
}

/// Rescales `v` to the given length.
pub fn scaled_to_magnitude(v: &Vector3, magnitude: f64) -> Result<Vector3> {
    Ok(direction(v)? * magnitude)
}

/// Signed angle in radians that rotates `current` onto `ideal`, positive for left turns.
pub fn correction_angle(current: &Vector2, ideal: &Vector2) -> f64 {
    Angle::correction(current, ideal).radians()
}

/// Signed angle in radians about `up` that rotates `current` onto `ideal`.
pub fn correction_angle_3d(current: &Vector3, ideal: &Vector3, up: &Vector3) -> f64 {
    Angle::correction_about(current, ideal, up).radians()
}

/// Unsigned angle between two flat vectors, in [0, pi].
pub fn angle_between(a: &Vector2, b: &Vector2) -> f64 {
    correction_angle(a, b).abs()
}

pub fn rotate_vector(v: &Vector2, radians: f64) -> Vector2 {
    Angle::from_radians(radians).rotate_vector(v)
}

/// An infinite plane `normal . p = constant` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3,
    pub constant: f64,
}

impl Plane {
    /// Plane through `point` with the given normal direction.
    pub fn new(normal: Vector3, point: Vector3) -> Result<Self> {
        let normal = direction(&normal)?;
        Ok(Self {
            normal,
            constant: normal.dot(&point),
        })
    }

    pub fn ground() -> Self {
        Self {
            normal: Vector3::z(),
            constant: 0.0,
        }
    }

    /// Signed distance from the plane, positive on the side the normal points to.
    pub fn distance(&self, point: &Vector3) -> f64 {
        self.normal.dot(point) - self.constant
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn shadow(&self, point: &Vector3) -> Vector3 {
        point - self.normal * self.distance(point)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn flat_distance_ignores_normal_axis() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(3.0, 4.0, 100.0);
        assert_relative_eq!(flat_distance(&a, &b, &Vector3::z()), 5.0);

        // Along a side wall the x axis is the one ignored.
        assert_relative_eq!(
            flat_distance(&a, &b, &Vector3::x()),
            (16.0f64 + 10000.0).sqrt()
        );
    }

    #[test]
    fn direction_rejects_zero_vector() {
        assert!(direction(&Vector3::zeros()).is_err());
        assert!(scaled_to_magnitude(&Vector3::zeros(), 3.0).is_err());

        let scaled = scaled_to_magnitude(&Vector3::new(0.0, 2.0, 0.0), 3.0).unwrap();
        assert_relative_eq!(scaled, Vector3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn plane_shadow_and_distance() {
        let wall = Plane::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(4096.0, 0.0, 0.0)).unwrap();
        let point = Vector3::new(4000.0, 10.0, 300.0);
        assert_relative_eq!(wall.distance(&point), 96.0);
        assert_relative_eq!(wall.shadow(&point), Vector3::new(4096.0, 10.0, 300.0));
    }

    #[test]
    fn project_to_plane_removes_normal_component() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(
            project_to_plane(&v, &Vector3::new(0.0, 0.0, 2.0)),
            Vector3::new(1.0, 2.0, 0.0)
        );
    }
}
