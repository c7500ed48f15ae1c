//! Single-axis attitude control for a car in the air.
//!
//! Each helper turns the car about one body axis so that a chosen body vector
//! comes to rest in a plane given by its normal. The outputs only touch one
//! rotation axis, so they can be merged with [`ControlOutput::with_rotation_from`].

use kestrel_core::{CarData, ControlOutput, Vector3};

const PROPORTIONAL_GAIN: f64 = 3.5;
const DERIVATIVE_GAIN: f64 = 0.6;
const ANGLE_TOLERANCE: f64 = 0.05;
const RATE_TOLERANCE: f64 = 0.3;

/// Turns the nose about the right axis until it lies in the plane.
pub fn pitch_to_plane(car: &CarData, plane_normal: &Vector3) -> Option<ControlOutput> {
    let orientation = &car.orientation;
    let target = toward(plane_normal.cross(&orientation.right), &orientation.nose)?;
    let angle = target.dot(&orientation.roof).atan2(target.dot(&orientation.nose));
    axis_command(angle, car.spin.pitch_rate).map(|pitch| ControlOutput::new().with_pitch(pitch))
}

/// Turns the nose about the roof axis until it lies in the plane.
pub fn yaw_to_plane(car: &CarData, plane_normal: &Vector3) -> Option<ControlOutput> {
    let orientation = &car.orientation;
    let target = toward(plane_normal.cross(&orientation.roof), &orientation.nose)?;
    let angle = target.dot(&orientation.right).atan2(target.dot(&orientation.nose));
    axis_command(angle, car.spin.yaw_rate).map(|yaw| ControlOutput::new().with_yaw(yaw))
}

/// Rolls about the nose until the right axis lies in the plane with the roof
/// on the side the normal points to.
pub fn roll_to_plane(car: &CarData, plane_normal: &Vector3) -> Option<ControlOutput> {
    let orientation = &car.orientation;
    let target = orientation.nose.cross(plane_normal).try_normalize(1e-6)?;
    let angle = (-target.dot(&orientation.roof)).atan2(target.dot(&orientation.right));
    axis_command(angle, car.spin.roll_rate).map(|roll| ControlOutput::new().with_roll(roll))
}

/// `direction` normalized and flipped onto the same side as `reference`.
fn toward(direction: Vector3, reference: &Vector3) -> Option<Vector3> {
    let direction = direction.try_normalize(1e-6)?;
    if direction.dot(reference) < 0.0 {
        Some(-direction)
    } else {
        Some(direction)
    }
}

/// PD command for one axis, or `None` once the axis is settled.
fn axis_command(angle: f64, rate: f64) -> Option<f64> {
    if angle.abs() < ANGLE_TOLERANCE && rate.abs() < RATE_TOLERANCE {
        return None;
    }
    Some(PROPORTIONAL_GAIN * angle - DERIVATIVE_GAIN * rate)
}
