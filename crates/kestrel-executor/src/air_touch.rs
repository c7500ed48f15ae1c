use kestrel_core::{correction_angle, flatten, CarData};
use kestrel_world::Intercept;

use crate::steer::{correction_angle_rad, is_skidding, GOOD_ENOUGH_ANGLE};

/// Vertical speed an aerial is assumed to climb at, in uu/s.
pub const AERIAL_RISE_RATE: f64 = 500.0;
/// Heading error tolerated before leaving the ground.
const LINED_UP_ANGLE: f64 = 0.2;
/// Roof z component above which the car counts as sitting flat.
const UPRIGHT_ROOF_Z: f64 = 0.98;

/// Preconditions for committing to a launch. Checks that do not apply to a
/// particular style are left satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchChecklist {
    pub has_wheel_contact: bool,
    pub lined_up: bool,
    pub has_boost: bool,
    pub upright: bool,
    pub not_skidding: bool,
    pub time_for_ignition: bool,
}

impl Default for LaunchChecklist {
    fn default() -> Self {
        Self {
            has_wheel_contact: true,
            lined_up: true,
            has_boost: true,
            upright: true,
            not_skidding: true,
            time_for_ignition: true,
        }
    }
}

impl LaunchChecklist {
    pub fn ready_to_launch(&self) -> bool {
        self.has_wheel_contact
            && self.lined_up
            && self.has_boost
            && self.upright
            && self.not_skidding
            && self.time_for_ignition
    }
}

/// Seconds an aerial needs to climb to `height`.
pub fn expected_aerial_seconds(height: f64) -> f64 {
    height.max(0.0) / AERIAL_RISE_RATE
}

pub fn check_aerial_readiness(car: &CarData, intercept: &Intercept) -> LaunchChecklist {
    let seconds_till = intercept.time - car.time;
    LaunchChecklist {
        has_wheel_contact: car.has_wheel_contact,
        lined_up: correction_angle_rad(car, &intercept.space).abs() < LINED_UP_ANGLE,
        has_boost: car.boost >= intercept.air_boost,
        upright: car.orientation.roof.z > UPRIGHT_ROOF_Z,
        not_skidding: !is_skidding(car),
        time_for_ignition: seconds_till <= expected_aerial_seconds(intercept.space.z),
    }
}

pub fn check_jump_hit_readiness(car: &CarData, intercept: &Intercept) -> LaunchChecklist {
    let seconds_till = intercept.time - car.time;
    LaunchChecklist {
        has_wheel_contact: car.has_wheel_contact,
        lined_up: correction_angle_rad(car, &intercept.space).abs() < LINED_UP_ANGLE,
        time_for_ignition: seconds_till <= intercept.strike_profile.hang_time,
        ..LaunchChecklist::default()
    }
}

pub fn check_flip_hit_readiness(car: &CarData, intercept: &Intercept) -> LaunchChecklist {
    let seconds_till = intercept.time - car.time;
    let flat_nose = flatten(&car.orientation.nose);
    let slide_angle = correction_angle(&flat_nose, &flatten(&car.velocity));
    LaunchChecklist {
        has_wheel_contact: car.has_wheel_contact,
        lined_up: correction_angle_rad(car, &intercept.space).abs() < GOOD_ENOUGH_ANGLE,
        not_skidding: slide_angle.abs() < GOOD_ENOUGH_ANGLE,
        time_for_ignition: seconds_till <= intercept.strike_profile.dodge_seconds,
        ..LaunchChecklist::default()
    }
}
