//! Ground steering and flip helpers shared by the driving steps.

use std::f64::consts::PI;

use kestrel_core::{
    angle_between, correction_angle, correction_angle_3d, flatten, ground_distance, CarData, ControlOutput,
    SpaceTime, Vector2, Vector3,
};
use kestrel_world::{
    front_flip_distance, ground_bounce_energy, simulate_acceleration, BallPath, StrikeProfile,
    FLIP_THRESHOLD_SPEED, MEANINGFUL_BOUNCE_ENERGY,
};

use crate::{set_pieces, Plan};

/// Facing and sliding errors below this are close enough to flip straight ahead.
pub const GOOD_ENOUGH_ANGLE: f64 = PI / 12.0;

/// Roof z component below which a grounded car counts as driving on a wall.
const ON_WALL_ROOF_Z: f64 = 0.8;
const BRAKING_DISTANCE: f64 = 1250.0;
const BRAKING_SPEED: f64 = 1250.0;
const HALF_FLIP_MIN_DISTANCE: f64 = 2000.0;
const FRONT_FLIP_MARGIN: f64 = 500.0;
const CATCH_SEARCH_ATTEMPTS: usize = 3;
/// Sideways speed above which the tires have lost grip.
const SKID_SPEED: f64 = 250.0;

/// Signed angle from the car's flat heading to `target`, positive to the left.
pub fn correction_angle_rad(car: &CarData, target: &Vector3) -> f64 {
    let to_target = flatten(target) - car.flat_position();
    correction_angle(&flatten(&car.orientation.nose), &to_target)
}

pub fn distance_from_car(car: &CarData, location: &Vector3) -> f64 {
    ground_distance(&car.position, location)
}

pub fn is_skidding(car: &CarData) -> bool {
    car.velocity.dot(&car.orientation.right).abs() > SKID_SPEED
}

pub fn steer_toward_ground_position(car: &CarData, position: &Vector3) -> ControlOutput {
    if car.has_wheel_contact && car.orientation.roof.z < ON_WALL_ROOF_Z {
        return steer_toward_wall_position(car, position);
    }

    let distance = car.flat_position().metric_distance(&flatten(position));
    steering_output(correction_angle_rad(car, position), distance, car.speed(), car.is_supersonic)
}

/// Steers within the plane the car is driving on.
pub fn steer_toward_wall_position(car: &CarData, position: &Vector3) -> ControlOutput {
    let to_position = position - car.position;
    let correction = correction_angle_3d(&car.orientation.nose, &to_position, &car.orientation.roof);
    steering_output(
        correction,
        car.position.metric_distance(position),
        car.speed(),
        car.is_supersonic,
    )
}

fn steering_output(correction: f64, distance: f64, speed: f64, is_supersonic: bool) -> ControlOutput {
    let difference = correction.abs();
    let sharpness = difference * 6.0 / PI + difference * speed * 0.002;

    let should_brake = distance < BRAKING_DISTANCE && difference > PI / 4.0 && speed > BRAKING_SPEED;
    let should_slide = should_brake || difference > PI / 2.0;
    let should_boost = !should_brake && difference < PI / 6.0 && !is_supersonic;

    ControlOutput::new()
        .with_throttle(if should_brake { -1.0 } else { 1.0 })
        .with_steer(-correction.signum() * sharpness)
        .with_handbrake(should_slide)
        .with_boost(should_boost)
}

/// A flip that gets the car to `target` sooner than driving, if one applies.
pub fn sensible_flip(car: &CarData, target: &Vector3) -> Option<Plan> {
    if car.orientation.roof.z < 0.98 || !car.has_wheel_contact {
        return None;
    }

    let to_target = flatten(target) - car.flat_position();
    let flat_nose = flatten(&car.orientation.nose);
    let flat_velocity = flatten(&car.velocity);
    if to_target.norm() > HALF_FLIP_MIN_DISTANCE
        && angle_between(&flat_nose, &to_target) > 3.0 * PI / 4.0
        && (flat_velocity.dot(&to_target) > 0.0 || car.speed() < 250.0)
    {
        log::debug!("Half flip toward {:?}", target);
        return Some(set_pieces::half_flip());
    }

    let speed = flat_velocity.norm();
    if car.is_supersonic || car.boost > 75.0 || speed < FLIP_THRESHOLD_SPEED {
        return None;
    }

    if to_target.norm() > front_flip_distance(speed) + FRONT_FLIP_MARGIN {
        let facing_correction = correction_angle(&flat_nose, &to_target);
        let slide_angle = correction_angle(&flat_nose, &flat_velocity);
        if facing_correction.abs() < GOOD_ENOUGH_ANGLE && slide_angle.abs() < GOOD_ENOUGH_ANGLE {
            return Some(set_pieces::front_flip());
        }
    }

    None
}

/// Drives toward a ground position, easing off so as not to arrive early.
pub fn there_on_time(car: &CarData, target: &SpaceTime) -> ControlOutput {
    let seconds_to_target = (target.time - car.time).max(1e-3);
    let max_distance = simulate_acceleration(car, seconds_to_target, 0.0, 0.0).end().distance;

    let distance = distance_from_car(car, &target.space).max(1.0);
    let distance_ratio = max_distance / distance;
    let average_speed_needed = distance / seconds_to_target;
    let current_speed = car.forward_speed();

    let mut output = steer_toward_ground_position(car, &target.space);
    if distance_ratio > 1.1 {
        output = output.with_boost(false);
        if current_speed > average_speed_needed {
            output = output.with_throttle((1.5 - distance_ratio).min(0.0));
            if car.orientation.nose.dot(&car.velocity) < 0.0 {
                output = output.with_throttle(0.0).with_steer(0.0);
            }
        } else if distance_ratio > 1.5 {
            output = output.with_throttle(0.5);
        }
    }

    if current_speed > average_speed_needed {
        output = output
            .with_boost(false)
            .with_throttle(average_speed_needed / current_speed);
    }
    output
}

/// The next bounce the car can get underneath, trying up to three bounces.
pub fn catch_opportunity(
    car: &CarData,
    ball_path: &BallPath,
    boost_budget: f64,
    horizon_secs: f64,
) -> Option<SpaceTime> {
    let start = ball_path.start_point();
    if ground_bounce_energy(start.space.z, start.velocity.z) < MEANINGFUL_BOUNCE_ENERGY {
        return None;
    }

    let mut search_start = car.time;
    for _ in 0..CATCH_SEARCH_ATTEMPTS {
        let landing = ball_path.landing(search_start)?.to_space_time();
        if can_get_under(car, &landing, boost_budget, horizon_secs) {
            return Some(landing);
        }
        search_start = landing.time + 1.0;
    }
    None
}

fn can_get_under(car: &CarData, landing: &SpaceTime, boost_budget: f64, horizon_secs: f64) -> bool {
    let plot = simulate_acceleration(
        car,
        horizon_secs,
        boost_budget,
        car.position.metric_distance(&landing.space),
    );
    let required = distance_from_car(car, &landing.space);
    plot.arrival_state(car, &landing.space, landing.time - car.time, &StrikeProfile::default())
        .is_some_and(|dts| dts.distance > required)
}

/// Flat direction from `from` to `to`, or the car's heading if they coincide.
pub fn flat_direction_or_heading(car: &CarData, from: &Vector3, to: &Vector3) -> Vector2 {
    flatten(&(to - from))
        .try_normalize(1e-6)
        .unwrap_or_else(|| flatten(&car.orientation.nose))
}
