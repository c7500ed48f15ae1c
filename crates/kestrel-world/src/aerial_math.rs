use kestrel_core::{CarData, GRAVITY};

use crate::BOOST_ACCELERATION;

/// Upward speed a jump adds the instant it starts, in uu/s.
pub const JUMP_IMPULSE: f64 = 291.67;
/// Extra upward acceleration while jump is held early in a jump.
pub const JUMP_HOLD_ACCELERATION: f64 = 1458.33;
/// How long holding jump keeps adding acceleration.
pub const JUMP_HOLD_SECONDS: f64 = 0.2;
/// Height of a grounded car's roof contact above the ball-center height it can hit.
const JUMP_HIT_CONTACT_OFFSET: f64 = 110.0;

const JUMP_SIM_STEP: f64 = 1.0 / 120.0;

/// Seconds from pressing jump until the car can touch a ball centered at
/// `height`. Heights out of reach return the time of the jump's apex.
pub fn jump_time_to_height(height: f64) -> f64 {
    let rise = height - JUMP_HIT_CONTACT_OFFSET;
    if rise <= 0.0 {
        return 0.0;
    }

    let mut elapsed = 0.0;
    let mut z = 0.0;
    let mut vz = JUMP_IMPULSE;
    while z < rise {
        let hold = if elapsed < JUMP_HOLD_SECONDS {
            JUMP_HOLD_ACCELERATION
        } else {
            0.0
        };
        vz += (GRAVITY + hold) * JUMP_SIM_STEP;
        if vz <= 0.0 {
            break;
        }
        z += vz * JUMP_SIM_STEP;
        elapsed += JUMP_SIM_STEP;
    }
    elapsed
}

/// Height gained from the jump-hold bonus still available after
/// `seconds_since_launch`, accrued over the next `seconds` seconds.
fn remaining_hold_rise(seconds: f64, seconds_since_launch: f64) -> f64 {
    let hold = (JUMP_HOLD_SECONDS - seconds_since_launch).clamp(0.0, seconds.max(0.0));
    JUMP_HOLD_ACCELERATION * hold * (seconds - hold / 2.0)
}

/// Vertical component of the nose direction that, boosting the whole way,
/// brings the car to `height` in `seconds_till_intercept` seconds.
pub fn desired_z_component(
    height: f64,
    seconds_till_intercept: f64,
    seconds_since_launch: f64,
    car: &CarData,
) -> f64 {
    let t = seconds_till_intercept.max(1e-3);
    let ballistic_rise =
        car.velocity.z * t + 0.5 * GRAVITY * t * t + remaining_hold_rise(t, seconds_since_launch);
    let needed_rise = height - car.position.z - ballistic_rise;
    let needed_acceleration = 2.0 * needed_rise / (t * t);
    (needed_acceleration / BOOST_ACCELERATION).clamp(-1.0, 1.0)
}

/// Height the car reaches after `seconds_till_intercept` if it keeps boosting
/// along its current nose.
pub fn projected_height(car: &CarData, seconds_till_intercept: f64, seconds_since_launch: f64) -> f64 {
    let t = seconds_till_intercept.max(0.0);
    let vertical_acceleration = GRAVITY + BOOST_ACCELERATION * car.orientation.nose.z;
    car.position.z
        + car.velocity.z * t
        + 0.5 * vertical_acceleration * t * t
        + remaining_hold_rise(t, seconds_since_launch)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kestrel_core::{CarOrientation, Team, Vector3};

    use super::*;

    #[test]
    fn jump_time_grows_with_height() {
        assert_eq!(jump_time_to_height(100.0), 0.0);
        let low = jump_time_to_height(180.0);
        let high = jump_time_to_height(300.0);
        assert!(low > 0.0);
        assert!(high > low);
        // Beyond the apex the answer stops growing.
        assert_relative_eq!(jump_time_to_height(2000.0), jump_time_to_height(5000.0));
    }

    #[test]
    fn desired_z_matches_projected_height() {
        let mut car = CarData::parked(Vector3::new(0.0, 0.0, 100.0), 0.0, Team::Blue);
        car.velocity = Vector3::new(0.0, 0.0, 300.0);
        car.has_wheel_contact = false;

        let z = desired_z_component(600.0, 1.2, 1.0, &car);
        assert!(z > 0.0 && z < 1.0);

        let flat = (1.0 - z * z).sqrt();
        car.orientation = CarOrientation::new(Vector3::new(flat, 0.0, z), Vector3::new(-z, 0.0, flat));
        assert_relative_eq!(projected_height(&car, 1.2, 1.0), 600.0, epsilon = 1e-6);
    }
}
