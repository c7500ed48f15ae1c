use kestrel_core::{correction_angle, flatten, CarData, Vector3};

use crate::{DistancePlot, DistanceTimeSpeed, FLIP_SPEED_BOOST};

/// Top speed of a car in uu/s.
pub const SUPERSONIC_SPEED: f64 = 2300.0;
/// Acceleration boost adds on top of throttle, in uu/s².
pub const BOOST_ACCELERATION: f64 = 991.67;
/// Boost consumed per second of boosting.
pub const BOOST_CONSUMPTION_RATE: f64 = 33.3;
/// Flipping below this speed loses more time than it gains.
pub const FLIP_THRESHOLD_SPEED: f64 = 1000.0;
/// Seconds from the start of a front flip until the car can accelerate again.
pub const FRONT_FLIP_SECONDS: f64 = 1.3;

const SIMULATION_STEP_SECONDS: f64 = 1.0 / 60.0;

/// Acceleration from full throttle at the given forward speed.
pub fn throttle_acceleration(speed: f64) -> f64 {
    if speed < 1400.0 {
        1600.0 - 1440.0 * speed.max(0.0) / 1400.0
    } else if speed < 1410.0 {
        160.0 * (1410.0 - speed) / 10.0
    } else {
        0.0
    }
}

/// Ground covered by a front flip started at `speed`.
pub fn front_flip_distance(speed: f64) -> f64 {
    (speed + FLIP_SPEED_BOOST).min(SUPERSONIC_SPEED) * FRONT_FLIP_SECONDS
}

/// Seconds lost turning to face `target`. Wider turns at higher speeds cost more.
pub fn steer_penalty_seconds(car: &CarData, target: &Vector3) -> f64 {
    let to_target = flatten(target) - car.flat_position();
    let correction = correction_angle(&flatten(&car.orientation.nose), &to_target).abs();
    correction * (0.15 + 0.3 * car.speed() / SUPERSONIC_SPEED)
}

/// Advances `time` by one simulation step without overshooting `end`.
fn next_time(time: f64, end: f64) -> f64 {
    let next = time + SIMULATION_STEP_SECONDS;
    if next >= end - 1e-9 {
        end
    } else {
        next
    }
}

/// Distance curve for driving straight ahead at full throttle, boosting
/// while `boost_budget` allows.
///
/// Once out of boost, a front flip is modeled whenever the car is fast
/// enough and the flip would land short of `flip_cutoff_distance`.
pub fn simulate_acceleration(
    car: &CarData,
    duration: f64,
    boost_budget: f64,
    flip_cutoff_distance: f64,
) -> DistancePlot {
    let mut speed = flatten(&car.velocity)
        .dot(&flatten(&car.orientation.nose))
        .clamp(0.0, SUPERSONIC_SPEED);
    let mut boost = car.boost.min(boost_budget).max(0.0);
    let mut distance = 0.0;
    let mut time = 0.0;
    let mut plot = DistancePlot::new(DistanceTimeSpeed::new(0.0, 0.0, speed));

    while time < duration {
        let flip_worthwhile = boost <= 0.0
            && speed >= FLIP_THRESHOLD_SPEED
            && flip_cutoff_distance - distance > front_flip_distance(speed);

        if flip_worthwhile {
            speed = (speed + FLIP_SPEED_BOOST).min(SUPERSONIC_SPEED);
            let flip_end = (time + FRONT_FLIP_SECONDS).min(duration);
            while time < flip_end {
                let next = next_time(time, flip_end);
                distance += speed * (next - time);
                time = next;
                plot.add_slice(DistanceTimeSpeed::new(distance, time, speed));
            }
            continue;
        }

        let next = next_time(time, duration);
        let dt = next - time;
        let mut acceleration = throttle_acceleration(speed);
        if boost > 0.0 {
            acceleration += BOOST_ACCELERATION;
            boost -= BOOST_CONSUMPTION_RATE * dt;
        }
        speed = (speed + acceleration * dt).min(SUPERSONIC_SPEED);
        distance += speed * dt;
        time = next;
        plot.add_slice(DistanceTimeSpeed::new(distance, time, speed));
    }

    plot
}

/// Distance curve for a car in the air boosting continuously, with
/// `horizontal_portion` of the boost pushing it across the ground.
pub fn simulate_air_acceleration(car: &CarData, duration: f64, horizontal_portion: f64) -> DistancePlot {
    let mut speed = flatten(&car.velocity).norm().min(SUPERSONIC_SPEED);
    let acceleration = BOOST_ACCELERATION * horizontal_portion.max(0.0);
    let mut distance = 0.0;
    let mut time = 0.0;
    let mut plot = DistancePlot::new(DistanceTimeSpeed::new(0.0, 0.0, speed));

    while time < duration {
        let next = next_time(time, duration);
        let dt = next - time;
        speed = (speed + acceleration * dt).min(SUPERSONIC_SPEED);
        distance += speed * dt;
        time = next;
        plot.add_slice(DistanceTimeSpeed::new(distance, time, speed));
    }

    plot
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kestrel_core::Team;

    use super::*;

    #[test]
    fn throttle_curve_tapers_off() {
        assert_relative_eq!(throttle_acceleration(0.0), 1600.0);
        assert_relative_eq!(throttle_acceleration(1400.0), 160.0);
        assert_relative_eq!(throttle_acceleration(2000.0), 0.0);
    }

    #[test]
    fn plot_ends_exactly_at_duration() {
        let car = CarData::parked(Vector3::zeros(), 0.0, Team::Blue);
        let plot = simulate_acceleration(&car, 2.5, 0.0, 0.0);
        assert_eq!(plot.end().time, 2.5);
        assert!(plot.end().speed <= 1410.0 + 1e-9);
    }

    #[test]
    fn boost_reaches_supersonic() {
        let mut car = CarData::parked(Vector3::zeros(), 0.0, Team::Blue);
        car.boost = 100.0;
        let boosted = simulate_acceleration(&car, 4.0, 100.0, 0.0);
        let plain = simulate_acceleration(&car, 4.0, 0.0, 0.0);
        assert_relative_eq!(boosted.end().speed, SUPERSONIC_SPEED);
        assert!(boosted.end().distance > plain.end().distance);
    }

    #[test]
    fn long_trips_without_boost_include_a_flip() {
        let mut car = CarData::parked(Vector3::zeros(), 0.0, Team::Blue);
        car.velocity = Vector3::new(1300.0, 0.0, 0.0);
        car.boost = 0.0;
        let flipping = simulate_acceleration(&car, 3.0, 0.0, 10_000.0);
        let driving = simulate_acceleration(&car, 3.0, 0.0, 0.0);
        assert!(flipping.end().distance > driving.end().distance);
    }

    #[test]
    fn steering_penalty_is_zero_when_facing_target() {
        let car = CarData::parked(Vector3::zeros(), 0.0, Team::Blue);
        assert_eq!(steer_penalty_seconds(&car, &Vector3::new(500.0, 0.0, 0.0)), 0.0);
        assert!(steer_penalty_seconds(&car, &Vector3::new(0.0, 500.0, 0.0)) > 0.0);
    }

    #[test]
    fn air_acceleration_scales_with_portion() {
        let car = CarData::parked(Vector3::new(0.0, 0.0, 300.0), 0.0, Team::Blue);
        let flat = simulate_air_acceleration(&car, 1.0, 1.0);
        let steep = simulate_air_acceleration(&car, 1.0, 0.2);
        assert!(flat.end().distance > steep.end().distance);
    }
}
