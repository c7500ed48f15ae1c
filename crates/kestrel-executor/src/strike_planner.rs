use kestrel_core::{ground_distance, CarData};
use kestrel_world::{Intercept, StrikeStyle};

use crate::{check_aerial_readiness, check_flip_hit_readiness, check_jump_hit_readiness, set_pieces, Plan};

/// Pitch above the target line at which boosting holds vertical speed steady.
const UPWARD_VELOCITY_MAINTENANCE_ANGLE: f64 = 0.25;
/// Targets above this height get a double jump when there is time for it.
pub const DOUBLE_JUMP_AERIAL_HEIGHT: f64 = 500.0;
const DOUBLE_JUMP_MIN_SECONDS: f64 = 1.5;

/// A launch plan for the intercept's strike style if the car is ready to
/// commit this tick. Ram strikes never launch.
pub fn plan_immediate_launch(car: &CarData, intercept: &Intercept) -> Option<Plan> {
    let height = intercept.space.z;
    match intercept.strike_profile.style {
        StrikeStyle::Aerial => {
            if !check_aerial_readiness(car, intercept).ready_to_launch() {
                return None;
            }
            log::info!("Player {} launching aerial", car.player_index);

            let ground = ground_distance(&car.position, &intercept.space);
            let tilt_radians = height.atan2(ground) + UPWARD_VELOCITY_MAINTENANCE_ANGLE;
            let tilt_back_seconds = tilt_radians * 0.35;

            let seconds_till = intercept.time - car.time;
            if seconds_till > DOUBLE_JUMP_MIN_SECONDS && height > DOUBLE_JUMP_AERIAL_HEIGHT {
                Some(set_pieces::double_jump_aerial(tilt_back_seconds * 0.8))
            } else {
                Some(set_pieces::aerial(tilt_back_seconds))
            }
        }
        StrikeStyle::JumpHit => {
            if !check_jump_hit_readiness(car, intercept).ready_to_launch() {
                return None;
            }
            log::info!("Player {} launching jump hit", car.player_index);
            Some(set_pieces::jump_hit(intercept.strike_profile.hang_time))
        }
        StrikeStyle::FlipHit => {
            if !check_flip_hit_readiness(car, intercept).ready_to_launch() {
                return None;
            }
            log::info!("Player {} launching flip hit", car.player_index);
            Some(set_pieces::front_flip())
        }
        StrikeStyle::Ram => None,
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::{BallSlice, Team, Vector3};
    use kestrel_world::{simulate_acceleration, StrikeProfile};

    use super::*;

    fn intercept_with(style_profile: StrikeProfile, space: Vector3, time: f64) -> Intercept {
        let car = CarData::parked(Vector3::zeros(), 0.0, Team::Blue);
        Intercept {
            space,
            time,
            air_boost: 0.0,
            strike_profile: style_profile,
            distance_plot: simulate_acceleration(&car, 1.0, 0.0, 0.0),
            spare_time: 0.0,
            ball_slice: BallSlice::new(space, time, Vector3::zeros()),
        }
    }

    #[test_log::test]
    fn ready_flip_hit_launches() {
        let car = CarData::parked(Vector3::new(0.0, 0.0, 17.0), 0.0, Team::Blue);
        let intercept = intercept_with(StrikeProfile::flip_hit(), Vector3::new(400.0, 0.0, 93.0), 0.25);
        let plan = plan_immediate_launch(&car, &intercept).unwrap();
        assert!(!plan.can_interrupt());
    }

    #[test]
    fn ram_never_launches() {
        let car = CarData::parked(Vector3::new(0.0, 0.0, 17.0), 0.0, Team::Blue);
        let intercept = intercept_with(StrikeProfile::default(), Vector3::new(100.0, 0.0, 93.0), 0.1);
        assert!(plan_immediate_launch(&car, &intercept).is_none());
    }

    #[test]
    fn early_aerial_waits() {
        let car = CarData::parked(Vector3::new(0.0, 0.0, 17.0), 0.0, Team::Blue);
        let intercept = intercept_with(StrikeProfile::aerial(), Vector3::new(1500.0, 0.0, 900.0), 4.0);
        assert!(plan_immediate_launch(&car, &intercept).is_none());

        let soon = intercept_with(StrikeProfile::aerial(), Vector3::new(1500.0, 0.0, 900.0), 1.6);
        assert!(plan_immediate_launch(&car, &soon).is_some());
    }
}
