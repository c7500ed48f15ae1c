use std::f64::consts::PI;

use kestrel_core::{
    correction_angle, flatten, lift, rotate_vector, scaled_to_magnitude, ControlOutput, DebugCanvas, DebugColor,
    GameTime, SpaceTime, Vector2, Vector3, BALL_RADIUS,
};
use kestrel_world::{aerial_intercept, desired_z_component, projected_height, MAX_TIME_FOR_AIR_DODGE};

use super::{
    orientation::{pitch_to_plane, roll_to_plane, yaw_to_plane},
    BlindStep,
};
use crate::{
    nested::{LieuOutcome, NestedPlanBehavior},
    steer::correction_angle_rad,
    InterceptDisruptionMeter, Plan, TickContext,
};

/// Side dodges are used when the ball is more than this far off the nose.
const SIDE_DODGE_THRESHOLD: f64 = PI / 4.0;
const DODGE_SECONDS: f64 = 0.4;
/// Dodge only when the intercept is at most this much higher than the car.
const DODGE_MAX_RISE: f64 = 75.0;
const YAW_OVERCORRECT: f64 = 0.1;
const NOSE_FINESSE_SECONDS: f64 = 0.8;
const STRIKE_OFFSET: f64 = 150.0;
const EXTRA_HEIGHT: f64 = 80.0;
/// Ball-to-goal distance beyond which the strike aims slightly under the ball.
const LONG_SHOT_DISTANCE: f64 = 5500.0;
const MAX_SIDEWAYS_DIVERGENCE: f64 = 1000.0;
/// A touch this recent by this car counts as our own hit.
const OWN_TOUCH_SECONDS: f64 = 0.5;

#[derive(Debug)]
enum MidairState {
    Uninitialized,
    Running {
        launched_at: GameTime,
        last_moment_for_dodge: GameTime,
        confusion: u32,
        target: Option<SpaceTime>,
        meter: InterceptDisruptionMeter,
    },
}

/// Flies the car into the ball after an aerial launch.
#[derive(Debug)]
pub struct MidairStrikeStep {
    time_in_air_at_start: f64,
    state: MidairState,
}

impl MidairStrikeStep {
    /// `time_in_air_at_start` is how long the car has already been off the ground.
    pub fn new(time_in_air_at_start: f64) -> Self {
        Self {
            time_in_air_at_start,
            state: MidairState::Uninitialized,
        }
    }
}

impl NestedPlanBehavior for MidairStrikeStep {
    fn initial_computation(&mut self, ctx: &TickContext) {
        if let MidairState::Uninitialized = self.state {
            self.state = MidairState::Running {
                launched_at: ctx.time(),
                last_moment_for_dodge: ctx.time() + MAX_TIME_FOR_AIR_DODGE - self.time_in_air_at_start,
                confusion: 0,
                target: None,
                meter: InterceptDisruptionMeter::new(ctx.settings.maneuver.midair_disruption_threshold),
            };
        }
    }

    fn should_cancel(&self, ctx: &TickContext) -> bool {
        ctx.car().has_wheel_contact
    }

    fn can_abort_internally(&self, _interruptible: bool) -> bool {
        true
    }

    fn compute_in_lieu_of_plan(&mut self, ctx: &TickContext) -> LieuOutcome {
        let MidairState::Running {
            launched_at,
            last_moment_for_dodge,
            confusion,
            target,
            meter,
        } = &mut self.state
        else {
            return LieuOutcome::Done;
        };
        let car = ctx.car();
        let now = ctx.time();
        let seconds_since_launch = now - *launched_at;

        let enemy_goal = car.team.enemy_goal_center();
        let offset = match target.as_ref() {
            None => {
                let mut offset = offset_toward(&car.team.own_goal_center(), STRIKE_OFFSET);
                offset.z -= 30.0;
                offset
            }
            Some(target) => {
                let goal_to_ball = target.space - enemy_goal;
                let mut offset = offset_toward(&goal_to_ball, STRIKE_OFFSET);
                if goal_to_ball.norm() > LONG_SHOT_DISTANCE {
                    offset.z = -10.0;
                }
                offset
            }
        };

        let latest = aerial_intercept(car, ctx.ball_path, offset, *launched_at);
        let disrupted = latest.as_ref().map_or(true, |i| meter.is_disrupted(&i.ball_slice));
        let latest = match latest {
            Some(latest) if !disrupted => latest,
            stale => {
                let own_recent_touch = ctx.input.latest_ball_touch.is_some_and(|touch| {
                    touch.player_index == car.player_index && now - touch.time < OWN_TOUCH_SECONDS
                });
                if let (true, Some(stale)) = (own_recent_touch, stale.as_ref()) {
                    log::debug!("Touched the ball, going for a second touch");
                    meter.reset(&stale.ball_slice);
                }
                *confusion += 1;
                if *confusion > ctx.settings.maneuver.max_confusion {
                    log::info!("Player {} quitting midair strike, intercept too disrupted", car.player_index);
                    return LieuOutcome::Done;
                }
                return LieuOutcome::Output(ControlOutput::new().with_boost(true));
            }
        };

        *target = Some(latest.to_space_time());
        let car_to_intercept = latest.space - car.position;
        let seconds_till = latest.time - now;
        let ball_distance = car.position.metric_distance(&ctx.input.ball.space);
        let correction = correction_angle_rad(car, &latest.space);

        if now < *last_moment_for_dodge
            && ball_distance < DODGE_SECONDS * car.speed()
            && latest.space.z - car.position.z < DODGE_MAX_RISE
        {
            let (dodge_seconds, dodge) = if correction.abs() <= SIDE_DODGE_THRESHOLD {
                log::debug!("Front flip strike");
                (1.0, ControlOutput::new().with_pitch(-1.0).with_jump(true))
            } else {
                log::debug!("Side flip strike");
                (0.03, ControlOutput::new().with_yaw(-correction.signum()).with_jump(true))
            };
            return LieuOutcome::StartPlan(
                Plan::new()
                    .with_step(BlindStep::new(0.03, ControlOutput::new()))
                    .with_step(BlindStep::new(dodge_seconds, dodge)),
            );
        }

        let flat_velocity = flatten(&car.velocity);
        let flat_to_intercept = flatten(&car_to_intercept);
        let sideways_divergence = correction_angle(&flat_velocity, &flat_to_intercept).sin().abs()
            * car_to_intercept.norm();
        if seconds_till > DODGE_SECONDS
            && seconds_since_launch > 2.0
            && sideways_divergence > MAX_SIDEWAYS_DIVERGENCE
        {
            log::info!("Player {} abandoning aerial on a bad angle", car.player_index);
            return LieuOutcome::Done;
        }

        let height_error = projected_height(car, seconds_till, seconds_since_launch) - latest.space.z;

        let left_right_correction = correction_angle(&flat_velocity, &flat_to_intercept);
        let desired_flat = rotate_vector(
            &flat_velocity,
            left_right_correction + left_right_correction.signum() * YAW_OVERCORRECT,
        )
        .try_normalize(1e-6)
        .or_else(|| flatten(&car.orientation.nose).try_normalize(1e-6))
        .unwrap_or_else(Vector2::x);

        let finesse = seconds_till < NOSE_FINESSE_SECONDS
            && latest.time > *last_moment_for_dodge
            && height_error > 0.0
            && offset.z > 0.0;

        let desired_nose = if finesse {
            (-offset).try_normalize(1e-6).unwrap_or(car.orientation.nose)
        } else {
            let extra_height = if offset.z > 0.0 { EXTRA_HEIGHT } else { 0.0 };
            let z = desired_z_component(latest.space.z + extra_height, seconds_till, seconds_since_launch, car);
            with_z_component(&desired_flat, z)
        };

        let pitch_normal = car.orientation.right.cross(&desired_nose);
        let yaw_normal = lift(&rotate_vector(&desired_flat, -PI / 2.0));

        let mut output = ControlOutput::new();
        for axis in [
            pitch_to_plane(car, &pitch_normal),
            yaw_to_plane(car, &yaw_normal),
            roll_to_plane(car, &Vector3::z()),
        ]
        .into_iter()
        .flatten()
        {
            output = output.with_rotation_from(&axis);
        }

        LieuOutcome::Output(
            output
                .with_boost(finesse || desired_nose.dot(&car.orientation.nose) > 0.5)
                .with_jump(true),
        )
    }

    fn local_situation(&self) -> String {
        "Midair strike".to_string()
    }

    fn can_interrupt(&self, _plan_interruptible: bool) -> bool {
        false
    }

    fn draw_debug(&self, canvas: &mut DebugCanvas) {
        if let MidairState::Running {
            target: Some(target), ..
        } = &self.state
        {
            canvas.sphere("midair.target", target.space, BALL_RADIUS, DebugColor::Purple);
        }
    }
}

/// `v` rescaled to `magnitude`, or zero when `v` has no direction.
fn offset_toward(v: &Vector3, magnitude: f64) -> Vector3 {
    scaled_to_magnitude(v, magnitude).unwrap_or_else(|_| Vector3::zeros())
}

/// Unit vector with the given z component pointing the same flat way as `flat`.
fn with_z_component(flat: &Vector2, z: f64) -> Vector3 {
    let z = z.clamp(-1.0, 1.0);
    let scale = ((1.0 - z * z) / flat.norm_squared()).sqrt();
    Vector3::new(flat.x * scale, flat.y * scale, z)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kestrel_core::{AgentInput, BallSlice, BallTouch, BotSettings, CarData, CarOrientation, Team};
    use kestrel_world::{BallPath, BallPredictor};

    use super::*;
    use crate::{Maneuver, NestedPlanStep};

    fn launched_car() -> CarData {
        let mut car = CarData::parked(Vector3::new(0.0, 0.0, 300.0), 0.0, Team::Blue);
        car.velocity = Vector3::new(800.0, 0.0, 400.0);
        car.orientation = CarOrientation::new(
            Vector3::new(0.8, 0.0, 0.6),
            Vector3::new(-0.6, 0.0, 0.8),
        );
        car.has_wheel_contact = false;
        car.boost = 60.0;
        car
    }

    fn input_with(car: CarData, ball: BallSlice, time: f64) -> (AgentInput, BallPath) {
        let path = BallPredictor::default().predict(&ball);
        let mut car = car;
        car.time = time;
        (
            AgentInput {
                car,
                ball,
                time,
                latest_ball_touch: None,
            },
            path,
        )
    }

    #[test]
    fn z_component_vector_is_unit() {
        let v = with_z_component(&Vector2::new(3.0, 4.0), 0.6);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.z, 0.6);
        assert_relative_eq!(v.x / v.y, 0.75, epsilon = 1e-12);
    }

    #[test_log::test]
    fn flies_toward_high_ball_with_jump_held() {
        let ball = BallSlice::new(Vector3::new(1500.0, 0.0, 900.0), 0.0, Vector3::new(0.0, 0.0, 100.0));
        let (input, path) = input_with(launched_car(), ball, 0.0);
        let settings = BotSettings::default();
        let ctx = TickContext::new(&input, &path, &settings);

        let mut step = NestedPlanStep::new(Maneuver::MidairStrike(MidairStrikeStep::new(0.3)));
        let output = step.tick(&ctx).unwrap();
        assert!(output.jump);
        assert!(!step.can_interrupt());
    }

    #[test]
    fn ends_on_wheel_contact() {
        let ball = BallSlice::new(Vector3::new(1500.0, 0.0, 900.0), 0.0, Vector3::zeros());
        let mut car = launched_car();
        car.has_wheel_contact = true;
        let (input, path) = input_with(car, ball, 0.0);
        let settings = BotSettings::default();
        let ctx = TickContext::new(&input, &path, &settings);

        let mut step = NestedPlanStep::new(Maneuver::MidairStrike(MidairStrikeStep::new(0.3)));
        assert!(step.tick(&ctx).is_none());
    }

    #[test]
    fn gives_up_after_repeated_confusion() {
        // A path with nothing after the present moment has no aerial intercept.
        let ball = BallSlice::new(Vector3::new(-4000.0, 4000.0, 1800.0), 0.0, Vector3::zeros());
        let path = BallPath::new(ball);
        let settings = BotSettings::default();
        let mut step = NestedPlanStep::new(Maneuver::MidairStrike(MidairStrikeStep::new(0.3)));

        let mut outputs = Vec::new();
        for frame in 0..=settings.maneuver.max_confusion {
            let (mut input, _) = input_with(launched_car(), ball, frame as f64 / 120.0);
            input.latest_ball_touch = Some(BallTouch {
                player_index: 1,
                time: 0.0,
                position: ball.space,
            });
            outputs.push(step.tick(&TickContext::new(&input, &path, &settings)));
        }

        let confused_ticks = settings.maneuver.max_confusion as usize;
        assert!(outputs[..confused_ticks].iter().all(|o| o.is_some_and(|o| o.boost)));
        assert_eq!(outputs.last(), Some(&None));
    }
}
