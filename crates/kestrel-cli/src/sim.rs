use anyhow::Result;
use clap::{Args, ValueEnum};
use kestrel_core::{
    flatten, AgentInput, BallSlice, BallTouch, BotSettings, CarData, CarOrientation, CarSpin, ControlOutput,
    DebugCanvas, GameTime, Team, Vector3, BALL_RADIUS, GOAL_LINE_Y, GRAVITY,
};
use kestrel_executor::Bot;
use kestrel_world::{
    throttle_acceleration, BallPhysics, BallPrediction, BallPredictor, PredictionWarehouse, SimpleBallPhysics,
    BOOST_ACCELERATION, BOOST_CONSUMPTION_RATE, FLIP_SPEED_BOOST, JUMP_HOLD_ACCELERATION, JUMP_HOLD_SECONDS,
    JUMP_IMPULSE, MAX_TIME_FOR_AIR_DODGE, SUPERSONIC_SPEED,
};
use nalgebra::UnitQuaternion;
use serde::Serialize;

use crate::parse_vector;

const TICK_RATE: f64 = 120.0;
const CAR_REST_HEIGHT: f64 = 17.0;
const CAR_HIT_RADIUS: f64 = 70.0;
const COAST_DECELERATION: f64 = 525.0;
const BRAKE_DECELERATION: f64 = 3500.0;
const PITCH_RATE: f64 = 5.5;
const YAW_RATE: f64 = 5.5;
const ROLL_RATE: f64 = 5.5;
const SIDE_WALL_X: f64 = 4096.0;
const GOAL_HALF_WIDTH: f64 = 893.0;
const GOAL_HEIGHT: f64 = 642.0;
const WALL_RESTITUTION: f64 = 0.6;
const TOUCH_COOLDOWN_SECONDS: f64 = 0.1;
/// Seconds ahead that checked predictions look.
const PREDICTION_LEAD_SECONDS: f64 = 1.0;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum TeamArg {
    Blue,
    Orange,
}

impl From<TeamArg> for Team {
    fn from(team: TeamArg) -> Self {
        match team {
            TeamArg::Blue => Team::Blue,
            TeamArg::Orange => Team::Orange,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    /// Simulated seconds to run for.
    #[clap(long, default_value = "10")]
    seconds: f64,

    #[clap(long, default_value = "blue")]
    team: TeamArg,

    /// Ball position at kickoff as `x,y,z`.
    #[clap(long, value_parser = parse_vector, default_value = "0,0,92.75")]
    ball_position: Vector3,

    /// Ball velocity at kickoff as `x,y,z`.
    #[clap(long, value_parser = parse_vector, default_value = "0,0,0")]
    ball_velocity: Vector3,

    /// Print the debug canvas as JSON every this many ticks.
    #[clap(long)]
    debug_every: Option<u64>,

    /// Record a ball prediction for checking every this many ticks.
    #[clap(long, default_value = "30")]
    prediction_every: u64,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    ticks: u64,
    touches: usize,
    goals_for: u32,
    goals_against: u32,
    checked_predictions: usize,
    mean_prediction_error: Option<f64>,
    max_prediction_error: Option<f64>,
    final_situation: String,
    final_ball: Option<BallSlice>,
}

/// Just enough car physics to exercise the bot: a car that drives where it
/// points on flat ground, jumps, dodges and rotates freely in the air.
struct SimCar {
    position: Vector3,
    velocity: Vector3,
    rotation: UnitQuaternion<f64>,
    spin: CarSpin,
    boost: f64,
    on_ground: bool,
    jumped_at: Option<GameTime>,
    has_dodged: bool,
    jump_was_held: bool,
}

impl SimCar {
    fn kickoff(team: Team) -> Self {
        let y = 2500.0 * team.own_goal_direction();
        let heading = -team.own_goal_direction() * std::f64::consts::FRAC_PI_2;
        Self {
            position: Vector3::new(0.0, y, CAR_REST_HEIGHT),
            velocity: Vector3::zeros(),
            rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, heading),
            spin: CarSpin::default(),
            boost: 33.0,
            on_ground: true,
            jumped_at: None,
            has_dodged: false,
            jump_was_held: false,
        }
    }

    fn orientation(&self) -> CarOrientation {
        CarOrientation::new(self.rotation * Vector3::x(), self.rotation * Vector3::z())
    }

    fn heading(&self) -> f64 {
        let nose = self.rotation * Vector3::x();
        nose.y.atan2(nose.x)
    }

    fn data(&self, team: Team, time: GameTime, frame_count: u64) -> CarData {
        CarData {
            position: self.position,
            velocity: self.velocity,
            orientation: self.orientation(),
            spin: self.spin,
            boost: self.boost,
            is_supersonic: self.velocity.norm() >= SUPERSONIC_SPEED - 100.0,
            has_wheel_contact: self.on_ground,
            team,
            player_index: 0,
            time,
            frame_count,
        }
    }

    fn step(&mut self, output: &ControlOutput, time: GameTime, dt: f64) {
        let jump_pressed = output.jump && !self.jump_was_held;
        self.jump_was_held = output.jump;

        let boosting = output.boost && self.boost > 0.0;
        if boosting {
            self.boost = (self.boost - BOOST_CONSUMPTION_RATE * dt).max(0.0);
        }

        if self.on_ground {
            self.drive(output, boosting, dt);
            if jump_pressed {
                self.velocity += self.orientation().roof * JUMP_IMPULSE;
                self.on_ground = false;
                self.jumped_at = Some(time);
                self.has_dodged = false;
            }
        } else {
            self.fly(output, boosting, jump_pressed, time, dt);
        }

        if self.velocity.norm() > SUPERSONIC_SPEED {
            self.velocity = self.velocity.normalize() * SUPERSONIC_SPEED;
        }
        self.position += self.velocity * dt;
        self.position.x = self.position.x.clamp(-SIDE_WALL_X, SIDE_WALL_X);
        self.position.y = self.position.y.clamp(-GOAL_LINE_Y, GOAL_LINE_Y);

        if !self.on_ground && self.position.z <= CAR_REST_HEIGHT && self.velocity.z <= 0.0 {
            self.land();
        }
    }

    fn drive(&mut self, output: &ControlOutput, boosting: bool, dt: f64) {
        let nose = self.orientation().nose;
        let mut speed = self.velocity.dot(&nose);

        let mut acceleration = if output.throttle > 0.0 {
            output.throttle * throttle_acceleration(speed)
        } else if output.throttle < 0.0 && speed > 0.0 {
            -BRAKE_DECELERATION
        } else if output.throttle < 0.0 {
            output.throttle * throttle_acceleration(-speed)
        } else {
            -COAST_DECELERATION * speed.signum()
        };
        if boosting {
            acceleration += BOOST_ACCELERATION;
        }
        speed = (speed + acceleration * dt).clamp(-SUPERSONIC_SPEED, SUPERSONIC_SPEED);
        if output.throttle == 0.0 && !boosting && speed.abs() < COAST_DECELERATION * dt {
            speed = 0.0;
        }

        // Positive steer turns right, which is clockwise seen from above.
        let turn_rate = speed * max_curvature(speed.abs()) * output.steer.clamp(-1.0, 1.0);
        let heading = self.heading() - turn_rate * dt;
        self.rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, heading);
        self.spin = CarSpin {
            yaw_rate: turn_rate,
            ..CarSpin::default()
        };
        self.velocity = self.orientation().nose * speed;
        self.position.z = CAR_REST_HEIGHT;
    }

    fn fly(&mut self, output: &ControlOutput, boosting: bool, jump_pressed: bool, time: GameTime, dt: f64) {
        let orientation = self.orientation();
        let since_jump = self.jumped_at.map_or(f64::INFINITY, |jumped_at| time - jumped_at);

        if jump_pressed && !self.has_dodged && since_jump < MAX_TIME_FOR_AIR_DODGE {
            self.has_dodged = true;
            let flat_nose = flatten(&orientation.nose);
            let flat_right = flatten(&orientation.right);
            let dodge = flat_nose * -output.pitch + flat_right * (output.yaw + output.roll);
            if dodge.norm() > 0.1 {
                let dodge = dodge.normalize() * FLIP_SPEED_BOOST;
                self.velocity += Vector3::new(dodge.x, dodge.y, 0.0);
            } else {
                self.velocity += orientation.roof * JUMP_IMPULSE;
            }
        }

        if output.jump && since_jump < JUMP_HOLD_SECONDS && !self.has_dodged {
            self.velocity += orientation.roof * JUMP_HOLD_ACCELERATION * dt;
        }
        if boosting {
            self.velocity += orientation.nose * BOOST_ACCELERATION * dt;
        }
        self.velocity.z += GRAVITY * dt;

        self.spin = CarSpin {
            pitch_rate: output.pitch.clamp(-1.0, 1.0) * PITCH_RATE,
            yaw_rate: output.yaw.clamp(-1.0, 1.0) * YAW_RATE,
            roll_rate: output.roll.clamp(-1.0, 1.0) * ROLL_RATE,
        };
        // Body axes: x is the nose, y points left, z is the roof.
        let body_rate = Vector3::new(self.spin.roll_rate, -self.spin.pitch_rate, -self.spin.yaw_rate);
        self.rotation *= UnitQuaternion::from_scaled_axis(body_rate * dt);
    }

    fn land(&mut self) {
        let heading = self.heading();
        self.rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, heading);
        self.position.z = CAR_REST_HEIGHT;
        self.velocity.z = 0.0;
        let nose = self.orientation().nose;
        self.velocity = nose * self.velocity.dot(&nose);
        self.spin = CarSpin::default();
        self.on_ground = true;
        self.jumped_at = None;
        self.has_dodged = false;
    }
}

/// Tightest turn curvature available at a given speed.
fn max_curvature(speed: f64) -> f64 {
    (0.0069 - 0.0000026 * speed).max(0.0009)
}

enum BallEvent {
    Goal(Team),
    Touch,
}

/// Bounces the ball off the side and back walls and detects goals.
fn contain_ball(ball: &mut BallSlice) -> Option<Team> {
    let side_limit = SIDE_WALL_X - BALL_RADIUS;
    if ball.space.x.abs() > side_limit {
        ball.space.x = side_limit * ball.space.x.signum();
        ball.velocity.x *= -WALL_RESTITUTION;
    }

    let back_limit = GOAL_LINE_Y + BALL_RADIUS;
    if ball.space.y.abs() > back_limit {
        if ball.space.x.abs() < GOAL_HALF_WIDTH && ball.space.z < GOAL_HEIGHT {
            // The team whose goal it was concedes.
            return Some(if ball.space.y > 0.0 { Team::Orange } else { Team::Blue });
        }
        ball.space.y = back_limit * ball.space.y.signum();
        ball.velocity.y *= -WALL_RESTITUTION;
    }
    None
}

fn resolve_touch(car: &SimCar, ball: &mut BallSlice) -> bool {
    let offset = ball.space - car.position;
    let distance = offset.norm();
    if distance > BALL_RADIUS + CAR_HIT_RADIUS || distance < f64::EPSILON {
        return false;
    }
    let normal = offset / distance;
    let closing_speed = (car.velocity - ball.velocity).dot(&normal).max(0.0);
    ball.velocity += normal * (closing_speed * 1.3 + 200.0);
    ball.space = car.position + normal * (BALL_RADIUS + CAR_HIT_RADIUS);
    true
}

pub(crate) fn run(settings: BotSettings, args: &RunArgs) -> Result<()> {
    let team = Team::from(args.team);
    let physics = SimpleBallPhysics;
    let checker = BallPredictor::new(Box::new(SimpleBallPhysics), settings.prediction.clone());
    let mut bot = Bot::new(settings);
    let mut warehouse = PredictionWarehouse::new();

    let dt = 1.0 / TICK_RATE;
    let total_ticks = (args.seconds.max(0.0) * TICK_RATE).round() as u64;
    let kickoff_ball = BallSlice::new(args.ball_position, 0.0, args.ball_velocity);

    let mut car = SimCar::kickoff(team);
    let mut ball = kickoff_ball;
    let mut latest_touch: Option<BallTouch> = None;
    let mut last_touch_time = f64::NEG_INFINITY;
    let mut errors: Vec<f64> = Vec::new();
    let mut summary = RunSummary::default();

    tracing::info!("Running {} ticks as {:?}", total_ticks, team);

    for frame in 0..total_ticks {
        let time = frame as f64 * dt;
        let input = AgentInput {
            car: car.data(team, time, frame),
            ball,
            time,
            latest_ball_touch: latest_touch,
        };
        let output = bot.tick(&input);

        if let Some(every) = args.debug_every.filter(|every| *every > 0) {
            if frame % every == 0 {
                let mut canvas = DebugCanvas::new();
                bot.draw_debug(&mut canvas);
                println!("{}", serde_json::to_string(canvas.map())?);
            }
        }

        if args.prediction_every > 0 && frame % args.prediction_every == 0 {
            let path = checker.predict(&ball);
            if let Some(slice) = path.motion_at(time + PREDICTION_LEAD_SECONDS) {
                warehouse.add_prediction(BallPrediction { made_at: time, slice });
            }
        }
        if let Some(prediction) = warehouse.prediction_of_moment(time) {
            if (prediction.predicted_moment() - time).abs() < dt / 2.0 {
                let error = (prediction.slice.space - ball.space).norm();
                tracing::trace!("Prediction from {:.2} s was off by {:.1} uu", prediction.made_at, error);
                errors.push(error);
            }
        }

        car.step(&output, time, dt);
        ball = physics.step(&ball, dt);

        let event = if resolve_touch(&car, &mut ball) {
            Some(BallEvent::Touch)
        } else {
            contain_ball(&mut ball).map(BallEvent::Goal)
        };
        match event {
            Some(BallEvent::Touch) if ball.time - last_touch_time > TOUCH_COOLDOWN_SECONDS => {
                last_touch_time = ball.time;
                latest_touch = Some(BallTouch {
                    player_index: 0,
                    time: ball.time,
                    position: ball.space,
                });
                summary.touches += 1;
                tracing::debug!("Touched ball at {:.2} s: {}", ball.time, bot.situation());
            }
            Some(BallEvent::Goal(conceding)) => {
                if conceding == team {
                    summary.goals_against += 1;
                } else {
                    summary.goals_for += 1;
                }
                tracing::info!("Goal against {:?} at {:.2} s", conceding, ball.time);
                car = SimCar::kickoff(team);
                ball = BallSlice::new(kickoff_ball.space, ball.time, kickoff_ball.velocity);
            }
            _ => {}
        }
        summary.ticks = frame + 1;
    }

    summary.checked_predictions = errors.len();
    if !errors.is_empty() {
        summary.mean_prediction_error = Some(errors.iter().sum::<f64>() / errors.len() as f64);
        summary.max_prediction_error = errors.iter().copied().reduce(f64::max);
    }
    summary.final_situation = bot.situation();
    summary.final_ball = Some(ball);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn full_throttle_accelerates_forward() {
        let mut car = SimCar::kickoff(Team::Blue);
        let output = ControlOutput::new().with_throttle(1.0);
        for frame in 0..120 {
            car.step(&output, frame as f64 / TICK_RATE, 1.0 / TICK_RATE);
        }
        assert!(car.velocity.y > 800.0);
        assert_relative_eq!(car.position.z, CAR_REST_HEIGHT);
    }

    #[test]
    fn positive_steer_turns_right() {
        let mut car = SimCar::kickoff(Team::Blue);
        let output = ControlOutput::new().with_throttle(1.0).with_steer(1.0);
        for frame in 0..60 {
            car.step(&output, frame as f64 / TICK_RATE, 1.0 / TICK_RATE);
        }
        // Facing +y, right is +x.
        assert!(car.position.x > 0.0);
    }

    #[test]
    fn jump_leaves_ground_and_lands() {
        let mut car = SimCar::kickoff(Team::Blue);
        let dt = 1.0 / TICK_RATE;
        car.step(&ControlOutput::new().with_jump(true), 0.0, dt);
        assert!(!car.on_ground);
        let mut frame = 1;
        while !car.on_ground && frame < 600 {
            car.step(&ControlOutput::new(), frame as f64 * dt, dt);
            frame += 1;
        }
        assert!(car.on_ground);
        assert_relative_eq!(car.position.z, CAR_REST_HEIGHT);
    }

    #[test]
    fn positive_pitch_raises_nose() {
        let mut car = SimCar::kickoff(Team::Blue);
        car.on_ground = false;
        car.position.z = 1000.0;
        car.step(&ControlOutput::new().with_pitch(1.0), 0.0, 1.0 / TICK_RATE);
        assert!(car.orientation().nose.z > 0.0);
    }

    #[test]
    fn ball_in_goal_mouth_scores() {
        let mut ball = BallSlice::new(Vector3::new(0.0, GOAL_LINE_Y + 200.0, 200.0), 0.0, Vector3::zeros());
        assert_eq!(contain_ball(&mut ball), Some(Team::Orange));

        let mut wide = BallSlice::new(Vector3::new(2000.0, -GOAL_LINE_Y - 200.0, 200.0), 0.0, Vector3::zeros());
        wide.velocity.y = -1000.0;
        assert_eq!(contain_ball(&mut wide), None);
        assert!(wide.velocity.y > 0.0);
    }
}
