use kestrel_core::{lift, AgentInput, BotSettings, CarData, ControlOutput, DebugCanvas, Vector3};
use kestrel_world::{intercept_opportunity_assuming_max_accel, BallPhysics, BallPredictor, SimpleBallPhysics};

use crate::{
    steer::{catch_opportunity, flat_direction_or_heading, steer_toward_ground_position},
    steps::{CatchBallStep, InterceptStep, LandGracefullyStep},
    Maneuver, NestedPlanStep, Plan, TickContext,
};

/// How far behind the ball, as seen from the enemy goal, ground strikes aim.
const STRIKE_SETBACK: f64 = 70.0;

/// Drives one car: predicts the ball once per tick, runs the active plan and
/// picks a new one whenever the old one finishes.
pub struct Bot {
    settings: BotSettings,
    predictor: BallPredictor,
    plan: Option<Plan>,
    cancel_requested: bool,
    last_frame: Option<u64>,
    last_output: ControlOutput,
}

impl Bot {
    pub fn new(settings: BotSettings) -> Self {
        Self::with_physics(settings, Box::new(SimpleBallPhysics))
    }

    pub fn with_physics(settings: BotSettings, physics: Box<dyn BallPhysics>) -> Self {
        let predictor = BallPredictor::new(physics, settings.prediction.clone());
        Self {
            settings,
            predictor,
            plan: None,
            cancel_requested: false,
            last_frame: None,
            last_output: ControlOutput::new(),
        }
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: BotSettings) {
        self.predictor.update_settings(settings.prediction.clone());
        self.settings = settings;
    }

    /// Replaces whatever is running with `plan`.
    pub fn start_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
        self.cancel_requested = false;
    }

    /// Asks the running plan to stop. Takes effect on the first tick at which
    /// the plan can be interrupted.
    pub fn request_cancel(&mut self) {
        if self.plan.is_some() {
            self.cancel_requested = true;
        }
    }

    pub fn cancel_pending(&self) -> bool {
        self.cancel_requested
    }

    pub fn tick(&mut self, input: &AgentInput) -> ControlOutput {
        let frame = input.car.frame_count;
        match self.last_frame {
            Some(last) if last == frame => return self.last_output,
            Some(last) if frame < last => {
                log::warn!("Frame counter went backwards from {} to {}", last, frame);
            }
            _ => {}
        }
        self.last_frame = Some(frame);

        let ball_path = self.predictor.predict(&input.ball);
        let ctx = TickContext::new(input, &ball_path, &self.settings);

        if self.cancel_requested && self.plan.as_ref().map_or(true, Plan::can_interrupt) {
            log::info!("Player {} cancelling plan: {}", input.player_index(), self.situation());
            self.plan = None;
            self.cancel_requested = false;
        }

        if let Some(output) = self.plan.as_mut().and_then(|plan| plan.tick(&ctx)) {
            self.last_output = output;
            return output;
        }
        self.plan = None;
        self.cancel_requested = false;

        let output = match select_plan(&ctx) {
            Some(mut plan) => match plan.tick(&ctx) {
                Some(output) => {
                    log::debug!("Player {} started plan: {}", input.player_index(), plan.situation());
                    self.plan = Some(plan);
                    output
                }
                None => steer_toward_ground_position(ctx.car(), &input.ball.space),
            },
            None => steer_toward_ground_position(ctx.car(), &input.ball.space),
        };
        self.last_output = output;
        output
    }

    pub fn situation(&self) -> String {
        match &self.plan {
            Some(plan) => plan.situation(),
            None => "Driving toward ball".to_string(),
        }
    }

    pub fn draw_debug(&self, canvas: &mut DebugCanvas) {
        canvas.string("situation", self.situation());
        if let Some(plan) = &self.plan {
            plan.draw_debug(canvas);
        }
    }
}

fn select_plan(ctx: &TickContext) -> Option<Plan> {
    let car = ctx.car();
    if !car.has_wheel_contact {
        return Some(Plan::new().with_step(LandGracefullyStep::facing_ball()));
    }

    let horizon = ctx.settings.reachability.horizon_secs;
    if intercept_opportunity_assuming_max_accel(car, ctx.ball_path, car.boost, horizon).is_some() {
        return Some(Plan::new().with_step(NestedPlanStep::new(Maneuver::Intercept(InterceptStep::new(
            strike_setback,
        )))));
    }

    let catch_budget = ctx.settings.maneuver.catch_boost_budget;
    if catch_opportunity(car, ctx.ball_path, catch_budget, horizon).is_some() {
        return Some(Plan::new().with_step(NestedPlanStep::new(Maneuver::CatchBall(CatchBallStep::new()))));
    }

    None
}

/// Offset that puts the contact point on the far side of the ball from the enemy goal.
fn strike_setback(car: &CarData, ball: &Vector3) -> Vector3 {
    let behind_ball = flat_direction_or_heading(car, &car.team.enemy_goal_center(), ball);
    lift(&behind_ball) * STRIKE_SETBACK
}
