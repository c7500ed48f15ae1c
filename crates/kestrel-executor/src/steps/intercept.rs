use std::fmt;

use kestrel_core::{CarData, DebugCanvas, DebugColor, GameTime, SpaceTime, Vector3};
use kestrel_world::{filtered_intercept_opportunity, simulate_acceleration, strike_profile_for_height, Intercept};

use crate::{
    nested::{LieuOutcome, NestedPlanBehavior},
    plan_immediate_launch,
    steer::{sensible_flip, there_on_time},
    InterceptDisruptionMeter, TickContext,
};

/// Restricts which ball positions the car may strike at.
pub type InterceptPredicate = fn(&CarData, &SpaceTime) -> bool;

/// Offset from the ball's center to strike at, given the car and the current
/// ball position. Evaluated every tick.
pub type InterceptModifier = fn(&CarData, &Vector3) -> Vector3;

#[derive(Debug)]
enum InterceptState {
    Uninitialized,
    Running {
        started_at: GameTime,
        meter: InterceptDisruptionMeter,
        latest: Option<Intercept>,
        disrupted: bool,
    },
}

/// Drives to the ball and strikes it, re-solving the intercept every tick.
pub struct InterceptStep {
    modifier: InterceptModifier,
    predicate: InterceptPredicate,
    state: InterceptState,
}

impl InterceptStep {
    /// Strikes at the offset `modifier` gives, away from the ball's center.
    pub fn new(modifier: InterceptModifier) -> Self {
        Self {
            modifier,
            predicate: |_, _| true,
            state: InterceptState::Uninitialized,
        }
    }

    pub fn with_predicate(mut self, predicate: InterceptPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn latest_intercept(&self) -> Option<&Intercept> {
        match &self.state {
            InterceptState::Running { latest, .. } => latest.as_ref(),
            InterceptState::Uninitialized => None,
        }
    }
}

impl fmt::Debug for InterceptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptStep")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl NestedPlanBehavior for InterceptStep {
    fn initial_computation(&mut self, ctx: &TickContext) {
        if let InterceptState::Uninitialized = self.state {
            self.state = InterceptState::Running {
                started_at: ctx.time(),
                meter: InterceptDisruptionMeter::new(ctx.settings.maneuver.intercept_disruption_threshold),
                latest: None,
                disrupted: false,
            };
        }

        let car = ctx.car();
        let modifier = (self.modifier)(car, &ctx.input.ball.space);
        let plot = simulate_acceleration(car, ctx.settings.reachability.horizon_secs, car.boost, 0.0);
        let intercept = filtered_intercept_opportunity(
            car,
            ctx.ball_path,
            &plot,
            modifier,
            self.predicate,
            |space| strike_profile_for_height(space.z),
            &Vector3::z(),
        );

        if let InterceptState::Running {
            meter,
            latest,
            disrupted,
            ..
        } = &mut self.state
        {
            *disrupted = intercept
                .as_ref()
                .is_some_and(|intercept| meter.is_disrupted(&intercept.ball_slice));
            *latest = intercept;
        }
    }

    fn should_cancel(&self, ctx: &TickContext) -> bool {
        match &self.state {
            InterceptState::Running {
                started_at, disrupted, ..
            } => *disrupted || ctx.time() - started_at > ctx.settings.maneuver.intercept_lifespan_secs,
            InterceptState::Uninitialized => false,
        }
    }

    fn compute_in_lieu_of_plan(&mut self, ctx: &TickContext) -> LieuOutcome {
        let car = ctx.car();
        let Some(intercept) = self.latest_intercept() else {
            log::debug!("No intercept for player {}", car.player_index);
            return LieuOutcome::Done;
        };

        if !car.has_wheel_contact {
            return LieuOutcome::Done;
        }

        if let Some(plan) = plan_immediate_launch(car, intercept) {
            return LieuOutcome::StartPlan(plan);
        }

        if let Some(plan) = sensible_flip(car, &intercept.space) {
            log::debug!("Flipping toward intercept");
            return LieuOutcome::StartPlan(plan);
        }

        LieuOutcome::Output(there_on_time(car, &intercept.to_space_time()))
    }

    fn local_situation(&self) -> String {
        match self.latest_intercept() {
            Some(intercept) => format!("Intercepting ({:?})", intercept.strike_profile.style),
            None => "Intercepting".to_string(),
        }
    }

    fn draw_debug(&self, canvas: &mut DebugCanvas) {
        if let Some(intercept) = self.latest_intercept() {
            canvas.sphere("intercept", intercept.space, 40.0, DebugColor::Green);
            canvas.value("intercept.spare_time", intercept.spare_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kestrel_core::{AgentInput, BallSlice, BotSettings, Team, BALL_RADIUS};
    use kestrel_world::{BallPath, BallPredictor};

    use super::*;
    use crate::{Maneuver, NestedPlanStep};

    fn scenario(ball: BallSlice) -> (AgentInput, BallPath) {
        let car = CarData::parked(Vector3::new(0.0, 0.0, 17.0), 0.0, Team::Blue);
        let path = BallPredictor::default().predict(&ball);
        let input = AgentInput {
            car,
            ball,
            time: 0.0,
            latest_ball_touch: None,
        };
        (input, path)
    }

    #[test_log::test]
    fn drives_toward_rolling_ball() {
        let ball = BallSlice::new(Vector3::new(3000.0, 500.0, BALL_RADIUS), 0.0, Vector3::new(0.0, -200.0, 0.0));
        let (input, path) = scenario(ball);
        let settings = BotSettings::default();
        let ctx = TickContext::new(&input, &path, &settings);

        let mut step = NestedPlanStep::new(Maneuver::Intercept(InterceptStep::new(|_, _| Vector3::zeros())));
        let output = step.tick(&ctx).unwrap();
        assert!(output.throttle > 0.0);
        assert!(step.situation().starts_with("Intercepting"));
        assert!(step.can_interrupt());
    }

    #[test]
    fn impossible_predicate_ends_the_step() {
        let ball = BallSlice::new(Vector3::new(3000.0, 500.0, BALL_RADIUS), 0.0, Vector3::zeros());
        let (input, path) = scenario(ball);
        let settings = BotSettings::default();
        let ctx = TickContext::new(&input, &path, &settings);

        let never = InterceptStep::new(|_, _| Vector3::zeros()).with_predicate(|_, _| false);
        let mut step = NestedPlanStep::new(Maneuver::Intercept(never));
        assert!(step.tick(&ctx).is_none());
    }

    #[test]
    fn expires_after_lifespan() {
        let ball = BallSlice::new(Vector3::new(3000.0, 500.0, BALL_RADIUS), 0.0, Vector3::zeros());
        let (mut input, path) = scenario(ball);
        let settings = BotSettings::default();
        let mut step = NestedPlanStep::new(Maneuver::Intercept(InterceptStep::new(|_, _| Vector3::zeros())));
        assert!(step.tick(&TickContext::new(&input, &path, &settings)).is_some());

        input.time = settings.maneuver.intercept_lifespan_secs + 0.1;
        input.car.time = input.time;
        assert!(step.tick(&TickContext::new(&input, &path, &settings)).is_none());
    }

    #[test]
    fn modifier_follows_the_current_ball() {
        let ball = BallSlice::new(Vector3::new(3000.0, 500.0, BALL_RADIUS), 0.0, Vector3::new(0.0, -200.0, 0.0));
        let (mut input, path) = scenario(ball);
        let settings = BotSettings::default();
        let mut step = InterceptStep::new(|_, ball| Vector3::new(0.0, -0.1 * ball.y, 0.0));

        step.initial_computation(&TickContext::new(&input, &path, &settings));
        let first = step.latest_intercept().unwrap();
        assert_relative_eq!(first.space - first.ball_slice.space, Vector3::new(0.0, -50.0, 0.0), epsilon = 1e-6);

        input.ball.space.y = 1000.0;
        step.initial_computation(&TickContext::new(&input, &path, &settings));
        let second = step.latest_intercept().unwrap();
        assert_relative_eq!(second.space - second.ball_slice.space, Vector3::new(0.0, -100.0, 0.0), epsilon = 1e-6);
    }
}
