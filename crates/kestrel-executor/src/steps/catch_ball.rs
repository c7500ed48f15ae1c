use kestrel_core::{lift, DebugCanvas, DebugColor, SpaceTime};

use crate::{
    nested::{LieuOutcome, NestedPlanBehavior},
    steer::{catch_opportunity, flat_direction_or_heading, there_on_time},
    TickContext,
};

/// How far behind the landing spot, away from the enemy goal, the car waits.
const CATCH_SETBACK: f64 = 60.0;

/// Drives under a bouncing ball so it lands on the car's roof.
#[derive(Debug, Default)]
pub struct CatchBallStep {
    latest_catch: Option<SpaceTime>,
}

impl CatchBallStep {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NestedPlanBehavior for CatchBallStep {
    fn initial_computation(&mut self, ctx: &TickContext) {
        self.latest_catch = catch_opportunity(
            ctx.car(),
            ctx.ball_path,
            ctx.settings.maneuver.catch_boost_budget,
            ctx.settings.reachability.horizon_secs,
        );
    }

    fn should_cancel(&self, ctx: &TickContext) -> bool {
        !ctx.car().has_wheel_contact
    }

    fn compute_in_lieu_of_plan(&mut self, ctx: &TickContext) -> LieuOutcome {
        let Some(catch) = self.latest_catch else {
            return LieuOutcome::Done;
        };

        let car = ctx.car();
        let enemy_goal = car.team.enemy_goal_center();
        let away_from_goal = flat_direction_or_heading(car, &enemy_goal, &catch.space);
        let spot = catch.space + lift(&away_from_goal) * CATCH_SETBACK;
        LieuOutcome::Output(there_on_time(car, &SpaceTime::new(spot, catch.time)))
    }

    fn local_situation(&self) -> String {
        "Catching ball".to_string()
    }

    fn draw_debug(&self, canvas: &mut DebugCanvas) {
        if let Some(catch) = &self.latest_catch {
            canvas.cross("catch", catch.space, DebugColor::Orange);
        }
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::{AgentInput, BallSlice, BotSettings, CarData, Team, Vector3};
    use kestrel_world::{BallPath, BallPredictor};

    use super::*;
    use crate::{Maneuver, NestedPlanStep};

    #[test_log::test]
    fn drives_to_landing_spot() {
        let car = CarData::parked(Vector3::new(0.0, 0.0, 17.0), 0.0, Team::Blue);
        let ball = BallSlice::new(Vector3::new(1200.0, 0.0, 1500.0), 0.0, Vector3::zeros());
        let path = BallPredictor::default().predict(&ball);
        let input = AgentInput {
            car,
            ball,
            time: 0.0,
            latest_ball_touch: None,
        };
        let settings = BotSettings::default();
        let ctx = TickContext::new(&input, &path, &settings);

        let mut step = NestedPlanStep::new(Maneuver::CatchBall(CatchBallStep::new()));
        let output = step.tick(&ctx).unwrap();
        assert!(output.throttle > 0.0);
        assert!(step.can_interrupt());
    }

    #[test]
    fn resting_ball_cannot_be_caught() {
        let car = CarData::parked(Vector3::new(0.0, 0.0, 17.0), 0.0, Team::Blue);
        let ball = BallSlice::new(Vector3::new(1200.0, 0.0, 92.75), 0.0, Vector3::zeros());
        let path = BallPath::new(ball);
        let input = AgentInput {
            car,
            ball,
            time: 0.0,
            latest_ball_touch: None,
        };
        let settings = BotSettings::default();
        let ctx = TickContext::new(&input, &path, &settings);

        let mut step = NestedPlanStep::new(Maneuver::CatchBall(CatchBallStep::new()));
        assert!(step.tick(&ctx).is_none());
    }
}
