use kestrel_core::{ControlOutput, DebugCanvas};

use crate::{
    steps::{CatchBallStep, InterceptStep, MidairStrikeStep},
    Plan, TickContext,
};

/// What a nested-plan step does on a tick when it has no plan of its own running.
#[derive(Debug)]
pub enum LieuOutcome {
    Output(ControlOutput),
    /// Start this plan and hand it the current tick.
    StartPlan(Plan),
    /// The step is finished.
    Done,
}

/// The decision logic of a step that can delegate to a nested plan.
///
/// [`NestedPlanStep`] calls these in a fixed order every tick: bookkeeping
/// first, then the abort check, then the nested plan, and finally
/// [`NestedPlanBehavior::compute_in_lieu_of_plan`] when no plan produced output.
pub trait NestedPlanBehavior {
    /// Runs every tick before anything else. Store results needed by the
    /// other hooks here.
    fn initial_computation(&mut self, _ctx: &TickContext) {}

    /// Should be free of side effects.
    fn should_cancel(&self, _ctx: &TickContext) -> bool {
        false
    }

    /// Whether the abort check may fire given the step's current interruptibility.
    fn can_abort_internally(&self, interruptible: bool) -> bool {
        interruptible
    }

    fn compute_in_lieu_of_plan(&mut self, ctx: &TickContext) -> LieuOutcome;

    fn local_situation(&self) -> String;

    /// Interruptibility of the step given that of its nested plan.
    fn can_interrupt(&self, plan_interruptible: bool) -> bool {
        plan_interruptible
    }

    fn draw_debug(&self, _canvas: &mut DebugCanvas) {}
}

/// The long-running maneuvers that own nested plans.
#[derive(Debug)]
pub enum Maneuver {
    Intercept(InterceptStep),
    MidairStrike(MidairStrikeStep),
    CatchBall(CatchBallStep),
}

impl Maneuver {
    fn behavior(&self) -> &dyn NestedPlanBehavior {
        match self {
            Maneuver::Intercept(step) => step,
            Maneuver::MidairStrike(step) => step,
            Maneuver::CatchBall(step) => step,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn NestedPlanBehavior {
        match self {
            Maneuver::Intercept(step) => step,
            Maneuver::MidairStrike(step) => step,
            Maneuver::CatchBall(step) => step,
        }
    }
}

/// A step that owns at most one child plan.
#[derive(Debug)]
pub struct NestedPlanStep {
    maneuver: Maneuver,
    plan: Option<Plan>,
}

impl NestedPlanStep {
    pub fn new(maneuver: Maneuver) -> Self {
        Self {
            maneuver,
            plan: None,
        }
    }

    /// Starts the step with `plan` already running.
    pub fn starting_with(maneuver: Maneuver, plan: Plan) -> Self {
        Self {
            maneuver,
            plan: Some(plan),
        }
    }

    pub fn maneuver(&self) -> &Maneuver {
        &self.maneuver
    }

    fn active_plan(&self) -> Option<&Plan> {
        self.plan.as_ref().filter(|plan| !plan.is_complete())
    }

    pub fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        self.maneuver.behavior_mut().initial_computation(ctx);

        let interruptible = self.can_interrupt();
        let behavior = self.maneuver.behavior();
        if behavior.should_cancel(ctx) && behavior.can_abort_internally(interruptible) {
            log::debug!("Aborting {}", behavior.local_situation());
            return None;
        }

        if let Some(plan) = self.plan.as_mut() {
            if let Some(output) = plan.tick(ctx) {
                return Some(output);
            }
            self.plan = None;
        }

        match self.maneuver.behavior_mut().compute_in_lieu_of_plan(ctx) {
            LieuOutcome::Output(output) => Some(output),
            LieuOutcome::Done => None,
            LieuOutcome::StartPlan(mut plan) => {
                let output = plan.tick(ctx);
                if !plan.is_complete() {
                    self.plan = Some(plan);
                }
                output
            }
        }
    }

    pub fn can_interrupt(&self) -> bool {
        let plan_interruptible = self.active_plan().map_or(true, Plan::can_interrupt);
        self.maneuver.behavior().can_interrupt(plan_interruptible)
    }

    pub fn situation(&self) -> String {
        let local = self.maneuver.behavior().local_situation();
        match self.active_plan() {
            Some(plan) => format!("{} -> {}", local, plan.situation()),
            None => local,
        }
    }

    pub fn draw_debug(&self, canvas: &mut DebugCanvas) {
        self.maneuver.behavior().draw_debug(canvas);
        if let Some(plan) = self.active_plan() {
            plan.draw_debug(canvas);
        }
    }
}

impl From<Maneuver> for NestedPlanStep {
    fn from(maneuver: Maneuver) -> Self {
        Self::new(maneuver)
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::BotSettings;
    use kestrel_world::BallPath;

    use super::*;
    use crate::{
        steps::{LandGracefullyStep, TapStep},
        testing::airborne_input_at_frame,
    };

    #[test_log::test]
    fn interruptibility_follows_nested_plan() {
        let inner = Plan::new()
            .with_step(TapStep::new(1, ControlOutput::new().with_jump(true)))
            .with_step(LandGracefullyStep::new());
        let mut step = NestedPlanStep::starting_with(Maneuver::CatchBall(CatchBallStep::new()), inner);
        let settings = BotSettings::default();

        let input = airborne_input_at_frame(0);
        let path = BallPath::new(input.ball);
        let ctx = TickContext::new(&input, &path, &settings);
        assert!(step.tick(&ctx).is_some());
        assert!(!step.can_interrupt());
        assert!(step.situation().contains("Tapping"));

        let input = airborne_input_at_frame(1);
        let path = BallPath::new(input.ball);
        let ctx = TickContext::new(&input, &path, &settings);
        assert!(step.tick(&ctx).is_some());
        assert!(step.can_interrupt());
        assert!(step.situation().contains("Landing gracefully"));
    }

    #[test_log::test]
    fn cancel_waits_for_nested_plan_to_become_interruptible() {
        let jump = ControlOutput::new().with_jump(true);
        let inner = Plan::new()
            .with_step(TapStep::new(3, jump))
            .with_step(LandGracefullyStep::new());
        // Catching is cancelled whenever the car is airborne.
        let mut step = NestedPlanStep::starting_with(Maneuver::CatchBall(CatchBallStep::new()), inner);
        let settings = BotSettings::default();

        let mut outputs = Vec::new();
        for frame in 0..5 {
            let input = airborne_input_at_frame(frame);
            let path = BallPath::new(input.ball);
            let ctx = TickContext::new(&input, &path, &settings);
            outputs.push(step.tick(&ctx));
        }

        assert_eq!(&outputs[..3], &[Some(jump), Some(jump), Some(jump)]);
        assert!(outputs[3].is_some());
        assert_eq!(outputs[4], None);
    }

    #[test]
    fn plan_free_step_is_interruptible() {
        let step = NestedPlanStep::new(Maneuver::CatchBall(CatchBallStep::new()));
        assert!(step.can_interrupt());
        assert_eq!(step.situation(), "Catching ball");
    }

    #[test]
    fn midair_strike_is_never_interruptible() {
        let step = NestedPlanStep::new(Maneuver::MidairStrike(MidairStrikeStep::new(0.3)));
        assert!(!step.can_interrupt());
    }
}
