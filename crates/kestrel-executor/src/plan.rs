use kestrel_core::{ControlOutput, DebugCanvas};

use crate::{
    steps::{BlindStep, LandGracefullyStep, TapStep},
    NestedPlanStep, TickContext,
};

/// A single short-lived control behavior.
#[derive(Debug)]
pub enum Step {
    Blind(BlindStep),
    Tap(TapStep),
    LandGracefully(LandGracefullyStep),
    /// A step that runs its own plan of sub-steps.
    Nested(Box<NestedPlanStep>),
}

impl Step {
    /// Produces this tick's output, or `None` once the step is finished.
    pub fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        match self {
            Step::Blind(step) => step.tick(ctx),
            Step::Tap(step) => step.tick(ctx),
            Step::LandGracefully(step) => step.tick(ctx),
            Step::Nested(step) => step.tick(ctx),
        }
    }

    /// Whether dropping the step right now leaves the car in a safe state.
    pub fn can_interrupt(&self) -> bool {
        match self {
            Step::Blind(_) | Step::Tap(_) => false,
            Step::LandGracefully(_) => true,
            Step::Nested(step) => step.can_interrupt(),
        }
    }

    pub fn situation(&self) -> String {
        match self {
            Step::Blind(_) => "Muscle memory".to_string(),
            Step::Tap(_) => "Tapping".to_string(),
            Step::LandGracefully(_) => "Landing gracefully".to_string(),
            Step::Nested(step) => step.situation(),
        }
    }

    pub fn draw_debug(&self, canvas: &mut DebugCanvas) {
        if let Step::Nested(step) = self {
            step.draw_debug(canvas);
        }
    }
}

impl From<BlindStep> for Step {
    fn from(step: BlindStep) -> Self {
        Step::Blind(step)
    }
}

impl From<TapStep> for Step {
    fn from(step: TapStep) -> Self {
        Step::Tap(step)
    }
}

impl From<LandGracefullyStep> for Step {
    fn from(step: LandGracefullyStep) -> Self {
        Step::LandGracefully(step)
    }
}

impl From<NestedPlanStep> for Step {
    fn from(step: NestedPlanStep) -> Self {
        Step::Nested(Box::new(step))
    }
}

/// An ordered list of steps with a cursor on the current one.
#[derive(Debug, Default)]
pub struct Plan {
    steps: Vec<Step>,
    cursor: usize,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Runs the current step, moving on to later steps within the same tick
    /// as earlier ones finish. Returns `None` once every step is done.
    pub fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        while let Some(step) = self.steps.get_mut(self.cursor) {
            if let Some(output) = step.tick(ctx) {
                return Some(output);
            }
            log::debug!("Step finished: {}", step.situation());
            self.cursor += 1;
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.cursor)
    }

    pub fn can_interrupt(&self) -> bool {
        self.current_step().map_or(true, Step::can_interrupt)
    }

    pub fn situation(&self) -> String {
        self.current_step()
            .map_or_else(|| "Plan complete".to_string(), Step::situation)
    }

    pub fn draw_debug(&self, canvas: &mut DebugCanvas) {
        if let Some(step) = self.current_step() {
            step.draw_debug(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::BotSettings;
    use kestrel_world::BallPath;

    use super::*;
    use crate::testing::input_at_frame;

    #[test_log::test]
    fn steps_run_in_order_and_plan_completes() {
        let first = ControlOutput::new().with_throttle(1.0);
        let second = ControlOutput::new().with_throttle(-1.0);
        let mut plan = Plan::new()
            .with_step(TapStep::new(2, first))
            .with_step(TapStep::new(0, second));

        let settings = BotSettings::default();
        let mut outputs = Vec::new();
        for frame in 0..4 {
            let input = input_at_frame(frame);
            let path = BallPath::new(input.ball);
            let ctx = TickContext::new(&input, &path, &settings);
            outputs.push(plan.tick(&ctx));
        }

        assert_eq!(outputs, vec![Some(first), Some(first), None, None]);
        assert!(plan.is_complete());
        assert!(plan.can_interrupt());
    }

    #[test]
    fn blind_steps_block_interruption() {
        let plan = Plan::new().with_step(BlindStep::new(0.5, ControlOutput::new().with_jump(true)));
        assert!(!plan.can_interrupt());
        assert_eq!(plan.situation(), "Muscle memory");
        assert!(Plan::new().can_interrupt());
    }
}
