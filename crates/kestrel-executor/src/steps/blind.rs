use kestrel_core::{ControlOutput, GameTime};

use crate::TickContext;

#[derive(Debug, Clone, Copy)]
enum BlindState {
    Unscheduled,
    EndsAt(GameTime),
}

/// Holds a fixed output for a fixed duration, starting on its first tick.
#[derive(Debug, Clone)]
pub struct BlindStep {
    seconds: f64,
    output: ControlOutput,
    state: BlindState,
}

impl BlindStep {
    pub fn new(seconds: f64, output: ControlOutput) -> Self {
        Self {
            seconds,
            output,
            state: BlindState::Unscheduled,
        }
    }

    pub fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let ends_at = match self.state {
            BlindState::EndsAt(ends_at) => ends_at,
            BlindState::Unscheduled => {
                let ends_at = ctx.time() + self.seconds;
                self.state = BlindState::EndsAt(ends_at);
                ends_at
            }
        };

        if ctx.time() > ends_at {
            return None;
        }
        Some(self.output)
    }
}
