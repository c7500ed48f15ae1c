use kestrel_core::ControlOutput;

use crate::TickContext;

#[derive(Debug, Clone, Copy)]
enum TapState {
    Pending,
    StartedAt(u64),
}

/// Holds a fixed output for a number of frames.
#[derive(Debug, Clone)]
pub struct TapStep {
    frames: u64,
    output: ControlOutput,
    state: TapState,
}

impl TapStep {
    pub fn new(frames: u64, output: ControlOutput) -> Self {
        Self {
            frames,
            output,
            state: TapState::Pending,
        }
    }

    pub fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let frame = ctx.car().frame_count;
        let started_at = match self.state {
            TapState::StartedAt(start) => start,
            TapState::Pending => {
                self.state = TapState::StartedAt(frame);
                frame
            }
        };

        if frame.saturating_sub(started_at) >= self.frames {
            return None;
        }
        Some(self.output)
    }
}
