use kestrel_core::{AgentInput, BotSettings, CarData, GameTime};
use kestrel_world::BallPath;

/// Read-only view of one tick, borrowed by every step that runs during it.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub input: &'a AgentInput,
    pub ball_path: &'a BallPath,
    pub settings: &'a BotSettings,
}

impl<'a> TickContext<'a> {
    pub fn new(input: &'a AgentInput, ball_path: &'a BallPath, settings: &'a BotSettings) -> Self {
        Self {
            input,
            ball_path,
            settings,
        }
    }

    pub fn car(&self) -> &'a CarData {
        &self.input.car
    }

    pub fn time(&self) -> GameTime {
        self.input.time
    }
}
