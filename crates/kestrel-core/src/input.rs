use serde::{Deserialize, Serialize};

use crate::{BallSlice, BallTouch, CarData, GameTime, Team};

/// Everything the host hands over for one controlled car on one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInput {
    pub car: CarData,
    pub ball: BallSlice,
    pub time: GameTime,
    pub latest_ball_touch: Option<BallTouch>,
}

impl AgentInput {
    pub fn team(&self) -> Team {
        self.car.team
    }

    pub fn player_index(&self) -> usize {
        self.car.player_index
    }
}
