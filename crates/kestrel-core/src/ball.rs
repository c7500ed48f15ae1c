use serde::{Deserialize, Serialize};

use crate::{GameTime, Vector3};

/// A point in space at a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceTime {
    pub space: Vector3,
    pub time: GameTime,
}

impl SpaceTime {
    pub fn new(space: Vector3, time: GameTime) -> Self {
        Self { space, time }
    }
}

/// One sample of ball motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSlice {
    pub space: Vector3,
    pub time: GameTime,
    pub velocity: Vector3,
}

impl BallSlice {
    pub fn new(space: Vector3, time: GameTime, velocity: Vector3) -> Self {
        Self {
            space,
            time,
            velocity,
        }
    }

    pub fn to_space_time(&self) -> SpaceTime {
        SpaceTime::new(self.space, self.time)
    }
}

/// The most recent contact between a car and the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallTouch {
    pub player_index: usize,
    pub time: GameTime,
    pub position: Vector3,
}
