use serde::{Deserialize, Serialize};

use crate::{flatten, GameTime, Vector2, Vector3, GOAL_LINE_Y};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Blue,
    Orange,
}

impl Team {
    /// Sign of the y coordinate of this team's own goal.
    pub fn own_goal_direction(&self) -> f64 {
        match self {
            Team::Blue => -1.0,
            Team::Orange => 1.0,
        }
    }

    pub fn own_goal_center(&self) -> Vector3 {
        Vector3::new(0.0, GOAL_LINE_Y * self.own_goal_direction(), crate::GOAL_CENTER_HEIGHT)
    }

    pub fn enemy_goal_center(&self) -> Vector3 {
        Vector3::new(0.0, -GOAL_LINE_Y * self.own_goal_direction(), crate::GOAL_CENTER_HEIGHT)
    }
}

/// Orthonormal body axes of a car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarOrientation {
    pub nose: Vector3,
    pub roof: Vector3,
    pub right: Vector3,
}

impl CarOrientation {
    /// Builds the basis from the nose and roof axes; `right` is `nose x roof`.
    pub fn new(nose: Vector3, roof: Vector3) -> Self {
        Self {
            nose,
            roof,
            right: nose.cross(&roof),
        }
    }

    /// Wheels down on flat ground, nose pointing at `heading` radians from +x.
    pub fn level(heading: f64) -> Self {
        Self::new(
            Vector3::new(heading.cos(), heading.sin(), 0.0),
            Vector3::z(),
        )
    }
}

impl Default for CarOrientation {
    fn default() -> Self {
        Self::level(0.0)
    }
}

/// Angular velocity about the car's own axes, in rad/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarSpin {
    pub pitch_rate: f64,
    pub yaw_rate: f64,
    pub roll_rate: f64,
}

/// Snapshot of one car for a single tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarData {
    pub position: Vector3,
    pub velocity: Vector3,
    pub orientation: CarOrientation,
    pub spin: CarSpin,
    pub boost: f64,
    pub is_supersonic: bool,
    pub has_wheel_contact: bool,
    pub team: Team,
    pub player_index: usize,
    pub time: GameTime,
    pub frame_count: u64,
}

impl CarData {
    /// A stationary car resting on the ground.
    pub fn parked(position: Vector3, heading: f64, team: Team) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            orientation: CarOrientation::level(heading),
            spin: CarSpin::default(),
            boost: 33.0,
            is_supersonic: false,
            has_wheel_contact: true,
            team,
            player_index: 0,
            time: 0.0,
            frame_count: 0,
        }
    }

    pub fn flat_position(&self) -> Vector2 {
        flatten(&self.position)
    }

    /// Speed along the nose axis; negative when reversing.
    pub fn forward_speed(&self) -> f64 {
        self.velocity.dot(&self.orientation.nose)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}
