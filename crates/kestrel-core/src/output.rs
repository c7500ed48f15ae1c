use serde::{Deserialize, Serialize};

/// A control command for one car. Every axis is in [-1, 1] and every field
/// defaults to neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlOutput {
    pub throttle: f64,
    pub steer: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub jump: bool,
    pub boost: bool,
    pub handbrake: bool,
}

impl ControlOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throttle(mut self, throttle: f64) -> Self {
        self.throttle = clamp_axis(throttle);
        self
    }

    pub fn with_steer(mut self, steer: f64) -> Self {
        self.steer = clamp_axis(steer);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = clamp_axis(pitch);
        self
    }

    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.yaw = clamp_axis(yaw);
        self
    }

    pub fn with_roll(mut self, roll: f64) -> Self {
        self.roll = clamp_axis(roll);
        self
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    pub fn with_boost(mut self, boost: bool) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_handbrake(mut self, handbrake: bool) -> Self {
        self.handbrake = handbrake;
        self
    }

    /// Copies the rotation axes of `other` that are set, leaving the rest untouched.
    pub fn with_rotation_from(self, other: &ControlOutput) -> Self {
        let mut merged = self;
        if other.pitch != 0.0 {
            merged.pitch = other.pitch;
        }
        if other.yaw != 0.0 {
            merged.yaw = other.yaw;
        }
        if other.roll != 0.0 {
            merged.roll = other.roll;
        }
        merged
    }
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
