use kestrel_core::{flatten, lift, ControlOutput, Vector3};

use super::orientation::{pitch_to_plane, roll_to_plane, yaw_to_plane};
use crate::TickContext;

/// Levels the car out until its wheels touch down.
#[derive(Debug, Clone, Default)]
pub struct LandGracefullyStep {
    face_ball: bool,
}

impl LandGracefullyStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also yaws toward the ball while falling.
    pub fn facing_ball() -> Self {
        Self { face_ball: true }
    }

    pub fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let car = ctx.car();
        if car.has_wheel_contact {
            return None;
        }

        let up = Vector3::z();
        let mut output = ControlOutput::new().with_throttle(1.0);
        if let Some(pitch) = pitch_to_plane(car, &up) {
            output = output.with_rotation_from(&pitch);
        }
        if let Some(roll) = roll_to_plane(car, &up) {
            output = output.with_rotation_from(&roll);
        }
        if self.face_ball {
            let to_ball = lift(&flatten(&(ctx.input.ball.space - car.position)));
            let yaw = up
                .cross(&to_ball)
                .try_normalize(1e-6)
                .and_then(|normal| yaw_to_plane(car, &normal));
            if let Some(yaw) = yaw {
                output = output.with_rotation_from(&yaw);
            }
        }
        Some(output)
    }
}
