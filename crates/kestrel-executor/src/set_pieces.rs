//! Canned plans for launches and flips.

use kestrel_core::ControlOutput;

use crate::{
    steps::{BlindStep, LandGracefullyStep, MidairStrikeStep, TapStep},
    Maneuver, NestedPlanStep, Plan,
};

/// Pause between releasing jump and pressing it again for a second jump or dodge.
const JUMP_RELEASE_SECONDS: f64 = 0.05;

/// Jump while pitching back, then fly the rest of the way.
pub fn aerial(tilt_back_seconds: f64) -> Plan {
    Plan::new()
        .with_step(BlindStep::new(
            tilt_back_seconds,
            ControlOutput::new().with_jump(true).with_pitch(1.0),
        ))
        .with_step(midair_strike(tilt_back_seconds))
        .with_step(LandGracefullyStep::facing_ball())
}

/// Like [`aerial`] but with a second jump for more height early on.
pub fn double_jump_aerial(tilt_back_seconds: f64) -> Plan {
    let first_jump_seconds = 0.2;
    Plan::new()
        .with_step(BlindStep::new(first_jump_seconds, ControlOutput::new().with_jump(true)))
        .with_step(BlindStep::new(JUMP_RELEASE_SECONDS, ControlOutput::new()))
        .with_step(TapStep::new(2, ControlOutput::new().with_jump(true)))
        .with_step(BlindStep::new(
            tilt_back_seconds,
            ControlOutput::new().with_jump(true).with_pitch(1.0).with_boost(true),
        ))
        .with_step(midair_strike(first_jump_seconds + JUMP_RELEASE_SECONDS + tilt_back_seconds))
        .with_step(LandGracefullyStep::facing_ball())
}

/// Hold jump for the hang time, then come down level.
pub fn jump_hit(hang_time: f64) -> Plan {
    Plan::new()
        .with_step(BlindStep::new(hang_time, ControlOutput::new().with_jump(true)))
        .with_step(BlindStep::new(JUMP_RELEASE_SECONDS, ControlOutput::new()))
        .with_step(LandGracefullyStep::facing_ball())
}

pub fn front_flip() -> Plan {
    Plan::new()
        .with_step(BlindStep::new(0.05, ControlOutput::new().with_jump(true).with_throttle(1.0)))
        .with_step(BlindStep::new(JUMP_RELEASE_SECONDS, ControlOutput::new().with_throttle(1.0)))
        .with_step(BlindStep::new(
            0.2,
            ControlOutput::new().with_jump(true).with_pitch(-1.0).with_throttle(1.0),
        ))
        .with_step(BlindStep::new(0.8, ControlOutput::new().with_throttle(1.0)))
        .with_step(LandGracefullyStep::new())
}

/// Back flip cancelled halfway and rolled upright, to turn around quickly.
pub fn half_flip() -> Plan {
    Plan::new()
        .with_step(BlindStep::new(0.1, ControlOutput::new().with_jump(true).with_throttle(-1.0)))
        .with_step(BlindStep::new(JUMP_RELEASE_SECONDS, ControlOutput::new().with_throttle(-1.0)))
        .with_step(BlindStep::new(
            0.05,
            ControlOutput::new().with_jump(true).with_pitch(1.0).with_throttle(-1.0),
        ))
        .with_step(BlindStep::new(0.15, ControlOutput::new().with_pitch(1.0)))
        .with_step(BlindStep::new(
            0.4,
            ControlOutput::new().with_pitch(-1.0).with_roll(1.0).with_throttle(1.0).with_boost(true),
        ))
        .with_step(LandGracefullyStep::new())
}

fn midair_strike(time_in_air_at_start: f64) -> NestedPlanStep {
    NestedPlanStep::new(Maneuver::MidairStrike(MidairStrikeStep::new(time_in_air_at_start)))
}
