use serde::{Deserialize, Serialize};

use crate::jump_time_to_height;

/// Ball heights above this need the car to leave the ground with boost.
pub const NEEDS_AERIAL_THRESHOLD: f64 = 300.0;
/// Ball heights above this are out of reach for a flip from the ground.
pub const NEEDS_JUMP_HIT_THRESHOLD: f64 = 170.0;
/// Boost an aerial is expected to consume.
pub const BOOST_NEEDED_FOR_AERIAL: f64 = 20.0;

/// Extra speed a front flip adds, in uu/s.
pub const FLIP_SPEED_BOOST: f64 = 500.0;
/// Time from pressing jump to the flip's speed burst, in seconds.
pub const FLIP_DODGE_SECONDS: f64 = 0.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeStyle {
    /// Drive straight through the ball.
    #[default]
    Ram,
    JumpHit,
    FlipHit,
    Aerial,
}

/// How the car finishes its approach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeProfile {
    /// Seconds spent in the air before contact.
    pub hang_time: f64,
    /// Seconds of the approach that do not count toward covering distance.
    pub travel_delay: f64,
    /// Speed added by the terminal burst.
    pub speed_boost: f64,
    /// Length of the terminal burst in seconds.
    pub dodge_seconds: f64,
    pub style: StrikeStyle,
}

impl StrikeProfile {
    pub fn new(
        hang_time: f64,
        travel_delay: f64,
        speed_boost: f64,
        dodge_seconds: f64,
        style: StrikeStyle,
    ) -> Self {
        Self {
            hang_time,
            travel_delay,
            speed_boost,
            dodge_seconds,
            style,
        }
    }

    pub fn aerial() -> Self {
        Self::new(0.0, 0.2, 0.0, 0.0, StrikeStyle::Aerial)
    }

    /// Short aerial finished by an air dodge into the ball.
    pub fn quick_aerial() -> Self {
        Self::new(0.0, 0.0, FLIP_SPEED_BOOST, 0.15, StrikeStyle::Aerial)
    }

    pub fn flip_hit() -> Self {
        Self::new(0.0, 0.0, FLIP_SPEED_BOOST, FLIP_DODGE_SECONDS, StrikeStyle::FlipHit)
    }

    pub fn jump_hit(height: f64) -> Self {
        let hang_time = jump_time_to_height(height);
        Self::new(hang_time, hang_time, 0.0, 0.0, StrikeStyle::JumpHit)
    }

    pub fn has_burst(&self) -> bool {
        self.dodge_seconds > 0.0 && self.speed_boost > 0.0
    }
}

/// Picks the strike style suited to a contact point at the given height.
pub fn strike_profile_for_height(height: f64) -> StrikeProfile {
    if height > NEEDS_AERIAL_THRESHOLD {
        StrikeProfile::aerial()
    } else if height > NEEDS_JUMP_HIT_THRESHOLD {
        StrikeProfile::jump_hit(height)
    } else {
        StrikeProfile::flip_hit()
    }
}

/// Boost reserved for reaching a contact point at the given height.
pub fn boost_needed_for_height(height: f64) -> f64 {
    if height > NEEDS_AERIAL_THRESHOLD {
        BOOST_NEEDED_FOR_AERIAL
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_follows_height() {
        assert_eq!(strike_profile_for_height(93.0).style, StrikeStyle::FlipHit);
        assert_eq!(strike_profile_for_height(250.0).style, StrikeStyle::JumpHit);
        assert_eq!(strike_profile_for_height(800.0).style, StrikeStyle::Aerial);
        assert!(strike_profile_for_height(250.0).hang_time > 0.0);
    }

    #[test]
    fn aerial_boost_is_a_step_function() {
        assert_eq!(boost_needed_for_height(NEEDS_AERIAL_THRESHOLD), 0.0);
        assert_eq!(
            boost_needed_for_height(NEEDS_AERIAL_THRESHOLD + 1.0),
            BOOST_NEEDED_FOR_AERIAL
        );
    }
}
