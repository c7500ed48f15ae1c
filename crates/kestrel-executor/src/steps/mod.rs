mod blind;
mod catch_ball;
mod intercept;
mod land_gracefully;
mod midair_strike;
pub mod orientation;
mod tap;

pub use blind::BlindStep;
pub use catch_ball::CatchBallStep;
pub use intercept::{InterceptModifier, InterceptPredicate, InterceptStep};
pub use land_gracefully::LandGracefullyStep;
pub use midair_strike::MidairStrikeStep;
pub use tap::TapStep;
