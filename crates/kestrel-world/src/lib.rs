mod acceleration;
mod aerial_math;
mod ball_path;
mod ball_physics;
mod distance_plot;
mod intercept;
mod predictor;
mod strike_profile;
mod warehouse;

pub use acceleration::*;
pub use aerial_math::*;
pub use ball_path::*;
pub use ball_physics::*;
pub use distance_plot::*;
pub use intercept::*;
pub use predictor::*;
pub use strike_profile::*;
pub use warehouse::*;
