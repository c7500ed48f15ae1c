mod angle;
mod ball;
mod car;
mod debug_info;
mod geom;
mod input;
mod output;
mod settings;

pub use angle::*;
pub use ball::*;
pub use car::*;
pub use debug_info::*;
pub use geom::*;
pub use input::*;
pub use output::*;
pub use settings::*;

pub type Scalar = f64;
pub type Vector2 = nalgebra::Vector2<Scalar>;
pub type Vector3 = nalgebra::Vector3<Scalar>;

/// Game time in seconds since the start of the match.
pub type GameTime = f64;

/// Radius of the ball in unreal units.
pub const BALL_RADIUS: f64 = 92.75;

/// Vertical acceleration due to gravity in uu/s².
pub const GRAVITY: f64 = -650.0;

/// Distance from the field center to each goal line along y.
pub const GOAL_LINE_Y: f64 = 5120.0;

/// Height of the center of each goal mouth.
pub const GOAL_CENTER_HEIGHT: f64 = 321.0;
