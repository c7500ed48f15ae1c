mod air_touch;
mod bot;
mod context;
mod disruption;
mod nested;
mod plan;
pub mod set_pieces;
pub mod steer;
pub mod steps;
mod strike_planner;

pub use air_touch::*;
pub use bot::Bot;
pub use context::TickContext;
pub use disruption::InterceptDisruptionMeter;
pub use nested::{LieuOutcome, Maneuver, NestedPlanBehavior, NestedPlanStep};
pub use plan::{Plan, Step};
pub use strike_planner::plan_immediate_launch;

#[cfg(test)]
mod testing;
