use kestrel_core::{BallSlice, Vector3, BALL_RADIUS, GRAVITY};

/// Bounce energy (per unit mass) above which a bounce is worth reacting to.
pub const MEANINGFUL_BOUNCE_ENERGY: f64 = 125_000.0;

const AIR_DRAG: f64 = 0.03;
const RESTITUTION: f64 = 0.6;
const BOUNCE_FRICTION: f64 = 0.9;
/// Rebounds slower than this settle into a roll.
const SETTLE_SPEED: f64 = 25.0;
const MAX_BALL_SPEED: f64 = 6000.0;

/// Advances the ball by one time step.
///
/// Implementations must be deterministic: the same slice and step always
/// produce the same result.
pub trait BallPhysics {
    fn step(&self, slice: &BallSlice, dt: f64) -> BallSlice;
}

/// Energy available for the next bounce, counting height above the resting
/// position and vertical speed.
pub fn ground_bounce_energy(height: f64, vertical_velocity: f64) -> f64 {
    let potential = (height - BALL_RADIUS) * -GRAVITY;
    let kinetic = 0.5 * vertical_velocity * vertical_velocity;
    potential + kinetic
}

/// Ballistic flight over a flat floor with drag and lossy bounces. Walls and
/// the ceiling are not modeled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleBallPhysics;

impl BallPhysics for SimpleBallPhysics {
    fn step(&self, slice: &BallSlice, dt: f64) -> BallSlice {
        let mut velocity = slice.velocity;
        let resting = slice.space.z <= BALL_RADIUS && velocity.z == 0.0;
        if !resting {
            velocity.z += GRAVITY * dt;
        }
        velocity *= 1.0 - AIR_DRAG * dt;
        if velocity.norm() > MAX_BALL_SPEED {
            velocity = velocity.normalize() * MAX_BALL_SPEED;
        }

        let mut space = slice.space + velocity * dt;
        if space.z < BALL_RADIUS {
            space.z = BALL_RADIUS;
            if velocity.z < 0.0 {
                let rebound = -velocity.z * RESTITUTION;
                velocity = Vector3::new(
                    velocity.x * BOUNCE_FRICTION,
                    velocity.y * BOUNCE_FRICTION,
                    if rebound < SETTLE_SPEED { 0.0 } else { rebound },
                );
            }
        }

        BallSlice::new(space, slice.time + dt, velocity)
    }
}
