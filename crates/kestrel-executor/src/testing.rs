use kestrel_core::{AgentInput, BallSlice, CarData, Team, Vector3, BALL_RADIUS};

/// A parked car at the origin facing +x and a resting ball, at the given frame.
pub fn input_at_frame(frame: u64) -> AgentInput {
    let time = frame as f64 / 120.0;
    let mut car = CarData::parked(Vector3::new(0.0, 0.0, 17.0), 0.0, Team::Blue);
    car.frame_count = frame;
    car.time = time;
    AgentInput {
        car,
        ball: BallSlice::new(Vector3::new(0.0, 2000.0, BALL_RADIUS), time, Vector3::zeros()),
        time,
        latest_ball_touch: None,
    }
}

/// Same as [`input_at_frame`] with the car in the air.
pub fn airborne_input_at_frame(frame: u64) -> AgentInput {
    let mut input = input_at_frame(frame);
    input.car.position.z = 400.0;
    input.car.has_wheel_contact = false;
    input
}
