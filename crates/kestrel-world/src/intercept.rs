use kestrel_core::{flat_distance, BallSlice, CarData, GameTime, SpaceTime, Vector3};

use crate::{
    boost_needed_for_height, desired_z_component, simulate_acceleration, simulate_air_acceleration,
    BallPath, DistancePlot, StrikeProfile,
};

/// Longest time after leaving the ground that a car can still dodge.
pub const MAX_TIME_FOR_AIR_DODGE: f64 = 1.4;

/// A point where the car can meet the ball.
#[derive(Debug, Clone, PartialEq)]
pub struct Intercept {
    /// Where the car should be, including any offset from the ball.
    pub space: Vector3,
    pub time: GameTime,
    /// Boost to reserve for reaching the contact height.
    pub air_boost: f64,
    pub strike_profile: StrikeProfile,
    /// The reachability curve that proved this intercept feasible.
    pub distance_plot: DistancePlot,
    /// Seconds between the first reachable moment and this one.
    pub spare_time: f64,
    /// The ball state at the intercept, without the offset.
    pub ball_slice: BallSlice,
}

impl Intercept {
    pub fn to_space_time(&self) -> SpaceTime {
        SpaceTime::new(self.space, self.time)
    }
}

/// The first reachable moment on the ball path, driving on the ground.
pub fn intercept_opportunity(car: &CarData, ball_path: &BallPath, plot: &DistancePlot) -> Option<Intercept> {
    filtered_intercept_opportunity(
        car,
        ball_path,
        plot,
        Vector3::zeros(),
        |_, _| true,
        |_| StrikeProfile::default(),
        &Vector3::z(),
    )
}

/// Like [`intercept_opportunity`], simulating full acceleration with the given boost budget.
pub fn intercept_opportunity_assuming_max_accel(
    car: &CarData,
    ball_path: &BallPath,
    boost_budget: f64,
    horizon_secs: f64,
) -> Option<Intercept> {
    let plot = simulate_acceleration(car, horizon_secs, boost_budget, 0.0);
    intercept_opportunity(car, ball_path, &plot)
}

/// Scans the ball path for the earliest slice that the car can reach and that
/// satisfies `predicate`.
///
/// * `intercept_modifier` is added to every ball position, for aiming at a
///   point next to the ball instead of its center.
/// * `strike_profile_fn` picks how the car finishes its approach to a position.
/// * `plane_normal` is the normal of the surface the car drives on; distances
///   are measured along that surface.
///
/// The chosen slice is refined by interpolating toward the previous slice
/// according to how much of the range deficiency was closed between them.
/// Returns `None` when no slice qualifies, or when a slice falls outside the
/// reachability curve before one does.
pub fn filtered_intercept_opportunity(
    car: &CarData,
    ball_path: &BallPath,
    plot: &DistancePlot,
    intercept_modifier: Vector3,
    predicate: impl Fn(&CarData, &SpaceTime) -> bool,
    strike_profile_fn: impl Fn(&Vector3) -> StrikeProfile,
    plane_normal: &Vector3,
) -> Option<Intercept> {
    let mut first_moment_in_range: Option<GameTime> = None;
    let mut previous_deficiency: Option<f64> = None;

    for (index, slice) in ball_path.slices().iter().enumerate() {
        let candidate = SpaceTime::new(slice.space + intercept_modifier, slice.time);
        let strike_profile = strike_profile_fn(&candidate.space);
        let dts = plot.arrival_state(car, &candidate.space, candidate.time - car.time, &strike_profile)?;

        let intercept_distance = flat_distance(&car.position, &candidate.space, plane_normal);
        let deficiency = intercept_distance - dts.distance;
        if deficiency <= 0.0 {
            let first_moment = *first_moment_in_range.get_or_insert(candidate.time);
            if predicate(car, &candidate) {
                let tweened = tweened_slice(ball_path, index, deficiency, previous_deficiency);
                return Some(Intercept {
                    space: tweened.space + intercept_modifier,
                    time: tweened.time,
                    air_boost: boost_needed_for_height(candidate.space.z),
                    strike_profile,
                    distance_plot: plot.clone(),
                    spare_time: (tweened.time - first_moment).max(0.0),
                    ball_slice: tweened,
                });
            }
        }
        previous_deficiency = Some(deficiency);
    }

    None
}

/// Estimates the moment between slice `index - 1` and slice `index` where the
/// range deficiency reached zero.
///
/// Falls back to the slice itself when there is no earlier slice, when the
/// earlier slice was already in range, or when the deficiency did not drop.
fn tweened_slice(
    ball_path: &BallPath,
    index: usize,
    deficiency: f64,
    previous_deficiency: Option<f64>,
) -> BallSlice {
    let slices = ball_path.slices();
    let current = slices[index];
    let previous = match (index.checked_sub(1), previous_deficiency) {
        (Some(previous_index), Some(previous_deficiency)) => (slices[previous_index], previous_deficiency),
        _ => return current,
    };
    let (previous_slice, previous_deficiency) = previous;

    let drop = previous_deficiency - deficiency;
    if previous_deficiency <= 0.0 || drop <= f64::EPSILON {
        return current;
    }

    let ratio = (previous_deficiency / drop).clamp(0.0, 1.0);
    let moment = previous_slice.time + (current.time - previous_slice.time) * ratio;
    ball_path.motion_at(moment).unwrap_or(current)
}

/// Earliest slice an airborne car can reach by boosting, given when it left the ground.
pub fn aerial_intercept(
    car: &CarData,
    ball_path: &BallPath,
    intercept_modifier: Vector3,
    launch_moment: GameTime,
) -> Option<Intercept> {
    let time_since_launch = car.time - launch_moment;
    let current_nose_angle = car.orientation.nose.z.clamp(-1.0, 1.0).asin();

    for slice in ball_path.slices() {
        let duration = slice.time - car.time;
        if duration <= 1e-3 {
            continue;
        }
        let target = slice.space + intercept_modifier;

        let z_component = desired_z_component(target.z, duration, time_since_launch, car);
        let desired_nose_angle = z_component.asin();
        let current_angle_factor = (1.0 / duration).min(1.0);
        let average_nose_angle = current_nose_angle * current_angle_factor
            + desired_nose_angle * (1.0 - current_angle_factor);

        let plot = simulate_air_acceleration(car, duration, average_nose_angle.cos());
        let strike_profile = if duration < MAX_TIME_FOR_AIR_DODGE && average_nose_angle < 0.5 {
            StrikeProfile::quick_aerial()
        } else {
            StrikeProfile::aerial()
        };

        let dts = plot.arrival_state(car, &target, duration, &strike_profile)?;
        if dts.distance > flat_distance(&car.position, &target, &Vector3::z()) {
            return Some(Intercept {
                space: target,
                time: slice.time,
                air_boost: 0.0,
                strike_profile,
                distance_plot: plot,
                spare_time: 0.0,
                ball_slice: *slice,
            });
        }
    }
    None
}
