use anyhow::Result;
use clap::Args;
use kestrel_core::{BallSlice, BotSettings, CarData, SpaceTime, Team, Vector3};
use kestrel_executor::steer::catch_opportunity;
use kestrel_world::{
    filtered_intercept_opportunity, simulate_acceleration, strike_profile_for_height, BallPredictor, SimpleBallPhysics,
    StrikeStyle,
};
use serde::Serialize;

use crate::parse_vector;

#[derive(Debug, Args)]
pub(crate) struct PlanArgs {
    /// Ball position as `x,y,z`.
    #[clap(long, value_parser = parse_vector, default_value = "1500,2500,92.75")]
    ball_position: Vector3,

    /// Ball velocity as `x,y,z`.
    #[clap(long, value_parser = parse_vector, default_value = "0,-500,0")]
    ball_velocity: Vector3,

    /// Car position as `x,y,z`.
    #[clap(long, value_parser = parse_vector, default_value = "0,0,17")]
    car_position: Vector3,

    /// Car heading in radians from the +x axis.
    #[clap(long, default_value = "1.5708")]
    car_heading: f64,

    #[clap(long, default_value = "33")]
    boost: f64,
}

#[derive(Debug, Serialize)]
struct PlanReport {
    intercept: Option<InterceptReport>,
    catch: Option<SpaceTime>,
}

#[derive(Debug, Serialize)]
struct InterceptReport {
    time: f64,
    space: Vector3,
    style: StrikeStyle,
    spare_time: f64,
    air_boost: f64,
}

pub(crate) fn run(settings: &BotSettings, args: &PlanArgs) -> Result<()> {
    let mut car = CarData::parked(args.car_position, args.car_heading, Team::Blue);
    car.boost = args.boost;

    let ball = BallSlice::new(args.ball_position, 0.0, args.ball_velocity);
    let predictor = BallPredictor::new(Box::new(SimpleBallPhysics), settings.prediction.clone());
    let path = predictor.predict(&ball);
    tracing::debug!("Predicted {} ball slices", path.slices().len());

    let horizon = settings.reachability.horizon_secs;
    let plot = simulate_acceleration(&car, horizon, car.boost, 0.0);
    let intercept = filtered_intercept_opportunity(
        &car,
        &path,
        &plot,
        Vector3::zeros(),
        |_, _| true,
        |space| strike_profile_for_height(space.z),
        &Vector3::z(),
    );
    if intercept.is_none() {
        tracing::info!("No intercept within {:.1} s", horizon);
    }

    let report = PlanReport {
        intercept: intercept.map(|intercept| InterceptReport {
            time: intercept.time,
            space: intercept.space,
            style: intercept.strike_profile.style,
            spare_time: intercept.spare_time,
            air_boost: intercept.air_boost,
        }),
        catch: catch_opportunity(&car, &path, settings.maneuver.catch_boost_budget, horizon),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
