use kestrel_core::{flatten, CarData, Vector3};
use serde::{Deserialize, Serialize};

use crate::{steer_penalty_seconds, StrikeProfile, SUPERSONIC_SPEED};

/// Cumulative distance covered and speed reached after some elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceTimeSpeed {
    pub distance: f64,
    /// Seconds elapsed since the car snapshot the curve was built from.
    pub time: f64,
    pub speed: f64,
}

impl DistanceTimeSpeed {
    pub fn new(distance: f64, time: f64, speed: f64) -> Self {
        Self {
            distance,
            time,
            speed,
        }
    }
}

/// How far a car can get over time, as a piecewise-linear curve.
///
/// Distance and time never decrease along the curve, and the first point is
/// the car's current state at zero elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistancePlot {
    plot: Vec<DistanceTimeSpeed>,
}

impl DistancePlot {
    pub fn new(start: DistanceTimeSpeed) -> Self {
        Self { plot: vec![start] }
    }

    pub fn add_slice(&mut self, dts: DistanceTimeSpeed) {
        let end = self.end();
        debug_assert!(dts.time >= end.time && dts.distance >= end.distance);
        self.plot.push(dts);
    }

    pub fn slices(&self) -> &[DistanceTimeSpeed] {
        &self.plot
    }

    pub fn start(&self) -> DistanceTimeSpeed {
        self.plot[0]
    }

    pub fn end(&self) -> DistanceTimeSpeed {
        self.plot[self.plot.len() - 1]
    }

    /// Distance and speed after `time` seconds, or `None` outside the curve.
    pub fn state_after_duration(&self, time: f64) -> Option<DistanceTimeSpeed> {
        if time < self.start().time || time > self.end().time {
            return None;
        }

        for pair in self.plot.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if next.time > time {
                let tween = (time - current.time) / (next.time - current.time);
                return Some(DistanceTimeSpeed::new(
                    lerp(current.distance, next.distance, tween),
                    time,
                    lerp(current.speed, next.speed, tween),
                ));
            }
        }

        Some(self.end())
    }

    /// When and how fast the car first covers `distance`, or `None` if it never does.
    pub fn state_after_distance(&self, distance: f64) -> Option<DistanceTimeSpeed> {
        if distance <= self.start().distance {
            return Some(self.start());
        }

        for pair in self.plot.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if next.distance > distance {
                let tween = (distance - current.distance) / (next.distance - current.distance);
                return Some(DistanceTimeSpeed::new(
                    distance,
                    lerp(current.time, next.time, tween),
                    lerp(current.speed, next.speed, tween),
                ));
            }
        }

        let end = self.end();
        if end.distance == distance {
            // Report the first point that reached the end distance.
            return self.plot.iter().find(|dts| dts.distance == distance).copied();
        }
        None
    }

    pub fn travel_time(&self, distance: f64) -> Option<f64> {
        self.state_after_distance(distance).map(|dts| dts.time)
    }

    /// Time and speed on reaching `destination`, including the time spent
    /// turning to face it and the strike profile's delay.
    pub fn motion_upon_arrival(
        &self,
        car: &CarData,
        destination: &Vector3,
        profile: &StrikeProfile,
    ) -> Option<DistanceTimeSpeed> {
        let orient_seconds = steer_penalty_seconds(car, destination) + profile.travel_delay;
        let distance = flatten(&car.position).metric_distance(&flatten(destination));
        self.state_after_distance(distance)
            .map(|dts| DistanceTimeSpeed::new(dts.distance, dts.time + orient_seconds, dts.speed))
    }

    /// How far the car gets toward `target` within `elapsed` seconds.
    ///
    /// Turning to face the target and the profile's travel delay are dead
    /// time. A profile with a terminal burst has the burst spliced onto the
    /// end of the approach; with less accelerating time than the burst lasts,
    /// the whole approach is credited at burst speed.
    pub fn arrival_state(
        &self,
        car: &CarData,
        target: &Vector3,
        elapsed: f64,
        profile: &StrikeProfile,
    ) -> Option<DistanceTimeSpeed> {
        let orient_seconds = steer_penalty_seconds(car, target) + profile.travel_delay;
        let accelerating_seconds = (elapsed - orient_seconds).max(0.0);

        if !profile.has_burst() {
            return self
                .state_after_duration(accelerating_seconds)
                .map(|dts| DistanceTimeSpeed::new(dts.distance, elapsed, dts.speed));
        }

        if accelerating_seconds < profile.dodge_seconds {
            let boosted_speed = (self.start().speed + profile.speed_boost).min(SUPERSONIC_SPEED);
            return Some(DistanceTimeSpeed::new(
                boosted_speed * accelerating_seconds,
                elapsed,
                boosted_speed,
            ));
        }

        self.state_after_duration(accelerating_seconds - profile.dodge_seconds)
            .map(|dts| {
                let boosted_speed = (dts.speed + profile.speed_boost).min(SUPERSONIC_SPEED);
                DistanceTimeSpeed::new(
                    dts.distance + boosted_speed * profile.dodge_seconds,
                    elapsed,
                    boosted_speed,
                )
            })
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}
