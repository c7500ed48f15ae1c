use kestrel_core::{BallSlice, GameTime, BALL_RADIUS};

use crate::{ground_bounce_energy, MEANINGFUL_BOUNCE_ENERGY};

/// A predicted ball trajectory: slices with strictly increasing times, the
/// first of which is the moment the prediction was made.
#[derive(Debug, Clone, PartialEq)]
pub struct BallPath {
    slices: Vec<BallSlice>,
}

impl BallPath {
    pub fn new(start: BallSlice) -> Self {
        Self {
            slices: vec![start],
        }
    }

    /// Appends a slice. Slices that do not move forward in time are dropped.
    pub fn add_slice(&mut self, slice: BallSlice) {
        if slice.time > self.end_point().time {
            self.slices.push(slice);
        } else {
            log::warn!(
                "Dropping out-of-order ball slice at {:.3} (path ends at {:.3})",
                slice.time,
                self.end_point().time
            );
        }
    }

    pub fn slices(&self) -> &[BallSlice] {
        &self.slices
    }

    pub fn start_point(&self) -> &BallSlice {
        &self.slices[0]
    }

    pub fn end_point(&self) -> &BallSlice {
        &self.slices[self.slices.len() - 1]
    }

    /// The interpolated ball state at `time`, or `None` outside the predicted span.
    pub fn motion_at(&self, time: GameTime) -> Option<BallSlice> {
        let start = self.start_point();
        let end = self.end_point();
        if !time.is_finite() || time < start.time || time > end.time {
            return None;
        }
        if time == end.time {
            return Some(*end);
        }

        // Index of the first slice strictly after `time`; always >= 1 here.
        let next_index = self.slices.partition_point(|slice| slice.time <= time);
        let current = &self.slices[next_index - 1];
        let next = &self.slices[next_index];
        if current.time == time {
            return Some(*current);
        }

        let tween = (time - current.time) / (next.time - current.time);
        Some(BallSlice::new(
            current.space.lerp(&next.space, tween),
            time,
            current.velocity.lerp(&next.velocity, tween),
        ))
    }

    pub fn find_slice(&self, predicate: impl Fn(&BallSlice) -> bool) -> Option<BallSlice> {
        self.slices.iter().find(|slice| predicate(slice)).copied()
    }

    /// The next meaningful bounce off the floor after `after_time`.
    ///
    /// The returned slice is placed at the estimated moment of contact, with
    /// the ball center at resting height and the post-bounce velocity.
    pub fn landing(&self, after_time: GameTime) -> Option<BallSlice> {
        for window in self.slices.windows(2) {
            let (previous, current) = (&window[0], &window[1]);
            if current.time <= after_time {
                continue;
            }
            if previous.velocity.z >= 0.0 || current.velocity.z < 0.0 {
                continue;
            }
            if ground_bounce_energy(previous.space.z, previous.velocity.z) < MEANINGFUL_BOUNCE_ENERGY {
                continue;
            }

            let drop = (previous.space.z - BALL_RADIUS).max(0.0);
            let step = current.time - previous.time;
            let seconds_to_contact = (drop / -previous.velocity.z).clamp(0.0, step);
            let mut space = previous.space + previous.velocity * seconds_to_contact;
            space.z = BALL_RADIUS;
            let time = (previous.time + seconds_to_contact).max(after_time).min(current.time);
            return Some(BallSlice::new(space, time, current.velocity));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kestrel_core::Vector3;

    use super::*;

    fn straight_path() -> BallPath {
        let mut path = BallPath::new(BallSlice::new(
            Vector3::new(0.0, 0.0, 500.0),
            1.0,
            Vector3::new(100.0, 0.0, 0.0),
        ));
        for i in 1..=10 {
            let t = i as f64 * 0.1;
            path.add_slice(BallSlice::new(
                Vector3::new(100.0 * t, 0.0, 500.0),
                1.0 + t,
                Vector3::new(100.0, 0.0, 0.0),
            ));
        }
        path
    }

    #[test]
    fn motion_at_is_exact_at_boundaries() {
        let path = straight_path();
        assert_eq!(path.motion_at(1.0), Some(*path.start_point()));
        assert_eq!(path.motion_at(path.end_point().time), Some(*path.end_point()));
    }

    #[test]
    fn motion_at_outside_span_is_none() {
        let path = straight_path();
        assert!(path.motion_at(0.999).is_none());
        assert!(path.motion_at(path.end_point().time + 0.001).is_none());
    }

    #[test]
    fn motion_at_non_finite_time_is_none() {
        let path = straight_path();
        assert!(path.motion_at(f64::NAN).is_none());
        assert!(path.motion_at(f64::INFINITY).is_none());
        assert!(path.motion_at(f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn motion_at_interpolates() {
        let path = straight_path();
        let slice = path.motion_at(1.25).unwrap();
        assert_relative_eq!(slice.space.x, 25.0, epsilon = 1e-9);
        assert_relative_eq!(slice.time, 1.25);
    }

    #[test]
    fn out_of_order_slices_are_dropped() {
        let mut path = straight_path();
        let len = path.slices().len();
        path.add_slice(BallSlice::new(Vector3::zeros(), 1.5, Vector3::zeros()));
        assert_eq!(path.slices().len(), len);
    }

    #[test]
    fn find_slice_returns_first_match() {
        let path = straight_path();
        let found = path.find_slice(|slice| slice.space.x > 45.0).unwrap();
        assert_relative_eq!(found.space.x, 50.0, epsilon = 1e-9);
        assert!(path.find_slice(|slice| slice.space.z < 0.0).is_none());
    }

    #[test]
    fn landing_finds_contact_moment() {
        let mut path = BallPath::new(BallSlice::new(
            Vector3::new(0.0, 0.0, BALL_RADIUS + 10.0),
            0.0,
            Vector3::new(0.0, 0.0, -1000.0),
        ));
        path.add_slice(BallSlice::new(
            Vector3::new(0.0, 0.0, BALL_RADIUS),
            0.1,
            Vector3::new(0.0, 0.0, 600.0),
        ));
        let landing = path.landing(0.0).unwrap();
        assert_relative_eq!(landing.time, 0.01, epsilon = 1e-9);
        assert_eq!(landing.space.z, BALL_RADIUS);

        assert!(path.landing(0.1).is_none());
    }

    #[test]
    fn gentle_bounces_are_ignored() {
        let mut path = BallPath::new(BallSlice::new(
            Vector3::new(0.0, 0.0, BALL_RADIUS + 1.0),
            0.0,
            Vector3::new(0.0, 0.0, -100.0),
        ));
        path.add_slice(BallSlice::new(
            Vector3::new(0.0, 0.0, BALL_RADIUS),
            0.1,
            Vector3::new(0.0, 0.0, 60.0),
        ));
        assert!(path.landing(0.0).is_none());
    }
}
