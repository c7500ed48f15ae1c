use kestrel_core::{ground_distance, BallSlice};

/// Detects when the predicted contact point drifts away from the one a
/// maneuver committed to.
#[derive(Debug, Clone)]
pub struct InterceptDisruptionMeter {
    distance_threshold: f64,
    reference: Option<BallSlice>,
}

impl InterceptDisruptionMeter {
    pub fn new(distance_threshold: f64) -> Self {
        Self {
            distance_threshold,
            reference: None,
        }
    }

    /// The first slice seen becomes the reference and is never disruptive.
    /// Later slices are disruptive when they land farther than the threshold
    /// from the reference; the reference stays put either way.
    pub fn is_disrupted(&mut self, slice: &BallSlice) -> bool {
        match &self.reference {
            None => {
                self.reference = Some(*slice);
                false
            }
            Some(reference) => {
                let drift = ground_distance(&reference.space, &slice.space);
                if drift > self.distance_threshold {
                    log::debug!("Intercept drifted {:.0} uu from its reference", drift);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Rebases the meter on a new reference slice.
    pub fn reset(&mut self, slice: &BallSlice) {
        self.reference = Some(*slice);
    }

    pub fn reference(&self) -> Option<&BallSlice> {
        self.reference.as_ref()
    }
}
