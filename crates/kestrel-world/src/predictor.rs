use kestrel_core::{BallSlice, PredictionSettings};

use crate::{BallPath, BallPhysics, SimpleBallPhysics};

/// Rolls the ball forward with a host-supplied physics step.
///
/// Every call to [`BallPredictor::predict`] starts from scratch, so two calls
/// with the same starting slice always agree.
pub struct BallPredictor {
    physics: Box<dyn BallPhysics>,
    settings: PredictionSettings,
}

impl BallPredictor {
    pub fn new(physics: Box<dyn BallPhysics>, settings: PredictionSettings) -> Self {
        Self { physics, settings }
    }

    pub fn settings(&self) -> &PredictionSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: PredictionSettings) {
        self.settings = settings;
    }

    pub fn predict(&self, start: &BallSlice) -> BallPath {
        let step = self.settings.step_secs.max(1e-3);
        let steps = (self.settings.horizon_secs / step - 1e-6).ceil().max(1.0) as usize;

        let mut path = BallPath::new(*start);
        let mut current = *start;
        for i in 1..=steps {
            let mut next = self.physics.step(&current, step);
            // Anchor times to the start so rounding does not accumulate.
            next.time = start.time + i as f64 * step;
            path.add_slice(next);
            current = next;
        }
        path
    }
}

impl Default for BallPredictor {
    fn default() -> Self {
        Self::new(Box::new(SimpleBallPhysics), PredictionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kestrel_core::Vector3;

    use super::*;

    #[test]
    fn covers_horizon_with_increasing_times() {
        let predictor = BallPredictor::default();
        let start = BallSlice::new(Vector3::new(0.0, 0.0, 800.0), 12.0, Vector3::new(500.0, 0.0, 0.0));
        let path = predictor.predict(&start);

        assert_eq!(path.start_point(), &start);
        assert_relative_eq!(path.end_point().time, 18.0, epsilon = 1e-9);
        assert!(path
            .slices()
            .windows(2)
            .all(|pair| pair[1].time > pair[0].time));
    }

    #[test]
    fn prediction_is_deterministic() {
        let predictor = BallPredictor::default();
        let start = BallSlice::new(
            Vector3::new(100.0, -300.0, 400.0),
            0.0,
            Vector3::new(700.0, 200.0, 900.0),
        );
        assert_eq!(predictor.predict(&start), predictor.predict(&start));
    }

    #[test]
    fn dropped_ball_lands() {
        let predictor = BallPredictor::default();
        let start = BallSlice::new(Vector3::new(0.0, 0.0, 1000.0), 0.0, Vector3::zeros());
        let path = predictor.predict(&start);
        let landing = path.landing(0.0).unwrap();
        // Free fall of ~907 uu at 650 uu/s² takes about 1.67 s.
        assert_relative_eq!(landing.time, 1.67, epsilon = 0.05);
    }
}
