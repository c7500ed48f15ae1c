use std::collections::VecDeque;

use kestrel_core::{BallSlice, GameTime};

/// A prediction of where the ball will be, kept around to be checked later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallPrediction {
    /// When the prediction was made.
    pub made_at: GameTime,
    /// The predicted ball state; its `time` is the predicted moment.
    pub slice: BallSlice,
}

impl BallPrediction {
    pub fn predicted_moment(&self) -> GameTime {
        self.slice.time
    }
}

/// Queue of pending predictions, ordered by predicted moment.
#[derive(Debug, Default)]
pub struct PredictionWarehouse {
    predictions: VecDeque<BallPrediction>,
}

impl PredictionWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prediction(&mut self, prediction: BallPrediction) {
        self.predictions.push_back(prediction);
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// The oldest prediction for a moment at or after `moment`.
    ///
    /// Predictions for moments that have already passed are discarded along
    /// the way, as is the one returned.
    pub fn prediction_of_moment(&mut self, moment: GameTime) -> Option<BallPrediction> {
        let first = self.predictions.front()?;
        if moment < first.predicted_moment() {
            return None;
        }

        while let Some(oldest) = self.predictions.pop_front() {
            if oldest.predicted_moment() >= moment {
                return Some(oldest);
            }
        }
        None
    }
}
