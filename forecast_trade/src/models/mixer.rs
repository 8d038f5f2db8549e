//! Residual time-mixing network
//!
//! A two-layer MLP mixes information across the time steps of the window and
//! is added back onto the input before a linear projection to the horizon.

use super::layers::{mse, relu, relu_backward, Dense};
use super::training::Network;
use crate::error::ModelFitError;
use rand::rngs::StdRng;

const MIN_HIDDEN: usize = 8;
const MAX_HIDDEN: usize = 64;

#[derive(Debug, Clone)]
pub(crate) struct MixerNet {
    mix_in: Dense,
    mix_out: Dense,
    head: Dense,
}

impl MixerNet {
    pub(crate) fn new(lookback: usize, horizon: usize, rng: &mut StdRng) -> Result<Self, ModelFitError> {
        let hidden = lookback.clamp(MIN_HIDDEN, MAX_HIDDEN);
        Ok(Self {
            mix_in: Dense::new(lookback, hidden, rng)?,
            mix_out: Dense::new(hidden, lookback, rng)?,
            head: Dense::new(lookback, horizon, rng)?,
        })
    }

    fn mix(&self, input: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let pre = self.mix_in.forward(input);
        let hidden = relu(&pre);
        let mixed = self
            .mix_out
            .forward(&hidden)
            .iter()
            .zip(input)
            .map(|(r, x)| r + x)
            .collect();
        (pre, hidden, mixed)
    }
}

impl Network for MixerNet {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let (_, _, mixed) = self.mix(input);
        self.head.forward(&mixed)
    }

    fn accumulate(&mut self, input: &[f64], target: &[f64]) -> f64 {
        let (pre, hidden, mixed) = self.mix(input);
        let prediction = self.head.forward(&mixed);
        let (loss, grad) = mse(&prediction, target);

        // The residual branch sees the same gradient as the mixed output
        let grad_mixed = self.head.backward(&mixed, &grad);
        let grad_hidden = self.mix_out.backward(&hidden, &grad_mixed);
        let grad_pre = relu_backward(&pre, &grad_hidden);
        self.mix_in.accumulate(input, &grad_pre);

        loss
    }

    fn layers_mut(&mut self) -> Vec<&mut Dense> {
        vec![&mut self.mix_in, &mut self.mix_out, &mut self.head]
    }
}
