//! Trend/seasonal decomposition network
//!
//! The window is split into a centred moving-average trend and the seasonal
//! remainder; each component has its own linear head and the two projections
//! are summed.

use super::layers::{mse, Dense};
use super::training::Network;
use crate::error::ModelFitError;
use rand::rngs::StdRng;
use trade_math::moving_averages::centred_moving_average;

const TREND_KERNEL: usize = 25;

#[derive(Debug, Clone)]
pub(crate) struct DecompositionNet {
    kernel: usize,
    trend_head: Dense,
    seasonal_head: Dense,
}

impl DecompositionNet {
    pub(crate) fn new(lookback: usize, horizon: usize, rng: &mut StdRng) -> Result<Self, ModelFitError> {
        Ok(Self {
            kernel: TREND_KERNEL.min(lookback),
            trend_head: Dense::new(lookback, horizon, rng)?,
            seasonal_head: Dense::new(lookback, horizon, rng)?,
        })
    }

    fn decompose(&self, input: &[f64]) -> (Vec<f64>, Vec<f64>) {
        // An empty window is the only failure case and never reaches here
        let trend = centred_moving_average(input, self.kernel).unwrap_or_else(|_| input.to_vec());
        let seasonal = input.iter().zip(&trend).map(|(x, t)| x - t).collect();
        (trend, seasonal)
    }
}

impl Network for DecompositionNet {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let (trend, seasonal) = self.decompose(input);
        self.trend_head
            .forward(&trend)
            .iter()
            .zip(self.seasonal_head.forward(&seasonal))
            .map(|(t, s)| t + s)
            .collect()
    }

    fn accumulate(&mut self, input: &[f64], target: &[f64]) -> f64 {
        let (trend, seasonal) = self.decompose(input);
        let prediction: Vec<f64> = self
            .trend_head
            .forward(&trend)
            .iter()
            .zip(self.seasonal_head.forward(&seasonal))
            .map(|(t, s)| t + s)
            .collect();
        let (loss, grad) = mse(&prediction, target);

        self.trend_head.accumulate(&trend, &grad);
        self.seasonal_head.accumulate(&seasonal, &grad);

        loss
    }

    fn layers_mut(&mut self) -> Vec<&mut Dense> {
        vec![&mut self.trend_head, &mut self.seasonal_head]
    }
}
