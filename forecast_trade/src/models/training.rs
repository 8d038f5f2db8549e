//! Sliding-window dataset and the shared mini-batch training loop

use super::layers::Dense;
use super::variant::Hyperparameters;
use crate::error::ModelFitError;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;
use trade_math::optim::Adam;
use trade_math::scaling::{ScaleMode, WindowScaler};

/// A trainable network mapping a scaled lookback window to a scaled horizon
pub(crate) trait Network: std::fmt::Debug + Send + Sync {
    /// Predict the scaled horizon for a scaled input window
    fn forward(&self, input: &[f64]) -> Vec<f64>;

    /// Run one sample forward and backward, accumulating gradients.
    /// Returns the sample loss.
    fn accumulate(&mut self, input: &[f64], target: &[f64]) -> f64;

    /// Every layer holding trainable parameters
    fn layers_mut(&mut self) -> Vec<&mut Dense>;
}

/// Scaled (input, target) pairs cut from a transformed series
#[derive(Debug, Clone)]
pub(crate) struct WindowDataset {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

impl WindowDataset {
    /// Cut every full `lookback + horizon` window, each scaled on its input
    pub(crate) fn build(
        series: &[f64],
        lookback: usize,
        horizon: usize,
        scale_mode: ScaleMode,
    ) -> Result<Self, ModelFitError> {
        let window_len = lookback + horizon;
        if series.len() < window_len {
            return Err(ModelFitError::NotEnoughWindows {
                series_len: series.len(),
                window_len,
            });
        }

        let mut inputs = Vec::with_capacity(series.len() - window_len + 1);
        let mut targets = Vec::with_capacity(series.len() - window_len + 1);
        for window in series.windows(window_len) {
            let (input, target) = window.split_at(lookback);
            let scaler = WindowScaler::fit(scale_mode, input)?;
            inputs.push(scaler.apply(input));
            targets.push(scaler.apply(target));
        }

        Ok(Self { inputs, targets })
    }

    pub(crate) fn len(&self) -> usize {
        self.inputs.len()
    }
}

/// Outcome of a completed training run
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrainingReport {
    pub final_loss: f64,
}

/// Fit `network` with Adam on random mini-batches drawn from `data`
pub(crate) fn train<N: Network>(
    network: &mut N,
    data: &WindowDataset,
    params: &Hyperparameters,
    rng: &mut StdRng,
) -> Result<TrainingReport, ModelFitError> {
    let mut adam = Adam::new(params.learning_rate)?;
    let batch = params.batch_size.min(data.len()).max(1);
    let mut final_loss = f64::NAN;

    for step in 0..params.max_training_steps {
        network.layers_mut().into_iter().for_each(Dense::zero_grad);

        let mut total = 0.0;
        for _ in 0..batch {
            let idx = rng.gen_range(0..data.len());
            total += network.accumulate(&data.inputs[idx], &data.targets[idx]);
        }
        let loss = total / batch as f64;
        check_loss(step, loss)?;

        let factor = 1.0 / batch as f64;
        adam.advance();
        for layer in network.layers_mut() {
            layer.scale_grad(factor);
            layer.step(&adam)?;
        }
        final_loss = loss;
    }

    debug!(
        steps = params.max_training_steps,
        windows = data.len(),
        final_loss,
        "training finished"
    );

    Ok(TrainingReport { final_loss })
}

/// Abort training on a non-finite loss
pub(crate) fn check_loss(step: usize, loss: f64) -> Result<(), ModelFitError> {
    if loss.is_finite() {
        Ok(())
    } else {
        Err(ModelFitError::Diverged { step, loss })
    }
}
