//! Dense layers with manual backpropagation
//!
//! A dense layer computes `output = weights * input + bias` with the weight
//! matrix stored row-major (`outputs x inputs`). Gradients are accumulated
//! across a mini-batch and applied with Adam.

use crate::error::ModelFitError;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};
use trade_math::optim::{clip_by_norm, Adam, Moments};

/// Maximum L2 norm of a single tensor's gradient
const MAX_GRAD_NORM: f64 = 1.0;

/// Fully connected layer
#[derive(Debug, Clone)]
pub(crate) struct Dense {
    inputs: usize,
    outputs: usize,
    weights: Vec<f64>,
    bias: Vec<f64>,
    grad_w: Vec<f64>,
    grad_b: Vec<f64>,
    moments_w: Moments,
    moments_b: Moments,
}

impl Dense {
    /// Create a layer with Xavier/Glorot uniform initialisation
    pub(crate) fn new(inputs: usize, outputs: usize, rng: &mut StdRng) -> Result<Self, ModelFitError> {
        if inputs == 0 || outputs == 0 {
            return Err(ModelFitError::InvalidHyperparameter(format!(
                "dense layer needs non-zero dimensions, got {}x{}",
                outputs, inputs
            )));
        }

        let limit = (6.0 / (inputs + outputs) as f64).sqrt();
        let dist = Uniform::new(-limit, limit);
        let weights = (0..inputs * outputs).map(|_| dist.sample(rng)).collect();

        Ok(Self {
            inputs,
            outputs,
            weights,
            bias: vec![0.0; outputs],
            grad_w: vec![0.0; inputs * outputs],
            grad_b: vec![0.0; outputs],
            moments_w: Moments::zeros(inputs * outputs),
            moments_b: Moments::zeros(outputs),
        })
    }

    pub(crate) fn forward(&self, input: &[f64]) -> Vec<f64> {
        debug_assert_eq!(input.len(), self.inputs);
        self.weights
            .chunks_exact(self.inputs)
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }

    /// Accumulate parameter gradients and return the gradient w.r.t. the input
    pub(crate) fn backward(&mut self, input: &[f64], grad_output: &[f64]) -> Vec<f64> {
        let mut grad_input = vec![0.0; self.inputs];
        for (o, &g) in grad_output.iter().enumerate() {
            let row = o * self.inputs;
            for (i, &x) in input.iter().enumerate() {
                self.grad_w[row + i] += g * x;
                grad_input[i] += g * self.weights[row + i];
            }
            self.grad_b[o] += g;
        }
        grad_input
    }

    /// Accumulate parameter gradients when the input gradient is not needed
    pub(crate) fn accumulate(&mut self, input: &[f64], grad_output: &[f64]) {
        for (o, &g) in grad_output.iter().enumerate() {
            let row = o * self.inputs;
            for (i, &x) in input.iter().enumerate() {
                self.grad_w[row + i] += g * x;
            }
            self.grad_b[o] += g;
        }
    }

    pub(crate) fn zero_grad(&mut self) {
        self.grad_w.iter_mut().for_each(|g| *g = 0.0);
        self.grad_b.iter_mut().for_each(|g| *g = 0.0);
    }

    pub(crate) fn scale_grad(&mut self, factor: f64) {
        self.grad_w.iter_mut().for_each(|g| *g *= factor);
        self.grad_b.iter_mut().for_each(|g| *g *= factor);
    }

    /// Clip and apply the accumulated gradients
    pub(crate) fn step(&mut self, adam: &Adam) -> Result<(), ModelFitError> {
        clip_by_norm(&mut self.grad_w, MAX_GRAD_NORM);
        clip_by_norm(&mut self.grad_b, MAX_GRAD_NORM);
        adam.update(&mut self.moments_w, &mut self.weights, &self.grad_w)?;
        adam.update(&mut self.moments_b, &mut self.bias, &self.grad_b)?;
        Ok(())
    }
}

pub(crate) fn relu(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.max(0.0)).collect()
}

/// Gradient through a ReLU given its pre-activation input
pub(crate) fn relu_backward(pre_activation: &[f64], grad: &[f64]) -> Vec<f64> {
    pre_activation
        .iter()
        .zip(grad)
        .map(|(z, g)| if *z > 0.0 { *g } else { 0.0 })
        .collect()
}

/// Mean squared error and its gradient w.r.t. the prediction
pub(crate) fn mse(prediction: &[f64], target: &[f64]) -> (f64, Vec<f64>) {
    let n = prediction.len().max(1) as f64;
    let diff: Vec<f64> = prediction.iter().zip(target).map(|(p, t)| p - t).collect();
    let loss = diff.iter().map(|d| d * d).sum::<f64>() / n;
    let grad = diff.iter().map(|d| 2.0 * d / n).collect();
    (loss, grad)
}
