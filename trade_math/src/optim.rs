//! First-order optimizers for the forecasting networks
//!
//! - Adam (Adaptive Moment Estimation) with per-tensor moment buffers
//! - Gradient clipping by L2 norm

use crate::{MathError, Result};

/// First and second moment buffers for one parameter tensor
#[derive(Debug, Clone, PartialEq)]
pub struct Moments {
    m: Vec<f64>,
    v: Vec<f64>,
}

impl Moments {
    /// Zeroed buffers for a tensor with `len` parameters
    pub fn zeros(len: usize) -> Self {
        Self {
            m: vec![0.0; len],
            v: vec![0.0; len],
        }
    }

    /// Number of parameters tracked
    pub fn len(&self) -> usize {
        self.m.len()
    }

    /// Whether no parameters are tracked
    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }
}

/// Adam optimizer
///
/// The step counter is shared by every tensor of a network: call
/// [`Adam::advance`] once per optimisation step, then [`Adam::update`] for each
/// tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    t: i32,
}

impl Adam {
    /// Create an Adam optimizer with the usual moment decay rates
    pub fn new(learning_rate: f64) -> Result<Self> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Learning rate must be positive and finite, got {}",
                learning_rate
            )));
        }

        Ok(Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
        })
    }

    /// Override the moment decay rates
    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&beta1) || !(0.0..1.0).contains(&beta2) {
            return Err(MathError::InvalidInput(
                "Betas must lie in [0, 1)".to_string(),
            ));
        }
        self.beta1 = beta1;
        self.beta2 = beta2;
        Ok(self)
    }

    /// Start a new optimisation step
    pub fn advance(&mut self) {
        self.t = self.t.saturating_add(1);
    }

    /// Number of steps taken so far
    pub fn steps(&self) -> i32 {
        self.t
    }

    /// Apply one Adam update to `params` using `grads`
    pub fn update(&self, moments: &mut Moments, params: &mut [f64], grads: &[f64]) -> Result<()> {
        if params.len() != grads.len() || params.len() != moments.len() {
            return Err(MathError::InvalidInput(format!(
                "Shape mismatch: {} params, {} grads, {} moments",
                params.len(),
                grads.len(),
                moments.len()
            )));
        }
        if self.t == 0 {
            return Err(MathError::CalculationError(
                "advance() must be called before update()".to_string(),
            ));
        }

        let bias1 = 1.0 - self.beta1.powi(self.t);
        let bias2 = 1.0 - self.beta2.powi(self.t);

        for (((p, g), m), v) in params
            .iter_mut()
            .zip(grads)
            .zip(moments.m.iter_mut())
            .zip(moments.v.iter_mut())
        {
            *m = self.beta1 * *m + (1.0 - self.beta1) * g;
            *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
            let m_hat = *m / bias1;
            let v_hat = *v / bias2;
            *p -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }

        Ok(())
    }
}

/// Rescale `grads` in place so their L2 norm does not exceed `max_norm`.
///
/// Returns the norm before clipping.
pub fn clip_by_norm(grads: &mut [f64], max_norm: f64) -> f64 {
    let norm = grads.iter().map(|g| g * g).sum::<f64>().sqrt();
    if norm.is_finite() && norm > max_norm && max_norm > 0.0 {
        let factor = max_norm / norm;
        grads.iter_mut().for_each(|g| *g *= factor);
    }
    norm
}
