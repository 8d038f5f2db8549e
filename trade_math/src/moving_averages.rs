//! Moving average calculations
//!
//! Contains:
//! - A streaming Simple Moving Average (SMA)
//! - Rolling means over a whole series (chart overlays such as MA5/MA20)
//! - Centred moving averages used to split a window into trend and remainder

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        // Remove oldest value if we have more than period values
        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// Whether a full period has been observed
    pub fn is_ready(&self) -> bool {
        self.values.len() >= self.period
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Trailing rolling mean over a series.
///
/// The output has the same length as the input; positions before the first
/// full window are `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;

    Ok(values
        .iter()
        .map(|&v| {
            sma.update(v);
            sma.value().ok()
        })
        .collect())
}

/// Centred moving average with edge replication.
///
/// The series is padded at both ends by repeating the first and last values
/// so the output has the same length as the input. Even kernels are rounded
/// up to the next odd size.
pub fn centred_moving_average(values: &[f64], kernel: usize) -> Result<Vec<f64>> {
    if kernel == 0 {
        return Err(MathError::InvalidInput(
            "Kernel size must be greater than zero".to_string(),
        ));
    }
    let (first, last) = match (values.first(), values.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => {
            return Err(MathError::InsufficientData(
                "Cannot smooth an empty series".to_string(),
            ))
        }
    };

    let half = kernel / 2;
    let width = 2 * half + 1;

    let mut padded = Vec::with_capacity(values.len() + 2 * half);
    padded.extend(std::iter::repeat(first).take(half));
    padded.extend_from_slice(values);
    padded.extend(std::iter::repeat(last).take(half));

    Ok(padded
        .windows(width)
        .map(|w| w.iter().sum::<f64>() / width as f64)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        // Not enough data yet
        assert!(sma.value().is_err());

        sma.update(2.0);
        sma.update(4.0);
        assert!(!sma.is_ready());

        sma.update(6.0);
        assert_eq!(sma.value().unwrap(), 4.0); // (2 + 4 + 6) / 3 = 4

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert_eq!(sma.value().unwrap(), 6.0); // (4 + 6 + 8) / 3 = 6

        sma.reset();
        assert!(sma.value().is_err());
    }

    #[test]
    fn test_rolling_mean_pads_with_none() {
        let ma = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(ma, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_rolling_mean_rejects_zero_window() {
        assert!(rolling_mean(&[1.0], 0).is_err());
    }

    #[test]
    fn test_centred_moving_average_keeps_length() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let smoothed = centred_moving_average(&values, 3).unwrap();
        assert_eq!(smoothed.len(), values.len());
        // (1 + 1 + 2) / 3 at the replicated left edge
        assert!((smoothed[0] - 4.0 / 3.0).abs() < 1e-12);
        assert!((smoothed[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_centred_moving_average_of_constant_is_constant() {
        let smoothed = centred_moving_average(&[5.0; 10], 25).unwrap();
        assert!(smoothed.iter().all(|v| (v - 5.0).abs() < 1e-12));
    }

    #[test]
    fn test_centred_moving_average_rejects_empty() {
        assert!(centred_moving_average(&[], 3).is_err());
    }
}
