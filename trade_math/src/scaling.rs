//! Per-window scaling applied before a window is fed to a network
//!
//! Each training or inference window is normalised with statistics computed on
//! its own input segment; the same shift and scale are applied to the target
//! segment and undone on the network output.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Smallest scale accepted before falling back to unit scale
const MIN_SCALE: f64 = 1e-8;

/// How a window is normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Leave values untouched
    Identity,
    /// Subtract the mean, divide by the standard deviation
    #[default]
    Standard,
    /// Subtract the median, divide by the interquartile range
    Robust,
    /// Map the window minimum to 0 and maximum to 1
    MinMax,
}

/// Affine map fitted on one window: `scaled = (value - shift) / scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowScaler {
    shift: f64,
    scale: f64,
}

impl WindowScaler {
    /// Fit a scaler on the given window
    pub fn fit(mode: ScaleMode, window: &[f64]) -> Result<Self> {
        if window.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a scaler on an empty window".to_string(),
            ));
        }
        if window.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Window contains non-finite values".to_string(),
            ));
        }

        let (shift, scale) = match mode {
            ScaleMode::Identity => (0.0, 1.0),
            ScaleMode::Standard => {
                let mean = window.iter().mean();
                let std_dev = if window.len() > 1 {
                    window.iter().std_dev()
                } else {
                    0.0
                };
                (mean, std_dev)
            }
            ScaleMode::Robust => {
                let mut data = Data::new(window.to_vec());
                let median = data.quantile(0.5);
                let iqr = data.quantile(0.75) - data.quantile(0.25);
                (median, iqr)
            }
            ScaleMode::MinMax => {
                let min = window.iter().copied().fold(f64::INFINITY, f64::min);
                let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min, max - min)
            }
        };

        let scale = if scale.is_finite() && scale > MIN_SCALE {
            scale
        } else {
            1.0
        };

        Ok(Self { shift, scale })
    }

    /// Scale a slice of values
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v - self.shift) / self.scale).collect()
    }

    /// Undo the scaling on a slice of values
    pub fn restore(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| v * self.scale + self.shift).collect()
    }

    /// The subtracted location
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// The divisor
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(ScaleMode::Identity)]
    #[case(ScaleMode::Standard)]
    #[case(ScaleMode::Robust)]
    #[case(ScaleMode::MinMax)]
    fn test_restore_inverts_apply(#[case] mode: ScaleMode) {
        let window = vec![6.1, 6.3, 6.2, 6.8, 6.5, 6.4];
        let scaler = WindowScaler::fit(mode, &window).unwrap();
        let back = scaler.restore(&scaler.apply(&window));

        for (a, b) in window.iter().zip(back.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_minmax_bounds() {
        let scaler = WindowScaler::fit(ScaleMode::MinMax, &[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(scaler.apply(&[2.0, 6.0]), vec![0.0, 1.0]);
    }

    #[test]
    fn test_standard_centres_window() {
        let window = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let scaler = WindowScaler::fit(ScaleMode::Standard, &window).unwrap();
        let scaled = scaler.apply(&window);
        let mean: f64 = scaled.iter().sum::<f64>() / scaled.len() as f64;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_window_falls_back_to_unit_scale() {
        let scaler = WindowScaler::fit(ScaleMode::Robust, &[7.0; 8]).unwrap();
        assert_eq!(scaler.scale(), 1.0);
        assert_eq!(scaler.shift(), 7.0);
    }

    #[test]
    fn test_rejects_bad_windows() {
        assert!(WindowScaler::fit(ScaleMode::Standard, &[]).is_err());
        assert!(WindowScaler::fit(ScaleMode::Standard, &[1.0, f64::NAN]).is_err());
    }
}
