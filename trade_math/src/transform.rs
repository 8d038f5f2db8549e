//! Variance-stabilising transform between price and log domain
//!
//! Prices are mapped with `y' = ln(1 + y)` before training and mapped back with
//! `y = exp(y') - 1` afterwards. Both directions use the `ln_1p`/`exp_m1`
//! primitives so small values keep their precision.

use crate::{MathError, Result};
use num_traits::Float;

/// Map raw values into the log domain.
///
/// Every value must be finite and greater than `-1`.
///
/// # Examples
///
/// ```
/// use trade_math::transform::{forward, inverse};
///
/// let prices = vec![100.0_f64, 101.5, 99.25];
/// let logged = forward(&prices).unwrap();
/// let restored = inverse(&logged);
/// assert!((restored[1] - 101.5).abs() < 1e-9);
/// ```
pub fn forward<T: Float>(values: &[T]) -> Result<Vec<T>> {
    let floor = -T::one();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if !v.is_finite() || v <= floor {
                return Err(MathError::InvalidInput(format!(
                    "value at index {} is outside the log1p domain (must be finite and > -1)",
                    i
                )));
            }
            Ok(v.ln_1p())
        })
        .collect()
}

/// Map log-domain values back to the original scale.
pub fn inverse<T: Float>(values: &[T]) -> Vec<T> {
    values.iter().map(|v| v.exp_m1()).collect()
}

/// Single-value counterpart of [`inverse`].
pub fn inverse_value<T: Float>(value: T) -> T {
    value.exp_m1()
}
