//! # Trade Math
//!
//! Numeric building blocks for price forecasting.
//! This crate provides the variance-stabilising log transform, per-window
//! scalers, moving averages used for trend extraction and chart overlays, and
//! the first-order optimizer used to train the forecasting networks.

use thiserror::Error;

pub mod moving_averages;
pub mod optim;
pub mod scaling;
pub mod transform;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for trading math operations
pub type Result<T> = std::result::Result<T, MathError>;
