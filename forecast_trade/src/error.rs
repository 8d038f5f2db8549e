//! Error types for the forecast_trade crate

use crate::models::ModelKind;
use serde::Serialize;
use thiserror::Error;
use trade_math::MathError;

/// Pipeline-level errors.
///
/// Every variant except [`ForecastError::Math`] and the I/O family is fatal to
/// a forecast run. Failures of a single model are reported separately as
/// [`ModelFitError`] and never abort the run.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The series is too short for the requested horizon
    #[error("Insufficient data: need at least {required} observations, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A forecast does not line up with the generated date axis
    #[error("Date axis mismatch for {kind}: expected {expected} points, got {actual}")]
    DateAxisMismatch {
        kind: ModelKind,
        expected: usize,
        actual: usize,
    },

    /// Horizon outside the supported range
    #[error("Invalid horizon {horizon}: must be between {min} and {max} days")]
    InvalidHorizon {
        horizon: usize,
        min: usize,
        max: usize,
    },

    /// Series violates ordering or positivity invariants
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// Configuration could not be accepted
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The instrument name could not be resolved to a code
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    /// The price history provider returned no usable data
    #[error("Provider error: {0}")]
    Provider(String),

    /// Error from numeric building blocks
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from JSON serialisation
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from TOML parsing
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Failure of a single model variant during fit or predict.
///
/// These are collected per variant and attached to the comparison result.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", content = "detail", rename_all = "snake_case")]
pub enum ModelFitError {
    /// A hyperparameter is out of range
    #[error("Invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    /// Not a single training window fits in the series
    #[error("Not enough training windows: series has {series_len} points, window needs {window_len}")]
    NotEnoughWindows { series_len: usize, window_len: usize },

    /// Training loss became non-finite
    #[error("Training diverged at step {step} (loss = {loss})")]
    Diverged { step: usize, loss: f64 },

    /// The trained model produced NaN or infinite values
    #[error("Forecast contains non-finite values")]
    NonFiniteForecast,

    /// The forecast left the positive price domain after the inverse transform
    #[error("Forecast value {value} at step {step} is not a usable price")]
    OutOfDomain { step: usize, value: f64 },

    /// The model was asked for a horizon it was not trained for
    #[error("Model trained for horizon {trained} cannot forecast {requested} steps")]
    HorizonMismatch { trained: usize, requested: usize },

    /// Numeric failure inside the model
    #[error("Numeric failure: {0}")]
    Numeric(String),
}

impl From<MathError> for ModelFitError {
    fn from(err: MathError) -> Self {
        ModelFitError::Numeric(err.to_string())
    }
}
