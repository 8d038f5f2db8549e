//! The closed set of model families and their hyperparameter bundles

use crate::error::ModelFitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use trade_math::scaling::ScaleMode;

/// Model family identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Patch-embedding network aimed at long-range structure
    Patch,
    /// Residual MLP mixing along the time axis of a single series
    Mixer,
    /// Trend/seasonal decomposition with a linear head per component
    Decomposition,
}

impl ModelKind {
    /// Every family in the ensemble
    pub const ALL: [ModelKind; 3] = [ModelKind::Patch, ModelKind::Mixer, ModelKind::Decomposition];

    /// Display name of the architecture
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Patch => "PatchMLP",
            ModelKind::Mixer => "TSMixer",
            ModelKind::Decomposition => "DLinear",
        }
    }

    /// Internal default training settings for this family
    pub fn default_tuning(&self) -> Tuning {
        match self {
            ModelKind::Patch => Tuning {
                max_training_steps: 300,
                learning_rate: 3e-3,
                scale_mode: ScaleMode::Robust,
                ..Tuning::default()
            },
            ModelKind::Mixer => Tuning {
                max_training_steps: 300,
                learning_rate: 3e-3,
                scale_mode: ScaleMode::Standard,
                ..Tuning::default()
            },
            ModelKind::Decomposition => Tuning {
                max_training_steps: 300,
                learning_rate: 5e-3,
                scale_mode: ScaleMode::Standard,
                ..Tuning::default()
            },
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Training settings that do not depend on the request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub max_training_steps: usize,
    pub learning_rate: f64,
    pub scale_mode: ScaleMode,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_training_steps: 300,
            learning_rate: 1e-3,
            scale_mode: ScaleMode::Standard,
            batch_size: 32,
            seed: 1,
        }
    }
}

/// Full hyperparameter bundle of one variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub horizon: usize,
    pub lookback: usize,
    pub max_training_steps: usize,
    pub learning_rate: f64,
    pub scale_mode: ScaleMode,
    pub batch_size: usize,
    pub seed: u64,
}

impl Hyperparameters {
    /// Combine request-derived window sizes with training settings
    pub fn new(horizon: usize, lookback: usize, tuning: Tuning) -> Self {
        Self {
            horizon,
            lookback,
            max_training_steps: tuning.max_training_steps,
            learning_rate: tuning.learning_rate,
            scale_mode: tuning.scale_mode,
            batch_size: tuning.batch_size,
            seed: tuning.seed,
        }
    }

    /// Check every value is usable for training
    pub fn validate(&self) -> Result<(), ModelFitError> {
        if self.horizon == 0 || self.lookback == 0 {
            return Err(ModelFitError::InvalidHyperparameter(format!(
                "horizon ({}) and lookback ({}) must be positive",
                self.horizon, self.lookback
            )));
        }
        if self.max_training_steps == 0 {
            return Err(ModelFitError::InvalidHyperparameter(
                "max_training_steps must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ModelFitError::InvalidHyperparameter(
                "batch_size must be positive".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ModelFitError::InvalidHyperparameter(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// A model family paired with its hyperparameters. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelVariant {
    kind: ModelKind,
    hyperparameters: Hyperparameters,
}

impl ModelVariant {
    pub fn new(kind: ModelKind, hyperparameters: Hyperparameters) -> Self {
        Self {
            kind,
            hyperparameters,
        }
    }

    /// Variant with the family's default tuning
    pub fn with_defaults(kind: ModelKind, horizon: usize, lookback: usize) -> Self {
        Self::new(kind, Hyperparameters::new(horizon, lookback, kind.default_tuning()))
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for kind in ModelKind::ALL {
            let variant = ModelVariant::with_defaults(kind, 10, 20);
            assert!(variant.hyperparameters().validate().is_ok());
        }
    }

    #[test]
    fn test_invalid_learning_rate() {
        let tuning = Tuning {
            learning_rate: -0.1,
            ..Tuning::default()
        };
        let params = Hyperparameters::new(10, 20, tuning);
        assert!(matches!(
            params.validate(),
            Err(ModelFitError::InvalidHyperparameter(_))
        ));
    }

    #[test]
    fn test_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ModelKind::Decomposition).unwrap();
        assert_eq!(json, "\"decomposition\"");
        assert_eq!(ModelKind::Mixer.to_string(), "TSMixer");
    }
}
