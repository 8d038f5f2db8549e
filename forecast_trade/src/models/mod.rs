//! Forecasting models for transformed price series
//!
//! Each [`ModelVariant`] is fitted on a log-domain series and yields a
//! [`TrainedModel`] that forecasts a fixed horizon from the tail of that
//! series. The three families share one training loop and differ only in the
//! network mapping a lookback window to the horizon.

use crate::error::ModelFitError;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use trade_math::scaling::WindowScaler;

mod decomposition;
mod layers;
mod mixer;
mod patch;
mod training;
pub mod variant;

use decomposition::DecompositionNet;
use layers::Dense;
use mixer::MixerNet;
use patch::PatchNet;
use training::{train, Network, WindowDataset};

pub use variant::{Hyperparameters, ModelKind, ModelVariant, Tuning};

/// A dated forecast value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Horizon-length forecast of one variant, still in the transformed domain
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast {
    pub kind: ModelKind,
    pub points: Vec<ForecastPoint>,
}

impl RawForecast {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast the next `horizon` values after the training series
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>, ModelFitError>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a transformed series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a transformed series
    fn train(&self, series: &[f64]) -> Result<Self::Trained, ModelFitError>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
enum ModelNetwork {
    Patch(PatchNet),
    Mixer(MixerNet),
    Decomposition(DecompositionNet),
}

impl ModelNetwork {
    fn build(kind: ModelKind, params: &Hyperparameters, rng: &mut StdRng) -> Result<Self, ModelFitError> {
        Ok(match kind {
            ModelKind::Patch => ModelNetwork::Patch(PatchNet::new(params.lookback, params.horizon, rng)?),
            ModelKind::Mixer => ModelNetwork::Mixer(MixerNet::new(params.lookback, params.horizon, rng)?),
            ModelKind::Decomposition => {
                ModelNetwork::Decomposition(DecompositionNet::new(params.lookback, params.horizon, rng)?)
            }
        })
    }
}

impl Network for ModelNetwork {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        match self {
            ModelNetwork::Patch(net) => net.forward(input),
            ModelNetwork::Mixer(net) => net.forward(input),
            ModelNetwork::Decomposition(net) => net.forward(input),
        }
    }

    fn accumulate(&mut self, input: &[f64], target: &[f64]) -> f64 {
        match self {
            ModelNetwork::Patch(net) => net.accumulate(input, target),
            ModelNetwork::Mixer(net) => net.accumulate(input, target),
            ModelNetwork::Decomposition(net) => net.accumulate(input, target),
        }
    }

    fn layers_mut(&mut self) -> Vec<&mut Dense> {
        match self {
            ModelNetwork::Patch(net) => net.layers_mut(),
            ModelNetwork::Mixer(net) => net.layers_mut(),
            ModelNetwork::Decomposition(net) => net.layers_mut(),
        }
    }
}

/// A variant fitted on one series snapshot
#[derive(Debug, Clone)]
pub struct TrainedModel {
    variant: ModelVariant,
    network: ModelNetwork,
    /// Last `lookback` transformed values of the training series
    context: Vec<f64>,
    final_loss: f64,
}

impl TrainedModel {
    pub fn variant(&self) -> &ModelVariant {
        &self.variant
    }

    pub fn kind(&self) -> ModelKind {
        self.variant.kind()
    }

    /// Mean squared error of the last training batch, in scaled units
    pub fn final_loss(&self) -> f64 {
        self.final_loss
    }
}

impl ForecastModel for ModelVariant {
    type Trained = TrainedModel;

    fn train(&self, series: &[f64]) -> Result<Self::Trained, ModelFitError> {
        let params = self.hyperparameters();
        params.validate()?;

        let data = WindowDataset::build(series, params.lookback, params.horizon, params.scale_mode)?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut network = ModelNetwork::build(self.kind(), params, &mut rng)?;
        let report = train(&mut network, &data, params, &mut rng)?;

        Ok(TrainedModel {
            variant: self.clone(),
            network,
            context: series[series.len() - params.lookback..].to_vec(),
            final_loss: report.final_loss,
        })
    }

    fn name(&self) -> &str {
        self.kind().name()
    }
}

impl TrainedForecastModel for TrainedModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>, ModelFitError> {
        let params = self.variant.hyperparameters();
        if horizon != params.horizon {
            return Err(ModelFitError::HorizonMismatch {
                trained: params.horizon,
                requested: horizon,
            });
        }

        let scaler = WindowScaler::fit(params.scale_mode, &self.context)?;
        let output = self.network.forward(&scaler.apply(&self.context));
        let values = scaler.restore(&output);

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelFitError::NonFiniteForecast);
        }
        Ok(values)
    }

    fn name(&self) -> &str {
        self.variant.kind().name()
    }
}
