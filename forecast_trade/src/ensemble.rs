//! The fixed ensemble of model families
//!
//! Every variant is fitted on the same transformed series and queried for the
//! same horizon. Variants run concurrently on the rayon pool; each task yields
//! its own `Result`, so one failure never reaches the others.

use crate::calendar::BusinessCalendar;
use crate::error::{ModelFitError, Result};
use crate::models::{
    ForecastModel, ForecastPoint, Hyperparameters, ModelKind, ModelVariant, RawForecast,
    TrainedForecastModel, TrainedModel, Tuning,
};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-variant outcome of a fit or predict pass
pub type VariantOutcomes<T> = BTreeMap<ModelKind, std::result::Result<T, ModelFitError>>;

/// Holds the training settings of each model family
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnsemble {
    tunings: BTreeMap<ModelKind, Tuning>,
}

impl Default for ModelEnsemble {
    fn default() -> Self {
        Self {
            tunings: ModelKind::ALL
                .iter()
                .map(|kind| (*kind, kind.default_tuning()))
                .collect(),
        }
    }
}

impl ModelEnsemble {
    /// Replace the training settings of one family
    pub fn with_tuning(mut self, kind: ModelKind, tuning: Tuning) -> Self {
        self.tunings.insert(kind, tuning);
        self
    }

    /// Families in the ensemble
    pub fn kinds(&self) -> impl Iterator<Item = ModelKind> + '_ {
        self.tunings.keys().copied()
    }

    /// Training settings of one family
    pub fn tuning(&self, kind: ModelKind) -> Option<&Tuning> {
        self.tunings.get(&kind)
    }

    /// Build the variants for a request
    pub fn variants(&self, horizon: usize, lookback: usize) -> Vec<ModelVariant> {
        self.tunings
            .iter()
            .map(|(kind, tuning)| ModelVariant::new(*kind, Hyperparameters::new(horizon, lookback, *tuning)))
            .collect()
    }

    /// Fit every variant on the same transformed series
    pub fn fit_all(&self, series: &[f64], horizon: usize, lookback: usize) -> VariantOutcomes<TrainedModel> {
        self.variants(horizon, lookback)
            .into_par_iter()
            .map(|variant| {
                let kind = variant.kind();
                let outcome = variant.train(series);
                match &outcome {
                    Ok(model) => debug!(model = %kind, final_loss = model.final_loss(), "model fitted"),
                    Err(err) => warn!(model = %kind, error = %err, "model fit failed"),
                }
                (kind, outcome)
            })
            .collect()
    }

    /// Query every fitted model for `horizon` values dated on the business
    /// days following `last_date`
    pub fn predict_all(
        &self,
        trained: &BTreeMap<ModelKind, TrainedModel>,
        horizon: usize,
        last_date: NaiveDate,
        calendar: &BusinessCalendar,
    ) -> Result<VariantOutcomes<RawForecast>> {
        let dates = calendar.business_days_after(last_date, horizon)?;

        Ok(trained
            .par_iter()
            .map(|(kind, model)| {
                let outcome = model.forecast(horizon).map(|values| RawForecast {
                    kind: *kind,
                    points: dates
                        .iter()
                        .zip(values)
                        .map(|(date, value)| ForecastPoint { date: *date, value })
                        .collect(),
                });
                if let Err(err) = &outcome {
                    warn!(model = %kind, error = %err, "model predict failed");
                }
                (*kind, outcome)
            })
            .collect())
    }
}

/// Split outcomes into successes and failures
pub fn partition_outcomes<T>(
    outcomes: VariantOutcomes<T>,
) -> (BTreeMap<ModelKind, T>, BTreeMap<ModelKind, ModelFitError>) {
    let mut ok = BTreeMap::new();
    let mut failed = BTreeMap::new();
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(value) => {
                ok.insert(kind, value);
            }
            Err(err) => {
                failed.insert(kind, err);
            }
        }
    }
    (ok, failed)
}
