//! The forecast pipeline orchestrator
//!
//! Pipeline: check horizon → plan/validate window → log transform → fit all
//! variants → predict all variants → inverse transform → continuity
//! correction → assemble comparison.

use crate::assembler::{assemble, ComparisonResult};
use crate::calendar::BusinessCalendar;
use crate::config::{check_horizon, PipelineConfig};
use crate::correction::correct;
use crate::data::PriceSeries;
use crate::ensemble::{partition_outcomes, ModelEnsemble};
use crate::error::{ForecastError, ModelFitError, Result};
use crate::models::{ForecastPoint, RawForecast};
use crate::window::WindowPlanner;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, warn};
use trade_math::transform;

/// Synchronous entry point consumed by the presentation layer
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    planner: WindowPlanner,
    calendar: BusinessCalendar,
    ensemble: ModelEnsemble,
}

impl Default for ForecastPipeline {
    fn default() -> Self {
        Self {
            planner: WindowPlanner::default(),
            calendar: BusinessCalendar::weekdays(),
            ensemble: ModelEnsemble::default(),
        }
    }
}

impl ForecastPipeline {
    /// Build a pipeline from a validated configuration
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            planner: config.planner()?,
            calendar: config.calendar(),
            ensemble: ModelEnsemble::default(),
        })
    }

    /// Replace the model ensemble
    pub fn with_ensemble(mut self, ensemble: ModelEnsemble) -> Self {
        self.ensemble = ensemble;
        self
    }

    pub fn planner(&self) -> &WindowPlanner {
        &self.planner
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn ensemble(&self) -> &ModelEnsemble {
        &self.ensemble
    }

    /// Forecast `horizon` business days past the end of `series`.
    ///
    /// Fails fast on an unsupported horizon or a series too short for the
    /// derived lookback. Model failures do not fail the run; they are listed
    /// in [`ComparisonResult::failures`].
    pub fn run(&self, series: &PriceSeries, horizon: usize) -> Result<ComparisonResult> {
        let start = Instant::now();
        check_horizon(horizon)?;
        let request = self.planner.plan_request(series, horizon)?;
        let last = *series.last().ok_or(ForecastError::InsufficientData {
            required: request.lookback + horizon,
            actual: 0,
        })?;

        info!(
            observations = series.len(),
            horizon,
            lookback = request.lookback,
            "starting forecast pipeline"
        );

        let transformed = transform::forward(&series.closes())?;

        let fitted = self
            .ensemble
            .fit_all(&transformed, request.horizon, request.lookback);
        let (trained, mut failures) = partition_outcomes(fitted);

        let predicted = self
            .ensemble
            .predict_all(&trained, horizon, last.date, &self.calendar)?;
        let (raw, predict_failures) = partition_outcomes(predicted);
        failures.extend(predict_failures);

        let mut corrected = BTreeMap::new();
        for (kind, forecast) in raw {
            match to_price_domain(&forecast) {
                Ok(points) => {
                    corrected.insert(kind, correct(&points, last.close));
                }
                Err(err) => {
                    failures.insert(kind, err);
                }
            }
        }

        for (kind, err) in &failures {
            warn!(model = %kind, error = %err, "variant omitted from comparison");
        }

        let result = assemble(last.date, horizon, corrected, failures, &self.calendar)?;

        info!(
            survivors = result.forecasts.len(),
            failed = result.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "forecast pipeline complete"
        );

        Ok(result)
    }
}

/// Map a log-domain forecast back to prices.
///
/// `exp_m1` overflows to infinity for large inputs and saturates at -1 for
/// very negative ones, so every value must come back finite and positive.
fn to_price_domain(forecast: &RawForecast) -> std::result::Result<Vec<ForecastPoint>, ModelFitError> {
    forecast
        .points
        .iter()
        .enumerate()
        .map(|(step, p)| {
            let value = transform::inverse_value(p.value);
            if !value.is_finite() {
                Err(ModelFitError::NonFiniteForecast)
            } else if value <= 0.0 {
                Err(ModelFitError::OutOfDomain { step, value })
            } else {
                Ok(ForecastPoint { date: p.date, value })
            }
        })
        .collect()
}

/// Run the default pipeline on `series`
pub fn run(series: &PriceSeries, horizon: usize) -> Result<ComparisonResult> {
    ForecastPipeline::default().run(series, horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelKind;
    use chrono::NaiveDate;

    fn raw(values: &[f64]) -> RawForecast {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        RawForecast {
            kind: ModelKind::Decomposition,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| ForecastPoint {
                    date: start + chrono::Duration::days(i as i64),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn test_price_domain_restores_prices() {
        let points = to_price_domain(&raw(&[1000.0_f64.ln_1p(), 1010.0_f64.ln_1p()])).unwrap();
        assert!((points[0].value - 1000.0).abs() < 1e-9);
        assert!((points[1].value - 1010.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(
            to_price_domain(&raw(&[6.9, 6.9, 800.0])).unwrap_err(),
            ModelFitError::NonFiniteForecast
        );
    }

    #[test]
    fn test_saturated_values_are_rejected() {
        assert_eq!(
            to_price_domain(&raw(&[6.9, -50.0])).unwrap_err(),
            ModelFitError::OutOfDomain {
                step: 1,
                value: -1.0
            }
        );
    }
}
