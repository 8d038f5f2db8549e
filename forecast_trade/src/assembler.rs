//! Builds the comparison structure handed to the rendering layer

use crate::calendar::BusinessCalendar;
use crate::correction::CorrectedForecast;
use crate::error::{ForecastError, ModelFitError, Result};
use crate::models::{ForecastPoint, ModelKind};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Forecasts of every surviving variant on a shared future date axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Business days following the last observation
    pub future_dates: Vec<NaiveDate>,
    /// Corrected forecast of each variant that completed
    pub forecasts: BTreeMap<ModelKind, CorrectedForecast>,
    /// Cause of failure of each variant that did not
    pub failures: BTreeMap<ModelKind, ModelFitError>,
}

impl ComparisonResult {
    pub fn horizon(&self) -> usize {
        self.future_dates.len()
    }

    pub fn forecast(&self, kind: ModelKind) -> Option<&CorrectedForecast> {
        self.forecasts.get(&kind)
    }

    pub fn failure(&self, kind: ModelKind) -> Option<&ModelFitError> {
        self.failures.get(&kind)
    }

    /// Serialise for the rendering layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Generate the future date axis and pair it positionally with each forecast.
///
/// Any forecast whose length differs from `horizon` is an internal invariant
/// violation and aborts with [`ForecastError::DateAxisMismatch`].
pub fn assemble(
    last_actual_date: NaiveDate,
    horizon: usize,
    forecasts: BTreeMap<ModelKind, CorrectedForecast>,
    failures: BTreeMap<ModelKind, ModelFitError>,
    calendar: &BusinessCalendar,
) -> Result<ComparisonResult> {
    let future_dates = calendar.business_days_after(last_actual_date, horizon)?;

    let mut aligned = BTreeMap::new();
    for (kind, forecast) in forecasts {
        if forecast.len() != horizon {
            return Err(ForecastError::DateAxisMismatch {
                kind,
                expected: horizon,
                actual: forecast.len(),
            });
        }

        let points = future_dates
            .iter()
            .zip(&forecast.points)
            .map(|(date, point)| ForecastPoint {
                date: *date,
                value: point.value,
            })
            .collect();
        aligned.insert(
            kind,
            CorrectedForecast {
                points,
                offset: forecast.offset,
            },
        );
    }

    Ok(ComparisonResult {
        future_dates,
        forecasts: aligned,
        failures,
    })
}
