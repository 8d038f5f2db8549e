//! Continuity correction of price-domain forecasts
//!
//! After the inverse transform the first forecast value rarely equals the
//! last observed close, which shows up as a jump where history meets the
//! forecast. The whole forecast is shifted by one constant offset so the first
//! point lands on the last close.
//!
//! The shift is uniform: it guarantees continuity but keeps the raw forecast's
//! shape, including any slope error, for the whole horizon.

use crate::models::ForecastPoint;
use serde::Serialize;

/// A price-domain forecast whose first point equals the last actual close
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectedForecast {
    pub points: Vec<ForecastPoint>,
    /// Constant added to every raw point
    pub offset: f64,
}

impl CorrectedForecast {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.value)
    }
}

/// Shift `raw` so that its first value equals `last_actual`
pub fn correct(raw: &[ForecastPoint], last_actual: f64) -> CorrectedForecast {
    let offset = match raw.first() {
        Some(first) => last_actual - first.value,
        None => 0.0,
    };

    CorrectedForecast {
        points: raw
            .iter()
            .map(|p| ForecastPoint {
                date: p.date,
                value: p.value + offset,
            })
            .collect(),
        offset,
    }
}
