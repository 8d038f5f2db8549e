//! Lookback planning and history sufficiency checks

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};

/// Lookback length as a multiple of the horizon
pub const DEFAULT_LOOKBACK_RATIO: usize = 2;

/// A validated forecast request.
///
/// `lookback` is always derived from `horizon` by a [`WindowPlanner`].
#[derive(Debug, Clone, Copy)]
pub struct ForecastRequest<'a> {
    pub horizon: usize,
    pub lookback: usize,
    pub series: &'a PriceSeries,
}

/// Derives the lookback window from the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlanner {
    lookback_ratio: usize,
}

impl Default for WindowPlanner {
    fn default() -> Self {
        Self {
            lookback_ratio: DEFAULT_LOOKBACK_RATIO,
        }
    }
}

impl WindowPlanner {
    /// Create a planner with a custom ratio
    pub fn new(lookback_ratio: usize) -> Result<Self> {
        if lookback_ratio == 0 {
            return Err(ForecastError::InvalidConfig(
                "lookback ratio must be at least 1".to_string(),
            ));
        }
        Ok(Self { lookback_ratio })
    }

    /// The configured ratio
    pub fn lookback_ratio(&self) -> usize {
        self.lookback_ratio
    }

    /// Lookback for a horizon
    pub fn plan(&self, horizon: usize) -> usize {
        horizon.saturating_mul(self.lookback_ratio)
    }

    /// Fail unless the series holds at least `lookback + horizon` observations
    pub fn validate(&self, series_len: usize, lookback: usize, horizon: usize) -> Result<()> {
        let required = lookback.saturating_add(horizon);
        if series_len < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: series_len,
            });
        }
        Ok(())
    }

    /// Plan and validate a request in one step
    pub fn plan_request<'a>(
        &self,
        series: &'a PriceSeries,
        horizon: usize,
    ) -> Result<ForecastRequest<'a>> {
        let lookback = self.plan(horizon);
        self.validate(series.len(), lookback, horizon)?;
        Ok(ForecastRequest {
            horizon,
            lookback,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ratio() {
        let planner = WindowPlanner::default();
        assert_eq!(planner.plan(30), 60);
        assert_eq!(planner.lookback_ratio(), DEFAULT_LOOKBACK_RATIO);
    }

    #[test]
    fn test_zero_ratio_rejected() {
        assert!(WindowPlanner::new(0).is_err());
    }

    #[test]
    fn test_error_carries_lengths() {
        let planner = WindowPlanner::new(3).unwrap();
        let lookback = planner.plan(10);
        match planner.validate(25, lookback, 10) {
            Err(ForecastError::InsufficientData { required, actual }) => {
                assert_eq!(required, 40);
                assert_eq!(actual, 25);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }
}
