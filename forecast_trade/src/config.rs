//! Configuration accepted by the forecast pipeline
//!
//! Only the horizon default, the lookback ratio and the market holiday list
//! cross this boundary; model hyperparameters stay internal.
//!
//! ```toml
//! lookback_ratio = 2
//! default_horizon = 30
//! holidays = ["2024-12-25", "2025-01-01"]
//! ```

use crate::calendar::BusinessCalendar;
use crate::error::{ForecastError, Result};
use crate::window::{WindowPlanner, DEFAULT_LOOKBACK_RATIO};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Supported forecast horizons in business days
pub const HORIZON_RANGE: RangeInclusive<usize> = 7..=60;

/// Horizon used when none is requested
pub const DEFAULT_HORIZON: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub lookback_ratio: usize,
    pub default_horizon: usize,
    pub holidays: Vec<NaiveDate>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_ratio: DEFAULT_LOOKBACK_RATIO,
            default_horizon: DEFAULT_HORIZON,
            holidays: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookback_ratio == 0 {
            return Err(ForecastError::InvalidConfig(
                "lookback_ratio must be at least 1".to_string(),
            ));
        }
        check_horizon(self.default_horizon).map_err(|_| {
            ForecastError::InvalidConfig(format!(
                "default_horizon {} outside {}..={}",
                self.default_horizon,
                HORIZON_RANGE.start(),
                HORIZON_RANGE.end()
            ))
        })
    }

    pub fn planner(&self) -> Result<WindowPlanner> {
        WindowPlanner::new(self.lookback_ratio)
    }

    pub fn calendar(&self) -> BusinessCalendar {
        BusinessCalendar::with_holidays(self.holidays.iter().copied())
    }
}

/// Fail unless `horizon` lies in [`HORIZON_RANGE`]
pub fn check_horizon(horizon: usize) -> Result<()> {
    if HORIZON_RANGE.contains(&horizon) {
        Ok(())
    } else {
        Err(ForecastError::InvalidHorizon {
            horizon,
            min: *HORIZON_RANGE.start(),
            max: *HORIZON_RANGE.end(),
        })
    }
}
