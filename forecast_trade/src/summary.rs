//! Headline figures and moving-average overlays for a fetched price history

use crate::data::DailyBar;
use crate::error::{ForecastError, Result};
use serde::Serialize;
use trade_math::moving_averages::rolling_mean;

/// Short and long overlay windows
pub const SHORT_MA_WINDOW: usize = 5;
pub const LONG_MA_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub last_close: f64,
    /// `(last - first) / first * 100` over the whole history
    pub period_return_pct: f64,
    pub highest_high: f64,
    pub short_ma: Vec<Option<f64>>,
    pub long_ma: Vec<Option<f64>>,
}

impl SeriesSummary {
    pub fn from_bars(bars: &[DailyBar]) -> Result<Self> {
        let (first, last) = match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(ForecastError::InvalidSeries(
                    "cannot summarise an empty history".to_string(),
                ))
            }
        };
        if first.close <= 0.0 {
            return Err(ForecastError::InvalidSeries(format!(
                "first close on {} must be positive",
                first.date
            )));
        }

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let highest_high = bars.iter().map(|bar| bar.high).fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            last_close: last.close,
            period_return_pct: (last.close - first.close) / first.close * 100.0,
            highest_high,
            short_ma: rolling_mean(&closes, SHORT_MA_WINDOW)?,
            long_ma: rolling_mean(&closes, LONG_MA_WINDOW)?,
        })
    }
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Series Summary:")?;
        writeln!(f, "  Last close:    {:.2}", self.last_close)?;
        writeln!(f, "  Period return: {:.2}%", self.period_return_pct)?;
        writeln!(f, "  Highest high:  {:.2}", self.highest_high)?;
        Ok(())
    }
}
