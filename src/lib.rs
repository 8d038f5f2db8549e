//! # Owl Forecast
//!
//! `owl_forecast` bundles the numeric building blocks in [`math`] with the
//! forecasting pipeline in [`forecast`].
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use owl_forecast::forecast::{BusinessCalendar, PriceSeries, WindowPlanner};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let dates = BusinessCalendar::weekdays().business_days_from(start, 95).unwrap();
//! let closes = (0..95).map(|i| 100.0 + i as f64).collect();
//! let series = PriceSeries::from_parts(dates, closes).unwrap();
//!
//! let request = WindowPlanner::default().plan_request(&series, 30).unwrap();
//! assert_eq!(request.lookback, 60);
//! ```

/// Forecasting pipeline, providers and configuration
pub use forecast_trade as forecast;
/// Log-domain transform, scalers, moving averages and optimisers
pub use trade_math as math;

pub use forecast_trade::{run, ComparisonResult, ForecastError, ForecastPipeline, PipelineConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_exposes_both_crates() {
        let values = math::transform::forward(&[0.0_f64, 1.0]).unwrap();
        assert_eq!(values[0], 0.0);
        assert_eq!(forecast::config::DEFAULT_HORIZON, 30);
        assert!(PipelineConfig::default().validate().is_ok());
    }
}
