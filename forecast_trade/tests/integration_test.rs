mod common;

use approx::assert_relative_eq;
use chrono::{Datelike, Weekday};
use common::series_ending_at;
use forecast_trade::models::Tuning;
use forecast_trade::{
    ForecastError, ForecastPipeline, ModelEnsemble, ModelFitError, ModelKind, PipelineConfig,
};
use pretty_assertions::assert_eq;

#[test]
fn test_scenario_four_hundred_days_horizon_ten() {
    let series = series_ending_at(400, 1000.0);
    let last_date = series.last().unwrap().date;

    let result = forecast_trade::run(&series, 10).unwrap();

    assert_eq!(result.future_dates.len(), 10);
    assert!(result.future_dates.iter().all(|d| *d > last_date));
    assert!(result
        .future_dates
        .iter()
        .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
    assert!(result.future_dates.windows(2).all(|w| w[0] < w[1]));

    assert!(!result.forecasts.is_empty());
    for (kind, forecast) in &result.forecasts {
        assert_eq!(forecast.len(), 10, "{} length", kind);
        assert_relative_eq!(forecast.first_value().unwrap(), 1000.0, max_relative = 1e-9);
        let dates: Vec<_> = forecast.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, result.future_dates);
        assert!(forecast.values().iter().all(|v| v.is_finite()));
    }
    assert_eq!(result.forecasts.len() + result.failures.len(), 3);
}

#[test]
fn test_default_ensemble_completes_every_variant() {
    let series = series_ending_at(200, 250.0);
    let result = forecast_trade::run(&series, 7).unwrap();

    assert!(result.failures.is_empty(), "failures: {:?}", result.failures);
    let kinds: Vec<ModelKind> = result.forecasts.keys().copied().collect();
    assert_eq!(kinds, ModelKind::ALL.to_vec());
}

#[test]
fn test_single_variant_failure_keeps_the_others() {
    let series = series_ending_at(150, 500.0);
    let broken = Tuning {
        learning_rate: f64::NAN,
        ..ModelKind::Mixer.default_tuning()
    };
    let pipeline = ForecastPipeline::default()
        .with_ensemble(ModelEnsemble::default().with_tuning(ModelKind::Mixer, broken));

    let result = pipeline.run(&series, 10).unwrap();

    let kinds: Vec<ModelKind> = result.forecasts.keys().copied().collect();
    assert_eq!(kinds, vec![ModelKind::Patch, ModelKind::Decomposition]);
    assert!(matches!(
        result.failure(ModelKind::Mixer),
        Some(ModelFitError::InvalidHyperparameter(_))
    ));
    assert!(result.forecast(ModelKind::Mixer).is_none());
}

#[test]
fn test_insufficient_history_fails_before_training() {
    let series = series_ending_at(85, 100.0);

    match forecast_trade::run(&series, 30) {
        Err(ForecastError::InsufficientData { required, actual }) => {
            assert_eq!(required, 90);
            assert_eq!(actual, 85);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_horizon_outside_supported_range() {
    let series = series_ending_at(400, 100.0);
    assert!(matches!(
        forecast_trade::run(&series, 5),
        Err(ForecastError::InvalidHorizon { horizon: 5, min: 7, max: 60 })
    ));
    assert!(matches!(
        forecast_trade::run(&series, 61),
        Err(ForecastError::InvalidHorizon { .. })
    ));
}

#[test]
fn test_repeated_runs_are_identical() {
    let series = series_ending_at(120, 42.0);
    let pipeline = ForecastPipeline::default();

    let first = pipeline.run(&series, 7).unwrap();
    let second = pipeline.run(&series, 7).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_configured_holidays_shape_the_axis() {
    let series = series_ending_at(100, 80.0);
    let last_date = series.last().unwrap().date;
    let calendar = forecast_trade::BusinessCalendar::weekdays();
    let skipped = calendar.next_business_day(last_date).unwrap();

    let config = PipelineConfig {
        lookback_ratio: 3,
        holidays: vec![skipped],
        ..PipelineConfig::default()
    };
    let result = ForecastPipeline::new(&config).unwrap().run(&series, 7).unwrap();

    assert!(!result.future_dates.contains(&skipped));
    assert_eq!(result.future_dates.len(), 7);
}

#[test]
fn test_comparison_serialises_to_json() {
    let series = series_ending_at(80, 10.0);
    let broken = Tuning {
        max_training_steps: 0,
        ..ModelKind::Patch.default_tuning()
    };
    let pipeline = ForecastPipeline::default()
        .with_ensemble(ModelEnsemble::default().with_tuning(ModelKind::Patch, broken));

    let json = pipeline.run(&series, 7).unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["future_dates"].as_array().unwrap().len(), 7);
    assert!(value["forecasts"]["decomposition"]["points"].is_array());
    assert_eq!(
        value["failures"]["patch"]["error"],
        serde_json::json!("invalid_hyperparameter")
    );
}

#[test]
fn test_unusable_price_forecast_is_reported_as_failure() {
    let series = series_ending_at(150, 1000.0);
    let exploding = Tuning {
        learning_rate: 1e6,
        scale_mode: trade_math::scaling::ScaleMode::Identity,
        ..ModelKind::Decomposition.default_tuning()
    };
    let pipeline = ForecastPipeline::default()
        .with_ensemble(ModelEnsemble::default().with_tuning(ModelKind::Decomposition, exploding));

    let result = pipeline.run(&series, 10).unwrap();

    assert!(result.forecast(ModelKind::Decomposition).is_none());
    assert!(matches!(
        result.failure(ModelKind::Decomposition),
        Some(ModelFitError::NonFiniteForecast)
            | Some(ModelFitError::OutOfDomain { .. })
            | Some(ModelFitError::Diverged { .. })
    ));
    for forecast in result.forecasts.values() {
        assert_eq!(forecast.len(), 10);
        assert!(forecast.values().iter().all(|v| v.is_finite() && *v > 0.0));
    }
    assert_eq!(result.forecasts.len() + result.failures.len(), 3);
}
