//! # Forecast Trade
//!
//! Multi-model price forecasting for daily price series.
//!
//! ## Features
//!
//! - Daily price series with ordering and positivity checks
//! - Lookback planning from the forecast horizon with fail-fast history checks
//! - Three model families (patch embedding, time mixing, trend/seasonal
//!   decomposition) trained concurrently in the log domain
//! - Continuity correction so every forecast starts at the last close
//! - A business-day date axis shared by all forecasts
//! - CSV price history, instrument name resolution and a caller-owned cache
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_trade::data::{DataLoader, PriceSeries};
//! use forecast_trade::ForecastPipeline;
//!
//! let bars = DataLoader::from_csv("005930.csv")?;
//! let series = PriceSeries::from_bars(&bars)?;
//!
//! let comparison = ForecastPipeline::default().run(&series, 10)?;
//! for (model, forecast) in &comparison.forecasts {
//!     println!("{}: {:?}", model, forecast.values());
//! }
//! for (model, cause) in &comparison.failures {
//!     println!("{} failed: {}", model, cause);
//! }
//! # Ok::<(), forecast_trade::ForecastError>(())
//! ```

pub mod assembler;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod correction;
pub mod data;
pub mod ensemble;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod summary;
pub mod window;

// Re-export commonly used types
pub use crate::assembler::ComparisonResult;
pub use crate::calendar::BusinessCalendar;
pub use crate::config::PipelineConfig;
pub use crate::correction::CorrectedForecast;
pub use crate::data::{DailyBar, DataLoader, PricePoint, PriceSeries};
pub use crate::ensemble::ModelEnsemble;
pub use crate::error::{ForecastError, ModelFitError};
pub use crate::models::{ForecastModel, ModelKind, ModelVariant, TrainedForecastModel};
pub use crate::pipeline::{run, ForecastPipeline};
pub use crate::window::WindowPlanner;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
