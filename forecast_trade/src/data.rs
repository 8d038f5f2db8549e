//! Daily price data: OHLCV bars as delivered by a provider and the close-only
//! series the forecasting pipeline reads.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One daily OHLCV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    /// Open price
    #[serde(alias = "Open")]
    pub open: f64,
    /// High price
    #[serde(alias = "High")]
    pub high: f64,
    /// Low price
    #[serde(alias = "Low")]
    pub low: f64,
    /// Close price
    #[serde(alias = "Close")]
    pub close: f64,
    /// Traded volume
    #[serde(alias = "Volume")]
    pub volume: u64,
}

/// A dated close price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ordered daily close series.
///
/// Dates are strictly increasing weekdays (so no duplicates) and every close
/// is positive and finite. The pipeline only ever reads a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, checking ordering, positivity and business-day dates
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if let Some(bad) = points
            .iter()
            .find(|p| matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun))
        {
            return Err(ForecastError::InvalidSeries(format!(
                "{} falls on a weekend",
                bad.date
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
            return Err(ForecastError::InvalidSeries(format!(
                "close on {} must be positive and finite, got {}",
                bad.date, bad.close
            )));
        }
        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(ForecastError::InvalidSeries(format!(
                "dates must be strictly increasing ({} is followed by {})",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { points })
    }

    /// Build a series from parallel date and close vectors
    pub fn from_parts(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "dates length ({}) doesn't match closes length ({})",
                dates.len(),
                closes.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(closes)
                .map(|(date, close)| PricePoint::new(date, close))
                .collect(),
        )
    }

    /// Build a close series from OHLCV bars
    pub fn from_bars(bars: &[DailyBar]) -> Result<Self> {
        Self::new(
            bars.iter()
                .map(|bar| PricePoint::new(bar.date, bar.close))
                .collect(),
        )
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All observations in date order
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Close prices in date order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Dates in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Most recent observation
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The trailing `n` observations (or the whole series when shorter)
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Loader for daily bar files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load bars from a CSV file with a `date,open,high,low,close,volume` header
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<DailyBar>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load bars from any CSV reader, sorted by date
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<DailyBar>> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut bars = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<DailyBar>, csv::Error>>()?;
        bars.sort_by_key(|bar| bar.date);

        Ok(bars)
    }
}
