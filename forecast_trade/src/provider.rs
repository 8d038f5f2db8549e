//! Price history sources and instrument name resolution
//!
//! The pipeline only needs a validated series; these collaborators turn a
//! user query (company name or six-digit code) and a date range into one.

use crate::data::{DailyBar, DataLoader};
use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Length of a listed security code
pub const CODE_LEN: usize = 6;

/// Canonical six-digit security code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrumentId(String);

impl InstrumentId {
    /// Parse a numeric code, left-padding with zeros to six digits
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() || code.len() > CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ForecastError::InstrumentNotFound(format!(
                "'{}' is not a numeric code of up to {} digits",
                code, CODE_LEN
            )));
        }
        Ok(Self(format!("{:0>width$}", code, width = CODE_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidConfig(format!(
                "date range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The 365 days ending on `today`
    pub fn last_year(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(365),
            end: today,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Source of daily bars for an instrument
pub trait PriceHistoryProvider {
    /// Bars for `id` inside `range`, in date order
    fn fetch(&self, id: &InstrumentId, range: &DateRange) -> Result<Vec<DailyBar>>;
}

/// Reads `<dir>/<code>.csv` files
#[derive(Debug, Clone)]
pub struct CsvHistoryProvider {
    dir: PathBuf,
}

impl CsvHistoryProvider {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, id: &InstrumentId) -> PathBuf {
        self.dir.join(format!("{}.csv", id))
    }
}

impl PriceHistoryProvider for CsvHistoryProvider {
    fn fetch(&self, id: &InstrumentId, range: &DateRange) -> Result<Vec<DailyBar>> {
        let path = self.path_for(id);
        debug!(instrument = %id, path = %path.display(), "loading price history");

        let bars: Vec<DailyBar> = DataLoader::from_csv(&path)?
            .into_iter()
            .filter(|bar| range.contains(bar.date))
            .collect();

        if bars.is_empty() {
            return Err(ForecastError::Provider(format!(
                "no prices for {} between {} and {}",
                id,
                range.start(),
                range.end()
            )));
        }
        Ok(bars)
    }
}

/// Maps free-text instrument names to codes
pub trait InstrumentResolver {
    fn resolve(&self, query: &str) -> Option<InstrumentId>;
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    name: String,
    code: String,
}

/// Resolver backed by an exchange listing of (name, code) pairs.
///
/// A query that already is a six-digit code resolves to itself.
#[derive(Debug, Clone, Default)]
pub struct ListingResolver {
    by_name: HashMap<String, InstrumentId>,
}

impl ListingResolver {
    /// Build from (name, code) pairs; invalid codes are rejected
    pub fn from_pairs<I, N, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: AsRef<str>,
    {
        let by_name = pairs
            .into_iter()
            .map(|(name, code)| {
                let name: String = name.into();
                Ok((name.trim().to_string(), InstrumentId::parse(code.as_ref())?))
            })
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { by_name })
    }

    /// Load a listing CSV with `name,code` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(File::open(path)?);
        let rows = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<ListingRow>, csv::Error>>()?;
        Self::from_pairs(rows.into_iter().map(|row| (row.name, row.code)))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl InstrumentResolver for ListingResolver {
    fn resolve(&self, query: &str) -> Option<InstrumentId> {
        let query = query.trim();
        if query.len() == CODE_LEN && query.chars().all(|c| c.is_ascii_digit()) {
            return InstrumentId::parse(query).ok();
        }
        self.by_name.get(query).cloned()
    }
}
