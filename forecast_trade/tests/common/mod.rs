#![allow(dead_code)]

use chrono::NaiveDate;
use forecast_trade::{BusinessCalendar, DailyBar, PriceSeries};

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Business-day closes with a gentle trend and cycle, the last one forced to `last_value`
pub fn series_ending_at(len: usize, last_value: f64) -> PriceSeries {
    let calendar = BusinessCalendar::weekdays();
    let dates = calendar.business_days_from(date("2022-01-03"), len).unwrap();
    let mut closes: Vec<f64> = (0..len)
        .map(|i| {
            let t = i as f64;
            last_value * (0.9 + 0.1 * t / len as f64) + 0.02 * last_value * (t / 9.0).sin()
        })
        .collect();
    if let Some(last) = closes.last_mut() {
        *last = last_value;
    }
    PriceSeries::from_parts(dates, closes).unwrap()
}

pub fn bars(rows: &[(&str, f64, f64, f64, f64, u64)]) -> Vec<DailyBar> {
    rows.iter()
        .map(|(d, open, high, low, close, volume)| DailyBar {
            date: date(d),
            open: *open,
            high: *high,
            low: *low,
            close: *close,
            volume: *volume,
        })
        .collect()
}
