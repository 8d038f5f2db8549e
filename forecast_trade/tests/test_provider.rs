mod common;

use common::{bars, date};
use forecast_trade::cache::SeriesCache;
use forecast_trade::provider::{
    CsvHistoryProvider, DateRange, InstrumentId, InstrumentResolver, ListingResolver,
    PriceHistoryProvider,
};
use forecast_trade::{DailyBar, ForecastError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cell::Cell;
use std::fs;
use std::sync::Arc;

#[rstest]
#[case("5930", "005930")]
#[case("005930", "005930")]
#[case(" 660 ", "000660")]
#[case("1", "000001")]
fn test_codes_are_zero_padded(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(InstrumentId::parse(raw).unwrap().as_str(), expected);
}

#[rstest]
#[case("")]
#[case("SAMSUNG")]
#[case("1234567")]
#[case("12a4")]
fn test_bad_codes_are_rejected(#[case] raw: &str) {
    assert!(matches!(
        InstrumentId::parse(raw),
        Err(ForecastError::InstrumentNotFound(_))
    ));
}

#[test]
fn test_resolver_lookup_and_passthrough() {
    let resolver =
        ListingResolver::from_pairs(vec![("Samsung Electronics", "5930"), ("SK hynix", "000660")])
            .unwrap();

    assert_eq!(resolver.len(), 2);
    assert_eq!(
        resolver.resolve("Samsung Electronics").map(|id| id.to_string()),
        Some("005930".to_string())
    );
    assert_eq!(
        resolver.resolve("035420").map(|id| id.to_string()),
        Some("035420".to_string())
    );
    assert_eq!(resolver.resolve("Unknown Corp"), None);
    assert_eq!(resolver.resolve("5930"), None);
}

#[test]
fn test_resolver_from_listing_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listing.csv");
    fs::write(&path, "name,code\nSamsung Electronics,5930\nNAVER,35420\n").unwrap();

    let resolver = ListingResolver::from_csv(&path).unwrap();
    assert_eq!(
        resolver.resolve("NAVER").map(|id| id.to_string()),
        Some("035420".to_string())
    );
}

#[test]
fn test_date_range() {
    let range = DateRange::last_year(date("2024-06-30"));
    assert_eq!(range.start(), date("2023-07-01"));
    assert!(range.contains(date("2024-06-30")));
    assert!(!range.contains(date("2023-06-30")));

    assert!(DateRange::new(date("2024-02-01"), date("2024-01-01")).is_err());
}

fn write_history(dir: &std::path::Path) {
    fs::write(
        dir.join("005930.csv"),
        "date,open,high,low,close,volume\n\
         2024-01-02,100,102,99,101,10\n\
         2024-01-03,101,104,100,103,12\n\
         2024-01-04,103,103,98,99,9\n",
    )
    .unwrap();
}

#[test]
fn test_csv_provider_filters_range() {
    let dir = tempfile::tempdir().unwrap();
    write_history(dir.path());
    let provider = CsvHistoryProvider::new(dir.path());
    let id = InstrumentId::parse("5930").unwrap();

    let range = DateRange::new(date("2024-01-03"), date("2024-01-31")).unwrap();
    let fetched = provider.fetch(&id, &range).unwrap();
    assert_eq!(
        fetched,
        bars(&[
            ("2024-01-03", 101.0, 104.0, 100.0, 103.0, 12),
            ("2024-01-04", 103.0, 103.0, 98.0, 99.0, 9),
        ])
    );

    let empty = DateRange::new(date("2023-01-01"), date("2023-12-31")).unwrap();
    assert!(matches!(
        provider.fetch(&id, &empty),
        Err(ForecastError::Provider(_))
    ));
}

#[derive(Default)]
struct CountingProvider {
    calls: Cell<usize>,
}

impl PriceHistoryProvider for CountingProvider {
    fn fetch(&self, _id: &InstrumentId, range: &DateRange) -> forecast_trade::error::Result<Vec<DailyBar>> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![DailyBar {
            date: range.end(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 0,
        }])
    }
}

#[test]
fn test_cache_serves_repeat_requests() {
    let provider = CountingProvider::default();
    let mut cache = SeriesCache::new();
    let id = InstrumentId::parse("005930").unwrap();
    let range = DateRange::last_year(date("2024-06-30"));

    let first = cache.get_or_fetch(&provider, &id, &range).unwrap();
    let second = cache.get_or_fetch(&provider, &id, &range).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.calls.get(), 1);
    assert_eq!(cache.stats(), (1, 1));

    let other = DateRange::last_year(date("2024-07-01"));
    cache.get_or_fetch(&provider, &id, &other).unwrap();
    assert_eq!(provider.calls.get(), 2);
    assert_eq!(cache.len(), 2);

    assert!(cache.invalidate(&id, &range));
    assert!(!cache.invalidate(&id, &range));
    assert!(cache.get(&id, &range).is_none());
    cache.get_or_fetch(&provider, &id, &range).unwrap();
    assert_eq!(provider.calls.get(), 3);

    cache.invalidate_instrument(&id);
    assert!(cache.is_empty());

    cache.get_or_fetch(&provider, &id, &range).unwrap();
    cache.clear();
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_cache_does_not_store_failures() {
    let dir = tempfile::tempdir().unwrap();
    let provider = CsvHistoryProvider::new(dir.path());
    let mut cache = SeriesCache::new();
    let id = InstrumentId::parse("000660").unwrap();

    assert!(cache
        .get_or_fetch(&provider, &id, &DateRange::last_year(date("2024-06-30")))
        .is_err());
    assert!(cache.is_empty());
}
