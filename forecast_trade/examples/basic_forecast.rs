use chrono::NaiveDate;
use forecast_trade::{BusinessCalendar, ForecastPipeline, PriceSeries};

// Generate a trending, cyclical close series on business days
fn synthetic_series(days: usize) -> Result<PriceSeries, Box<dyn std::error::Error>> {
    let calendar = BusinessCalendar::weekdays();
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).ok_or("bad start date")?;
    let dates = calendar.business_days_from(start, days)?;
    let closes = (0..days)
        .map(|i| {
            let t = i as f64;
            70_000.0 + 25.0 * t + 1_500.0 * (t / 15.0).sin()
        })
        .collect();

    Ok(PriceSeries::from_parts(dates, closes)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let series = synthetic_series(300)?;
    let last = series.last().ok_or("empty series")?;
    println!("Last close {:.0} on {}", last.close, last.date);

    let comparison = ForecastPipeline::default().run(&series, 10)?;

    for (model, forecast) in &comparison.forecasts {
        println!("\n{} (offset {:+.2})", model, forecast.offset);
        for point in &forecast.points {
            println!("  {}  {:>10.2}", point.date, point.value);
        }
    }
    for (model, cause) in &comparison.failures {
        println!("\n{} failed: {}", model, cause);
    }

    Ok(())
}
