use chrono::{Local, NaiveDate};
use clap::Parser;
use forecast_trade::cache::SeriesCache;
use forecast_trade::provider::{
    CsvHistoryProvider, DateRange, InstrumentId, InstrumentResolver, ListingResolver,
};
use forecast_trade::summary::SeriesSummary;
use forecast_trade::{ForecastError, ForecastPipeline, PipelineConfig, PriceSeries};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Forecast a listed instrument from CSV price history and print the comparison as JSON
#[derive(Parser, Debug)]
#[command(name = "forecast_report", version)]
struct Args {
    /// Directory holding `<code>.csv` daily bar files
    #[arg(long)]
    data_dir: PathBuf,

    /// Company name or six-digit code
    #[arg(long)]
    instrument: String,

    /// Listing CSV with `name,code` columns used to resolve names
    #[arg(long)]
    listing: Option<PathBuf>,

    /// First date of history (defaults to one year before --end)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date of history (defaults to today)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Business days to forecast (defaults to the configured horizon)
    #[arg(long)]
    horizon: Option<usize>,

    /// Pipeline configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_trade=info".into()),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "forecast failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ForecastError> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    let resolver = match &args.listing {
        Some(path) => ListingResolver::from_csv(path)?,
        None => ListingResolver::default(),
    };
    let id: InstrumentId = resolver
        .resolve(&args.instrument)
        .ok_or_else(|| ForecastError::InstrumentNotFound(args.instrument.clone()))?;

    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    let range = match args.start {
        Some(start) => DateRange::new(start, end)?,
        None => DateRange::last_year(end),
    };

    let provider = CsvHistoryProvider::new(&args.data_dir);
    let mut cache = SeriesCache::new();
    let bars = cache.get_or_fetch(&provider, &id, &range)?;

    let summary = SeriesSummary::from_bars(&bars)?;
    println!("Instrument {}", id);
    print!("{}", summary);

    let series = PriceSeries::from_bars(&bars)?;
    let horizon = args.horizon.unwrap_or(config.default_horizon);
    let comparison = ForecastPipeline::new(&config)?.run(&series, horizon)?;

    println!("{}", comparison.to_json()?);
    Ok(())
}
