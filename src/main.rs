use anyhow::{Context, Result};
use clap::Parser;
use hestia::aggregate::CalculationResult;
use hestia::calculator::{Calculator, PreparedSeries, TariffDefinition};
use hestia::calendar::{CalendarLookup, InMemoryCalendar, NoCalendar};
use hestia::cli::{Args, CalculateArgs, Command, OffersArgs, SeriesArgs};
use hestia::config::Config;
use hestia::logging::init_logging;
use hestia::reading::load_samples_file;
use hestia::series::DateWindow;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::load()?,
    };
    config.validate()?;
    init_logging(&config.logging)?;
    info!("Hestia {} starting", env!("APP_VERSION"));

    let calculator = Calculator::from_config(&config.calculation)?;

    match args.command {
        Command::Calculate(calculate) => run_calculate(&calculator, &config, calculate),
        Command::Compare(series) => run_compare(&calculator, &config, &series),
        Command::Offers(offers) => run_offers(&calculator, &offers),
    }
}

fn prepare(calculator: &Calculator, args: &SeriesArgs) -> Result<PreparedSeries> {
    let readings = load_samples_file(&args.samples, calculator.timezone())
        .with_context(|| format!("failed to read {}", args.samples.display()))?;
    let window = DateWindow::new(args.start, args.end)?;
    let mut prepared = calculator.prepare(&readings.samples, window)?;
    prepared.data_quality.rejected_samples += readings.rejected;
    Ok(prepared)
}

fn load_calendar(args: &SeriesArgs) -> Result<Box<dyn CalendarLookup>> {
    Ok(match &args.calendar {
        Some(path) => Box::new(
            InMemoryCalendar::from_file(path)
                .with_context(|| format!("failed to load calendar {}", path.display()))?,
        ),
        None => Box::new(NoCalendar),
    })
}

fn run_calculate(calculator: &Calculator, config: &Config, args: CalculateArgs) -> Result<()> {
    let tariff = match &args.tariff {
        Some(name) => config.tariff(name)?,
        None => config.tariffs.first().context("no tariff configured")?,
    };
    let definition = TariffDefinition::try_from(tariff)?;
    calculator.check_offer(&definition.offer_type, &definition.options, &definition.prices)?;
    let prepared = prepare(calculator, &args.series)?;
    let calendar = load_calendar(&args.series)?;

    let mut result = calculator.calculate(
        &prepared.series,
        &definition.offer_type,
        &definition.options,
        &definition.prices,
        calendar.as_ref(),
    )?;
    result.data_quality = prepared.data_quality;

    let rounded = result.rounded();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rounded)?);
    } else {
        print_result(&definition.name, &rounded);
    }
    Ok(())
}

fn run_compare(calculator: &Calculator, config: &Config, args: &SeriesArgs) -> Result<()> {
    let tariffs = config
        .tariffs
        .iter()
        .map(TariffDefinition::try_from)
        .collect::<hestia::Result<Vec<_>>>()?;
    let prepared = prepare(calculator, args)?;
    let calendar = load_calendar(args)?;

    for (rank, comparison) in calculator
        .compare(&prepared.series, &tariffs, calendar.as_ref())
        .iter()
        .enumerate()
    {
        match (&comparison.result, &comparison.error) {
            (Some(result), _) => println!(
                "{:>2}. {:<24} {:<16} {}",
                rank + 1,
                comparison.name,
                comparison.offer_type,
                result.total_with_subscription.round_to_cents()
            ),
            (None, error) => println!(
                "  -  {:<24} {:<16} {}",
                comparison.name,
                comparison.offer_type,
                error.as_deref().unwrap_or("failed")
            ),
        }
    }
    Ok(())
}

fn run_offers(calculator: &Calculator, args: &OffersArgs) -> Result<()> {
    let json = match &args.code {
        Some(code) => serde_json::to_string_pretty(&calculator.registry().describe(code)?)?,
        None => serde_json::to_string_pretty(&calculator.registry().catalog()?)?,
    };
    println!("{}", json);
    Ok(())
}

fn print_result(name: &str, result: &CalculationResult) {
    println!("{} ({}), {} day(s)", name, result.offer_type, result.days);
    for period in &result.periods {
        println!(
            "  {:<14} {:>12} {:>8}%  x {:<14} = {}",
            period.name,
            period.consumption_kwh,
            period.percentage_of_total,
            period.unit_price,
            period.cost_euros
        );
    }
    println!("  consumption    {}", result.total_kwh);
    println!("  energy cost    {}", result.total_cost_euros);
    println!("  subscription   {}", result.subscription_cost_euros);
    println!("  total          {}", result.total_with_subscription);

    let quality = &result.data_quality;
    if !quality.is_clean() {
        println!(
            "  data quality   {} rejected, {} defaulted interval(s), {} duplicate(s) ({} conflicting), {} outside window",
            quality.rejected_samples,
            quality.defaulted_intervals,
            quality.duplicate_timestamps,
            quality.conflicting_duplicates,
            quality.out_of_window_samples
        );
    }
}
