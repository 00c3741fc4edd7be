//! Command line interface

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version = env!("APP_VERSION"), about, propagate_version = true)]
pub struct Args {
    /// Configuration file; defaults to `hestia.yaml` or `/etc/hestia/config.yaml`.
    #[clap(long, short = 'c', env = "HESTIA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Price a consumption file under one configured tariff.
    #[clap(name = "calculate")]
    Calculate(CalculateArgs),

    /// Price a consumption file under every configured tariff, cheapest first.
    #[clap(name = "compare")]
    Compare(SeriesArgs),

    /// Print offer type metadata as JSON.
    #[clap(name = "offers")]
    Offers(OffersArgs),
}

#[derive(Parser)]
pub struct SeriesArgs {
    /// JSON file: a provider load-curve payload or an array of raw samples.
    #[clap(long)]
    pub samples: PathBuf,

    /// First billed day.
    #[clap(long)]
    pub start: NaiveDate,

    /// Last billed day, included.
    #[clap(long)]
    pub end: NaiveDate,

    /// YAML or JSON file of calendar days, for Tempo, EJP, Zen Flex and peak-day pricing.
    #[clap(long)]
    pub calendar: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CalculateArgs {
    #[clap(flatten)]
    pub series: SeriesArgs,

    /// Tariff name from the configuration; the first tariff when omitted.
    #[clap(long)]
    pub tariff: Option<String>,

    /// Print the result as JSON.
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct OffersArgs {
    /// Describe a single offer type.
    #[clap(long)]
    pub code: Option<String>,
}
