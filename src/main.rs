use chrono::Local;
use clap::{Parser as _, Subcommand};
use hotel_sniper::client::AmadeusClient;
use hotel_sniper::config::{
    load_config, load_credentials, load_destinations, load_environment, AppConfig,
};
use hotel_sniper::model::{AppError, StorageError};
use hotel_sniper::parser::AmadeusParser;
use hotel_sniper::search::{coarse_check_in_dates, run_search};
use hotel_sniper::storage::reports::{read_cheapest_by_place, write_json};
use hotel_sniper::storage::{write_reports, OutputPaths, QuoteLog};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Parser)]
#[command(name = "hotel-sniper", version, about = "Cheapest summer stay per destination")]
struct Cli {
    /// Search settings
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Country -> places mapping
    #[arg(long, default_value = "destinations.yaml")]
    destinations: PathBuf,

    /// Overrides `output.dir` from the config
    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Shortlist, scan and refine every destination, then write all reports
    Search,
    /// Print the coarse check-in dates without calling the API
    Windows,
    /// Rebuild the country aggregate and CSV from cheapest_by_place.json
    Aggregate,
    /// Fetch the current details of a single offer
    Offer { offer_id: String },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli.config)?;
    let out_dir = cli
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));

    match cli.command.unwrap_or(Command::Search) {
        Command::Search => search(&config, &cli.destinations, &out_dir),
        Command::Windows => {
            print_windows(&config);
            Ok(())
        }
        Command::Aggregate => aggregate(&out_dir),
        Command::Offer { offer_id } => offer_details(&config, &offer_id),
    }
}

fn connect(config: &AppConfig) -> Result<AmadeusClient, AppError> {
    let env = load_environment();
    let credentials = load_credentials()?;
    let host = config.api.host_for(env);
    info!("Using API host {}", host);
    Ok(AmadeusClient::new(
        host,
        credentials,
        config.api.call_delay(),
        Duration::from_secs(config.api.timeout_secs),
    )?)
}

fn search(config: &AppConfig, destinations_path: &Path, out_dir: &Path) -> Result<(), AppError> {
    let client = connect(config)?;
    let destinations = load_destinations(destinations_path, config)?;
    info!("Destinations to process: {}", destinations.len());

    fs::create_dir_all(out_dir).map_err(StorageError::from)?;
    let paths = OutputPaths::in_dir(out_dir);
    let mut log = QuoteLog::create(&paths.raw_quotes)?;

    let coarse_dates = coarse_check_in_dates(&config.search);
    info!("Coarse check-in dates: {}", coarse_dates.len());
    let verified_at = Local::now().to_rfc3339();

    let by_place = run_search(
        &client,
        &AmadeusParser::new(),
        config,
        &destinations,
        &coarse_dates,
        &verified_at,
        &mut log,
    )?;

    write_json(&paths.by_place, &by_place)?;
    write_reports(&paths, &by_place)?;
    info!(
        "Wrote:\n- {}\n- {}\n- {}\n- {}",
        paths.by_place.display(),
        paths.by_country.display(),
        paths.csv.display(),
        paths.raw_quotes.display()
    );
    Ok(())
}

fn print_windows(config: &AppConfig) {
    let dates = coarse_check_in_dates(&config.search);
    for date in &dates {
        println!("{} {}", date, date.format("%a"));
    }
    info!("{} candidate check-in dates", dates.len());
}

fn aggregate(out_dir: &Path) -> Result<(), AppError> {
    let paths = OutputPaths::in_dir(out_dir);
    let by_place = read_cheapest_by_place(&paths.by_place)?;
    let by_country = write_reports(&paths, &by_place)?;
    info!(
        "Aggregated {} countries into {} and {}",
        by_country.len(),
        paths.by_country.display(),
        paths.csv.display()
    );
    Ok(())
}

fn offer_details(config: &AppConfig, offer_id: &str) -> Result<(), AppError> {
    let client = connect(config)?;
    let details = client.hotel_offer_details(offer_id)?;
    let pretty = serde_json::to_string_pretty(&details).map_err(StorageError::from)?;
    println!("{pretty}");
    Ok(())
}
