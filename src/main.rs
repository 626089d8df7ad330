use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use trip_contacts::config::{parse_delimiter, Config};
use trip_contacts::constants::{default_output_path, DEFAULT_INPUT_FILE};
use trip_contacts::pipeline::{Pipeline, PipelineResult};
use trip_contacts::{logging, report};

#[derive(Parser)]
#[command(name = "trip_contacts")]
#[command(about = "Turn a trip sign-up spreadsheet into a CSV contact list grouped by trip")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Args)]
struct Settings {
    /// TOML config file (defaults to ./trip_contacts.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Region for phone numbers without a country code, e.g. IL
    #[arg(long, global = true)]
    region: Option<String>,

    /// Text prepended to every contact name
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Character separating trip names in the trips column
    #[arg(long, global = true)]
    delimiter: Option<String>,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the roster spreadsheet into a contact CSV
    Convert {
        /// Input spreadsheet
        #[arg(default_value = DEFAULT_INPUT_FILE)]
        input: PathBuf,
        /// Output CSV (defaults to the input path with .csv appended)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the trips found in the roster without writing anything
    Trips {
        /// Input spreadsheet
        #[arg(default_value = DEFAULT_INPUT_FILE)]
        input: PathBuf,
    },
}

fn load_config(settings: &Settings) -> Result<Config> {
    let mut config = Config::load(settings.config.as_deref()).context("Failed to load config")?;
    if let Some(region) = &settings.region {
        config.region = region.clone();
    }
    if let Some(prefix) = &settings.prefix {
        config.name_prefix = prefix.clone();
    }
    if let Some(delimiter) = &settings.delimiter {
        config.trip_delimiter = parse_delimiter(delimiter)?;
    }
    Ok(config)
}

fn print_result(result: &PipelineResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", report::render_summary(result));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.settings)?;
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;

    let result = match cli.command {
        Commands::Convert { input, output } => {
            let output = output.unwrap_or_else(|| default_output_path(&input));
            pipeline
                .convert_file(&input, &output)
                .with_context(|| format!("Failed to convert {}", input.display()))?
        }
        Commands::Trips { input } => pipeline
            .inspect_file(&input)
            .with_context(|| format!("Failed to read {}", input.display()))?,
    };

    print_result(&result, cli.settings.json)
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let guard = logging::init_logging(cli.settings.verbose);

    if let Err(e) = run(cli) {
        error!("Run failed: {:#}", e);
        drop(guard);
        std::process::exit(1);
    }
    info!("Done");
}
