//! `batchcode` — print and inspect product batch codes.
//!
//! Usage:
//!   batchcode encode --dose 5 --cannabinoid D9 --abbr ACME --oil-batch OIL123 --batch-number 7
//!   batchcode decode 5D9ACME-07-15-24-DC-OIL123.7
//!   batchcode config

use std::path::PathBuf;

use anyhow::Context as _;
use batchcode::code::{
    AbbreviationTable, BatchCodeCodec, BatchCodeRequest, Clock, CodecConfig, CodecError,
    DecodedBatchCode, FixedClock, ProductRef, SystemClock,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

/// Batch code CLI.
#[derive(Parser, Debug)]
#[command(name = "batchcode", about = "Encode and decode product batch codes")]
struct Cli {
    /// Codec config file (YAML or JSON). Defaults to the built-in token table.
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a batch code for a new product batch.
    Encode(EncodeArgs),

    /// Split a batch code back into its fields.
    Decode {
        /// Batch code as printed on the label.
        code: String,
    },

    /// Print the effective codec config.
    Config,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Dose in mg.
    #[arg(long)]
    dose: u32,

    /// Cannabinoid token (e.g. D9, THCO).
    #[arg(long)]
    cannabinoid: String,

    /// Product abbreviation, printed as-is.
    #[arg(long, conflicts_with = "product", required_unless_present = "product")]
    abbr: Option<String>,

    /// Full product name, abbreviated via --abbreviations or derived.
    #[arg(long)]
    product: Option<String>,

    /// YAML map of product name → abbreviation.
    #[arg(long)]
    abbreviations: Option<PathBuf>,

    /// Oil batch code the product batch was made from.
    #[arg(long = "oil-batch")]
    oil_batch: String,

    /// Sequence number for this product, date and oil batch.
    #[arg(long = "batch-number", default_value_t = 1)]
    batch_number: u32,

    /// Production date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading codec config from {}", path.display());
            CodecConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => CodecConfig::default(),
    };
    let codec = BatchCodeCodec::new(config)?;

    match cli.command {
        Commands::Encode(args) => {
            let abbreviations = match &args.abbreviations {
                Some(path) => load_abbreviations(path)?,
                None => AbbreviationTable::new(),
            };
            let code = encode(&codec, &args, &abbreviations)?;
            println!("{}", render_code(&code, cli.output)?);
        }
        Commands::Decode { code } => {
            let decoded = codec.decode(&code).map_err(CodecError::from)?;
            match cli.output {
                Output::Table => print!("{}", render_decoded(&decoded)),
                Output::Json => println!("{}", serde_json::to_string_pretty(&decoded)?),
            }
        }
        Commands::Config => match cli.output {
            Output::Table => print!("{}", serde_yml::to_string(codec.config())?),
            Output::Json => println!("{}", serde_json::to_string_pretty(codec.config())?),
        },
    }

    Ok(())
}

fn encode(
    codec: &BatchCodeCodec,
    args: &EncodeArgs,
    abbreviations: &AbbreviationTable,
) -> Result<String, CodecError> {
    let product = match &args.abbr {
        Some(abbr) => ProductRef::Abbreviation(abbr.clone()),
        None => ProductRef::Name(args.product.clone().unwrap_or_default()),
    };
    let request = BatchCodeRequest {
        dose: args.dose,
        cannabinoid: args.cannabinoid.clone(),
        product,
        oil_batch_code: args.oil_batch.clone(),
        batch_number: args.batch_number,
    };

    let clock: Box<dyn Clock> = match args.date {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };
    Ok(codec.encode_request(&request, abbreviations, clock.as_ref())?)
}

fn load_abbreviations(path: &std::path::Path) -> anyhow::Result<AbbreviationTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let table: AbbreviationTable = serde_yml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!("Loaded {} product abbreviations", table.len());
    Ok(table)
}

fn render_code(code: &str, output: Output) -> anyhow::Result<String> {
    Ok(match output {
        Output::Table => code.to_string(),
        Output::Json => serde_json::to_string_pretty(&serde_json::json!({ "code": code }))?,
    })
}

fn render_decoded(decoded: &DecodedBatchCode) -> String {
    let cannabinoid = if decoded.cannabinoid_recognized {
        decoded.cannabinoid.clone()
    } else {
        format!("{} (unrecognized)", decoded.cannabinoid)
    };
    let date = match decoded.production_date() {
        Some(date) => format!("{} ({})", decoded.date_info, date),
        None => decoded.date_info.clone(),
    };

    let rows = [
        ("DOSE", decoded.dose.to_string()),
        ("CANNABINOID", cannabinoid),
        ("PRODUCT", decoded.product_abbr.clone()),
        ("DATE", date),
        ("OIL BATCH", decoded.oil_batch_code.clone()),
        ("BATCH NUMBER", decoded.batch_number.to_string()),
    ];
    rows.iter()
        .map(|(label, value)| format!("{:<14} {}\n", label, value))
        .collect()
}
