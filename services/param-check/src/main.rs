//! Parameter check tool.
//!
//! Loads a parameter-set definition, validates input from the environment,
//! a query string and `--param` assignments, and prints a JSON report.
//! Exits with 2 when any parameter fails.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use store_params::NullPolicy;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use param_check::{load_definition, CheckReport, InputSources, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "param-check")]
#[command(about = "Validate graphic-store connection parameters")]
struct Args {
    /// Parameter-set definition (YAML)
    #[arg(short, long, env = "PARAM_CHECK_DEFINITION")]
    definition: PathBuf,

    /// Parameter assignment: key=value, key= (empty) or key (null). Repeatable.
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Query string such as "user=gis&port=8080"
    #[arg(short, long)]
    query: Option<String>,

    /// Read <PREFIX><KEY> environment variables for declared keys
    #[arg(long)]
    env_prefix: Option<String>,

    /// Treat null or empty values of required parameters as missing
    #[arg(long)]
    strict_null: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let policy = if args.strict_null {
        NullPolicy::Strict
    } else {
        NullPolicy::Lenient
    };

    let set = load_definition(&args.definition, policy)?;
    info!(
        definition = %args.definition.display(),
        parameters = set.len(),
        policy = ?policy,
        "Loaded parameter definition"
    );

    let sources = InputSources {
        env_prefix: args.env_prefix,
        query: args.query,
        params: args.params,
    };
    let raw = sources.collect(&set)?;

    let report = CheckReport::new(&set, &raw);
    if !report.unrecognized.is_empty() {
        warn!(keys = ?report.unrecognized, "Input contains undeclared parameters");
    }

    println!("{}", report.render(args.format)?);

    if report.is_valid() {
        info!("All parameters valid");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(errors = report.report.errors().count(), "Parameter validation failed");
        Ok(ExitCode::from(2))
    }
}
