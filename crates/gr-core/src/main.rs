//! gr-core - Gutenberg-Richter catalog analysis
//!
//! The main entry point for gr-core, handling:
//! - Catalog loading and region/time selection
//! - Magnitude of completeness and Gutenberg-Richter fitting
//! - Configuration checks and result schema export
//! - Deterministic synthetic catalogs

use clap::{Args, Parser, Subcommand};
use gr_common::{
    BoundingBox, Error, EventCatalog, OutputFormat, Polygon, Region, StructuredError, TimeRange,
};
use gr_config::{load_config, ConfigSource, FitMethod, McMethod, ResolvedConfig};
use gr_core::catalog::{load_catalog, parse_time, write_catalog};
use gr_core::exit_codes::ExitCode;
use gr_core::logging::{event_names, init_logging, LogConfig, LogFormat, LogLevel, Stage};
use gr_core::synthetic::{catalog_from_magnitudes, gr_magnitudes, incomplete_tail};
use gr_core::{analyze, render, AnalysisResult};
use std::path::PathBuf;

/// Selection margin (degrees) around the catalog extent when no region is given.
const EXTENT_MARGIN: f64 = 0.01;

/// Gutenberg-Richter analysis of earthquake catalogs
#[derive(Parser)]
#[command(name = "gr-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Analysis config file (overrides GR_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format for stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select events, estimate Mc and fit the Gutenberg-Richter relation
    Analyze(AnalyzeArgs),

    /// Validate the resolved analysis configuration
    Check,

    /// Print the JSON Schema of the analysis result
    Schema,

    /// Write a deterministic synthetic GR catalog as CSV
    Synth(SynthArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Catalog CSV (ISC-GEM layout or date,lat,lon,mw)
    #[arg(long)]
    catalog: PathBuf,

    /// Bounding box west,south,east,north (defaults to the catalog extent)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "polygon")]
    bbox: Option<String>,

    /// Polygon "lat lon; lat lon; ..." with at least three vertices
    #[arg(long, allow_hyphen_values = true)]
    polygon: Option<String>,

    /// Start of the time window (inclusive)
    #[arg(long)]
    start: Option<String>,

    /// End of the time window (exclusive)
    #[arg(long)]
    end: Option<String>,

    /// Magnitude bin width (defaults to the config value)
    #[arg(long)]
    bin_width: Option<f64>,

    /// Mc estimation method
    #[arg(long)]
    mc_method: Option<McMethod>,

    /// GR fitting method
    #[arg(long)]
    fit_method: Option<FitMethod>,

    /// Minimum MFD points at or above Mc for a fit
    #[arg(long)]
    min_points: Option<usize>,

    /// Goodness-of-fit threshold for the goodness-of-fit Mc method
    #[arg(long)]
    gof_threshold: Option<f64>,
}

#[derive(Args, Debug)]
struct SynthArgs {
    /// Events following the GR law above Mc
    #[arg(long, default_value = "100")]
    events: usize,

    /// Completeness magnitude of the synthetic law
    #[arg(long, default_value = "3.0")]
    mc: f64,

    /// b-value of the synthetic law
    #[arg(long, default_value = "1.0")]
    b: f64,

    /// Magnitude bin width
    #[arg(long, default_value = "0.1")]
    bin_width: f64,

    /// Under-reported events spread over the five bins below Mc
    #[arg(long, default_value = "0")]
    tail: usize,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, args),
        Commands::Check => run_check(&cli.global),
        Commands::Schema => run_schema(),
        Commands::Synth(args) => run_synth(&cli.global, args),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    let resolved = match resolve(global) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };

    let mut config = resolved.config;
    if let Some(method) = args.mc_method {
        config = config.with_mc_method(method);
    }
    if let Some(method) = args.fit_method {
        config = config.with_fit_method(method);
    }
    if let Some(min_points) = args.min_points {
        config = config.with_min_points(min_points);
    }
    if let Some(threshold) = args.gof_threshold {
        config = config.with_threshold(threshold);
    }
    let bin_width = args.bin_width.unwrap_or(config.bin_width);

    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(e) => return output_error(global, &e),
    };

    let region = match parse_region(args, &catalog) {
        Ok(region) => region,
        Err(e) => return output_error(global, &e),
    };

    let time_range = match parse_time_range(args) {
        Ok(range) => range,
        Err(e) => return output_error(global, &e),
    };

    let result = match analyze(&catalog, &region, &time_range, bin_width, &config) {
        Ok(result) => result,
        Err(e) => return output_error(global, &e),
    };

    match render(&result, global.format) {
        Ok(text) => println!("{}", text),
        Err(e) => return output_error(global, &e),
    }

    outcome(&result)
}

fn outcome(result: &AnalysisResult) -> ExitCode {
    if result.has_fit() {
        ExitCode::Clean
    } else {
        ExitCode::InsufficientData
    }
}

/// Region from `--bbox` or `--polygon`, else the catalog extent.
fn parse_region(args: &AnalyzeArgs, catalog: &EventCatalog) -> Result<Region, Error> {
    if let Some(raw) = &args.bbox {
        return Ok(raw.parse::<BoundingBox>()?.into());
    }
    if let Some(raw) = &args.polygon {
        return Ok(raw.parse::<Polygon>()?.into());
    }
    let world = BoundingBox {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };
    Ok(catalog
        .extent()
        .map_or(world, |extent| extent.expanded(EXTENT_MARGIN))
        .into())
}

fn parse_time_range(args: &AnalyzeArgs) -> Result<TimeRange, Error> {
    let parse = |name: &str, raw: &Option<String>| -> Result<_, Error> {
        raw.as_deref()
            .map(|s| {
                parse_time(s).ok_or_else(|| {
                    Error::invalid_parameter(name, format!("unrecognized time {:?}", s))
                })
            })
            .transpose()
    };
    TimeRange::new(parse("start", &args.start)?, parse("end", &args.end)?)
}

fn resolve(global: &GlobalOpts) -> Result<ResolvedConfig, ExitCode> {
    match load_config(global.config.as_deref()) {
        Ok(resolved) => {
            if resolved.source == ConfigSource::BuiltinDefault {
                tracing::debug!(
                    event = event_names::CONFIG_DEFAULT_USED,
                    stage = %Stage::Init,
                    "no config file found; using built-in defaults"
                );
            } else {
                tracing::info!(
                    event = event_names::CONFIG_LOADED,
                    stage = %Stage::Init,
                    source = %resolved.source,
                    path = ?resolved.path,
                    hash = ?resolved.hash,
                    "config loaded"
                );
            }
            Ok(resolved)
        }
        Err(e) => Err(output_error(global, &Error::Config(e.to_string()))),
    }
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    let resolved = match resolve(global) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": "ok",
                "source": resolved.source.to_string(),
                "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                "hash": resolved.hash,
                "config": resolved.config,
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => println!("{}", text),
                Err(e) => return output_error(global, &e.into()),
            }
        }
        OutputFormat::Md | OutputFormat::Summary => {
            let path = resolved
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "config ok: source={} path={} mc_method={} fit_method={} min_points={} threshold={} bin_width={}",
                resolved.source,
                path,
                resolved.config.mc_method,
                resolved.config.fit_method,
                resolved.config.min_points_for_fit,
                resolved.config.goodness_of_fit_threshold,
                resolved.config.bin_width,
            );
        }
    }
    ExitCode::Clean
}

fn run_schema() -> ExitCode {
    match serde_json::to_string_pretty(&AnalysisResult::json_schema()) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::Clean
        }
        Err(e) => {
            eprintln!("{}", Error::from(e).to_human());
            ExitCode::InternalError
        }
    }
}

fn run_synth(global: &GlobalOpts, args: &SynthArgs) -> ExitCode {
    if !(args.bin_width > 0.0 && args.b > 0.0) {
        return output_error(
            global,
            &Error::invalid_parameter("bin_width/b", "must be positive"),
        );
    }
    let mut mags = gr_magnitudes(args.events, args.mc, args.b, args.bin_width);
    mags.extend(incomplete_tail(
        args.tail,
        args.mc - 5.0 * args.bin_width,
        5,
        args.bin_width,
    ));

    let written = catalog_from_magnitudes(&mags)
        .and_then(|catalog| write_catalog(&catalog, std::io::stdout().lock()));
    match written {
        Ok(()) => ExitCode::Clean,
        Err(e) => output_error(global, &e),
    }
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let version_info = serde_json::json!({
                "gr_core_version": env!("CARGO_PKG_VERSION"),
                "config_schema_version": gr_config::CONFIG_SCHEMA_VERSION,
            });
            println!("{}", version_info);
        }
        _ => {
            println!("gr-core {}", env!("CARGO_PKG_VERSION"));
            println!("config schema version: {}", gr_config::CONFIG_SCHEMA_VERSION);
        }
    }
}

/// Report an error on stderr and map it to an exit code.
fn output_error(global: &GlobalOpts, error: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(error);
    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(error).with_context("exit_code", exit_code.code_name());
            eprintln!("{}", structured.to_json_pretty());
        }
        OutputFormat::Md | OutputFormat::Summary => eprintln!("{}", error.to_human()),
    }
    exit_code
}
