//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{CsvAdapter, CsvReportWriter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::rng_adapter::RngAdapter;
use crate::domain::annotate::{annotate_with, AnnotatedBar};
use crate::domain::config_validation::{
    build_indicator_params, build_model_config, build_synth_settings, SynthSettings,
};
use crate::domain::error::SimchartError;
use crate::domain::indicator::{IndicatorSet, Overlay};
use crate::domain::synth::generate;
use crate::domain::timeframe::Timeframe;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "simchart", about = "Synthetic OHLCV series and technical indicators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize a series and write it, annotated, as CSV
    Generate(GenerateArgs),
    /// Annotate an existing OHLCV CSV file
    Annotate(AnnotateArgs),
    /// List supported timeframes
    Timeframes,
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub timeframe: Option<String>,
    #[arg(long)]
    pub base_value: Option<f64>,
    #[arg(long)]
    pub volatility: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub trend_bias: Option<f64>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub bars: Option<usize>,
    /// Overlays to include, e.g. `sma7,rsi,bollinger` (default: all)
    #[arg(long)]
    pub show: Option<String>,
    /// Skip indicator annotation
    #[arg(long)]
    pub raw: bool,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub show: Option<String>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// Dispatch a command. Reports are built in full before any output file is
/// created, so a rejected request leaves the filesystem untouched.
pub fn execute(command: Command) -> Result<(), SimchartError> {
    match command {
        Command::Generate(args) => {
            let report = build_generate_report(&args)?;
            with_output(args.output.as_deref(), |out| report.write(out))
        }
        Command::Annotate(args) => {
            let report = build_annotate_report(&args)?;
            with_output(args.output.as_deref(), |out| report.write(out))
        }
        Command::Timeframes => run_timeframes(&mut io::stdout().lock()),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Annotated bars plus the overlay columns to emit.
#[derive(Debug)]
pub struct Report {
    pub bars: Vec<AnnotatedBar>,
    pub overlays: Vec<Overlay>,
}

impl Report {
    pub fn write(&self, out: &mut dyn Write) -> Result<(), SimchartError> {
        CsvReportWriter.write(&self.bars, &self.overlays, out)
    }
}

fn with_output<F>(path: Option<&Path>, f: F) -> Result<(), SimchartError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), SimchartError>,
{
    let Some(path) = path else {
        return f(&mut io::stdout().lock());
    };
    let mut out = BufWriter::new(File::create(path)?);
    let written = f(&mut out).and_then(|()| out.flush().map_err(SimchartError::from));
    match written {
        Ok(()) => {
            info!("wrote {}", path.display());
            Ok(())
        }
        Err(e) => {
            drop(out);
            if let Err(rm) = fs::remove_file(path) {
                warn!("could not remove partial output {}: {rm}", path.display());
            }
            Err(e)
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, SimchartError> {
    match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Merge `[synth]` settings with command-line overrides.
pub fn resolve_synth_settings(
    config: &dyn ConfigPort,
    args: &GenerateArgs,
) -> Result<SynthSettings, SimchartError> {
    let mut settings = build_synth_settings(config)?;
    let request = &mut settings.request;

    if let Some(tf) = &args.timeframe {
        request.timeframe = tf.parse()?;
    }
    if let Some(v) = args.base_value {
        request.base_value = v;
    }
    if let Some(v) = args.volatility {
        request.volatility = v;
    }
    if let Some(v) = args.trend_bias {
        request.trend_bias = v;
    }
    if let Some(n) = args.bars {
        request.bars = Some(n);
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    request.validate()?;
    Ok(settings)
}

/// Overlay selection from `--show`, falling back to `[output] show`, then all.
pub fn resolve_overlays(
    config: &dyn ConfigPort,
    show: Option<&str>,
) -> Result<Vec<Overlay>, SimchartError> {
    match show.map(str::to_string).or_else(|| config.get_string("output", "show")) {
        Some(list) => Overlay::parse_list(&list),
        None => Ok(Overlay::ALL.to_vec()),
    }
}

pub fn run_generate(args: &GenerateArgs, out: &mut dyn Write) -> Result<(), SimchartError> {
    build_generate_report(args)?.write(out)
}

pub fn build_generate_report(args: &GenerateArgs) -> Result<Report, SimchartError> {
    let config = load_config(args.config.as_deref())?;
    let settings = resolve_synth_settings(&config, args)?;
    let model = build_model_config(&config)?;
    let raw = args.raw || config.get_bool("output", "raw", false);

    if settings.seed.is_none() {
        warn!("no seed given; output will not be reproducible");
    }
    let mut rng = RngAdapter::from_seed_option(settings.seed);

    info!(
        "generating {} bars ({}, base {}, volatility {}, trend {})",
        settings.request.total_bars(),
        settings.request.timeframe,
        settings.request.base_value,
        settings.request.volatility,
        settings.request.trend_bias,
    );
    let bars = generate(&settings.request, &model, &mut rng)?;

    let (bars, overlays) = if raw {
        let plain = bars
            .into_iter()
            .map(|bar| AnnotatedBar {
                bar,
                indicators: IndicatorSet::default(),
            })
            .collect();
        (plain, Vec::new())
    } else {
        let params = build_indicator_params(&config)?;
        let overlays = resolve_overlays(&config, args.show.as_deref())?;
        (annotate_with(&bars, &params), overlays)
    };

    Ok(Report { bars, overlays })
}

pub fn run_annotate(args: &AnnotateArgs, out: &mut dyn Write) -> Result<(), SimchartError> {
    build_annotate_report(args)?.write(out)
}

pub fn build_annotate_report(args: &AnnotateArgs) -> Result<Report, SimchartError> {
    let config = load_config(args.config.as_deref())?;
    let params = build_indicator_params(&config)?;
    let overlays = resolve_overlays(&config, args.show.as_deref())?;

    info!("reading bars from {}", args.input.display());
    let bars = CsvAdapter::new(args.input.clone()).load_bars()?;
    if bars.is_empty() {
        warn!("{} contains no bars", args.input.display());
    }

    Ok(Report {
        bars: annotate_with(&bars, &params),
        overlays,
    })
}

pub fn run_timeframes(out: &mut dyn Write) -> Result<(), SimchartError> {
    writeln!(out, "{:<6} {:>6} {:>10} {:>6}", "label", "bars", "step (s)", "noise")?;
    for tf in Timeframe::ALL {
        writeln!(
            out,
            "{:<6} {:>6} {:>10} {:>6.2}",
            tf.label(),
            tf.total_bars(),
            tf.increment_secs(),
            tf.noise_scale()
        )?;
    }
    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), SimchartError> {
    let config = load_config(Some(config_path))?;
    let settings = build_synth_settings(&config)?;
    build_model_config(&config)?;
    build_indicator_params(&config)?;
    if let Some(show) = config.get_string("output", "show") {
        Overlay::parse_list(&show)?;
    }
    info!(
        "config OK: {} x {} bars",
        settings.request.timeframe,
        settings.request.total_bars()
    );
    Ok(())
}
