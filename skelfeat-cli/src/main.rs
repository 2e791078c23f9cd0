//! Batch front-end for the skeleton feature pipeline
//!
//! Thin wrapper around `skelfeat-core`: discovers input files, builds the
//! pipeline stages from shipped configuration, and maps batch reports to
//! the process exit code. Subcommands mirror the pipeline stages:
//!
//! - `check`: triage a directory of raw recordings into an allow-list
//! - `convert`: decode an allow-list into 17-joint trajectory arrays
//! - `remap`: convert 17-joint arrays into the canonical 15-joint rig
//! - `angles`: smooth canonical arrays and extract hinge-angle features
//!
//! The exit code is non-zero when any file fails; per-file error classes
//! are distinguished in the logs only.

mod config;
mod discover;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use skelfeat_core::{
    batch::{check_corpus, run_batch, AngleStage, BatchReport, ConvertStage, RemapStage},
    canonical_topology,
    constants::{DEFAULT_POLY_ORDER, DEFAULT_WINDOW},
    persist, BatchError, CorpusValidator, FilterError, PersistError, TemporalSmoother,
    TopologyError,
};

use config::JobParams;

/// Failures of the front-end itself, as opposed to per-file outcomes.
#[derive(Error, Debug)]
pub enum CliError {
    /// Pipeline configuration was rejected before any file was touched.
    #[error("configuration: {0}")]
    Topology(#[from] TopologyError),

    /// Smoothing parameters were rejected before any file was touched.
    #[error("configuration: {0}")]
    Filter(#[from] FilterError),

    /// The worker pool could not be built.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// The allow-list could not be persisted.
    #[error("writing allow-list: {0}")]
    Persist(#[from] PersistError),

    /// Discovery or parameter-file I/O failed.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter file did not parse.
    #[error("parameter file: {0}")]
    Params(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "skelfeat", version, about = "Skeleton recording ingestion and kinematic feature extraction")]
struct Cli {
    /// Worker-pool size; 0 uses all available cores.
    #[arg(long, global = true, default_value_t = 0)]
    workers: usize,

    /// Optional JSON parameter file; explicit flags win over it.
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Triage raw recordings and write the allow-list of usable files.
    Check {
        /// Directory scanned recursively for `.skeleton` files.
        input_dir: PathBuf,
        /// Output allow-list, one passing path per line.
        output_list: PathBuf,
    },
    /// Decode allow-listed recordings into 17-joint trajectory arrays.
    Convert {
        /// Allow-list produced by `check`.
        list_file: PathBuf,
        /// Directory receiving one `.npy` per recording.
        out_dir: PathBuf,
    },
    /// Convert 17-joint arrays into the canonical 15-joint topology.
    Remap {
        /// Directory scanned recursively for `.npy` files.
        input_dir: PathBuf,
        /// Directory receiving the canonical arrays.
        out_dir: PathBuf,
    },
    /// Smooth canonical arrays and extract hinge-angle features.
    Angles {
        /// Directory scanned recursively for `.npy` files.
        input_dir: PathBuf,
        /// Directory receiving one `.npz` feature container per array.
        out_dir: PathBuf,
        /// Smoothing window length, in frames (odd).
        #[arg(long)]
        window: Option<usize>,
        /// Polynomial order of the smoothing fit.
        #[arg(long)]
        order: Option<usize>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Execute the selected subcommand; `Ok(true)` means every file succeeded.
fn run(cli: Cli) -> Result<bool, CliError> {
    let params = match &cli.params {
        Some(path) => JobParams::load(path)?,
        None => JobParams::default(),
    };
    let workers = if cli.workers != 0 {
        cli.workers
    } else {
        params.workers.unwrap_or(0)
    };

    match cli.command {
        Command::Check {
            input_dir,
            output_list,
        } => {
            let validator = CorpusValidator::standard()?;
            let files = discover::find_files(&input_dir, "skeleton")?;
            log::info!("checking {} recordings under {}", files.len(), input_dir.display());
            let passing = check_corpus(&validator, &files, workers)?;
            persist::write_allow_list(&output_list, &passing)?;
            log::info!(
                "{} of {} recordings pass -> {}",
                passing.len(),
                files.len(),
                output_list.display()
            );
            Ok(true)
        }
        Command::Convert { list_file, out_dir } => {
            let stage = ConvertStage::standard()?;
            let files = discover::read_list(&list_file)?;
            std::fs::create_dir_all(&out_dir)?;
            log::info!("converting {} recordings", files.len());
            let report = run_batch(&files, workers, |input| stage.run(input, &out_dir))?;
            Ok(summarize("convert", &report))
        }
        Command::Remap { input_dir, out_dir } => {
            let stage = RemapStage::standard()?;
            let files = discover::find_files(&input_dir, "npy")?;
            std::fs::create_dir_all(&out_dir)?;
            log::info!("remapping {} trajectories", files.len());
            let report = run_batch(&files, workers, |input| stage.run(input, &out_dir))?;
            Ok(summarize("remap", &report))
        }
        Command::Angles {
            input_dir,
            out_dir,
            window,
            order,
        } => {
            let window = window.or(params.window).unwrap_or(DEFAULT_WINDOW);
            let order = order.or(params.order).unwrap_or(DEFAULT_POLY_ORDER);
            let smoother = TemporalSmoother::new(window, order)?;
            let stage = AngleStage::new(canonical_topology()?, smoother)?;
            let files = discover::find_files(&input_dir, "npy")?;
            std::fs::create_dir_all(&out_dir)?;
            log::info!(
                "extracting {} angles from {} trajectories (window {window}, order {order})",
                stage.angle_count(),
                files.len()
            );
            let report = run_batch(&files, workers, |input| stage.run(input, &out_dir))?;
            Ok(summarize("angles", &report))
        }
    }
}

fn summarize(operation: &str, report: &BatchReport) -> bool {
    report.log_failures();
    log::info!(
        "{operation}: {} of {} files succeeded",
        report.succeeded(),
        report.total()
    );
    report.is_clean()
}
