//! Corpus-scale execution over a bounded worker pool
//!
//! ## Model
//!
//! Every file is an independent task: one worker owns one file's buffers
//! for the duration of its parse → remap → smooth → extract sequence and
//! releases them before taking the next. Workers share nothing mutable
//! except an atomic completion tally used for progress logging, which is
//! not load-bearing for correctness. Completion order is unordered; only
//! the multiset of per-file outcomes matters.
//!
//! File-scoped errors never cross the worker boundary: each file resolves
//! to a [`FileOutcome`] and the batch keeps going. Configuration errors,
//! by contrast, surface from stage constructors before any file is
//! scheduled.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::{s, Array3};
use ndarray_npy::ReadNpyExt;
use rayon::prelude::*;

use crate::angles::AngleFeatureExtractor;
use crate::errors::{BatchError, TaskError, TopologyError};
use crate::persist;
use crate::record::{RecordParser, SensorLayout};
use crate::remap::TopologyRemapper;
use crate::smooth::TemporalSmoother;
use crate::topology::{JointTopology, Trajectory};
use crate::validate::CorpusValidator;

/// Outcome of processing one file.
#[derive(Debug)]
pub struct FileOutcome {
    /// The input file this outcome describes.
    pub input: PathBuf,
    /// The produced output path, or the error that stopped this file.
    pub result: Result<PathBuf, TaskError>,
}

/// Collected outcomes of one batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// One outcome per input file, in input order.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of input files.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of files that produced output.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Outcomes of the files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Whether every file produced output.
    pub fn is_clean(&self) -> bool {
        self.succeeded() == self.total()
    }

    /// Log every failure with its error class and message.
    pub fn log_failures(&self) {
        for outcome in self.failures() {
            if let Err(err) = &outcome.result {
                log::error!("{}: {err}", outcome.input.display());
            }
        }
    }
}

/// Run `task` over `files` on a bounded worker pool.
///
/// `workers == 0` uses all available cores. The returned report holds one
/// outcome per file, in input order.
pub fn run_batch<F>(files: &[PathBuf], workers: usize, task: F) -> Result<BatchReport, BatchError>
where
    F: Fn(&Path) -> Result<PathBuf, TaskError> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    let total = files.len();
    let completed = AtomicUsize::new(0);

    let outcomes = pool.install(|| {
        files
            .par_iter()
            .map(|input| {
                let result = task(input);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                match &result {
                    Ok(output) => {
                        log::info!("[{done}/{total}] {} -> {}", input.display(), output.display());
                    }
                    Err(err) => {
                        log::warn!("[{done}/{total}] {} failed: {err}", input.display());
                    }
                }
                FileOutcome {
                    input: input.clone(),
                    result,
                }
            })
            .collect()
    });

    Ok(BatchReport { outcomes })
}

/// Check every file against `validator` and return the passing subset, in
/// input order.
pub fn check_corpus(
    validator: &CorpusValidator,
    files: &[PathBuf],
    workers: usize,
) -> Result<Vec<PathBuf>, BatchError> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    let total = files.len();
    let completed = AtomicUsize::new(0);

    let passing: Vec<bool> = pool.install(|| {
        files
            .par_iter()
            .map(|input| {
                let ok = validator.check_file(input);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % 1000 == 0 {
                    log::info!("checked {done}/{total} files");
                }
                ok
            })
            .collect()
    });

    Ok(files
        .iter()
        .zip(passing)
        .filter_map(|(path, ok)| ok.then(|| path.clone()))
        .collect())
}

/// Full decode of raw recordings into sensor-native trajectory arrays.
#[derive(Debug, Clone)]
pub struct ConvertStage {
    layout: SensorLayout,
}

impl ConvertStage {
    /// Stage over a custom sensor layout.
    pub fn new(layout: SensorLayout) -> Self {
        Self { layout }
    }

    /// Stage over the standard 17-slot sensor layout.
    pub fn standard() -> Result<Self, TopologyError> {
        Ok(Self::new(SensorLayout::standard()?))
    }

    /// Decode `input` and persist its `(T, 17, 3)` array under `out_dir`.
    pub fn run(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, TaskError> {
        let record = RecordParser::parse_file(input)?;
        let trajectory = self.layout.bind(&record)?;
        let output = array_output_path(input, out_dir, "npy");
        persist::write_trajectory(&output, &trajectory)?;
        Ok(output)
    }
}

/// Rig conversion of persisted trajectories into the canonical topology.
#[derive(Debug, Clone)]
pub struct RemapStage {
    remapper: TopologyRemapper,
}

impl RemapStage {
    /// Stage over a custom remapper.
    pub fn new(remapper: TopologyRemapper) -> Self {
        Self { remapper }
    }

    /// Stage over the standard sensor→canonical conversion.
    pub fn standard() -> Result<Self, TopologyError> {
        Ok(Self::new(TopologyRemapper::standard()?))
    }

    /// Remap `input` and persist the canonical array under `out_dir`.
    pub fn run(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, TaskError> {
        let array = read_array(input)?;
        let trajectory = Trajectory::new(self.remapper.source().clone(), array)?;
        let remapped = self.remapper.remap(&trajectory)?;
        let output = array_output_path(input, out_dir, "npy");
        persist::write_trajectory(&output, &remapped)?;
        Ok(output)
    }
}

/// Smoothing plus angle extraction over canonical trajectories.
#[derive(Debug, Clone)]
pub struct AngleStage {
    topology: Arc<JointTopology>,
    smoother: TemporalSmoother,
    extractor: AngleFeatureExtractor,
}

impl AngleStage {
    /// Stage over `topology` with the shipped hinge-angle catalogue.
    pub fn new(topology: Arc<JointTopology>, smoother: TemporalSmoother) -> Result<Self, TopologyError> {
        let extractor = AngleFeatureExtractor::standard(topology.clone())?;
        Ok(Self {
            topology,
            smoother,
            extractor,
        })
    }

    /// Number of angles per frame in the persisted containers.
    pub fn angle_count(&self) -> usize {
        self.extractor.angle_count()
    }

    /// Smooth `input`, extract features, persist the NPZ under `out_dir`.
    pub fn run(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, TaskError> {
        let mut array = read_array(input)?;
        // Tolerate arrays carrying extra trailing joints (e.g. a rig that
        // was persisted before its spine joints were dropped).
        let joints = self.topology.len();
        if array.shape()[1] > joints {
            array = array.slice(s![.., ..joints, ..]).to_owned();
        }
        let trajectory = Trajectory::new(self.topology.clone(), array)?;
        let smoothed = self.smoother.smooth(&trajectory)?;
        let features = self.extractor.extract(&smoothed)?;
        if !features.degeneracies.is_empty() {
            log::warn!(
                "{}: {} degenerate angle frames, sentinel substituted",
                input.display(),
                features.degeneracies.len()
            );
        }
        let output = array_output_path(input, out_dir, "npz");
        persist::write_features(&output, &features)?;
        Ok(output)
    }
}

fn read_array(path: &Path) -> Result<Array3<f32>, TaskError> {
    let file = File::open(path)?;
    Ok(Array3::<f32>::read_npy(file)?)
}

fn array_output_path(input: &Path, out_dir: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_else(|| input.as_os_str());
    out_dir.join(stem).with_extension(extension)
}
