//! Core pipeline for skeleton recording ingestion and kinematic features
//!
//! Turns raw motion-capture skeleton dumps into fixed-size kinematic
//! feature vectors for downstream learning pipelines. Five independent
//! stages compose into the pipeline; each file flows through on one
//! worker, embarrassingly parallel across a corpus:
//!
//! ```text
//! CorpusValidator → RecordParser → TopologyRemapper → TemporalSmoother → AngleFeatureExtractor
//!      triage          decode        rig conversion      denoising           cos/sin pairs
//! ```
//!
//! Every stage is a pure function from one in-memory trajectory
//! representation to another; topologies, the rig mapping, and the angle
//! catalogue are immutable configuration constructed once at startup.
//!
//! ```
//! use skelfeat_core::{AngleFeatureExtractor, TemporalSmoother, canonical_topology};
//!
//! let smoother = TemporalSmoother::new(9, 3)?;
//! let extractor = AngleFeatureExtractor::standard(canonical_topology()?)?;
//! assert_eq!(extractor.angle_count(), 16);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod angles;
pub mod batch;
pub mod constants;
pub mod errors;
pub mod persist;
pub mod record;
pub mod remap;
pub mod smooth;
pub mod topology;
pub mod validate;

// Public API
pub use angles::{AngleFeatureExtractor, AngleFeatures, Degeneracy};
pub use batch::{check_corpus, run_batch, AngleStage, BatchReport, ConvertStage, FileOutcome, RemapStage};
pub use errors::{BatchError, FilterError, PersistError, RecordError, TaskError, TopologyError};
pub use record::{RecordParser, SensorLayout, TrackingRecord};
pub use remap::{CoordTransform, TopologyRemapper};
pub use smooth::TemporalSmoother;
pub use topology::{canonical_topology, sensor_topology, AngleDefinition, JointTopology, Trajectory};
pub use validate::CorpusValidator;

/// Crate version, for log banners.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
