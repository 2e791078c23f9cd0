//! Error types for the skeleton feature pipeline
//!
//! ## Design Philosophy
//!
//! Errors are split by scope, because the two scopes demand opposite
//! handling:
//!
//! 1. **Configuration-scoped** ([`TopologyError`], the parameter variants of
//!    [`FilterError`]): raised from component constructors before any file is
//!    touched. These abort the whole run; a half-configured pipeline must
//!    never process a corpus.
//!
//! 2. **File-scoped** ([`RecordError`], [`FilterError::InsufficientLength`],
//!    [`PersistError`] and plain I/O): raised while processing one file.
//!    The batch layer converts these into a per-file [`TaskError`] outcome
//!    and keeps going; a single truncated recording must never sink a
//!    multi-hour corpus run.
//!
//! Degenerate angle geometry is deliberately *not* an error: the extractor
//! substitutes a sentinel encoding and reports the frames as diagnostics
//! (see [`crate::angles::AngleFeatures::degeneracies`]).

use thiserror::Error;

/// Failures while decoding a raw skeleton recording.
///
/// Parsing is strict and line-count-driven: the header declares how many
/// frame blocks follow and each frame block declares how many joint lines
/// follow. Anything that breaks that contract is a hard failure for the
/// file; there is no partial recovery.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The recording ended before the declared counts were satisfied.
    #[error("line {line}: expected {expected}, found end of file")]
    UnexpectedEof {
        /// Line number at which input ran out (1-based).
        line: usize,
        /// What the parser was trying to read.
        expected: &'static str,
    },

    /// A line did not hold the expected token(s).
    #[error("line {line}: expected {expected}, got {got:?}")]
    Malformed {
        /// Line number of the offending line (1-based).
        line: usize,
        /// What the parser was trying to read.
        expected: &'static str,
        /// The offending text, truncated for display.
        got: String,
    },

    /// A joint coordinate parsed as NaN or infinity.
    #[error("line {line}: non-finite joint coordinate")]
    NonFinite {
        /// Line number of the offending joint line (1-based).
        line: usize,
    },

    /// Content remained after the declared number of frame blocks.
    #[error("line {line}: trailing content after declared frames")]
    TrailingContent {
        /// Line number of the first unexpected line (1-based).
        line: usize,
    },

    /// Underlying read failure.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures in topology configuration or topology-bound data.
///
/// Raised from constructors ([`crate::topology::JointTopology::new`],
/// [`crate::remap::TopologyRemapper::new`],
/// [`crate::angles::AngleFeatureExtractor::new`]) these are fatal
/// configuration errors. Raised from [`crate::topology::Trajectory::new`]
/// over loaded array data they are file-scoped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A topology was declared with the same label twice.
    #[error("duplicate joint label {label:?}")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },

    /// A label was looked up in a topology that does not define it.
    #[error("label {label:?} not present in topology {topology:?}")]
    UnknownLabel {
        /// The missing label.
        label: String,
        /// Name of the topology that was searched.
        topology: String,
    },

    /// A target label has no entry in the target→source mapping.
    #[error("mapping has no source for target label {label:?}")]
    MissingMapping {
        /// The unmapped target label.
        label: String,
    },

    /// A coordinate transform was built from an invalid axis order.
    #[error("axes {axes:?} are not a permutation of [0, 1, 2]")]
    InvalidAxes {
        /// The rejected axis order.
        axes: [usize; 3],
    },

    /// Array dimensions do not match the topology it claims to be bound to.
    #[error("array shape {shape:?} does not match topology {topology:?} ({joints} joints)")]
    ShapeMismatch {
        /// Name of the expected topology.
        topology: String,
        /// Joint count of the expected topology.
        joints: usize,
        /// The actual array shape.
        shape: Vec<usize>,
    },

    /// A component received a trajectory bound to a different topology.
    #[error("expected a trajectory in topology {expected:?}, got {got:?}")]
    TopologyMismatch {
        /// Topology the component was constructed for.
        expected: String,
        /// Topology of the trajectory it received.
        got: String,
    },

    /// A trajectory held a NaN or infinite coordinate.
    #[error("non-finite coordinate at frame {frame}, joint {joint}")]
    NonFinite {
        /// Frame index of the bad sample.
        frame: usize,
        /// Joint index of the bad sample.
        joint: usize,
    },

    /// A trajectory had zero frames.
    #[error("trajectory must contain at least one frame")]
    Empty,
}

/// Failures in temporal smoothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// The window length must be odd so the fit can be centered.
    #[error("window length {window} must be odd")]
    EvenWindow {
        /// The rejected window length.
        window: usize,
    },

    /// The polynomial order must leave at least one degree of freedom.
    #[error("polynomial order {order} must be less than window length {window}")]
    OrderTooHigh {
        /// The rejected polynomial order.
        order: usize,
        /// The configured window length.
        window: usize,
    },

    /// The fit's normal equations could not be solved.
    #[error("smoothing weights are ill-conditioned for window {window}, order {order}")]
    IllConditioned {
        /// The configured window length.
        window: usize,
        /// The configured polynomial order.
        order: usize,
    },

    /// The trajectory is shorter than the smoothing window.
    ///
    /// Callers must pre-filter on sequence length; the smoother never
    /// silently shrinks its window.
    #[error("trajectory has {frames} frames, smoothing window needs at least {window}")]
    InsufficientLength {
        /// Frame count of the rejected trajectory.
        frames: usize,
        /// The configured window length.
        window: usize,
    },
}

/// Failures while persisting arrays or list files.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Underlying write failure.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    /// NPY encoding failure.
    #[error("array encoding: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    /// NPZ archive failure.
    #[error("archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Union of the file-scoped failures one worker can hit.
///
/// Collected by the batch layer into per-file outcomes; never propagated
/// across the worker boundary as a panic.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Recording decode failed.
    #[error("parse: {0}")]
    Record(#[from] RecordError),

    /// Loaded array did not satisfy the topology contract.
    #[error("topology: {0}")]
    Topology(#[from] TopologyError),

    /// Smoothing rejected the trajectory.
    #[error("filter: {0}")]
    Filter(#[from] FilterError),

    /// Array input could not be decoded.
    #[error("array decoding: {0}")]
    ReadNpy(#[from] ndarray_npy::ReadNpyError),

    /// Output could not be persisted.
    #[error("persist: {0}")]
    Persist(#[from] PersistError),

    /// Plain I/O failure on the input file.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the batch layer itself, before any file is processed.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The bounded worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
