//! Field positions and state codes of the raw recording format
//!
//! A recording is newline-separated text: a frame-count header, then per
//! frame a body count, one metadata line per body, a joint count, and that
//! many joint lines. Field positions below are 0-based within a
//! whitespace-split line.

/// Minimum field count of a body-metadata line.
pub const BODY_FIELDS_MIN: usize = 10;

/// Position of the lean-quality flag on a body-metadata line.
pub const BODY_LEAN_FIELD: usize = 1;

/// Position of the tracking-state flag on a body-metadata line.
pub const BODY_TRACKING_FIELD: usize = 6;

/// Body-level flag value meaning "confidently tracked".
pub const BODY_STATE_OK: i32 = 0;

/// Minimum numeric field count of a joint line (x, y, z plus sensor
/// telemetry).
pub const JOINT_FIELDS_MIN: usize = 11;

/// Position of the per-joint tracking-state code, when present.
pub const JOINT_TRACKING_FIELD: usize = 11;

/// Per-joint tracking state: the sensor lost this joint.
pub const TRACKING_STATE_NOT_TRACKED: i32 = 0;

/// Per-joint tracking state: position inferred from neighboring joints.
pub const TRACKING_STATE_INFERRED: i32 = 1;

/// Per-joint tracking state: position directly observed.
pub const TRACKING_STATE_TRACKED: i32 = 2;
