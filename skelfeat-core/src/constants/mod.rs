//! Constants for the skeleton feature pipeline
//!
//! Centralized, documented configuration data used throughout the system.
//! Everything here is fixed domain knowledge (joint orderings, the rig
//! conversion, the hinge-angle catalogue, record-format field positions),
//! not tunables derived at runtime.
//!
//! ## Organization
//!
//! - **topology**: joint label orderings, the raw-index map, and the
//!   sensor→canonical rig conversion.
//! - **record**: field positions and state codes of the raw recording
//!   format.
//! - **angles**: the ordered hinge-angle feature catalogue.
//! - **filter**: temporal smoothing defaults.

pub mod angles;
pub mod filter;
pub mod record;
pub mod topology;

pub use angles::HINGE_ANGLES;
pub use filter::{DEFAULT_POLY_ORDER, DEFAULT_WINDOW};
pub use record::{
    BODY_FIELDS_MIN, BODY_LEAN_FIELD, BODY_STATE_OK, BODY_TRACKING_FIELD, JOINT_FIELDS_MIN,
    JOINT_TRACKING_FIELD, TRACKING_STATE_INFERRED, TRACKING_STATE_NOT_TRACKED,
    TRACKING_STATE_TRACKED,
};
pub use topology::{
    AXIS_ORDER_SENSOR_TO_CANONICAL, CANONICAL_JOINT_LABELS, RAW_JOINT_SLOTS,
    SCALE_SENSOR_TO_CANONICAL, SENSOR_JOINT_LABELS,
};
