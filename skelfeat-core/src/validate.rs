//! Corpus triage: cheap pass/fail checks before full decodes
//!
//! A recording passes when every frame carries exactly one confidently
//! tracked body, declares at least the sensor-native joint count, and
//! reports every joint of interest as tracked or inferred. The check reads
//! the same line structure as [`crate::record::RecordParser`] but keeps
//! only scalars, short-circuits on the first failing frame, and treats any
//! parse error as a plain fail: triage, not diagnostics.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::constants::record::{
    BODY_FIELDS_MIN, BODY_LEAN_FIELD, BODY_STATE_OK, BODY_TRACKING_FIELD, JOINT_TRACKING_FIELD,
    TRACKING_STATE_INFERRED, TRACKING_STATE_TRACKED,
};
use crate::errors::{RecordError, TopologyError};
use crate::record::{LineCursor, SensorLayout};

/// Read-only quality check over raw recordings.
#[derive(Debug, Clone)]
pub struct CorpusValidator {
    joints_of_interest: Vec<usize>,
    min_joint_count: usize,
}

impl CorpusValidator {
    /// Build a validator for a raw joint-index set of interest.
    ///
    /// `min_joint_count` is the smallest acceptable declared joint count
    /// per frame, normally the sensor-native topology size.
    pub fn new(joints_of_interest: impl IntoIterator<Item = usize>, min_joint_count: usize) -> Self {
        let mut joints: Vec<usize> = joints_of_interest.into_iter().collect();
        joints.sort_unstable();
        joints.dedup();
        Self {
            joints_of_interest: joints,
            min_joint_count,
        }
    }

    /// Validator matching the standard sensor layout.
    pub fn standard() -> Result<Self, TopologyError> {
        let layout = SensorLayout::standard()?;
        let min = layout.topology().len();
        Ok(Self::new(layout.raw_indices(), min))
    }

    /// Whether `path` satisfies all quality criteria.
    ///
    /// Unreadable or malformed files fail; errors are never raised.
    pub fn check_file(&self, path: &Path) -> bool {
        match File::open(path) {
            Ok(file) => self.check_reader(BufReader::new(file)),
            Err(_) => false,
        }
    }

    /// Whether the recording behind `reader` satisfies all quality
    /// criteria.
    pub fn check_reader<R: BufRead>(&self, reader: R) -> bool {
        self.scan(reader).unwrap_or(false)
    }

    fn scan<R: BufRead>(&self, reader: R) -> Result<bool, RecordError> {
        let mut cursor = LineCursor::new(reader);
        let frame_count = cursor.next_count("frame count")?;

        for _ in 0..frame_count {
            if cursor.next_count("body count")? != 1 {
                return Ok(false);
            }

            let body = cursor.next_line("body metadata")?;
            let fields: Vec<&str> = body.split_whitespace().collect();
            if fields.len() < BODY_FIELDS_MIN {
                return Ok(false);
            }
            let lean: i32 = match fields[BODY_LEAN_FIELD].parse() {
                Ok(v) => v,
                Err(_) => return Ok(false),
            };
            let tracking: i32 = match fields[BODY_TRACKING_FIELD].parse() {
                Ok(v) => v,
                Err(_) => return Ok(false),
            };
            if lean != BODY_STATE_OK || tracking != BODY_STATE_OK {
                return Ok(false);
            }

            let joint_count = cursor.next_count("joint count")?;
            if joint_count < self.min_joint_count {
                return Ok(false);
            }

            for raw_index in 0..joint_count {
                let line = cursor.next_line("joint sample")?;
                if self.joints_of_interest.binary_search(&raw_index).is_err() {
                    continue;
                }
                let state = line
                    .split_whitespace()
                    .nth(JOINT_TRACKING_FIELD)
                    .and_then(|field| field.parse::<i32>().ok());
                match state {
                    Some(TRACKING_STATE_TRACKED) | Some(TRACKING_STATE_INFERRED) => {}
                    _ => return Ok(false),
                }
            }
        }

        Ok(true)
    }
}
