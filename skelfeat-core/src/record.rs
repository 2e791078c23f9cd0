//! Raw skeleton recording decoder
//!
//! ## Format
//!
//! A recording is plain text, one token group per line:
//!
//! ```text
//! frameCount
//!   bodyCount                      (per frame)
//!   <body metadata, ≥10 fields>    (one line per body)
//!   jointCount
//!   <joint line, ≥11 fields>       (jointCount lines)
//! ```
//!
//! Joint line fields 0–2 are the (x, y, z) position; field 11, when
//! present, is the per-joint tracking-state code. Body metadata carries the
//! lean-quality flag at field 1 and the body tracking-state flag at field 6.
//!
//! ## Strictness
//!
//! Parsing is line-count-driven: the header says exactly how many frame
//! blocks follow and each block says exactly how many joint lines follow.
//! A short read, a non-numeric field, a non-finite coordinate, or content
//! after the last declared frame is a [`RecordError`] for the whole file.
//! There is no partial recovery; corpus triage belongs to
//! [`crate::validate::CorpusValidator`], which runs before full decodes are
//! spent.
//!
//! Decoding produces a [`TrackingRecord`]: frames of raw joints keyed by
//! their per-line index, not yet bound to a topology. [`SensorLayout`]
//! performs that binding, placing each mapped raw joint into its
//! sensor-native slot.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use ndarray::Array3;

use crate::constants::record::{BODY_FIELDS_MIN, BODY_LEAN_FIELD, BODY_TRACKING_FIELD, JOINT_FIELDS_MIN, JOINT_TRACKING_FIELD};
use crate::constants::topology::RAW_JOINT_SLOTS;
use crate::errors::{RecordError, TopologyError};
use crate::topology::{sensor_topology, JointTopology, Trajectory};

/// One tracked joint as reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawJoint {
    /// Position in sensor units (millimeter scale), sensor axis convention.
    pub position: [f32; 3],
    /// Per-joint tracking-state code, when the line carried one.
    pub tracking: Option<i32>,
}

/// Body-level tracking metadata for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyState {
    /// Lean-quality flag (0 = confidently tracked).
    pub lean: i32,
    /// Body tracking-state flag (0 = confidently tracked).
    pub tracking: i32,
}

/// One decoded frame: body metadata plus the raw joint block.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFrame {
    /// Metadata of each tracked body, in file order.
    pub bodies: Vec<BodyState>,
    /// Raw joints, indexed by their position in the joint block.
    pub joints: Vec<RawJoint>,
}

/// A fully decoded recording, prior to topology binding.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingRecord {
    /// Decoded frames, in file order.
    pub frames: Vec<RecordFrame>,
}

impl TrackingRecord {
    /// Number of frames, equal to the recording's declared header count.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Line-oriented cursor shared by the parser and the corpus validator.
pub(crate) struct LineCursor<R: BufRead> {
    lines: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// 1-based number of the last line returned.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn next_line(&mut self, expected: &'static str) -> Result<String, RecordError> {
        self.line += 1;
        match self.lines.next() {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => Err(RecordError::Io(e)),
            None => Err(RecordError::UnexpectedEof {
                line: self.line,
                expected,
            }),
        }
    }

    pub(crate) fn next_count(&mut self, expected: &'static str) -> Result<usize, RecordError> {
        let text = self.next_line(expected)?;
        text.trim().parse().map_err(|_| RecordError::Malformed {
            line: self.line,
            expected,
            got: clip(&text),
        })
    }

    /// Consume the rest of the input, rejecting anything but blank lines.
    fn expect_end(&mut self) -> Result<(), RecordError> {
        while let Some(result) = self.lines.next() {
            self.line += 1;
            let text = result.map_err(RecordError::Io)?;
            if !text.trim().is_empty() {
                return Err(RecordError::TrailingContent { line: self.line });
            }
        }
        Ok(())
    }
}

fn clip(text: &str) -> String {
    const MAX: usize = 40;
    let trimmed = text.trim();
    if trimmed.len() <= MAX {
        trimmed.to_owned()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        trimmed[..end].to_owned()
    }
}

fn parse_field_i32(
    fields: &[&str],
    position: usize,
    line: usize,
    expected: &'static str,
) -> Result<i32, RecordError> {
    fields[position].parse().map_err(|_| RecordError::Malformed {
        line,
        expected,
        got: clip(fields[position]),
    })
}

/// Strict decoder for raw skeleton recordings.
pub struct RecordParser;

impl RecordParser {
    /// Decode a recording file.
    pub fn parse_file(path: &Path) -> Result<TrackingRecord, RecordError> {
        let file = File::open(path)?;
        Self::parse_reader(BufReader::new(file))
    }

    /// Decode a recording from any buffered reader.
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<TrackingRecord, RecordError> {
        let mut cursor = LineCursor::new(reader);
        let frame_count = cursor.next_count("frame count")?;

        let mut frames = Vec::with_capacity(frame_count);
        for _ in 0..frame_count {
            frames.push(Self::parse_frame(&mut cursor)?);
        }
        cursor.expect_end()?;

        Ok(TrackingRecord { frames })
    }

    fn parse_frame<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<RecordFrame, RecordError> {
        let body_count = cursor.next_count("body count")?;

        let mut bodies = Vec::with_capacity(body_count);
        for _ in 0..body_count {
            bodies.push(Self::parse_body(cursor)?);
        }

        let joint_count = cursor.next_count("joint count")?;
        let mut joints = Vec::with_capacity(joint_count);
        for _ in 0..joint_count {
            joints.push(Self::parse_joint(cursor)?);
        }

        Ok(RecordFrame { bodies, joints })
    }

    fn parse_body<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<BodyState, RecordError> {
        let text = cursor.next_line("body metadata")?;
        let line = cursor.line();
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < BODY_FIELDS_MIN {
            return Err(RecordError::Malformed {
                line,
                expected: "body metadata with at least 10 fields",
                got: clip(&text),
            });
        }
        Ok(BodyState {
            lean: parse_field_i32(&fields, BODY_LEAN_FIELD, line, "lean flag")?,
            tracking: parse_field_i32(&fields, BODY_TRACKING_FIELD, line, "body tracking flag")?,
        })
    }

    fn parse_joint<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<RawJoint, RecordError> {
        let text = cursor.next_line("joint sample")?;
        let line = cursor.line();
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < JOINT_FIELDS_MIN {
            return Err(RecordError::Malformed {
                line,
                expected: "joint sample with at least 11 fields",
                got: clip(&text),
            });
        }

        let mut position = [0.0f32; 3];
        for (axis, slot) in position.iter_mut().enumerate() {
            let value: f32 = fields[axis].parse().map_err(|_| RecordError::Malformed {
                line,
                expected: "numeric joint coordinate",
                got: clip(fields[axis]),
            })?;
            if !value.is_finite() {
                return Err(RecordError::NonFinite { line });
            }
            *slot = value;
        }

        // The telemetry fields between position and tracking state are
        // unused downstream but still part of the numeric contract.
        for field in &fields[3..JOINT_FIELDS_MIN] {
            field.parse::<f32>().map_err(|_| RecordError::Malformed {
                line,
                expected: "numeric joint field",
                got: clip(field),
            })?;
        }

        let tracking = if fields.len() > JOINT_TRACKING_FIELD {
            Some(parse_field_i32(&fields, JOINT_TRACKING_FIELD, line, "joint tracking state")?)
        } else {
            None
        };

        Ok(RawJoint { position, tracking })
    }
}

/// Binding from raw per-line joint indices to sensor-topology slots.
///
/// The sensor dump indexes joints 0‥24 in its own order; only a subset is
/// kept. The layout owns that subset: which raw indices survive and which
/// slot of the sensor-native topology each lands in.
#[derive(Debug, Clone)]
pub struct SensorLayout {
    topology: Arc<JointTopology>,
    slots: Vec<(usize, usize)>,
}

impl SensorLayout {
    /// Build a layout over `topology` from `(raw index, slot)` pairs.
    ///
    /// Every slot must exist in the topology.
    pub fn new(
        topology: Arc<JointTopology>,
        slots: &[(usize, usize)],
    ) -> Result<Self, TopologyError> {
        for &(_, slot) in slots {
            if slot >= topology.len() {
                return Err(TopologyError::ShapeMismatch {
                    topology: topology.name().to_owned(),
                    joints: topology.len(),
                    shape: vec![slot],
                });
            }
        }
        Ok(Self {
            topology,
            slots: slots.to_vec(),
        })
    }

    /// The standard 17-slot layout of the tracking sensor.
    pub fn standard() -> Result<Self, TopologyError> {
        Self::new(sensor_topology()?, &RAW_JOINT_SLOTS)
    }

    /// The sensor-native topology this layout binds into.
    pub fn topology(&self) -> &Arc<JointTopology> {
        &self.topology
    }

    /// Raw joint indices the layout keeps, ascending.
    ///
    /// This doubles as the joint-of-interest set for corpus validation.
    pub fn raw_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.slots.iter().map(|&(raw, _)| raw).collect();
        indices.sort_unstable();
        indices
    }

    /// Bind a decoded recording to the sensor-native topology.
    ///
    /// Each frame's mapped raw joints are copied into their slots; raw
    /// indices outside the layout are discarded, and slots whose raw joint
    /// is missing from a frame stay at the origin. When a frame carries
    /// more than one body, the frame's single joint block is used as-is;
    /// corpus validation restricts real inputs to single-body recordings.
    pub fn bind(&self, record: &TrackingRecord) -> Result<Trajectory, TopologyError> {
        if record.frames.is_empty() {
            return Err(TopologyError::Empty);
        }
        let mut data = Array3::zeros((record.frames.len(), self.topology.len(), 3));
        for (frame_idx, frame) in record.frames.iter().enumerate() {
            for &(raw, slot) in &self.slots {
                if let Some(joint) = frame.joints.get(raw) {
                    for axis in 0..3 {
                        data[[frame_idx, slot, axis]] = joint.position[axis];
                    }
                }
            }
        }
        Ok(Trajectory::from_parts(self.topology.clone(), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn body_line() -> &'static str {
        "1 0 1 1 1 1 0 0.01 -0.02 2"
    }

    fn joint_line(x: f32, y: f32, z: f32, state: i32) -> String {
        format!("{x} {y} {z} 0.1 0.2 100.0 200.0 0.0 0.0 0.0 1.0 {state}")
    }

    fn recording(frames: usize, joints: usize) -> String {
        let mut text = format!("{frames}\n");
        for f in 0..frames {
            text.push_str("1\n");
            text.push_str(body_line());
            text.push('\n');
            text.push_str(&format!("{joints}\n"));
            for j in 0..joints {
                text.push_str(&joint_line(j as f32, f as f32, 2.5, 2));
                text.push('\n');
            }
        }
        text
    }

    #[test]
    fn declared_counts_match_decoded_content() {
        let record = RecordParser::parse_reader(Cursor::new(recording(3, 25))).unwrap();
        assert_eq!(record.frame_count(), 3);
        for frame in &record.frames {
            assert_eq!(frame.bodies.len(), 1);
            assert_eq!(frame.joints.len(), 25);
        }
        assert_eq!(record.frames[1].joints[4].position, [4.0, 1.0, 2.5]);
        assert_eq!(record.frames[0].joints[0].tracking, Some(2));
    }

    #[test]
    fn truncated_recording_is_rejected() {
        let mut text = recording(2, 25);
        let keep = text.lines().count() - 3;
        text = text.lines().take(keep).collect::<Vec<_>>().join("\n");
        let err = RecordParser::parse_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, RecordError::UnexpectedEof { .. }));
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let text = recording(1, 25).replace("4 0 2.5", "4 oops 2.5");
        let err = RecordParser::parse_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, RecordError::Malformed { .. }));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let text = recording(1, 25).replace("4 0 2.5", "4 nan 2.5");
        let err = RecordParser::parse_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, RecordError::NonFinite { .. }));
    }

    #[test]
    fn trailing_content_is_rejected() {
        let mut text = recording(1, 25);
        text.push_str("\n\n99\n");
        let err = RecordParser::parse_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, RecordError::TrailingContent { .. }));
    }

    #[test]
    fn trailing_blank_lines_are_tolerated() {
        let mut text = recording(1, 25);
        text.push_str("\n   \n");
        assert!(RecordParser::parse_reader(Cursor::new(text)).is_ok());
    }

    #[test]
    fn missing_tracking_field_is_optional() {
        let mut text = String::from("1\n1\n");
        text.push_str(body_line());
        text.push_str("\n1\n");
        text.push_str("1.0 2.0 3.0 0.1 0.2 0.3 0.4 0.5 0.6 0.7 0.8\n");
        let record = RecordParser::parse_reader(Cursor::new(text)).unwrap();
        assert_eq!(record.frames[0].joints[0].tracking, None);
    }

    #[test]
    fn binding_places_joints_in_slots() {
        let layout = SensorLayout::standard().unwrap();
        let record = RecordParser::parse_reader(Cursor::new(recording(2, 25))).unwrap();
        let trajectory = layout.bind(&record).unwrap();

        assert_eq!(trajectory.frames(), 2);
        assert_eq!(trajectory.topology().len(), 17);
        // Raw joint 3 (head) lands in slot 2; x was the raw index.
        assert_eq!(trajectory.joint(0, 2), [3.0, 0.0, 2.5]);
        // Raw joint 20 (spine shoulder) lands in slot 1.
        assert_eq!(trajectory.joint(1, 1), [20.0, 1.0, 2.5]);
    }

    #[test]
    fn binding_zero_fills_missing_raw_joints() {
        // Only 5 raw joints per frame; most slots stay at the origin.
        let layout = SensorLayout::standard().unwrap();
        let record = RecordParser::parse_reader(Cursor::new(recording(1, 5))).unwrap();
        let trajectory = layout.bind(&record).unwrap();
        assert_eq!(trajectory.joint(0, 2), [3.0, 0.0, 2.5]); // raw 3 present
        assert_eq!(trajectory.joint(0, 1), [0.0, 0.0, 0.0]); // raw 20 absent
    }

    #[test]
    fn layout_rejects_out_of_range_slot() {
        let topology = sensor_topology().unwrap();
        let err = SensorLayout::new(topology, &[(0, 17)]).unwrap_err();
        assert!(matches!(err, TopologyError::ShapeMismatch { .. }));
    }
}
