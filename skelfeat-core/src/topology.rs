//! Joint topologies, trajectories, and angle definitions
//!
//! A [`JointTopology`] is an ordered, immutable set of unique joint labels;
//! every dense array in the pipeline is bound to one. Binding is explicit:
//! a [`Trajectory`] carries its topology, and every component validates the
//! binding at its boundary instead of trusting array shapes. Mis-keyed
//! lookups are therefore construction-time failures, never silent no-ops.
//!
//! Topologies and angle definitions are process-wide configuration: built
//! once at startup, shared by reference (`Arc`), and never mutated.

use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array3;

use crate::constants::topology::{
    CANONICAL_JOINT_LABELS, CANONICAL_TOPOLOGY_NAME, SENSOR_JOINT_LABELS, SENSOR_TOPOLOGY_NAME,
};
use crate::errors::TopologyError;

/// Ordered, immutable sequence of unique joint labels.
///
/// The index of a label is stable for the topology's lifetime; components
/// resolve labels to indices once at construction and index arrays directly
/// afterwards.
#[derive(Debug, Clone)]
pub struct JointTopology {
    name: String,
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl JointTopology {
    /// Build a topology from an ordered label list.
    ///
    /// Fails with [`TopologyError::DuplicateLabel`] if any label repeats.
    pub fn new<S: AsRef<str>>(name: &str, labels: &[S]) -> Result<Self, TopologyError> {
        let mut index = HashMap::with_capacity(labels.len());
        let mut ordered = Vec::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref().to_owned();
            if index.insert(label.clone(), i).is_some() {
                return Err(TopologyError::DuplicateLabel { label });
            }
            ordered.push(label);
        }
        Ok(Self {
            name: name.to_owned(),
            labels: ordered,
            index,
        })
    }

    /// Topology name, used in error messages and binding checks.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of joints.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the topology has no joints.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Ordered labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label at `index`, if in range.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Index of `label`, if defined.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Resolve `label` or fail with [`TopologyError::UnknownLabel`].
    pub fn resolve(&self, label: &str) -> Result<usize, TopologyError> {
        self.index_of(label).ok_or_else(|| TopologyError::UnknownLabel {
            label: label.to_owned(),
            topology: self.name.clone(),
        })
    }
}

/// The 17-label sensor-native topology, shared as configuration.
pub fn sensor_topology() -> Result<Arc<JointTopology>, TopologyError> {
    Ok(Arc::new(JointTopology::new(
        SENSOR_TOPOLOGY_NAME,
        &SENSOR_JOINT_LABELS,
    )?))
}

/// The 15-label canonical topology, shared as configuration.
pub fn canonical_topology() -> Result<Arc<JointTopology>, TopologyError> {
    Ok(Arc::new(JointTopology::new(
        CANONICAL_TOPOLOGY_NAME,
        &CANONICAL_JOINT_LABELS,
    )?))
}

/// Dense per-frame joint positions bound to a topology.
///
/// Shape is `(frames, joints, 3)` with `joints` equal to the topology's
/// joint count. Every entry is finite; non-finite inputs are rejected at
/// construction so the angle stage never has to re-check.
#[derive(Debug, Clone)]
pub struct Trajectory {
    topology: Arc<JointTopology>,
    data: Array3<f32>,
}

impl Trajectory {
    /// Bind `data` to `topology`, validating shape and finiteness.
    pub fn new(topology: Arc<JointTopology>, data: Array3<f32>) -> Result<Self, TopologyError> {
        let shape = data.shape();
        if shape[0] == 0 {
            return Err(TopologyError::Empty);
        }
        if shape[1] != topology.len() || shape[2] != 3 {
            return Err(TopologyError::ShapeMismatch {
                topology: topology.name().to_owned(),
                joints: topology.len(),
                shape: shape.to_vec(),
            });
        }
        for ((frame, joint, _), &value) in data.indexed_iter() {
            if !value.is_finite() {
                return Err(TopologyError::NonFinite { frame, joint });
            }
        }
        Ok(Self { topology, data })
    }

    /// Bind without re-validating; for stage outputs whose invariants are
    /// guaranteed by construction (remap permutes finite data, smoothing is
    /// a finite linear combination of finite data).
    pub(crate) fn from_parts(topology: Arc<JointTopology>, data: Array3<f32>) -> Self {
        debug_assert_eq!(data.shape()[1], topology.len());
        debug_assert_eq!(data.shape()[2], 3);
        Self { topology, data }
    }

    /// Number of frames (always ≥ 1).
    pub fn frames(&self) -> usize {
        self.data.shape()[0]
    }

    /// The topology this trajectory is bound to.
    pub fn topology(&self) -> &Arc<JointTopology> {
        &self.topology
    }

    /// The underlying `(frames, joints, 3)` array.
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Consume the binding and return the raw array.
    pub fn into_data(self) -> Array3<f32> {
        self.data
    }

    /// Position of one joint at one frame.
    pub fn joint(&self, frame: usize, joint: usize) -> [f32; 3] {
        [
            self.data[[frame, joint, 0]],
            self.data[[frame, joint, 1]],
            self.data[[frame, joint, 2]],
        ]
    }
}

/// A named hinge angle measured at `vertex` between the rays toward
/// `near_a` and `near_b`.
///
/// All three labels are drawn from the canonical topology. The shipped set
/// lives in [`crate::constants::angles::HINGE_ANGLES`]; it is configuration
/// data, resolved to indices once per extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleDefinition {
    /// Feature name, used in diagnostics.
    pub name: &'static str,
    /// Label of the first near neighbor.
    pub near_a: &'static str,
    /// Label of the vertex joint.
    pub vertex: &'static str,
    /// Label of the second near neighbor.
    pub near_b: &'static str,
}
