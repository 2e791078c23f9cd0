//! Cross-topology joint remapping
//!
//! The canonical feature extractor serves heterogeneous sensor rigs; this
//! is the single seam where rig-specific knowledge lives. A remapper owns
//! a total target→source label mapping plus a coordinate transform (axis
//! permutation composed with a uniform scale) and turns a source-bound
//! trajectory into a target-bound one:
//!
//! ```text
//! target[:, i, :] = transform(source[:, source_index(mapping(target_label(i))), :])
//! ```
//!
//! All mapping validation happens at construction. A remapper that built
//! successfully cannot fail per frame.

use std::sync::Arc;

use ndarray::Array3;

use crate::constants::topology::{
    AXIS_ORDER_SENSOR_TO_CANONICAL, CANONICAL_JOINT_LABELS, SCALE_SENSOR_TO_CANONICAL,
};
use crate::errors::TopologyError;
use crate::topology::{canonical_topology, sensor_topology, JointTopology, Trajectory};

/// Axis permutation composed with a uniform linear scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordTransform {
    axes: [usize; 3],
    scale: f32,
}

impl CoordTransform {
    /// Build a transform; `axes` must be a permutation of `[0, 1, 2]`.
    pub fn new(axes: [usize; 3], scale: f32) -> Result<Self, TopologyError> {
        let mut seen = [false; 3];
        for &axis in &axes {
            if axis > 2 || seen[axis] {
                return Err(TopologyError::InvalidAxes { axes });
            }
            seen[axis] = true;
        }
        Ok(Self { axes, scale })
    }

    /// The transform that changes nothing.
    pub fn identity() -> Self {
        Self {
            axes: [0, 1, 2],
            scale: 1.0,
        }
    }

    /// The standard sensor→canonical conversion: swap the up axis into
    /// third position and convert millimeters to meters.
    pub fn sensor_to_canonical() -> Self {
        Self {
            axes: AXIS_ORDER_SENSOR_TO_CANONICAL,
            scale: SCALE_SENSOR_TO_CANONICAL,
        }
    }

    /// Transform one position.
    pub fn apply(&self, position: [f32; 3]) -> [f32; 3] {
        [
            position[self.axes[0]] * self.scale,
            position[self.axes[1]] * self.scale,
            position[self.axes[2]] * self.scale,
        ]
    }
}

/// Maps trajectories from a source topology into a target topology.
#[derive(Debug, Clone)]
pub struct TopologyRemapper {
    source: Arc<JointTopology>,
    target: Arc<JointTopology>,
    /// Source joint index feeding each target slot, in target order.
    source_for_target: Vec<usize>,
    transform: CoordTransform,
}

impl TopologyRemapper {
    /// Build a remapper from a `(target label, source label)` mapping.
    ///
    /// The mapping must be total over the target topology and every source
    /// label must exist in the source topology; otherwise construction
    /// fails with a [`TopologyError`] before any file is touched.
    pub fn new(
        source: Arc<JointTopology>,
        target: Arc<JointTopology>,
        mapping: &[(&str, &str)],
        transform: CoordTransform,
    ) -> Result<Self, TopologyError> {
        let mut source_for_target = Vec::with_capacity(target.len());
        for target_label in target.labels() {
            let source_label = mapping
                .iter()
                .find(|(t, _)| t == target_label)
                .map(|&(_, s)| s)
                .ok_or_else(|| TopologyError::MissingMapping {
                    label: target_label.clone(),
                })?;
            source_for_target.push(source.resolve(source_label)?);
        }
        Ok(Self {
            source,
            target,
            source_for_target,
            transform,
        })
    }

    /// The standard rig conversion: sensor-native 17 → canonical 15 by
    /// identical label, up-axis swap, millimeters to meters.
    pub fn standard() -> Result<Self, TopologyError> {
        let mapping: Vec<(&str, &str)> = CANONICAL_JOINT_LABELS
            .iter()
            .map(|&label| (label, label))
            .collect();
        Self::new(
            sensor_topology()?,
            canonical_topology()?,
            &mapping,
            CoordTransform::sensor_to_canonical(),
        )
    }

    /// The topology input trajectories must be bound to.
    pub fn source(&self) -> &Arc<JointTopology> {
        &self.source
    }

    /// The topology remapped trajectories are bound to.
    pub fn target(&self) -> &Arc<JointTopology> {
        &self.target
    }

    /// Remap a source-bound trajectory into the target topology.
    ///
    /// Fails only when the trajectory is bound to a different topology
    /// than the remapper was built for.
    pub fn remap(&self, trajectory: &Trajectory) -> Result<Trajectory, TopologyError> {
        if trajectory.topology().name() != self.source.name() {
            return Err(TopologyError::TopologyMismatch {
                expected: self.source.name().to_owned(),
                got: trajectory.topology().name().to_owned(),
            });
        }

        let frames = trajectory.frames();
        let mut data = Array3::zeros((frames, self.target.len(), 3));
        for frame in 0..frames {
            for (slot, &source_index) in self.source_for_target.iter().enumerate() {
                let position = self.transform.apply(trajectory.joint(frame, source_index));
                for axis in 0..3 {
                    data[[frame, slot, axis]] = position[axis];
                }
            }
        }
        Ok(Trajectory::from_parts(self.target.clone(), data))
    }
}
