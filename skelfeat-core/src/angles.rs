//! Hinge-angle feature extraction
//!
//! ## Geometry
//!
//! For each [`AngleDefinition`] and frame, the extractor forms the rays
//! `a = A − V` and `b = B − V` from the vertex joint to its two neighbors
//! and encodes the unsigned angle between them as a (cosine, sine) pair:
//!
//! ```text
//! cos θ = (a · b) / (‖a‖ ‖b‖)     clamped to [-1, 1]
//! sin θ = ‖a × b‖ / (‖a‖ ‖b‖)     clamped to [0, 1]
//! ```
//!
//! Hinge angles are modeled as unsigned in [0, π], so the sine is a cross
//! product magnitude and always non-negative; winding direction is
//! discarded. The clamps absorb floating-point overshoot so downstream
//! inverse-trig can never see values outside the principal domain.
//!
//! The pair encoding avoids the 0/2π wrap discontinuity of a raw angle and
//! satisfies cos² + sin² = 1 up to floating error, except at the
//! degeneracy sentinel.
//!
//! ## Degenerate frames
//!
//! When either ray has zero length (coincident joint positions) the angle
//! is undefined. The extractor substitutes the "straight" default
//! (cos = 1, sin = 0), records the frame in
//! [`AngleFeatures::degeneracies`], and keeps going; one collapsed frame
//! must not abort a batch.

use std::sync::Arc;

use ndarray::Array2;

use crate::constants::angles::HINGE_ANGLES;
use crate::errors::TopologyError;
use crate::topology::{AngleDefinition, JointTopology, Trajectory};

/// An angle definition resolved to topology indices.
#[derive(Debug, Clone, Copy)]
struct ResolvedAngle {
    name: &'static str,
    near_a: usize,
    vertex: usize,
    near_b: usize,
}

/// A degenerate-angle diagnostic: which feature collapsed at which frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degeneracy {
    /// Frame index of the collapsed geometry.
    pub frame: usize,
    /// Index into the extractor's angle list.
    pub angle: usize,
}

/// Extracted features: parallel cosine and sine arrays of shape
/// `(frames, angles)`, plus degeneracy diagnostics.
#[derive(Debug, Clone)]
pub struct AngleFeatures {
    /// Cosine of each angle at each frame.
    pub cos: Array2<f32>,
    /// Sine of each angle at each frame, non-negative by construction.
    pub sin: Array2<f32>,
    /// Frames where a ray collapsed and the sentinel was substituted.
    pub degeneracies: Vec<Degeneracy>,
}

/// Computes the fixed hinge-angle set from canonical trajectories.
#[derive(Debug, Clone)]
pub struct AngleFeatureExtractor {
    topology: Arc<JointTopology>,
    angles: Vec<ResolvedAngle>,
}

impl AngleFeatureExtractor {
    /// Build an extractor, resolving every definition's labels against
    /// `topology`.
    ///
    /// Unknown labels fail with [`TopologyError::UnknownLabel`] here, at
    /// configuration time, never per frame.
    pub fn new(
        topology: Arc<JointTopology>,
        definitions: &[AngleDefinition],
    ) -> Result<Self, TopologyError> {
        let mut angles = Vec::with_capacity(definitions.len());
        for def in definitions {
            angles.push(ResolvedAngle {
                name: def.name,
                near_a: topology.resolve(def.near_a)?,
                vertex: topology.resolve(def.vertex)?,
                near_b: topology.resolve(def.near_b)?,
            });
        }
        Ok(Self { topology, angles })
    }

    /// Extractor over the shipped hinge-angle catalogue.
    pub fn standard(topology: Arc<JointTopology>) -> Result<Self, TopologyError> {
        Self::new(topology, &HINGE_ANGLES)
    }

    /// Number of configured angles; the feature dimension.
    pub fn angle_count(&self) -> usize {
        self.angles.len()
    }

    /// Compute features for every frame of `trajectory`.
    pub fn extract(&self, trajectory: &Trajectory) -> Result<AngleFeatures, TopologyError> {
        if trajectory.topology().name() != self.topology.name() {
            return Err(TopologyError::TopologyMismatch {
                expected: self.topology.name().to_owned(),
                got: trajectory.topology().name().to_owned(),
            });
        }

        let frames = trajectory.frames();
        let count = self.angles.len();
        let mut cos = Array2::zeros((frames, count));
        let mut sin = Array2::zeros((frames, count));
        let mut degeneracies = Vec::new();

        for frame in 0..frames {
            for (index, angle) in self.angles.iter().enumerate() {
                let vertex = trajectory.joint(frame, angle.vertex);
                let a = ray(trajectory.joint(frame, angle.near_a), vertex);
                let b = ray(trajectory.joint(frame, angle.near_b), vertex);

                let norms = norm(a) * norm(b);
                if norms == 0.0 {
                    cos[[frame, index]] = 1.0;
                    sin[[frame, index]] = 0.0;
                    degeneracies.push(Degeneracy { frame, angle: index });
                    log::debug!("degenerate angle {:?} at frame {}", angle.name, frame);
                    continue;
                }

                cos[[frame, index]] = (dot(a, b) / norms).clamp(-1.0, 1.0) as f32;
                sin[[frame, index]] = (norm(cross(a, b)) / norms).clamp(0.0, 1.0) as f32;
            }
        }

        Ok(AngleFeatures {
            cos,
            sin,
            degeneracies,
        })
    }
}

fn ray(tip: [f32; 3], vertex: [f32; 3]) -> [f64; 3] {
    [
        f64::from(tip[0]) - f64::from(vertex[0]),
        f64::from(tip[1]) - f64::from(vertex[1]),
        f64::from(tip[2]) - f64::from(vertex[2]),
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    const TRIPLE: [AngleDefinition; 1] = [AngleDefinition {
        name: "test",
        near_a: "a",
        vertex: "v",
        near_b: "b",
    }];

    fn topology() -> Arc<JointTopology> {
        Arc::new(JointTopology::new("triple", &["a", "v", "b"]).unwrap())
    }

    fn single_frame(a: [f32; 3], v: [f32; 3], b: [f32; 3]) -> Trajectory {
        let mut data = Array3::zeros((1, 3, 3));
        for (joint, pos) in [a, v, b].iter().enumerate() {
            for axis in 0..3 {
                data[[0, joint, axis]] = pos[axis];
            }
        }
        Trajectory::new(topology(), data).unwrap()
    }

    #[test]
    fn right_angle_encodes_as_cos_zero_sin_one() {
        let extractor = AngleFeatureExtractor::new(topology(), &TRIPLE).unwrap();
        let features = extractor
            .extract(&single_frame([1.0, 0.0, 0.0], [0.0; 3], [0.0, 1.0, 0.0]))
            .unwrap();
        assert!(features.cos[[0, 0]].abs() < 1e-6);
        assert!((features.sin[[0, 0]] - 1.0).abs() < 1e-6);
        assert!(features.degeneracies.is_empty());
    }

    #[test]
    fn antiparallel_rays_encode_as_cos_minus_one() {
        let extractor = AngleFeatureExtractor::new(topology(), &TRIPLE).unwrap();
        let features = extractor
            .extract(&single_frame([1.0, 0.0, 0.0], [0.0; 3], [-1.0, 0.0, 0.0]))
            .unwrap();
        assert!((features.cos[[0, 0]] + 1.0).abs() < 1e-6);
        assert!(features.sin[[0, 0]].abs() < 1e-6);
    }

    #[test]
    fn encoding_stays_on_the_unit_circle() {
        let extractor = AngleFeatureExtractor::new(topology(), &TRIPLE).unwrap();
        for (a, b) in [
            ([1.0, 2.0, 3.0], [0.5, -0.4, 0.8]),
            ([0.1, 0.0, 0.0], [100.0, 5.0, -3.0]),
            ([-2.0, 1.0, 0.0], [-2.0, 1.0, 1e-4]),
        ] {
            let features = extractor
                .extract(&single_frame(a, [0.0; 3], b))
                .unwrap();
            let c = f64::from(features.cos[[0, 0]]);
            let s = f64::from(features.sin[[0, 0]]);
            assert!((c * c + s * s - 1.0).abs() < 1e-5, "off circle for {a:?} {b:?}");
        }
    }

    #[test]
    fn coincident_joints_produce_sentinel_and_diagnostic() {
        let extractor = AngleFeatureExtractor::new(topology(), &TRIPLE).unwrap();
        let features = extractor
            .extract(&single_frame([0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [1.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(features.cos[[0, 0]], 1.0);
        assert_eq!(features.sin[[0, 0]], 0.0);
        assert_eq!(features.degeneracies, vec![Degeneracy { frame: 0, angle: 0 }]);
    }

    #[test]
    fn unknown_label_fails_at_construction() {
        let defs = [AngleDefinition {
            name: "bad",
            near_a: "a",
            vertex: "nope",
            near_b: "b",
        }];
        let err = AngleFeatureExtractor::new(topology(), &defs).unwrap_err();
        assert!(matches!(err, TopologyError::UnknownLabel { .. }));
    }

    #[test]
    fn standard_catalogue_resolves_against_canonical_topology() {
        let topology = crate::topology::canonical_topology().unwrap();
        let extractor = AngleFeatureExtractor::standard(topology).unwrap();
        assert_eq!(extractor.angle_count(), 16);
    }
}
