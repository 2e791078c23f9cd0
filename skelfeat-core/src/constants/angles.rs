//! The hinge-angle feature catalogue
//!
//! Sixteen bilateral hinge angles over the canonical topology, derived from
//! the canonical skeleton's edge list. The order here is the feature order
//! of every persisted `cos`/`sin` array; append, never reorder.

use crate::topology::AngleDefinition;

/// Ordered hinge-angle definitions extracted per frame.
pub const HINGE_ANGLES: [AngleDefinition; 16] = [
    AngleDefinition {
        name: "l_neck",
        near_a: "Head",
        vertex: "L_Shoulder",
        near_b: "L_Hip",
    },
    AngleDefinition {
        name: "r_neck",
        near_a: "Head",
        vertex: "R_Shoulder",
        near_b: "R_Hip",
    },
    AngleDefinition {
        name: "l_shoulder_abduction",
        near_a: "L_Hip",
        vertex: "L_Shoulder",
        near_b: "L_Elbow",
    },
    AngleDefinition {
        name: "r_shoulder_abduction",
        near_a: "R_Hip",
        vertex: "R_Shoulder",
        near_b: "R_Elbow",
    },
    AngleDefinition {
        name: "l_shoulder_horizontal",
        near_a: "R_Shoulder",
        vertex: "L_Shoulder",
        near_b: "L_Elbow",
    },
    AngleDefinition {
        name: "r_shoulder_horizontal",
        near_a: "L_Shoulder",
        vertex: "R_Shoulder",
        near_b: "R_Elbow",
    },
    AngleDefinition {
        name: "l_elbow",
        near_a: "L_Shoulder",
        vertex: "L_Elbow",
        near_b: "L_Wrist",
    },
    AngleDefinition {
        name: "r_elbow",
        near_a: "R_Shoulder",
        vertex: "R_Elbow",
        near_b: "R_Wrist",
    },
    AngleDefinition {
        name: "l_hip_flexion",
        near_a: "L_Shoulder",
        vertex: "L_Hip",
        near_b: "L_Knee",
    },
    AngleDefinition {
        name: "r_hip_flexion",
        near_a: "R_Shoulder",
        vertex: "R_Hip",
        near_b: "R_Knee",
    },
    AngleDefinition {
        name: "l_hip_abduction",
        near_a: "R_Hip",
        vertex: "L_Hip",
        near_b: "L_Knee",
    },
    AngleDefinition {
        name: "r_hip_abduction",
        near_a: "L_Hip",
        vertex: "R_Hip",
        near_b: "R_Knee",
    },
    AngleDefinition {
        name: "l_knee",
        near_a: "L_Hip",
        vertex: "L_Knee",
        near_b: "L_Ankle",
    },
    AngleDefinition {
        name: "r_knee",
        near_a: "R_Hip",
        vertex: "R_Knee",
        near_b: "R_Ankle",
    },
    AngleDefinition {
        name: "l_ankle",
        near_a: "L_Knee",
        vertex: "L_Ankle",
        near_b: "L_Foot",
    },
    AngleDefinition {
        name: "r_ankle",
        near_a: "R_Knee",
        vertex: "R_Ankle",
        near_b: "R_Foot",
    },
];
