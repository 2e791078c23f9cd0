//! Joint orderings and the sensor→canonical rig conversion
//!
//! Two skeleton layouts exist in this domain. The tracking sensor emits 25
//! raw joints per frame, of which 17 are kept in a fixed slot order (the
//! sensor-native topology). Feature extraction runs on a 15-joint canonical
//! topology shared by every supported rig; canonical labels are a subset of
//! the sensor-native labels, so the standard rig mapping is by identical
//! label.

/// Name of the sensor-native topology.
pub const SENSOR_TOPOLOGY_NAME: &str = "sensor17";

/// Name of the canonical topology.
pub const CANONICAL_TOPOLOGY_NAME: &str = "canonical15";

/// Sensor-native joint labels, in slot order.
///
/// The order must exactly match the layout of persisted `(T, 17, 3)`
/// trajectory arrays. The two spine joints have no canonical counterpart
/// and are dropped by the rig conversion.
pub const SENSOR_JOINT_LABELS: [&str; 17] = [
    "SpineBase",     // 0
    "SpineShoulder", // 1
    "Head",          // 2
    "L_Shoulder",    // 3
    "L_Elbow",       // 4
    "L_Wrist",       // 5
    "R_Shoulder",    // 6
    "R_Elbow",       // 7
    "R_Wrist",       // 8
    "L_Hip",         // 9
    "L_Knee",        // 10
    "L_Ankle",       // 11
    "L_Foot",        // 12
    "R_Hip",         // 13
    "R_Knee",        // 14
    "R_Ankle",       // 15
    "R_Foot",        // 16
];

/// Canonical joint labels, in slot order.
pub const CANONICAL_JOINT_LABELS: [&str; 15] = [
    "Head",
    "L_Shoulder",
    "R_Shoulder",
    "L_Elbow",
    "R_Elbow",
    "L_Wrist",
    "R_Wrist",
    "L_Hip",
    "R_Hip",
    "L_Knee",
    "R_Knee",
    "L_Ankle",
    "R_Ankle",
    "L_Foot",
    "R_Foot",
];

/// Raw per-line joint index → sensor-native slot.
///
/// The sensor dump lists joints by its own 0‥24 indexing; only these 17 are
/// kept. Raw indices absent from this table are discarded during binding.
pub const RAW_JOINT_SLOTS: [(usize, usize); 17] = [
    (0, 0),   // base spine
    (20, 1),  // spine at shoulder height
    (3, 2),   // head
    (4, 3),   // left shoulder
    (5, 4),   // left elbow
    (7, 5),   // left hand, kept as wrist
    (8, 6),   // right shoulder
    (9, 7),   // right elbow
    (10, 8),  // right wrist
    (12, 9),  // left hip
    (13, 10), // left knee
    (14, 11), // left ankle
    (15, 12), // left foot
    (16, 13), // right hip
    (17, 14), // right knee
    (18, 15), // right ankle
    (19, 16), // right foot
];

/// Axis order applied by the sensor→canonical conversion.
///
/// The sensor reports (x, y, z) with y up; the canonical convention is
/// z-up, so the 2nd and 3rd axes swap.
pub const AXIS_ORDER_SENSOR_TO_CANONICAL: [usize; 3] = [0, 2, 1];

/// Scale applied by the sensor→canonical conversion (millimeters → meters).
pub const SCALE_SENSOR_TO_CANONICAL: f32 = 1.0e-3;
