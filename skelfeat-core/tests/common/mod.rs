//! Synthetic recording generators shared by the integration tests
//!
//! Builds raw-format recordings of a plausible standing figure so the full
//! pipeline can run end to end without corpus data. Coordinates are in the
//! sensor's millimeter convention with y up.

use std::fs;
use std::path::Path;

/// Number of raw joints the sensor emits per frame.
pub const RAW_JOINT_COUNT: usize = 25;

/// Millimeter-scale standing pose, keyed by raw joint index.
///
/// Only the 17 raw indices the standard layout keeps get anatomical
/// positions; the rest sit at a filler offset so nothing coincides.
pub fn standing_pose() -> Vec<[f32; 3]> {
    let mut pose = vec![[9000.0, 9000.0, 9000.0]; RAW_JOINT_COUNT];
    pose[0] = [0.0, 900.0, 2500.0]; // spine base
    pose[20] = [0.0, 1400.0, 2500.0]; // spine shoulder
    pose[3] = [0.0, 1600.0, 2500.0]; // head
    pose[4] = [-200.0, 1400.0, 2500.0]; // left shoulder
    pose[5] = [-250.0, 1150.0, 2500.0]; // left elbow
    pose[7] = [-260.0, 900.0, 2480.0]; // left wrist
    pose[8] = [200.0, 1400.0, 2500.0]; // right shoulder
    pose[9] = [250.0, 1150.0, 2500.0]; // right elbow
    pose[10] = [260.0, 900.0, 2480.0]; // right wrist
    pose[12] = [-100.0, 900.0, 2500.0]; // left hip
    pose[13] = [-110.0, 500.0, 2510.0]; // left knee
    pose[14] = [-115.0, 100.0, 2520.0]; // left ankle
    pose[15] = [-120.0, 60.0, 2430.0]; // left foot
    pose[16] = [100.0, 900.0, 2500.0]; // right hip
    pose[17] = [110.0, 500.0, 2510.0]; // right knee
    pose[18] = [115.0, 100.0, 2520.0]; // right ankle
    pose[19] = [120.0, 60.0, 2430.0]; // right foot
    pose
}

/// Render a recording: one confidently tracked body per frame, every
/// joint tracked, the standing pose drifting linearly over time.
pub fn render_recording(frames: usize) -> String {
    let pose = standing_pose();
    let mut text = format!("{frames}\n");
    for frame in 0..frames {
        let drift = frame as f32 * 2.0;
        text.push_str("1\n");
        text.push_str("1 0 1 1 1 1 0 0.01 -0.02 2\n");
        text.push_str(&format!("{RAW_JOINT_COUNT}\n"));
        for position in &pose {
            text.push_str(&format!(
                "{} {} {} 0.1 0.2 100.0 200.0 0.0 0.0 0.0 1.0 2\n",
                position[0] + drift,
                position[1],
                position[2]
            ));
        }
    }
    text
}

/// Write a rendered recording to `path`.
pub fn write_recording(path: &Path, frames: usize) {
    fs::write(path, render_recording(frames)).expect("write synthetic recording");
}
