//! End-to-end pipeline tests over synthetic corpora
//!
//! Drives the full flow (triage, decode, rig conversion, smoothing,
//! feature extraction, persistence) through the same batch stages the
//! CLI uses, against recordings rendered on the fly.

mod common;

use std::fs;
use std::io::Read;

use half::f16;
use skelfeat_core::{
    batch::{check_corpus, run_batch, AngleStage, ConvertStage, RemapStage},
    canonical_topology, CorpusValidator, RecordParser, SensorLayout, TemporalSmoother,
    TopologyRemapper,
};

#[test]
fn synthetic_recording_flows_to_feature_container() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("S001C001P001R001A001.skeleton");
    common::write_recording(&raw, 20);

    // Triage accepts the recording.
    let validator = CorpusValidator::standard().unwrap();
    assert!(validator.check_file(&raw));

    // Decode honors the declared counts.
    let record = RecordParser::parse_file(&raw).unwrap();
    assert_eq!(record.frame_count(), 20);
    assert_eq!(record.frames[0].joints.len(), common::RAW_JOINT_COUNT);

    // Bind, remap, smooth, extract in memory.
    let layout = SensorLayout::standard().unwrap();
    let sensor_bound = layout.bind(&record).unwrap();
    assert_eq!(sensor_bound.topology().len(), 17);

    let remapper = TopologyRemapper::standard().unwrap();
    let canonical = remapper.remap(&sensor_bound).unwrap();
    assert_eq!(canonical.topology().len(), 15);
    // Millimeters became meters: the head sits under 2 m up (third axis
    // after the swap).
    let head = canonical.joint(0, 0);
    assert!((head[2] - 1.6).abs() < 1e-4);

    let smoother = TemporalSmoother::new(9, 3).unwrap();
    let smoothed = smoother.smooth(&canonical).unwrap();
    assert_eq!(smoothed.data().shape(), canonical.data().shape());

    let extractor =
        skelfeat_core::AngleFeatureExtractor::standard(canonical_topology().unwrap()).unwrap();
    let features = extractor.extract(&smoothed).unwrap();
    assert_eq!(features.cos.shape(), &[20, 16]);
    assert_eq!(features.sin.shape(), &[20, 16]);
    assert!(features.degeneracies.is_empty());
    for (c, s) in features.cos.iter().zip(features.sin.iter()) {
        let c = f64::from(*c);
        let s = f64::from(*s);
        assert!((c * c + s * s - 1.0).abs() < 1e-4);
    }
}

#[test]
fn staged_batch_run_mirrors_base_names() {
    let dir = tempfile::tempdir().unwrap();
    let raw_dir = dir.path().join("raw");
    let npy_dir = dir.path().join("npy");
    let canonical_dir = dir.path().join("canonical");
    let angle_dir = dir.path().join("angles");
    for d in [&raw_dir, &npy_dir, &canonical_dir, &angle_dir] {
        fs::create_dir(d).unwrap();
    }

    let clip = raw_dir.join("clip.skeleton");
    common::write_recording(&clip, 20);

    // check → convert → remap → angles, each over the worker pool.
    let validator = CorpusValidator::standard().unwrap();
    let passing = check_corpus(&validator, &[clip.clone()], 2).unwrap();
    assert_eq!(passing, vec![clip]);

    let convert = ConvertStage::standard().unwrap();
    let report = run_batch(&passing, 2, |input| convert.run(input, &npy_dir)).unwrap();
    assert!(report.is_clean());
    assert!(npy_dir.join("clip.npy").exists());

    let remap = RemapStage::standard().unwrap();
    let inputs = vec![npy_dir.join("clip.npy")];
    let report = run_batch(&inputs, 2, |input| remap.run(input, &canonical_dir)).unwrap();
    assert!(report.is_clean());

    let stage = AngleStage::new(
        canonical_topology().unwrap(),
        TemporalSmoother::new(9, 3).unwrap(),
    )
    .unwrap();
    let inputs = vec![canonical_dir.join("clip.npy")];
    let report = run_batch(&inputs, 2, |input| stage.run(input, &angle_dir)).unwrap();
    assert!(report.is_clean());

    let container = angle_dir.join("clip.npz");
    assert!(container.exists());

    // The container holds (20, 16) half-precision members.
    let mut archive = zip::ZipArchive::new(fs::File::open(&container).unwrap()).unwrap();
    for name in ["cos.npy", "sin.npy"] {
        let mut member = archive.by_name(name).unwrap();
        let mut bytes = Vec::new();
        member.read_to_end(&mut bytes).unwrap();
        let npy = npyz::NpyFile::new(&bytes[..]).unwrap();
        assert_eq!(npy.shape(), &[20, 16]);
        let values: Vec<f16> = npy.into_vec().unwrap();
        assert_eq!(values.len(), 20 * 16);
    }
}

#[test]
fn short_recording_fails_without_sinking_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let npy_dir = dir.path().join("npy");
    let canonical_dir = dir.path().join("canonical");
    let angle_dir = dir.path().join("angles");
    for d in [&npy_dir, &canonical_dir, &angle_dir] {
        fs::create_dir(d).unwrap();
    }

    // One 20-frame clip and one 5-frame clip, shorter than the window.
    for (name, frames) in [("long.skeleton", 20usize), ("short.skeleton", 5)] {
        common::write_recording(&dir.path().join(name), frames);
    }

    let convert = ConvertStage::standard().unwrap();
    let remap = RemapStage::standard().unwrap();
    let inputs = vec![
        dir.path().join("long.skeleton"),
        dir.path().join("short.skeleton"),
    ];
    let report = run_batch(&inputs, 2, |input| convert.run(input, &npy_dir)).unwrap();
    assert!(report.is_clean());

    let inputs = vec![npy_dir.join("long.npy"), npy_dir.join("short.npy")];
    let report = run_batch(&inputs, 2, |input| remap.run(input, &canonical_dir)).unwrap();
    assert!(report.is_clean());

    let stage = AngleStage::new(
        canonical_topology().unwrap(),
        TemporalSmoother::new(9, 3).unwrap(),
    )
    .unwrap();
    let inputs = vec![
        canonical_dir.join("long.npy"),
        canonical_dir.join("short.npy"),
    ];
    let report = run_batch(&inputs, 2, |input| stage.run(input, &angle_dir)).unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 1);
    assert!(angle_dir.join("long.npz").exists());
    assert!(!angle_dir.join("short.npz").exists());
    let failed: Vec<_> = report.failures().map(|o| o.input.clone()).collect();
    assert_eq!(failed, vec![canonical_dir.join("short.npy")]);
}

#[test]
fn seventeen_joint_arrays_are_truncated_for_extraction() {
    // A canonical-order array persisted with two stray trailing joints
    // still extracts; the extras are ignored.
    let dir = tempfile::tempdir().unwrap();
    let angle_dir = dir.path().join("angles");
    fs::create_dir(&angle_dir).unwrap();

    use ndarray::Array3;
    use ndarray_npy::WriteNpyExt;

    let mut data = Array3::<f32>::zeros((12, 17, 3));
    for frame in 0..12 {
        for joint in 0..17 {
            data[[frame, joint, 0]] = joint as f32 * 0.1;
            data[[frame, joint, 1]] = 1.0 + frame as f32 * 0.01;
            data[[frame, joint, 2]] = 2.0 - joint as f32 * 0.05;
        }
    }
    let path = dir.path().join("wide.npy");
    data.write_npy(fs::File::create(&path).unwrap()).unwrap();

    let stage = AngleStage::new(
        canonical_topology().unwrap(),
        TemporalSmoother::new(9, 3).unwrap(),
    )
    .unwrap();
    let output = stage.run(&path, &angle_dir).unwrap();
    assert_eq!(output, angle_dir.join("wide.npz"));
}
