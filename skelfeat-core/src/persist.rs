//! Array and list persistence
//!
//! All outputs go through write-to-staging-then-rename: a killed run may
//! leave a stale `.tmp` file behind but never a truncated final file, so
//! partially completed batch runs remain resumable.
//!
//! Trajectories persist as single `(T, J, 3)` f32 NPY files. Feature sets
//! persist as NPZ containers with members `cos.npy` and `sin.npy` in IEEE
//! half precision; this is the only place precision is reduced, after all
//! math is done. `ndarray-npy` has no half-precision element type, so the
//! f16 members are encoded through `npyz` into the zip archive.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use half::f16;
use ndarray::Array2;
use ndarray_npy::WriteNpyExt;
use npyz::WriterBuilder;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::angles::AngleFeatures;
use crate::errors::PersistError;
use crate::topology::Trajectory;

/// Persist a trajectory as an f32 NPY file.
pub fn write_trajectory(path: &Path, trajectory: &Trajectory) -> Result<(), PersistError> {
    let staged = staging_path(path);
    let result: Result<(), PersistError> = (|| {
        let mut writer = BufWriter::new(File::create(&staged)?);
        trajectory.data().write_npy(&mut writer)?;
        writer.flush()?;
        Ok(())
    })();
    finalize(result, &staged, path)
}

/// Persist extracted features as an NPZ container with half-precision
/// `cos` and `sin` members.
pub fn write_features(path: &Path, features: &AngleFeatures) -> Result<(), PersistError> {
    let staged = staging_path(path);
    let result: Result<(), PersistError> = (|| {
        let mut archive = ZipWriter::new(File::create(&staged)?);
        write_half_member(&mut archive, "cos.npy", &features.cos)?;
        write_half_member(&mut archive, "sin.npy", &features.sin)?;
        archive.finish()?;
        Ok(())
    })();
    finalize(result, &staged, path)
}

/// Persist an allow-list: one path per line, input order preserved.
pub fn write_allow_list(path: &Path, files: &[PathBuf]) -> Result<(), PersistError> {
    let staged = staging_path(path);
    let result: Result<(), PersistError> = (|| {
        let mut writer = BufWriter::new(File::create(&staged)?);
        for file in files {
            writeln!(writer, "{}", file.display())?;
        }
        writer.flush()?;
        Ok(())
    })();
    finalize(result, &staged, path)
}

fn write_half_member<W: Write + Seek>(
    archive: &mut ZipWriter<W>,
    name: &str,
    values: &Array2<f32>,
) -> Result<(), PersistError> {
    // NumPy's own containers store members uncompressed.
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    archive.start_file(name, options)?;

    let shape = [values.nrows() as u64, values.ncols() as u64];
    let mut writer = npyz::WriteOptions::new()
        .default_dtype()
        .shape(&shape)
        .writer(&mut *archive)
        .begin_nd()?;
    for &value in values.iter() {
        writer.push(&f16::from_f32(value))?;
    }
    writer.finish()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn finalize(result: Result<(), PersistError>, staged: &Path, path: &Path) -> Result<(), PersistError> {
    match result {
        Ok(()) => {
            fs::rename(staged, path)?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(staged);
            Err(err)
        }
    }
}
