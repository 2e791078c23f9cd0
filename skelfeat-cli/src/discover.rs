//! File discovery for batch runs
//!
//! Recursive extension-filtered walks, sorted so discovery order is stable
//! across machines, plus allow-list reading. Discovery order feeds the
//! batch report and the allow-list but carries no correctness weight.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Collect every file under `root` with the given extension, sorted.
pub fn find_files(root: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, extension, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, extension, files)?;
        } else if path.extension().map_or(false, |ext| ext == extension) {
            files.push(path);
        }
    }
    Ok(())
}

/// Read an allow-list: one path per line, blank lines ignored.
pub fn read_list(path: &Path) -> io::Result<Vec<PathBuf>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
