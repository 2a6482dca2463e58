//! Directory enumeration
//!
//! One fixed extension, top level only. An empty result is a valid zero-file
//! run, not an error; an unreadable directory is a setup failure.

use crate::errors::{Result, SarFixError};
use crate::transcode::is_candidate_path;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Collect matching files, sorted by name so the operator sees prompts in a
/// stable order across runs. Candidate files share the source extension, so
/// anything carrying the candidate marker is excluded: a candidate stranded
/// by an interrupted run must never re-enter the pipeline as a source.
pub fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SarFixError::DirectoryUnreadable(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }
    dir.read_dir().map_err(|e| {
        SarFixError::DirectoryUnreadable(format!("{}: {}", dir.display(), e))
    })?;

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extension))
        .filter(|e| !is_candidate_path(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    Ok(files)
}
