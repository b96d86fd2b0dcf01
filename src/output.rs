//! Atomic output files
//!
//! Content is staged in a temporary file next to the target and renamed over
//! it on commit, so readers see either the previous file or the complete new
//! one. Files that belong together are all staged before any is committed.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fully written output that has not replaced its target yet
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staged content over the target
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.tmp
            .persist(&target)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", target.display()))?;
        Ok(())
    }
}

/// Commit files staged together, in order.
///
/// Targets were checked while staging, so only a failing rename can leave
/// the set partially committed.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<()> {
    for file in staged {
        file.commit()?;
    }
    Ok(())
}

/// Stage `rows` as CSV under the `columns` header row.
///
/// The header is written even when `rows` is empty.
pub fn stage_csv<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<StagedFile> {
    let mut tmp = temp_file_for(path)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        writer.write_record(columns)?;
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("Failed to serialize row for {}", path.display()))?;
        }
        writer.flush()?;
    }
    finish(tmp, path)
}

/// Stage `contents` verbatim
pub fn stage_text(path: &Path, contents: &str) -> Result<StagedFile> {
    let mut tmp = temp_file_for(path)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    finish(tmp, path)
}

pub fn write_csv<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    stage_csv(path, columns, rows)?.commit()
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    stage_text(path, contents)?.commit()
}

fn temp_file_for(path: &Path) -> Result<NamedTempFile> {
    if path.is_dir() {
        bail!("Cannot write {}: a directory is in the way", path.display());
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))
}

fn finish(tmp: NamedTempFile, path: &Path) -> Result<StagedFile> {
    tmp.as_file().sync_all()?;
    Ok(StagedFile { tmp, target: path.to_path_buf() })
}
