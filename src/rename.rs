//! Rename series folders after their Series Description
//!
//! Expects the layout `root/patient/study/series/*.dcm`. The first file of
//! each series directory (by name) supplies the description.

use crate::dicom::extract_series_description;
use dicom::dictionary_std::tags;
use dicom::object::OpenFileOptions;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Failed to read directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Directory {} is empty", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("Failed to open DICOM file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot rename {} to {}: target already exists", from.display(), to.display())]
    TargetExists { from: PathBuf, to: PathBuf },

    #[error("Failed to rename {} to {}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A series directory and the name it was (or would be) given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Folder-safe form of a series description
#[must_use]
pub fn sanitize_description(description: &str) -> String {
    description.trim().replace('/', "_")
}

/// Rename every series directory under `root`
///
/// Series without a usable description, or already carrying the right name,
/// are left alone. With `dry_run` nothing is renamed.
///
/// # Errors
///
/// Fails on unreadable or empty directories, unreadable DICOM files and
/// name collisions
pub fn rename_series(root: &Path, dry_run: bool) -> Result<Vec<SeriesRename>, RenameError> {
    let mut renames = Vec::new();

    for patient in subdirectories(root)? {
        for study in subdirectories(&patient)? {
            for series in subdirectories(&study)? {
                if let Some(rename) = plan_rename(&series)? {
                    apply_rename(&rename, dry_run)?;
                    renames.push(rename);
                }
            }
        }
    }

    Ok(renames)
}

fn plan_rename(series: &Path) -> Result<Option<SeriesRename>, RenameError> {
    let files = sorted_entries(series, |path| path.is_file())?;
    let Some(first) = files.first() else {
        return Err(RenameError::EmptyDirectory(series.to_path_buf()));
    };

    let obj = OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .open_file(first)
        .map_err(|source| RenameError::Open {
            path: first.clone(),
            source: source.into(),
        })?;

    let Some(description) = extract_series_description(&obj) else {
        warn!(series = %series.display(), "no Series Description, skipping");
        return Ok(None);
    };

    let new_name = sanitize_description(&description);
    if series.file_name().is_some_and(|name| name == new_name.as_str()) {
        debug!(series = %series.display(), "already named after its description");
        return Ok(None);
    }

    let to = series.with_file_name(new_name);
    Ok(Some(SeriesRename {
        from: series.to_path_buf(),
        to,
    }))
}

fn apply_rename(rename: &SeriesRename, dry_run: bool) -> Result<(), RenameError> {
    if rename.to.exists() {
        return Err(RenameError::TargetExists {
            from: rename.from.clone(),
            to: rename.to.clone(),
        });
    }

    if dry_run {
        info!(from = %rename.from.display(), to = %rename.to.display(), "would rename");
        return Ok(());
    }

    fs::rename(&rename.from, &rename.to).map_err(|source| RenameError::Rename {
        from: rename.from.clone(),
        to: rename.to.clone(),
        source,
    })?;
    info!(from = %rename.from.display(), to = %rename.to.display(), "renamed");

    Ok(())
}

/// Child directories of `dir`; an empty listing is an error
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, RenameError> {
    let dirs = sorted_entries(dir, |path| path.is_dir())?;
    if dirs.is_empty() {
        return Err(RenameError::EmptyDirectory(dir.to_path_buf()));
    }
    Ok(dirs)
}

fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>, RenameError> {
    let read_dir_error = |source| RenameError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if keep(&path) {
            entries.push(path);
        }
    }
    entries.sort();

    Ok(entries)
}
