use crate::models::TransferProgress;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, FileTimes};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors that can occur while copying or moving a source tree
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Source is not a directory: {0}")]
    SourceNotDirectory(Utf8PathBuf),

    #[error("Failed to enumerate {path}: {source}")]
    Enumerate {
        path: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Destination already exists: {0}")]
    DestinationExists(Utf8PathBuf),

    #[error("Destination {dst} is inside source {src}")]
    DestinationInsideSource { src: Utf8PathBuf, dst: Utf8PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),
}

impl TransferError {
    fn io(path: &Utf8Path, source: io::Error) -> Self {
        TransferError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Counts from a finished transfer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub files: usize,
    pub dirs: usize,
}

#[derive(Debug)]
enum EntryKind {
    Dir,
    File,
}

#[derive(Debug)]
struct TreeEntry {
    relative: Utf8PathBuf,
    kind: EntryKind,
}

/// Snapshot of a source tree, taken before anything is written.
#[derive(Debug)]
struct TreePlan {
    entries: Vec<TreeEntry>,
    files: usize,
}

impl TreePlan {
    fn scan(src: &Utf8Path) -> Result<Self, TransferError> {
        let mut entries = Vec::new();
        let mut files = 0;

        for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
            let entry = entry.map_err(|source| TransferError::Enumerate {
                path: src.to_path_buf(),
                source,
            })?;
            let is_dir = entry.file_type().is_dir();
            let path = Utf8PathBuf::from_path_buf(entry.into_path())
                .map_err(TransferError::NonUtf8Path)?;
            let Ok(relative) = path.strip_prefix(src) else {
                continue;
            };

            let kind = if is_dir {
                EntryKind::Dir
            } else {
                files += 1;
                EntryKind::File
            };
            entries.push(TreeEntry {
                relative: relative.to_path_buf(),
                kind,
            });
        }

        Ok(Self { entries, files })
    }
}

/// Copy every file under `src` into `dst`, merging into an existing
/// destination and overwriting files already there.
///
/// The source is enumerated in full before anything is written, so an
/// enumeration failure leaves no destination behind. `on_progress` is called
/// once per copied file with a strictly increasing `completed` count.
///
/// # Arguments
/// * `src` - Existing directory to copy from
/// * `dst` - Destination directory, created if missing; must not lie inside `src`
/// * `on_progress` - Called after each file is copied
///
/// # Returns
/// Counts of copied files and recreated directories
///
/// # Errors
/// Fails before writing anything when `src` is not a directory, `dst` is
/// inside `src`, or enumeration fails. Later I/O failures leave a partial copy.
pub fn copy_tree<F>(
    src: &Utf8Path,
    dst: &Utf8Path,
    mut on_progress: F,
) -> Result<TransferSummary, TransferError>
where
    F: FnMut(TransferProgress),
{
    check_source(src, dst)?;

    let plan = TreePlan::scan(src)?;
    tracing::info!("Copying {} files from {} to {}", plan.files, src, dst);

    fs::create_dir_all(dst).map_err(|e| TransferError::io(dst, e))?;

    let mut summary = TransferSummary::default();
    for entry in &plan.entries {
        let target = dst.join(&entry.relative);
        match entry.kind {
            EntryKind::Dir => {
                fs::create_dir_all(&target).map_err(|e| TransferError::io(&target, e))?;
                summary.dirs += 1;
            }
            EntryKind::File => {
                copy_file(&src.join(&entry.relative), &target)?;
                summary.files += 1;
                on_progress(TransferProgress {
                    completed: summary.files,
                    total: plan.files,
                });
            }
        }
    }

    tracing::info!(
        "Copied {} files and {} directories into {}",
        summary.files,
        summary.dirs,
        dst
    );
    Ok(summary)
}

/// Relocate the tree at `src` to `dst`.
///
/// `dst` must not exist; that is checked before any data is touched. The move
/// is a rename when possible and falls back to copy-then-delete across
/// devices. A failure part-way through the fallback leaves files at both
/// locations and is not rolled back.
///
/// # Arguments
/// * `src` - Existing directory to relocate
/// * `dst` - New location; its parent is created if missing
/// * `on_progress` - Called once after a rename, or once per file on the
///   copy fallback
pub fn move_tree<F>(
    src: &Utf8Path,
    dst: &Utf8Path,
    mut on_progress: F,
) -> Result<TransferSummary, TransferError>
where
    F: FnMut(TransferProgress),
{
    if dst.exists() {
        return Err(TransferError::DestinationExists(dst.to_path_buf()));
    }
    check_source(src, dst)?;

    let plan = TreePlan::scan(src)?;

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| TransferError::io(parent, e))?;
    }

    match fs::rename(src, dst) {
        Ok(()) => {
            tracing::info!("Moved {} to {} ({} files)", src, dst, plan.files);
            on_progress(TransferProgress {
                completed: plan.files,
                total: plan.files,
            });
            Ok(TransferSummary {
                files: plan.files,
                dirs: plan.entries.len() - plan.files,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::warn!("Rename across devices failed ({}), falling back to copy and delete", e);
            let summary = copy_tree(src, dst, on_progress)?;
            fs::remove_dir_all(src).map_err(|e| TransferError::io(src, e))?;
            tracing::info!("Moved {} to {} by copy", src, dst);
            Ok(summary)
        }
        Err(e) => Err(TransferError::io(src, e)),
    }
}

fn check_source(src: &Utf8Path, dst: &Utf8Path) -> Result<(), TransferError> {
    if !src.is_dir() {
        return Err(TransferError::SourceNotDirectory(src.to_path_buf()));
    }
    if dst.starts_with(src) {
        return Err(TransferError::DestinationInsideSource {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    Ok(())
}

/// Copy a single file, keeping permissions and timestamps where the
/// platform allows.
fn copy_file(from: &Utf8Path, to: &Utf8Path) -> Result<(), TransferError> {
    fs::copy(from, to).map_err(|e| TransferError::io(from, e))?;

    let metadata = fs::metadata(from).map_err(|e| TransferError::io(from, e))?;
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    let result = fs::OpenOptions::new()
        .write(true)
        .open(to)
        .or_else(|_| fs::File::open(to))
        .and_then(|file| file.set_times(times));
    if let Err(e) = result {
        tracing::debug!("Could not preserve timestamps on {}: {}", to, e);
    }

    Ok(())
}
