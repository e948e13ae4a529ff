//! Shared filesystem helpers for the file-backed stores.

use crate::error::{SchedulingError, SchedulingResult};
use rotation_ids::RecordId;
use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Attempts made to find an unused record directory before giving up.
const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Creates a unique sharded directory (`<base>/<s1>/<s2>/<id>/`) for a new record.
///
/// Identifiers come from `id_source`. An identifier whose directory already exists is skipped
/// and another is drawn, up to five attempts.
///
/// # Errors
///
/// Returns [`SchedulingError::StorageDirCreation`] if:
/// - a parent shard directory cannot be created,
/// - the record directory cannot be created,
/// - no unused identifier was found within five attempts.
pub(crate) fn create_record_dir(
    base_dir: &Path,
    mut id_source: impl FnMut() -> RecordId,
) -> SchedulingResult<(RecordId, PathBuf)> {
    for _attempt in 0..MAX_ALLOCATION_ATTEMPTS {
        let id = id_source();
        let candidate = id.sharded_dir(base_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(SchedulingError::StorageDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((id, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(SchedulingError::StorageDirCreation(e)),
        }
    }

    Err(SchedulingError::StorageDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "failed to allocate a unique record directory after {MAX_ALLOCATION_ATTEMPTS} attempts"
        ),
    )))
}

/// Writes `contents` to `path` via a sibling temporary file and a rename.
///
/// Readers see either no file or the complete file.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Lists the record directories of a `<base>/<s1>/<s2>/<id>/` tree.
///
/// Unreadable shard directories are skipped. A missing `base_dir` yields an empty list.
pub(crate) fn record_dirs(base_dir: &Path) -> Vec<PathBuf> {
    fn subdirs(path: &Path) -> Vec<PathBuf> {
        match fs::read_dir(path) {
            Ok(entries) => entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    let mut dirs = Vec::new();
    for s1 in subdirs(base_dir) {
        for s2 in subdirs(&s1) {
            dirs.extend(subdirs(&s2));
        }
    }
    dirs
}
