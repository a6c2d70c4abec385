//! Upload file naming and best-effort cleanup

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Reduce an uploaded filename to a safe basename
///
/// Keeps ASCII letters, digits, `.`, `_` and `-`; whitespace becomes `_`; everything
/// else, including path separators, is dropped. Leading dots are stripped. Returns
/// `None` when nothing usable is left.
pub fn secure_filename(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').trim_matches('_');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Delete files, ignoring ones that are already gone
pub fn remove_backing_files(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!("Removed {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}

/// Delete files in `dir` last modified more than `ttl` before `now`
///
/// Returns the number of files removed. A missing directory counts as empty.
pub fn purge_stale_uploads(dir: &Path, ttl: Duration, now: SystemTime) -> io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => continue,
        };

        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.checked_add(ttl))
            .is_some_and(|deadline| deadline < now);
        if !expired {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Failed to purge {}: {}", entry.path().display(), e),
        }
    }

    Ok(removed)
}
