//! Atomic document replacement.
//!
//! Documents are rewritten in full on every save. The new contents go to a
//! hidden sibling file which is synced and then renamed over the target, so a
//! reader never observes a half-written document.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8Path;
use cap_std::fs::{Dir, OpenOptions};

use crate::error::DocumentError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replaces `file_name` inside `dir` with `contents`.
///
/// `display_path` is only used in error messages; it should name the target
/// the way the caller configured it.
///
/// # Errors
///
/// Returns [`DocumentError::WriteError`] if the temporary file cannot be
/// created, written, synced or renamed into place.
pub(crate) fn write_atomic(
    dir: &Dir,
    file_name: &str,
    display_path: &Utf8Path,
    contents: &str,
) -> Result<(), DocumentError> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(".{file_name}.tmp.{}.{stamp}.{counter}", std::process::id());

    let write_error = |err: io::Error| DocumentError::WriteError {
        path: display_path.to_path_buf(),
        message: err.to_string(),
    };

    if let Err(err) = write_temp(dir, &tmp_name, contents) {
        discard_temp(dir, &tmp_name);
        return Err(write_error(err));
    }

    if let Err(err) = replace_target(dir, &tmp_name, file_name) {
        discard_temp(dir, &tmp_name);
        return Err(write_error(err));
    }

    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is best-effort; the rename already happened.
    }

    Ok(())
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, file_name: &str) -> io::Result<()> {
    // Rename does not overwrite on Windows.
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, file_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, file_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, file_name)
}

fn discard_temp(dir: &Dir, tmp_name: &str) {
    match dir.remove_file(tmp_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => tracing::debug!(file = tmp_name, error = %err, "temporary file left behind"),
    }
}
