//! Shared capability-based filesystem helpers for kiosk-store tests.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use std::io;
use tempfile::TempDir;

/// A throwaway kiosk base directory that is removed on drop.
pub struct TempBase {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl TempBase {
    /// Create an empty base directory.
    ///
    /// # Errors
    ///
    /// Returns filesystem errors, or `InvalidData` when the temp path is not
    /// UTF-8.
    pub fn new() -> io::Result<Self> {
        let dir = TempDir::new()?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(|path| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("temp dir is not UTF-8: {}", path.display()),
            )
        })?;
        Ok(Self { _dir: dir, path })
    }

    /// Base directory path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns any filesystem errors encountered while writing.
    pub fn write(&self, relative: &str, contents: &str) -> io::Result<()> {
        let root = Dir::open_ambient_dir(&self.path, ambient_authority())?;
        if let Some(parent) = Utf8Path::new(relative)
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
        {
            root.create_dir_all(parent)?;
        }
        root.write(relative, contents)
    }

    /// Read `relative` back as a string.
    ///
    /// # Errors
    ///
    /// Returns any filesystem errors encountered while reading.
    pub fn read(&self, relative: &str) -> io::Result<String> {
        let root = Dir::open_ambient_dir(&self.path, ambient_authority())?;
        root.read_to_string(relative)
    }

    /// Whether `relative` exists beneath the base directory.
    pub fn exists(&self, relative: &str) -> bool {
        Dir::open_ambient_dir(&self.path, ambient_authority())
            .is_ok_and(|root| root.exists(relative))
    }
}
