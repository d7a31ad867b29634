//! Whole-document persistence port.
//!
//! Both services keep their state in memory and synchronise it to a single
//! JSON document. [`DocumentStore`] is the seam between the two: production
//! code binds a [`FileDocument`] under the kiosk base directory, tests and
//! diskless hosts bind an [`InMemoryDocument`].

use std::cell::{Cell, RefCell};
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::atomic_io::write_atomic;
use crate::error::DocumentError;

/// A single document that is always read and written in full.
pub trait DocumentStore {
    /// Returns the document contents, or `None` when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ReadError`] when the document exists but
    /// cannot be read.
    fn read(&self) -> Result<Option<String>, DocumentError>;

    /// Replaces the document with `contents`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::WriteError`] when the document cannot be
    /// written.
    fn write(&self, contents: &str) -> Result<(), DocumentError>;

    /// Human-readable location used in log events and error messages.
    fn location(&self) -> &Utf8Path;
}

/// A document stored at a relative path beneath a base directory.
///
/// All access goes through capability handles rooted at the base directory,
/// so the relative path cannot escape it. Missing parent directories are
/// created on write.
///
/// # Examples
///
/// ```
/// use kiosk_store::{DocumentStore, FileDocument};
///
/// let temp = tempfile::tempdir().expect("temp dir");
/// let base = camino::Utf8Path::from_path(temp.path()).expect("utf-8 temp dir");
/// let document = FileDocument::new(base, "TrainData/trains.json");
///
/// assert_eq!(document.read().expect("read"), None);
/// document.write("[]").expect("write");
/// assert_eq!(document.read().expect("read").as_deref(), Some("[]"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDocument {
    base_dir: Utf8PathBuf,
    relative: Utf8PathBuf,
    full_path: Utf8PathBuf,
}

impl FileDocument {
    /// Binds the document at `relative` beneath `base_dir`.
    pub fn new(base: impl Into<Utf8PathBuf>, path: impl Into<Utf8PathBuf>) -> Self {
        let base_dir = base.into();
        let relative = path.into();
        let full_path = base_dir.join(&relative);
        Self {
            base_dir,
            relative,
            full_path,
        }
    }

    /// Base directory the document lives under.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    fn read_error(&self, err: &io::Error) -> DocumentError {
        DocumentError::ReadError {
            path: self.full_path.clone(),
            message: err.to_string(),
        }
    }

    fn write_error(&self, err: &io::Error) -> DocumentError {
        DocumentError::WriteError {
            path: self.full_path.clone(),
            message: err.to_string(),
        }
    }

    fn open_parent(&self) -> Result<Dir, DocumentError> {
        Dir::create_ambient_dir_all(&self.base_dir, ambient_authority())
            .map_err(|err| self.write_error(&err))?;
        let base = Dir::open_ambient_dir(&self.base_dir, ambient_authority())
            .map_err(|err| self.write_error(&err))?;
        match self.relative.parent() {
            Some(parent) if !parent.as_str().is_empty() => {
                base.create_dir_all(parent)
                    .map_err(|err| self.write_error(&err))?;
                base.open_dir(parent).map_err(|err| self.write_error(&err))
            }
            _ => Ok(base),
        }
    }
}

impl DocumentStore for FileDocument {
    fn read(&self) -> Result<Option<String>, DocumentError> {
        let base = match Dir::open_ambient_dir(&self.base_dir, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.read_error(&err)),
        };
        match base.read_to_string(&self.relative) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.read_error(&err)),
        }
    }

    fn write(&self, contents: &str) -> Result<(), DocumentError> {
        let Some(file_name) = self.relative.file_name() else {
            return Err(DocumentError::WriteError {
                path: self.full_path.clone(),
                message: "document path must name a file".to_owned(),
            });
        };
        let parent = self.open_parent()?;
        write_atomic(&parent, file_name, &self.full_path, contents)
    }

    fn location(&self) -> &Utf8Path {
        &self.full_path
    }
}

/// A process-local document with optional write-failure injection.
///
/// Nothing is shared between instances and nothing survives the process.
#[derive(Debug)]
pub struct InMemoryDocument {
    label: Utf8PathBuf,
    contents: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl InMemoryDocument {
    /// Creates an absent document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            label: Utf8PathBuf::from("<memory>"),
            contents: RefCell::new(None),
            fail_writes: Cell::new(false),
            writes: Cell::new(0),
        }
    }

    /// Creates a document that already holds `contents`.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let document = Self::new();
        document.contents.replace(Some(contents.into()));
        document
    }

    /// Current contents, if any write or seed has happened.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Makes every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocument {
    fn read(&self) -> Result<Option<String>, DocumentError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), DocumentError> {
        if self.fail_writes.get() {
            return Err(DocumentError::WriteError {
                path: self.label.clone(),
                message: "injected write failure".to_owned(),
            });
        }
        self.contents.replace(Some(contents.to_owned()));
        self.writes.set(self.writes.get().saturating_add(1));
        Ok(())
    }

    fn location(&self) -> &Utf8Path {
        &self.label
    }
}
