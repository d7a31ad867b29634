//! Error types for the kiosk store crate.
//!
//! Each service gets its own semantic enum built with `thiserror`. Paths are
//! carried as UTF-8 paths relative to nothing in particular: they are the
//! paths the caller configured, so messages can be shown as-is.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a persisted JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document exists but could not be read.
    #[error("failed to read document at '{path}': {message}")]
    ReadError {
        /// Path to the document.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The document could not be written.
    #[error("failed to write document at '{path}': {message}")]
    WriteError {
        /// Path to the document (or its temporary sibling).
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The in-memory state could not be serialised to JSON.
    #[error("failed to encode document: {message}")]
    EncodeError {
        /// Description of the serialisation error.
        message: String,
    },
}

/// Errors raised by the train schedule registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainDataError {
    /// Reading or writing the schedule document failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The schedule document is present but is not a valid train array.
    #[error("invalid train data in '{path}': {message}")]
    ParseError {
        /// Path to the schedule document.
        path: Utf8PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// No train record exists at the requested position.
    #[error("no train at position {index} (registry holds {len})")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of records held.
        len: usize,
    },

    /// A record failed validation before being added or replaced.
    #[error(transparent)]
    Invalid(#[from] TrainValidationError),
}

/// Validation failures for an edited train record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrainValidationError {
    /// Train number was missing or blank.
    #[error("train number is required")]
    MissingNumber,
    /// Destination was missing or blank.
    #[error("destination is required")]
    MissingDestination,
}

/// The user document matched none of the known schema variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDocumentError {
    /// Every decoder rejected the document.
    #[error("user document matches no known schema: {}", attempts.join("; "))]
    Undecodable {
        /// One message per schema variant tried, in order.
        attempts: Vec<String>,
    },
}

/// Validation failures for login and registration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// A role name that is neither `admin` nor `user`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{value}': expected 'admin' or 'user'")]
pub struct RoleParseError {
    /// The rejected input.
    pub value: String,
}

/// Errors raised when recording visitor feedback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    /// Feedback text was blank.
    #[error("feedback text must not be empty")]
    EmptyFeedback,
    /// Rating outside the 1..=5 scale.
    #[error("rating must be between 1 and 5, got {value}")]
    InvalidRating {
        /// The rejected rating.
        value: u8,
    },
    /// Writing the feedback file failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}
