//! File-backed services behind the railway information kiosk.
//!
//! The crate holds the kiosk's testable core. Everything is synchronous and
//! single-threaded; each service keeps its state in memory and mirrors it to
//! one JSON document beneath a caller-chosen base directory.
//!
//! # Overview
//!
//! - [`CredentialStore`]: local accounts with salted password hashes, a
//!   protected bootstrap administrator and transparent upgrade of the legacy
//!   `users.json` layout.
//! - [`password`]: the hash/verify pair the store uses.
//! - [`TrainRegistry`]: the editable train schedule with search helpers.
//! - [`FeedbackBox`]: one text file per visitor comment.
//!
//! Storage goes through the [`DocumentStore`] trait, so both services run
//! unchanged against [`InMemoryDocument`] in tests.
//!
//! # Example
//!
//! ```
//! use kiosk_store::{CredentialStore, TrainRegistry};
//!
//! let temp = tempfile::tempdir().expect("temp dir");
//! let base = camino::Utf8Path::from_path(temp.path()).expect("utf-8 temp dir");
//!
//! let mut users = CredentialStore::open(base).expect("credential store");
//! assert_eq!(users.validate("admin", "admin123"), Ok(true));
//!
//! let trains = TrainRegistry::open(base).expect("schedule");
//! assert!(trains.is_empty());
//! ```

mod atomic_io;
mod credentials;
mod document;
mod error;
mod feedback;
pub mod password;
mod registration;
mod trains;

pub use credentials::{ADMIN_USERNAME, CredentialStore, PersistPolicy, Role, USERS_DOCUMENT};
pub use document::{DocumentStore, FileDocument, InMemoryDocument};
pub use error::{
    DocumentError, FeedbackError, RegistrationError, RoleParseError, TrainDataError,
    TrainValidationError, UserDocumentError,
};
pub use feedback::{FEEDBACK_DIR, Feedback, FeedbackBox, FeedbackRating};
pub use registration::{LoginCredentials, Registration};
pub use trains::{
    ALL, DEFAULT_STATUS, DEFAULT_TRAIN_TYPE, StatusKind, TIME_WINDOW, TRAIN_STATUSES,
    TRAIN_TYPES, TRAINS_DOCUMENT, TrainQuery, TrainRecord, TrainRegistry, filter_trains,
    load_trains, save_trains, timestamp,
};
