//! Train schedule persistence and search.
//!
//! The schedule is a JSON array stored at `TrainData/trains.json` beneath the
//! base directory. A missing document is an empty schedule; a corrupt one is
//! an error for the caller to report, never an empty fallback.

mod filter;
mod record;
mod registry;
mod status;
pub mod timestamp;

use camino::Utf8Path;

pub use self::filter::{ALL, TIME_WINDOW, TrainQuery, filter_trains};
pub use self::record::{
    DEFAULT_STATUS, DEFAULT_TRAIN_TYPE, TRAIN_STATUSES, TRAIN_TYPES, TrainRecord,
};
pub use self::registry::TrainRegistry;
pub use self::status::StatusKind;
use crate::document::{DocumentStore, FileDocument};
use crate::error::{DocumentError, TrainDataError};

/// Path of the schedule document relative to the base directory.
pub const TRAINS_DOCUMENT: &str = "TrainData/trains.json";

/// Loads the schedule stored beneath `base_dir`.
///
/// # Errors
///
/// Returns [`TrainDataError::Document`] when the file exists but cannot be
/// read and [`TrainDataError::ParseError`] when it is not a train array.
pub fn load_trains(base_dir: &Utf8Path) -> Result<Vec<TrainRecord>, TrainDataError> {
    let document = FileDocument::new(base_dir, TRAINS_DOCUMENT);
    match document.read()? {
        Some(contents) => decode_trains(&contents, document.location()),
        None => Ok(Vec::new()),
    }
}

/// Overwrites the schedule stored beneath `base_dir` with `records`.
///
/// # Errors
///
/// Returns [`TrainDataError::Document`] when encoding or writing fails.
pub fn save_trains(base_dir: &Utf8Path, records: &[TrainRecord]) -> Result<(), TrainDataError> {
    let document = FileDocument::new(base_dir, TRAINS_DOCUMENT);
    document.write(&encode_trains(records)?)?;
    Ok(())
}

/// A literal `null` document reads as an empty schedule.
fn decode_trains(contents: &str, location: &Utf8Path) -> Result<Vec<TrainRecord>, TrainDataError> {
    serde_json::from_str::<Option<Vec<TrainRecord>>>(contents)
        .map(Option::unwrap_or_default)
        .map_err(|err| TrainDataError::ParseError {
            path: location.to_owned(),
            message: err.to_string(),
        })
}

fn encode_trains(records: &[TrainRecord]) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(records).map_err(|err| DocumentError::EncodeError {
        message: err.to_string(),
    })
}
