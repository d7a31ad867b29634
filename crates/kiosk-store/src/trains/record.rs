//! Train schedule records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::error::TrainValidationError;

/// Train categories offered when editing a record.
pub const TRAIN_TYPES: [&str; 4] = ["High Speed", "InterCity", "Express", "Local"];

/// Operational statuses offered when editing a record.
pub const TRAIN_STATUSES: [&str; 4] = ["On Time", "Delayed", "Cancelled", "Boarding"];

/// Category used when an edited record leaves the type blank.
pub const DEFAULT_TRAIN_TYPE: &str = "InterCity";

/// Status used when an edited record leaves the status blank.
pub const DEFAULT_STATUS: &str = "On Time";

/// One scheduled departure.
///
/// Every field except the departure time is free-form text; the catalogues
/// above are suggestions, not constraints. Train numbers need not be unique.
///
/// Stored as `{ "TrainNumber", "Destination", "DepartureTime", "TrainType",
/// "Status" }`; missing text fields read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrainRecord {
    /// Free-form train identifier.
    #[serde(default)]
    pub train_number: String,
    /// Destination station.
    #[serde(default)]
    pub destination: String,
    /// Scheduled local departure time.
    #[serde(with = "timestamp")]
    pub departure_time: NaiveDateTime,
    /// Category such as `Express` or `Local`.
    #[serde(default)]
    pub train_type: String,
    /// Operational state such as `On Time` or `Delayed`.
    #[serde(default)]
    pub status: String,
}

impl TrainRecord {
    /// Builds a validated record from edit-form input.
    ///
    /// Blank `train_type` and `status` fall back to [`DEFAULT_TRAIN_TYPE`]
    /// and [`DEFAULT_STATUS`].
    ///
    /// # Errors
    ///
    /// Returns [`TrainValidationError`] when the number or destination is
    /// blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiosk_store::{TrainRecord, timestamp};
    ///
    /// let departure = timestamp::parse("2024-05-01T10:30").expect("timestamp");
    /// let record = TrainRecord::new("101", "Lahore", departure, "", "").expect("valid");
    /// assert_eq!(record.train_type, "InterCity");
    /// assert_eq!(record.status, "On Time");
    /// ```
    pub fn new(
        train_number: &str,
        destination: &str,
        departure_time: NaiveDateTime,
        train_type: &str,
        status: &str,
    ) -> Result<Self, TrainValidationError> {
        let record = Self {
            train_number: train_number.to_owned(),
            destination: destination.to_owned(),
            departure_time,
            train_type: or_default(train_type, DEFAULT_TRAIN_TYPE),
            status: or_default(status, DEFAULT_STATUS),
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks that the number and destination are present.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), TrainValidationError> {
        if self.train_number.trim().is_empty() {
            return Err(TrainValidationError::MissingNumber);
        }
        if self.destination.trim().is_empty() {
            return Err(TrainValidationError::MissingDestination);
        }
        Ok(())
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_owned()
    } else {
        value.to_owned()
    }
}
