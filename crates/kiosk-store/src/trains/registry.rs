//! In-memory schedule bound to its document.

use camino::Utf8Path;
use tracing::{debug, info};

use super::filter::{TrainQuery, filter_trains};
use super::record::TrainRecord;
use super::{TRAINS_DOCUMENT, decode_trains, encode_trains};
use crate::document::{DocumentStore, FileDocument};
use crate::error::TrainDataError;

/// The editable train schedule.
///
/// Changes are held in memory until [`TrainRegistry::save`] is called; there
/// is no autosave.
///
/// # Examples
///
/// ```
/// use kiosk_store::{InMemoryDocument, TrainQuery, TrainRecord, TrainRegistry, timestamp};
///
/// let mut registry = TrainRegistry::load(InMemoryDocument::new()).expect("empty schedule");
/// let departure = timestamp::parse("2024-05-01T10:30").expect("timestamp");
/// registry
///     .add(TrainRecord::new("101", "Lahore", departure, "Express", "").expect("valid"))
///     .expect("add");
/// registry.save().expect("save");
///
/// assert_eq!(registry.filter(&TrainQuery::new().destination("lahore")).len(), 1);
/// assert_eq!(registry.destinations(), vec!["Lahore"]);
/// ```
#[derive(Debug)]
pub struct TrainRegistry<D = FileDocument> {
    document: D,
    records: Vec<TrainRecord>,
}

impl TrainRegistry<FileDocument> {
    /// Loads `TrainData/trains.json` beneath `base_dir`.
    ///
    /// # Errors
    ///
    /// See [`TrainRegistry::load`].
    pub fn open(base_dir: &Utf8Path) -> Result<Self, TrainDataError> {
        Self::load(FileDocument::new(base_dir, TRAINS_DOCUMENT))
    }
}

impl<D: DocumentStore> TrainRegistry<D> {
    /// Loads the schedule from `document`. An absent document is an empty
    /// schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TrainDataError::Document`] when the document cannot be read
    /// and [`TrainDataError::ParseError`] when it is not a train array.
    pub fn load(document: D) -> Result<Self, TrainDataError> {
        let records = match document.read()? {
            Some(contents) => decode_trains(&contents, document.location())?,
            None => {
                info!(path = %document.location(), "no train data yet");
                Vec::new()
            }
        };
        info!(path = %document.location(), count = records.len(), "trains loaded");
        Ok(Self { document, records })
    }

    /// Writes the whole schedule back, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns [`TrainDataError::Document`] when encoding or writing fails.
    pub fn save(&self) -> Result<(), TrainDataError> {
        let json = encode_trains(&self.records)?;
        self.document.write(&json)?;
        info!(
            path = %self.document.location(),
            count = self.records.len(),
            "trains saved"
        );
        Ok(())
    }

    /// All records in schedule order.
    #[must_use]
    pub fn records(&self) -> &[TrainRecord] {
        &self.records
    }

    /// Record at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TrainRecord> {
        self.records.get(index)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the schedule is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a validated record and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`TrainDataError::Invalid`] when the record is incomplete.
    pub fn add(&mut self, record: TrainRecord) -> Result<usize, TrainDataError> {
        record.validate()?;
        debug!(number = %record.train_number, "train added");
        self.records.push(record);
        Ok(self.records.len().saturating_sub(1))
    }

    /// Replaces the record at `index` and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TrainDataError::Invalid`] for an incomplete record and
    /// [`TrainDataError::IndexOutOfRange`] for a bad index.
    pub fn replace(
        &mut self,
        index: usize,
        record: TrainRecord,
    ) -> Result<TrainRecord, TrainDataError> {
        record.validate()?;
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(TrainDataError::IndexOutOfRange { index, len })?;
        debug!(index, number = %record.train_number, "train replaced");
        Ok(std::mem::replace(slot, record))
    }

    /// Removes and returns the record at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainDataError::IndexOutOfRange`] for a bad index.
    pub fn remove(&mut self, index: usize) -> Result<TrainRecord, TrainDataError> {
        if index >= self.records.len() {
            return Err(TrainDataError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        let removed = self.records.remove(index);
        debug!(index, number = %removed.train_number, "train removed");
        Ok(removed)
    }

    /// Records matching `query`, in schedule order.
    #[must_use]
    pub fn filter(&self, query: &TrainQuery) -> Vec<TrainRecord> {
        filter_trains(&self.records, query)
    }

    /// Distinct non-blank destinations in first-seen order.
    #[must_use]
    pub fn destinations(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.destination.as_str()))
    }

    /// Distinct non-blank train types in first-seen order.
    #[must_use]
    pub fn train_types(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.train_type.as_str()))
    }

    /// First record whose number equals `number`, ignoring case.
    #[must_use]
    pub fn find_by_number(&self, number: &str) -> Option<&TrainRecord> {
        let wanted = number.trim().to_lowercase();
        self.records
            .iter()
            .find(|record| record.train_number.to_lowercase() == wanted)
    }

    /// Backing document.
    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !value.trim().is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::document::InMemoryDocument;
    use crate::error::TrainValidationError;

    fn departure() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|day| day.and_hms_opt(8, 0, 0))
            .expect("valid fixture timestamp")
    }

    fn train(number: &str, destination: &str, train_type: &str) -> TrainRecord {
        TrainRecord::new(number, destination, departure(), train_type, "On Time")
            .expect("valid record")
    }

    #[fixture]
    fn registry() -> TrainRegistry<InMemoryDocument> {
        let mut registry = TrainRegistry::load(InMemoryDocument::new()).expect("empty schedule");
        for record in [
            train("101", "Lahore", "Express"),
            train("202B", "Karachi", "Local"),
            train("303", "Lahore", "Local"),
        ] {
            registry.add(record).expect("add");
        }
        registry
    }

    #[rstest]
    fn add_appends_and_returns_index(mut registry: TrainRegistry<InMemoryDocument>) {
        let index = registry.add(train("404", "Quetta", "High Speed")).expect("add");

        assert_eq!(index, 3);
        assert_eq!(registry.get(3).map(|r| r.destination.as_str()), Some("Quetta"));
    }

    #[rstest]
    fn add_rejects_incomplete_records(mut registry: TrainRegistry<InMemoryDocument>) {
        let mut incomplete = train("1", "Lahore", "Local");
        incomplete.destination = " ".to_owned();

        let err = registry.add(incomplete).expect_err("incomplete record");

        assert_eq!(
            err,
            TrainDataError::Invalid(TrainValidationError::MissingDestination)
        );
        assert_eq!(registry.len(), 3);
    }

    #[rstest]
    fn replace_swaps_in_place(mut registry: TrainRegistry<InMemoryDocument>) {
        let previous = registry
            .replace(1, train("202B", "Karachi", "Express"))
            .expect("replace");

        assert_eq!(previous.train_type, "Local");
        assert_eq!(
            registry.get(1).map(|r| r.train_type.as_str()),
            Some("Express")
        );
    }

    #[rstest]
    #[case(3)]
    #[case(99)]
    fn bad_indices_are_reported(mut registry: TrainRegistry<InMemoryDocument>, #[case] index: usize) {
        assert_eq!(
            registry.remove(index),
            Err(TrainDataError::IndexOutOfRange { index, len: 3 })
        );
        assert_eq!(
            registry.replace(index, train("1", "x", "y")),
            Err(TrainDataError::IndexOutOfRange { index, len: 3 })
        );
    }

    #[rstest]
    fn remove_keeps_order_of_the_rest(mut registry: TrainRegistry<InMemoryDocument>) {
        let removed = registry.remove(0).expect("remove");

        assert_eq!(removed.train_number, "101");
        let numbers: Vec<&str> = registry
            .records()
            .iter()
            .map(|r| r.train_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["202B", "303"]);
    }

    #[rstest]
    fn choices_are_distinct_in_first_seen_order(registry: TrainRegistry<InMemoryDocument>) {
        assert_eq!(registry.destinations(), vec!["Lahore", "Karachi"]);
        assert_eq!(registry.train_types(), vec!["Express", "Local"]);
    }

    #[rstest]
    #[case("202b", Some("Karachi"))]
    #[case(" 303 ", Some("Lahore"))]
    #[case("30", None)]
    fn find_by_number_matches_whole_number(
        registry: TrainRegistry<InMemoryDocument>,
        #[case] number: &str,
        #[case] destination: Option<&str>,
    ) {
        assert_eq!(
            registry
                .find_by_number(number)
                .map(|r| r.destination.as_str()),
            destination
        );
    }

    #[rstest]
    fn edits_are_not_saved_until_asked(registry: TrainRegistry<InMemoryDocument>) {
        assert_eq!(registry.document().contents(), None);

        registry.save().expect("save");

        let reloaded =
            TrainRegistry::load(InMemoryDocument::with_contents(
                registry.document().contents().expect("saved"),
            ))
            .expect("reload");
        assert_eq!(reloaded.records(), registry.records());
    }

    #[rstest]
    fn save_failure_is_returned(registry: TrainRegistry<InMemoryDocument>) {
        registry.document().set_fail_writes(true);

        assert!(matches!(
            registry.save(),
            Err(TrainDataError::Document(_))
        ));
    }
}
