//! Search criteria over train records.
//!
//! Every criterion is optional and they are ANDed. Text criteria that are
//! blank impose no constraint, and the destination and type criteria also
//! ignore the [`ALL`] sentinel.

use chrono::{NaiveDateTime, TimeDelta};

use super::record::TrainRecord;

/// Destination or type value meaning "any".
pub const ALL: &str = "All";

/// Half-width of the departure window around a time anchor (exclusive).
pub const TIME_WINDOW: TimeDelta = TimeDelta::minutes(60);

/// Optional search criteria, built up with the chaining setters.
///
/// # Examples
///
/// ```
/// use kiosk_store::{TrainQuery, TrainRecord, filter_trains, timestamp};
///
/// let departure = timestamp::parse("2024-05-01T10:30").expect("timestamp");
/// let trains = vec![
///     TrainRecord::new("555A", "Rawalpindi", departure, "Express", "").expect("valid"),
///     TrainRecord::new("123", "Multan", departure, "Local", "").expect("valid"),
/// ];
///
/// let hits = filter_trains(&trains, &TrainQuery::new().number("55").destination("All"));
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainQuery {
    number: Option<String>,
    destination: Option<String>,
    train_type: Option<String>,
    around: Option<NaiveDateTime>,
}

impl TrainQuery {
    /// A query that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep train numbers containing `query`, ignoring case.
    #[must_use]
    pub fn number(mut self, query: impl Into<String>) -> Self {
        self.number = Some(query.into());
        self
    }

    /// Keep destinations equal to `query`, ignoring case.
    #[must_use]
    pub fn destination(mut self, query: impl Into<String>) -> Self {
        self.destination = Some(query.into());
        self
    }

    /// Keep train types equal to `query`, ignoring case.
    #[must_use]
    pub fn train_type(mut self, query: impl Into<String>) -> Self {
        self.train_type = Some(query.into());
        self
    }

    /// Keep departures less than [`TIME_WINDOW`] from `anchor` either way.
    #[must_use]
    pub const fn around(mut self, anchor: NaiveDateTime) -> Self {
        self.around = Some(anchor);
        self
    }

    /// Builds a query from the optional positional criteria.
    #[must_use]
    pub fn from_parts(
        number: Option<&str>,
        destination: Option<&str>,
        train_type: Option<&str>,
        around: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            number: number.map(str::to_owned),
            destination: destination.map(str::to_owned),
            train_type: train_type.map(str::to_owned),
            around,
        }
    }

    /// Whether `record` satisfies every active criterion.
    #[must_use]
    pub fn matches(&self, record: &TrainRecord) -> bool {
        let number_ok = active_text(self.number.as_deref()).is_none_or(|query| {
            record
                .train_number
                .to_lowercase()
                .contains(&query.to_lowercase())
        });
        let destination_ok = active_choice(self.destination.as_deref())
            .is_none_or(|query| equals_ignore_case(&record.destination, query));
        let type_ok = active_choice(self.train_type.as_deref())
            .is_none_or(|query| equals_ignore_case(&record.train_type, query));
        let time_ok = self
            .around
            .is_none_or(|anchor| (record.departure_time - anchor).abs() < TIME_WINDOW);

        number_ok && destination_ok && type_ok && time_ok
    }
}

/// Records of `source` matching `query`, in their original order.
#[must_use]
pub fn filter_trains(source: &[TrainRecord], query: &TrainQuery) -> Vec<TrainRecord> {
    source
        .iter()
        .filter(|record| query.matches(record))
        .cloned()
        .collect()
}

fn active_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn active_choice(value: Option<&str>) -> Option<&str> {
    active_text(value).filter(|text| *text != ALL)
}

fn equals_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
