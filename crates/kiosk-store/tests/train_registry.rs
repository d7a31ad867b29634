//! File-backed tests for the train schedule.
//!
//! These tests cover the schedule document round trip, the missing and
//! corrupt document cases, and the search behaviour kiosk screens rely on.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

mod test_support;

use chrono::{Local, NaiveDateTime, TimeDelta};
use kiosk_store::{
    TRAINS_DOCUMENT, TrainDataError, TrainQuery, TrainRecord, TrainRegistry, filter_trains,
    load_trains, save_trains,
};
use rstest::{fixture, rstest};
use test_support::TempBase;

#[fixture]
fn base() -> TempBase {
    TempBase::new().expect("temp base dir")
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn train(
    number: &str,
    destination: &str,
    train_type: &str,
    departure: NaiveDateTime,
    status: &str,
) -> TrainRecord {
    TrainRecord {
        train_number: number.to_owned(),
        destination: destination.to_owned(),
        departure_time: departure,
        train_type: train_type.to_owned(),
        status: status.to_owned(),
    }
}

fn numbers(records: &[TrainRecord]) -> Vec<&str> {
    records.iter().map(|r| r.train_number.as_str()).collect()
}

#[test]
fn destination_type_and_time_select_one_train() {
    let anchor = now();
    let data = vec![
        train("101", "Lahore", "Express", anchor, "on time"),
        train("102", "Karachi", "Local", anchor + TimeDelta::hours(3), "delayed"),
        train("103", "Lahore", "Local", anchor + TimeDelta::minutes(30), "on time"),
    ];

    let query = TrainQuery::from_parts(None, Some("Lahore"), Some("Local"), Some(anchor));
    let result = filter_trains(&data, &query);

    assert_eq!(numbers(&result), vec!["103"]);
    assert_eq!(data.len(), 3);
}

#[test]
fn number_substring_with_sentinels() {
    let anchor = now();
    let data = vec![
        train("555A", "Rawalpindi", "Express", anchor, ""),
        train("123", "Multan", "Local", anchor, ""),
    ];

    let query = TrainQuery::from_parts(Some("55"), Some("All"), Some("All"), Some(anchor));
    let result = filter_trains(&data, &query);

    assert_eq!(numbers(&result), vec!["555A"]);
}

#[rstest]
fn missing_document_is_an_empty_schedule(base: TempBase) {
    assert_eq!(load_trains(base.path()), Ok(Vec::new()));
    assert!(!base.exists(TRAINS_DOCUMENT));
}

#[rstest]
fn save_then_load_round_trips(base: TempBase) {
    let departure = now();
    let records = vec![
        train("9UP", "Peshawar", "High Speed", departure, "Boarding"),
        train("9UP", "Peshawar", "High Speed", departure, "Boarding"),
        train("14DN", "Quetta", "Local", departure - TimeDelta::days(1), "Cancelled"),
    ];

    save_trains(base.path(), &records).expect("save");

    assert_eq!(load_trains(base.path()), Ok(records));
}

#[rstest]
fn saved_document_is_pretty_printed(base: TempBase) {
    let departure = now();
    save_trains(
        base.path(),
        &[train("1", "Lahore", "Local", departure, "On Time")],
    )
    .expect("save");

    let contents = base.read(TRAINS_DOCUMENT).expect("trains.json");

    assert!(contents.starts_with("[\n  {\n"));
    assert!(contents.contains("\"TrainNumber\": \"1\""));
}

#[rstest]
fn corrupt_document_is_reported_not_swallowed(base: TempBase) {
    base.write(TRAINS_DOCUMENT, "[{\"TrainNumber\": ")
        .expect("seed corrupt document");

    let err = load_trains(base.path()).expect_err("corrupt schedule");

    assert!(matches!(err, TrainDataError::ParseError { .. }));
    assert!(err.to_string().contains("trains.json"));
    assert!(matches!(
        TrainRegistry::open(base.path()),
        Err(TrainDataError::ParseError { .. })
    ));
}

#[rstest]
fn documents_from_the_desktop_build_load(base: TempBase) {
    base.write(
        TRAINS_DOCUMENT,
        r#"[
  {
    "TrainNumber": "42UP",
    "Destination": "Lahore",
    "DepartureTime": "2025-01-10T14:05:00.1234567+05:00",
    "TrainType": "Express",
    "Status": "Delayed"
  }
]"#,
    )
    .expect("seed document");

    let registry = TrainRegistry::open(base.path()).expect("open");

    let record = registry.find_by_number("42up").expect("train present");
    assert_eq!(
        record.departure_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2025-01-10 14:05:00"
    );
}

#[rstest]
fn registry_edits_persist_only_on_save(base: TempBase) {
    let departure = now();
    let mut registry = TrainRegistry::open(base.path()).expect("open");
    registry
        .add(train("7", "Sialkot", "Local", departure, "On Time"))
        .expect("add");

    assert!(!base.exists(TRAINS_DOCUMENT));

    registry.save().expect("save");
    let reopened = TrainRegistry::open(base.path()).expect("reopen");

    assert_eq!(reopened.records(), registry.records());
}
