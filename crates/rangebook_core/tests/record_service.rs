use chrono::{TimeZone, Utc};
use rangebook_core::{
    DeleteOutcome, JsonFileRecordStore, RangeError, RecordService, RecordServiceError,
    RecordStore, RecordValidationError, StoreConfig,
};
use std::fs;
use tempfile::TempDir;

fn temp_service() -> (TempDir, RecordService<JsonFileRecordStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileRecordStore::new(&StoreConfig::in_dir(dir.path()));
    (dir, RecordService::new(store))
}

fn seed(service: &RecordService<JsonFileRecordStore>) {
    service.create("5", "2024-01-01", "2024-01-10").unwrap();
    service.create("7", "2024-02-01", "2024-02-05").unwrap();
    service.create("-1.5", "2024-03-01", "2024-03-02").unwrap();
}

#[test]
fn create_appends_record_at_end() {
    let (_dir, service) = temp_service();
    seed(&service);

    let created = service
        .create("0.125", "2024-04-01T08:30", "2024-04-01T09:30")
        .unwrap();

    let all = service.list_all().unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all.last(), Some(&created));
    assert_eq!(created.number(), 0.125);
    assert_eq!(
        created.start_date(),
        Utc.with_ymd_and_hms(2024, 4, 1, 8, 30, 0).unwrap()
    );
}

#[test]
fn invalid_input_is_rejected_without_writing() {
    let (_dir, service) = temp_service();
    seed(&service);
    let before = fs::read_to_string(service.store().path()).unwrap();

    let cases = [
        ("twelve", "2024-01-01", "2024-01-02"),
        ("NaN", "2024-01-01", "2024-01-02"),
        ("1", "", "2024-01-02"),
        ("1", "2024-01-01", ""),
        ("1", "bad", "2024-01-02"),
        ("1", "2024-01-02", "2024-01-02"),
        ("1", "2024-01-03", "2024-01-02"),
    ];
    for (number, start, end) in cases {
        let err = service.create(number, start, end).unwrap_err();
        assert!(
            matches!(err, RecordServiceError::Validation(_)),
            "({number}, {start}, {end}) gave {err:?}"
        );
        assert!(err.is_user_error());
    }

    assert_eq!(fs::read_to_string(service.store().path()).unwrap(), before);
}

#[test]
fn list_filtered_keeps_full_collection_alongside_matches() {
    let (_dir, service) = temp_service();
    seed(&service);

    let view = service
        .list_filtered(Some("2024-01-15"), Some("2024-03-01"))
        .unwrap();

    assert_eq!(view.records.len(), 3);
    assert_eq!(view.filtered_records.len(), 2);
    assert_eq!(view.filtered_records[0].number(), 7.0);
    assert_eq!(view.filtered_records[1].number(), -1.5);
    assert_eq!(view.filter_start, "2024-01-15");
    assert_eq!(view.filter_end, "2024-03-01");
}

#[test]
fn list_filtered_without_bounds_returns_everything() {
    let (_dir, service) = temp_service();
    seed(&service);

    let view = service.list_filtered(None, Some("")).unwrap();
    assert_eq!(view.filtered_records, view.records);
    assert_eq!(view.filter_start, "");
    assert_eq!(view.filter_end, "");
}

#[test]
fn list_filtered_rejects_invalid_range() {
    let (_dir, service) = temp_service();
    seed(&service);

    let err = service
        .list_filtered(Some("2024-02-01"), Some("2024-01-01"))
        .unwrap_err();
    assert!(matches!(
        err,
        RecordServiceError::InvalidRange(RangeError::EmptyWindow { .. })
    ));

    let err = service.list_filtered(Some("garbage"), None).unwrap_err();
    assert!(matches!(
        err,
        RecordServiceError::InvalidRange(RangeError::InvalidStart(_))
    ));
}

#[test]
fn delete_at_removes_exactly_one_record() {
    let (_dir, service) = temp_service();
    seed(&service);

    let outcome = service.delete_at(1).unwrap();
    let DeleteOutcome::Deleted(removed) = outcome else {
        panic!("expected a deletion");
    };
    assert_eq!(removed.number(), 7.0);

    let remaining: Vec<f64> = service
        .list_all()
        .unwrap()
        .iter()
        .map(|record| record.number())
        .collect();
    assert_eq!(remaining, vec![5.0, -1.5]);
}

#[test]
fn delete_at_out_of_range_is_a_no_op() {
    let (_dir, service) = temp_service();
    seed(&service);

    assert_eq!(service.delete_at(3).unwrap(), DeleteOutcome::NoOp);
    assert_eq!(service.delete_at(-1).unwrap(), DeleteOutcome::NoOp);
    assert_eq!(service.delete_at(i64::MAX).unwrap(), DeleteOutcome::NoOp);
    assert_eq!(service.list_all().unwrap().len(), 3);
}

#[test]
fn corrupt_store_is_reported_not_hidden() {
    let (_dir, service) = temp_service();
    fs::write(service.store().path(), "not json").unwrap();

    let err = service.list_all().unwrap_err();
    assert!(matches!(err, RecordServiceError::Store(_)));
    assert!(!err.is_user_error());
}

#[test]
fn service_works_over_borrowed_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileRecordStore::new(&StoreConfig::in_dir(dir.path()));

    let service = RecordService::new(&store);
    service.create("3", "2024-05-01", "2024-05-02").unwrap();

    assert_eq!(store.load().unwrap().len(), 1);
    assert!(matches!(
        service.create("x", "2024-05-01", "2024-05-02"),
        Err(RecordServiceError::Validation(RecordValidationError::InvalidNumber(_)))
    ));
}

#[test]
fn create_rejects_window_that_collapses_below_a_millisecond() {
    let (_dir, service) = temp_service();
    seed(&service);

    let err = service
        .create("1", "2024-01-01T00:00:00.0001", "2024-01-01T00:00:00.0009")
        .unwrap_err();
    assert!(matches!(
        err,
        RecordServiceError::Validation(RecordValidationError::InvalidWindow { .. })
    ));

    assert_eq!(service.list_all().unwrap().len(), 3);
    service.create("2", "2024-02-01", "2024-02-02").unwrap();
    assert_eq!(service.list_all().unwrap().len(), 4);
}

#[test]
fn created_record_matches_listed_record() {
    let (_dir, service) = temp_service();

    let created = service
        .create("1", "2024-01-01T00:00:00.1234", "2024-01-02")
        .unwrap();

    assert_eq!(service.list_all().unwrap(), vec![created.clone()]);
    assert_eq!(
        created.start_date(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(123)
    );
}
