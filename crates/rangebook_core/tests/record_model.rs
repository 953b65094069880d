use chrono::{TimeZone, Utc};
use rangebook_core::{Record, RecordInput, RecordValidationError};

fn utc(year: i32, month: u32, day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

#[test]
fn record_serialization_uses_expected_wire_fields() {
    let record = Record::new(-2.5, utc(2024, 1, 1), utc(2024, 1, 10)).unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["number"], -2.5);
    assert_eq!(json["startDate"], "2024-01-01T00:00:00.000Z");
    assert_eq!(json["endDate"], "2024-01-10T00:00:00.000Z");
    assert_eq!(json.as_object().unwrap().len(), 3);

    let decoded: Record = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn deserialize_normalizes_offsets_and_integer_numbers() {
    let value = serde_json::json!({
        "number": 5,
        "startDate": "2024-01-01T02:00:00+02:00",
        "endDate": "2024-01-02T00:00:00Z"
    });

    let record: Record = serde_json::from_value(value).unwrap();
    assert_eq!(record.number(), 5.0);
    assert_eq!(record.start_date(), utc(2024, 1, 1));
    assert_eq!(record.end_date(), utc(2024, 1, 2));
}

#[test]
fn deserialize_rejects_invalid_window() {
    let value = serde_json::json!({
        "number": 1.0,
        "startDate": "2024-01-10T00:00:00.000Z",
        "endDate": "2024-01-01T00:00:00.000Z"
    });

    let err = serde_json::from_value::<Record>(value).unwrap_err();
    assert!(
        err.to_string().contains("must be after start date"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_bad_timestamp() {
    let value = serde_json::json!({
        "number": 1.0,
        "startDate": "not a date",
        "endDate": "2024-01-01T00:00:00.000Z"
    });

    assert!(serde_json::from_value::<Record>(value).is_err());
}

#[test]
fn input_builds_record_from_form_values() {
    let record = RecordInput::new("7", "2024-02-01", "2024-02-05")
        .to_record()
        .unwrap();

    assert_eq!(record.number(), 7.0);
    assert_eq!(record.start_date(), utc(2024, 2, 1));
    assert_eq!(record.end_date(), utc(2024, 2, 5));
}

#[test]
fn input_reports_first_failure_in_check_order() {
    let cases = [
        (
            RecordInput::new("abc", "", ""),
            RecordValidationError::InvalidNumber("abc".to_string()),
        ),
        (
            RecordInput::new("1", "", "2024-01-01"),
            RecordValidationError::MissingStartDate,
        ),
        (
            RecordInput::new("1", "2024-01-01", "  "),
            RecordValidationError::MissingEndDate,
        ),
        (
            RecordInput::new("1", "someday", "2024-01-01"),
            RecordValidationError::InvalidStartDate("someday".to_string()),
        ),
        (
            RecordInput::new("1", "2024-01-01", "2024-99-01"),
            RecordValidationError::InvalidEndDate("2024-99-01".to_string()),
        ),
        (
            RecordInput::new("1", "2024-01-02", "2024-01-01"),
            RecordValidationError::InvalidWindow {
                start: utc(2024, 1, 2),
                end: utc(2024, 1, 1),
            },
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(input.to_record().unwrap_err(), expected, "input: {input:?}");
    }
}

#[test]
fn input_rejects_equal_start_and_end() {
    let err = RecordInput::new("1", "2024-03-01", "2024-03-01T00:00:00Z")
        .to_record()
        .unwrap_err();
    assert!(matches!(err, RecordValidationError::InvalidWindow { .. }));
}
