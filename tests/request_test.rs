use chrono::{Duration, TimeZone, Utc};
use mongopurge::modules::bulk_delete::controller::{is_affirmative, PurgeError};
use mongopurge::modules::bulk_delete::model::{
    object_id_for_timestamp, parse_cutoff, DeletionRequest, DEFAULT_BATCH_SIZE,
    DEFAULT_DELETE_INTERVAL_MS,
};

fn build_request(
    batch_size: Option<i64>,
    delete_interval_ms: Option<u64>,
) -> Result<DeletionRequest, PurgeError> {
    DeletionRequest::new(
        "mongodb://localhost:27017".to_string(),
        "app".to_string(),
        "logs".to_string(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        batch_size,
        delete_interval_ms,
    )
}

#[test]
fn test_defaults_applied() {
    let request = build_request(None, None).unwrap();

    assert_eq!(request.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(request.delete_interval_ms, DEFAULT_DELETE_INTERVAL_MS);
    assert_eq!(request.batch_size, 300);
    assert_eq!(request.delete_interval_ms, 200);
}

#[test]
fn test_rejects_missing_required_fields() {
    let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for (uri, db_name, collection_name) in [
        ("", "app", "logs"),
        ("mongodb://localhost:27017", "", "logs"),
        ("mongodb://localhost:27017", "app", ""),
    ] {
        let result = DeletionRequest::new(
            uri.to_string(),
            db_name.to_string(),
            collection_name.to_string(),
            cutoff,
            None,
            None,
        );
        assert!(matches!(result, Err(PurgeError::Configuration(_))));
    }
}

#[test]
fn test_rejects_cutoff_in_the_future() {
    let result = DeletionRequest::new(
        "mongodb://localhost:27017".to_string(),
        "app".to_string(),
        "logs".to_string(),
        Utc::now() + Duration::seconds(1),
        None,
        None,
    );

    assert!(matches!(result, Err(PurgeError::Configuration(_))));
}

#[test]
fn test_rejects_non_positive_batch_size() {
    assert!(matches!(
        build_request(Some(0), None),
        Err(PurgeError::Configuration(_))
    ));
    assert!(matches!(
        build_request(Some(-5), None),
        Err(PurgeError::Configuration(_))
    ));
}

#[test]
fn test_rejects_zero_delete_interval() {
    assert!(matches!(
        build_request(None, Some(0)),
        Err(PurgeError::Configuration(_))
    ));
}

#[test]
fn test_parse_cutoff_accepts_rfc3339() {
    let parsed = parse_cutoff("2024-01-01T00:00:00.000Z").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

    let with_offset = parse_cutoff("2024-01-01T02:00:00+02:00").unwrap();
    assert_eq!(with_offset, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_cutoff_accepts_bare_date() {
    let parsed = parse_cutoff("2024-01-01").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_cutoff_rejects_garbage() {
    for raw in ["", "not-a-date", "01/01/2024", "2024-13-40"] {
        assert!(matches!(
            parse_cutoff(raw),
            Err(PurgeError::Configuration(_))
        ));
    }
}

#[test]
fn test_cutoff_id_is_deterministic() {
    let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    assert_eq!(
        object_id_for_timestamp(cutoff),
        object_id_for_timestamp(cutoff)
    );
}

#[test]
fn test_cutoff_id_embeds_seconds_then_zeros() {
    let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let id = object_id_for_timestamp(cutoff);

    assert_eq!(
        id.to_hex(),
        format!("{:08x}0000000000000000", cutoff.timestamp())
    );
}

#[test]
fn test_cutoff_id_is_strictly_monotonic() {
    let timestamps = [
        Utc.with_ymd_and_hms(2020, 6, 15, 12, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 1).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    ];

    for pair in timestamps.windows(2) {
        let earlier = object_id_for_timestamp(pair[0]);
        let later = object_id_for_timestamp(pair[1]);
        assert!(earlier.bytes() < later.bytes(), "{earlier} !< {later}");
    }
}

#[test]
fn test_only_literal_y_is_affirmative() {
    assert!(is_affirmative("y"));

    for answer in ["Y", "yes", "", "n", " y", "y "] {
        assert!(!is_affirmative(answer), "{answer:?} should decline");
    }
}
