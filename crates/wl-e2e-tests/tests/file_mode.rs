//! E2E tests for file mode: fixture on disk → sensor → test_mode envelope.

mod helpers;

use serde_json::{Value, json};

use helpers::{TestHarness, repo_fixture};
use wl_log_tools::{LogError, SourceConfig};
use wl_protocol::{ReadingState, Readings};
use wl_sensor::{Attributes, Sensor, SensorError};

const SAW_CSV: &str = "\
Time,Source,EventID,Message
2024-01-15 10:00:01,SawController,100,Blade engaged
2024-01-15 10:00:05,SawController,101,\"Blade speed nominal, 3000 rpm\"
2024-01-15 10:00:09,Handpiece,210,
2024-01-15 10:00:14,Handpiece,500,Blade stall detected
";

/// Every CSV row becomes a map with exactly the header's keys, in header order.
#[tokio::test]
async fn csv_rows_keep_header_keys_and_order() {
    let h = TestHarness::new();
    let path = h.write_fixture("saw.csv", SAW_CSV);

    let readings = h.file_sensor(&path).read().await.unwrap();
    assert_eq!(readings.state, ReadingState::TestMode);

    let rows = readings.entries.as_raw().unwrap();
    assert_eq!(rows.len(), 4);
    for row in rows {
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Time", "Source", "EventID", "Message"]);
    }
    assert_eq!(rows[1]["Message"], "Blade speed nominal, 3000 rpm");
    // Empty cells stay empty strings; numbers are not coerced.
    assert_eq!(rows[2]["Message"], "");
    assert_eq!(rows[3]["EventID"], "500");
}

/// JSON entries are the file's objects, unchanged, in file order.
#[tokio::test]
async fn json_objects_pass_through_unchanged() {
    let h = TestHarness::new();
    let contents = r#"[
        {"Message": "first", "EventID": 7, "Nested": {"a": [1, 2]}},
        {"Only": null},
        {}
    ]"#;
    let path = h.write_fixture("objects.json", contents);

    let readings = h.file_sensor(&path).read().await.unwrap();
    assert_eq!(readings.state, ReadingState::TestMode);

    let expected: Vec<Value> = serde_json::from_str(contents).unwrap();
    let actual: Vec<Value> = readings
        .entries
        .as_raw()
        .unwrap()
        .iter()
        .cloned()
        .map(Value::Object)
        .collect();
    assert_eq!(actual, expected);

    let keys: Vec<&str> = readings.entries.as_raw().unwrap()[0]
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["Message", "EventID", "Nested"]);
}

/// The repository's JSON fixture, including the record with an extra field.
#[tokio::test]
async fn repo_json_fixture() {
    let h = TestHarness::new();
    let path = repo_fixture("SawHandpieceLog.json");

    let readings = h.file_sensor(&path).read().await.unwrap();
    let rows = readings.entries.as_raw().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2]["Message"], "Blade stall detected");
    assert_eq!(rows[2]["Rpm"], 0);
    assert!(!rows[0].contains_key("Rpm"));
}

/// `log_source = "test"` reads the configured fixture.
#[tokio::test]
async fn test_keyword_reads_fixture() {
    let h = TestHarness::new();
    let sensor = h.sensor(SourceConfig {
        log_source: "test".into(),
        test_fixture: Some(repo_fixture("000009999-synth 1.csv").to_string_lossy().into_owned()),
        ..Default::default()
    });

    let readings = sensor.read().await.unwrap();
    assert_eq!(readings.state, ReadingState::TestMode);
    let rows = readings.entries.as_raw().unwrap();
    assert_eq!(rows.len(), 3);
    let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, ["Time", "Source", "Message"]);
    assert_eq!(rows[0]["Message"], "Blade engaged");
    assert!(h.events.queries().is_empty(), "file mode never touches the event log");
}

/// Reading the same unchanged file twice gives identical results.
#[tokio::test]
async fn repeated_reads_are_identical() {
    let h = TestHarness::new();
    let path = h.write_fixture("saw.csv", SAW_CSV);
    let sensor = h.file_sensor(&path);

    let first = sensor.readings(&Attributes::new()).await.unwrap();
    let second = sensor.readings(&Attributes::new()).await.unwrap();
    assert_eq!(first, second);
}

/// The host-facing map decodes back into the same typed envelope.
#[tokio::test]
async fn readings_map_round_trips() {
    let h = TestHarness::new();
    let path = h.write_fixture("saw.csv", SAW_CSV);
    let sensor = h.file_sensor(&path);

    let typed = sensor.read().await.unwrap();
    let map = sensor.readings(&Attributes::new()).await.unwrap();
    assert_eq!(map["state"], "test_mode");
    assert!(!map.contains_key("error"));

    let decoded: Readings = serde_json::from_value(Value::Object(map)).unwrap();
    assert_eq!(decoded, typed);
}

/// Fixture rows whose headers look like canonical fields still decode as raw rows.
#[tokio::test]
async fn canonical_looking_rows_round_trip_as_raw() {
    let h = TestHarness::new();
    let path = h.write_fixture(
        "lower.csv",
        "time,source,event_id,severity,message,Rpm\n,saw,7,Info,m,11800\n",
    );
    let sensor = h.file_sensor(&path);

    let typed = sensor.read().await.unwrap();
    let map = sensor.readings(&Attributes::new()).await.unwrap();
    let decoded: Readings = serde_json::from_value(Value::Object(map)).unwrap();
    assert_eq!(decoded, typed);
    assert_eq!(decoded.entries.as_raw().unwrap()[0]["Rpm"], "11800");
}

/// A fixture whose name is only the suffix is still read as that format.
#[tokio::test]
async fn dotfile_fixture_is_read() {
    let h = TestHarness::new();
    let path = h.write_fixture(".csv", "A,B\n1,2\n");

    let readings = h.file_sensor(&path).read().await.unwrap();
    assert_eq!(readings.state, ReadingState::TestMode);
    assert_eq!(readings.entries.as_raw().unwrap()[0]["A"], "1");
}

/// Header only: zero entries, still test mode.
#[tokio::test]
async fn header_only_csv_is_empty() {
    let h = TestHarness::new();
    let path = h.write_fixture("empty.csv", "Time,Source,Message\n");

    let readings = h.file_sensor(&path).read().await.unwrap();
    assert_eq!(readings.state, ReadingState::TestMode);
    assert!(readings.entries.is_empty());
    let map = readings.into_map().unwrap();
    assert_eq!(map["entries"], json!([]));
}

#[tokio::test]
async fn ragged_csv_is_hard_error() {
    let h = TestHarness::new();
    let path = h.write_fixture("ragged.csv", "A,B\n1,2\n3\n");

    let err = h.file_sensor(&path).read().await.unwrap_err();
    match err {
        SensorError::Log(LogError::Csv { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected CSV error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_hard_error() {
    let h = TestHarness::new();
    let path = h.write_fixture("broken.json", "[{\"a\": 1},");

    let err = h.file_sensor(&path).read().await.unwrap_err();
    assert!(matches!(err, SensorError::Log(LogError::Json(_))));
}

#[tokio::test]
async fn json_object_at_top_level_is_hard_error() {
    let h = TestHarness::new();
    let path = h.write_fixture("object.json", r#"{"Message": "not an array"}"#);

    let err = h.file_sensor(&path).read().await.unwrap_err();
    assert!(matches!(err, SensorError::Log(LogError::InvalidFormat(_))));
}

#[tokio::test]
async fn missing_file_is_hard_error() {
    let h = TestHarness::new();
    let path = h.dir.path().join("absent.json");

    let err = h.file_sensor(&path).read().await.unwrap_err();
    assert!(matches!(err, SensorError::Log(LogError::NotFound(_))));
    assert!(err.to_string().contains("absent.json"));
}

/// A `test` fixture with an unrecognized extension fails once it has been read.
#[tokio::test]
async fn unsupported_fixture_extension_is_hard_error() {
    let h = TestHarness::new();
    let path = h.write_fixture("saw.txt", "Time,Source\n");
    let sensor = h.sensor(SourceConfig {
        log_source: "test".into(),
        test_fixture: Some(path.to_string_lossy().into_owned()),
        ..Default::default()
    });

    let err = sensor.read().await.unwrap_err();
    assert!(matches!(
        err,
        SensorError::Log(LogError::UnsupportedExtension(ref ext)) if ext == ".txt"
    ));
}
