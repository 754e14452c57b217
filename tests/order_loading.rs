use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use order_insights::ingestion::{
    load_orders, read_orders_from_path, CompositeObserver, FileObserver, IngestionContext,
    IngestionObserver, IngestionSeverity, IngestionStats, LoadOptions,
};
use order_insights::types::fields;
use order_insights::IngestionError;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("order_insights_{name}_{nanos}"))
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.events
            .lock()
            .unwrap()
            .push(format!("success rows={} malformed={}", stats.rows, stats.malformed_rows));
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.events.lock().unwrap().push(format!("failure {severity:?}"));
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.events.lock().unwrap().push(format!("alert {severity:?}"));
    }
}

fn observed(obs: &Arc<RecordingObserver>) -> LoadOptions {
    LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    }
}

#[test]
fn loads_every_data_line_of_the_fixture() {
    let orders = load_orders(fixture("orders.csv"), &LoadOptions::default()).unwrap();
    assert_eq!(orders.len(), 12);

    let first = orders.get(0).unwrap();
    assert_eq!(first.get_number(fields::PIZZA_ID), 1.0);
    assert_eq!(first.get_text(fields::PIZZA_NAME_ID), Some("hawaiian_m"));
    assert_eq!(first.get_text(fields::ORDER_DATE), Some("1/1/2015"));
    assert_eq!(first.get_number(fields::UNIT_PRICE), 13.25);
    assert_eq!(
        first.get_text(fields::PIZZA_INGREDIENTS),
        Some("Sliced Ham, Pineapple, Mozzarella Cheese")
    );
    assert_eq!(first.get_text(fields::PIZZA_NAME), Some("The Hawaiian Pizza"));

    let last = orders.get(11).unwrap();
    assert_eq!(last.get_number(fields::QUANTITY), 4.0);
    assert_eq!(last.get_number(fields::TOTAL_PRICE), 83.0);
}

#[test]
fn header_is_never_a_record() {
    let batch = read_orders_from_path(fixture("orders.csv")).unwrap();
    let header = batch.header.unwrap();
    assert_eq!(header.get(0), Some("pizza_id"));
    assert!(batch
        .records
        .iter()
        .all(|r| r.get_text(fields::PIZZA_NAME) != Some("pizza_name")));
}

#[test]
fn header_only_file_has_no_orders() {
    let obs = Arc::new(RecordingObserver::default());
    let err = load_orders(fixture("header_only.csv"), &observed(&obs)).unwrap_err();

    assert!(matches!(err, IngestionError::NoOrders { .. }));
    // Warning is below the default alert threshold.
    assert_eq!(obs.events(), vec!["failure Warning".to_string()]);
}

#[test]
fn header_only_file_loads_empty_when_rows_are_optional() {
    let opts = LoadOptions {
        require_rows: false,
        ..Default::default()
    };
    let orders = load_orders(fixture("header_only.csv"), &opts).unwrap();
    assert!(orders.is_empty());
}

#[test]
fn empty_file_is_reported_as_empty_input() {
    let obs = Arc::new(RecordingObserver::default());
    let err = load_orders(fixture("empty.csv"), &observed(&obs)).unwrap_err();

    assert!(matches!(err, IngestionError::EmptyInput { .. }));
    assert_eq!(obs.events(), vec!["failure Error".to_string()]);
}

#[test]
fn missing_file_is_critical_and_alerts() {
    let obs = Arc::new(RecordingObserver::default());
    let err = load_orders(fixture("does_not_exist.csv"), &observed(&obs)).unwrap_err();

    match err {
        IngestionError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert_eq!(
        obs.events(),
        vec!["failure Critical".to_string(), "alert Critical".to_string()]
    );
}

#[test]
fn alert_threshold_can_be_lowered() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Warning,
        ..Default::default()
    };
    let _ = load_orders(fixture("header_only.csv"), &opts).unwrap_err();

    assert_eq!(
        obs.events(),
        vec!["failure Warning".to_string(), "alert Warning".to_string()]
    );
}

#[test]
fn malformed_lines_keep_their_leading_fields() {
    let obs = Arc::new(RecordingObserver::default());
    let orders = load_orders(fixture("malformed.csv"), &observed(&obs)).unwrap();

    assert_eq!(orders.len(), 3);
    assert_eq!(obs.events(), vec!["success rows=3 malformed=2".to_string()]);

    let short = orders.get(1).unwrap();
    assert_eq!(short.len(), 4);
    assert_eq!(short.get_number(fields::QUANTITY), 5.0);
    assert!(!short.contains_key(fields::ORDER_DATE));

    // order_id "three" is not a number, so reading stops before it.
    let bad_number = orders.get(2).unwrap();
    assert_eq!(bad_number.len(), 1);
    assert_eq!(bad_number.get_number(fields::PIZZA_ID), 3.0);
    assert_eq!(bad_number.try_number(fields::ORDER_ID), None);
}

#[test]
fn composite_fans_out_to_every_observer() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn IngestionObserver>> = vec![a.clone(), b.clone()];
    let opts = LoadOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };

    load_orders(fixture("orders.csv"), &opts).unwrap();

    assert_eq!(a.events(), vec!["success rows=12 malformed=0".to_string()]);
    assert_eq!(a.events(), b.events());
}

#[test]
fn file_observer_appends_one_line_per_event() {
    let log = tmp_file("load.log");
    let opts = LoadOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    };

    load_orders(fixture("orders.csv"), &opts).unwrap();
    let _ = load_orders(fixture("does_not_exist.csv"), &opts).unwrap_err();

    let contents = fs::read_to_string(&log).unwrap();
    let events: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 3);

    assert_eq!(events[0]["event"], "loaded");
    assert_eq!(events[0]["rows"], 12);
    assert_eq!(events[0]["malformed_rows"], 0);
    assert!(events[0].get("severity").is_none());

    assert_eq!(events[1]["event"], "failed");
    assert_eq!(events[1]["severity"], "critical");
    assert!(events[1]["path"].as_str().unwrap().ends_with("does_not_exist.csv"));
    assert_eq!(events[2]["event"], "alert");
    assert!(events[2]["error"].as_str().is_some());

    let _ = fs::remove_file(&log);
}
