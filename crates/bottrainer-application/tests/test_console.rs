mod common;

use std::sync::Arc;

use bottrainer_application::{AnalyzeOptions, Console, SessionConfigStore, Tab};
use bottrainer_interaction::IntentBackend;
use common::{MockBackend, history_entry};

fn console(mock: &Arc<MockBackend>) -> Console {
    let backend: Arc<dyn IntentBackend> = mock.clone();
    Console::new(backend, Arc::new(SessionConfigStore::new()), AnalyzeOptions::default())
}

#[tokio::test]
async fn test_selecting_history_refreshes() {
    let mock = MockBackend::new();
    *mock.log.lock().unwrap() = vec![history_entry("hi")];
    let mut console = console(&mock);

    assert!(console.select(Tab::Batch).is_none());
    let trigger = console.select(Tab::History).expect("history refresh");
    trigger.settled().await;

    assert_eq!(console.active(), Tab::History);
    assert_eq!(console.history().view().entries.len(), 1);
}

#[tokio::test]
async fn test_schema_dataset_loads_once() {
    let mock = MockBackend::new();
    let mut console = console(&mock);

    console.select(Tab::Schema).expect("dataset load").settled().await;
    assert!(console.select(Tab::Schema).is_none());
    assert_eq!(mock.intents.calls(), 1);
}

#[tokio::test]
async fn test_tabs_keep_state_across_switches() {
    let mock = MockBackend::new();
    let mut console = console(&mock);

    console.query().submit_text("hello").settled().await;
    console.select(Tab::Evaluation);
    console.select(Tab::Query);

    assert_eq!(console.query().transcript().len(), 2);
}

#[tokio::test]
async fn test_remount_discards_in_flight_result() {
    let mock = MockBackend::new();
    mock.analyze.hold();
    let mut console = console(&mock);

    let pending = console.query().submit_text("hello");
    console.remount(Tab::Query);
    mock.analyze.release();
    pending.settled().await;

    assert!(console.query().transcript().is_empty());
    assert!(!console.query().is_submitting());
}
