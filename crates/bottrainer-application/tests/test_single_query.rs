mod common;

use std::sync::Arc;

use bottrainer_application::{AnalyzeOptions, SessionConfigStore, SingleQueryController, Trigger};
use bottrainer_core::model::{ModelKind, TurnRole};
use bottrainer_interaction::IntentBackend;
use common::MockBackend;

fn controller(mock: &Arc<MockBackend>) -> (SingleQueryController, Arc<SessionConfigStore>) {
    let session = Arc::new(SessionConfigStore::new());
    let backend: Arc<dyn IntentBackend> = mock.clone();
    let controller = SingleQueryController::new(backend, Arc::clone(&session), AnalyzeOptions::default());
    (controller, session)
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let mock = MockBackend::new();
    let (query, _) = controller(&mock);

    for blank in ["", "   ", "\t\n"] {
        assert!(matches!(query.submit_text(blank), Trigger::BlankInput));
    }
    assert!(query.transcript().is_empty());
    assert_eq!(mock.analyze.calls(), 0);
}

#[tokio::test]
async fn test_submit_appends_user_turn_then_classification() {
    let mock = MockBackend::new();
    mock.analyze.hold();
    let (query, _) = controller(&mock);

    let trigger = query.submit_text("hello there");
    assert!(trigger.is_started());

    // User turn is visible before the backend answers.
    let transcript = query.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].role, TurnRole::User);
    assert_eq!(transcript[0].text, "hello there");
    assert_eq!(query.input(), "");
    assert!(query.is_submitting());

    mock.analyze.release();
    trigger.settled().await;

    let transcript = query.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].role, TurnRole::System);
    assert_eq!(transcript[1].intent.as_deref(), Some("greeting"));
    assert_eq!(transcript[1].confidence, Some(0.9));
    assert!(transcript[0].id < transcript[1].id);
    assert!(!query.is_submitting());
}

#[tokio::test]
async fn test_failure_is_recorded_as_error_turn() {
    let mock = MockBackend::new();
    mock.analyze.fail(Some(500), "Gemini API key not configured");
    let (query, _) = controller(&mock);

    query.submit_text("book a table").settled().await;

    let transcript = query.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(transcript[1].is_error());
    assert_eq!(
        transcript[1].error_message(),
        Some("Gemini API key not configured")
    );
    assert!(!query.is_submitting());
}

#[tokio::test]
async fn test_submit_while_in_flight_is_dropped() {
    let mock = MockBackend::new();
    mock.analyze.hold();
    let (query, _) = controller(&mock);

    let first = query.submit_text("first");
    query.set_input("draft");
    assert!(matches!(query.submit_text("second"), Trigger::Busy));
    assert!(matches!(query.submit(), Trigger::Busy));
    assert_eq!(query.transcript().len(), 1);
    assert_eq!(query.input(), "draft");

    mock.analyze.release();
    first.settled().await;

    assert_eq!(mock.analyze.calls(), 1);
    let texts: Vec<_> = query.transcript().into_iter().map(|turn| turn.text).collect();
    assert_eq!(texts, ["first", "first"]);
}

#[tokio::test]
async fn test_request_uses_current_session_config() {
    let mock = MockBackend::new();
    let (query, session) = controller(&mock);

    session.set_model_kind(ModelKind::Alternate);
    session.set_model_name("  ");
    query.submit_text("where is my order").settled().await;

    session.set_model_name("gemini-2.0-pro");
    query.submit_text("and now?").settled().await;

    let requests = mock.analyzed.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].model_type, ModelKind::Alternate);
    assert_eq!(requests[0].model_name, "gemini-1.5-flash");
    assert_eq!(requests[0].api_key, "");
    assert_eq!(requests[1].model_name, "gemini-2.0-pro");
}

#[tokio::test]
async fn test_response_after_teardown_is_discarded() {
    let mock = MockBackend::new();
    mock.analyze.hold();
    let (query, _) = controller(&mock);

    let trigger = query.submit_text("hi");
    drop(query);

    mock.analyze.release();
    let Trigger::Started(handle) = trigger else {
        panic!("expected a started request");
    };
    assert!(handle.await.is_ok());
    assert_eq!(mock.analyze.calls(), 1);
}
