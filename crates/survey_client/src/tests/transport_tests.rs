use super::*;
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::json;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex as AsyncMutex},
};

use crate::config::Settings;

#[derive(Clone)]
struct ServerState {
    tx: Arc<AsyncMutex<Option<oneshot::Sender<serde_json::Value>>>>,
    response: SubmissionResult,
}

async fn handle_submit(
    State(state): State<ServerState>,
    Json(payload): Json<serde_json::Value>,
) -> Json<SubmissionResult> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    Json(state.response.clone())
}

async fn spawn_survey_server(
    response: SubmissionResult,
) -> Result<(String, oneshot::Receiver<serde_json::Value>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(AsyncMutex::new(Some(tx))),
        response,
    };
    let app = Router::new()
        .route("/api/submit-survey", post(handle_submit))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/api/submit-survey"), rx))
}

fn one_answer() -> SurveyResponses {
    [("1".to_string(), "a".to_string())].into_iter().collect()
}

#[tokio::test]
async fn posts_the_payload_as_json_and_parses_acceptance() {
    let (endpoint, payload_rx) = spawn_survey_server(SubmissionResult::ok())
        .await
        .expect("spawn server");
    let transport = HttpTransport::new(endpoint, Duration::from_secs(5)).expect("transport");

    let result = transport
        .send(&SurveyPayload::anonymous(one_answer()))
        .await
        .expect("send");

    assert_eq!(result, SubmissionResult::ok());
    assert_eq!(
        payload_rx.await.expect("captured payload"),
        json!({"is_anonymous": true, "responses": {"1": "a"}})
    );
}

#[tokio::test]
async fn server_rejection_comes_back_as_a_result_not_an_error() {
    let (endpoint, _payload_rx) = spawn_survey_server(SubmissionResult::rejected("db down"))
        .await
        .expect("spawn server");
    let transport = HttpTransport::new(endpoint, Duration::from_secs(5)).expect("transport");

    let result = transport
        .send(&SurveyPayload::anonymous(one_answer()))
        .await
        .expect("send");

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("db down"));
}

#[tokio::test]
async fn unreachable_endpoint_surfaces_as_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport = HttpTransport::new(
        format!("http://{addr}/api/submit-survey"),
        Duration::from_secs(2),
    )
    .expect("transport");

    let result = transport
        .send(&SurveyPayload::anonymous(one_answer()))
        .await;
    assert!(result.is_err());
}

#[test]
fn rejects_a_malformed_endpoint_url() {
    assert!(HttpTransport::new("not a url", Duration::from_secs(1)).is_err());
    assert!(HttpTransport::from_settings(&Settings::default()).is_ok());
}

#[tokio::test]
async fn controller_submits_end_to_end_over_http() {
    let (endpoint, payload_rx) = spawn_survey_server(SubmissionResult::ok())
        .await
        .expect("spawn server");

    let form = InMemoryFormState::new();
    form.set_checked(FIELD_ANONYMOUS_SWITCH, true);
    form.add_choice_group("question_1", &["a", "b", "c", "d"]);
    form.select_choice("question_1", "a");

    let presenter = Arc::new(ChannelPresenter::default());
    let mut notices = presenter.subscribe();
    let controller = SurveyFormController::new(
        form,
        HttpTransport::new(endpoint, Duration::from_secs(5)).expect("transport"),
        Arc::clone(&presenter),
    );

    assert_eq!(controller.handle_submit().await, SubmitOutcome::Succeeded);
    assert_eq!(
        payload_rx.await.expect("captured payload"),
        json!({"is_anonymous": true, "responses": {"1": "a"}})
    );
    assert!(matches!(notices.try_recv(), Ok(Notice::Success { .. })));
}
