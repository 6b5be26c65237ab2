//! Action-server endpoint the dialogue engine calls once per predicted action.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use smartedu_actions::{ActionDispatcher, ActionRequest, TurnEvent};
use smartedu_core::{ActionName, SessionMetadata, SessionSlots};
use smartedu_gateway::BackendGateway;
use tracing::info;

const SESSION_METADATA_SLOT: &str = "session_started_metadata";

pub struct WebhookState<G> {
    dispatcher: Arc<ActionDispatcher<G>>,
}

impl<G> Clone for WebhookState<G> {
    fn clone(&self) -> Self {
        Self { dispatcher: Arc::clone(&self.dispatcher) }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionCall {
    pub next_action: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub tracker: Tracker,
}

#[derive(Debug, Default, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub slots: Map<String, Value>,
    #[serde(default)]
    pub latest_message: LatestMessage,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ActionReply {
    pub events: Vec<TurnEvent>,
    pub responses: Vec<Utterance>,
}

#[derive(Debug, Serialize)]
pub struct Utterance {
    pub text: String,
}

#[derive(Debug, Serialize)]
struct RegisteredAction {
    name: &'static str,
}

pub fn router<G>(dispatcher: Arc<ActionDispatcher<G>>) -> Router
where
    G: BackendGateway + 'static,
{
    Router::new()
        .route("/webhook", post(run_action::<G>))
        .route("/actions", get(list_actions))
        .with_state(WebhookState { dispatcher })
}

async fn run_action<G>(
    State(state): State<WebhookState<G>>,
    Json(call): Json<ActionCall>,
) -> Response
where
    G: BackendGateway + 'static,
{
    let Some(action) = ActionName::parse(&call.next_action) else {
        info!(
            event_name = "webhook.action.unknown",
            correlation_id = "webhook",
            action_name = %call.next_action,
            "no registered action for name"
        );
        let body = json!({
            "error": format!("No registered action found for name '{}'.", call.next_action),
            "action_name": call.next_action,
        });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    };

    let request = build_request(action, &call);
    let sender_id =
        call.sender_id.as_deref().or(call.tracker.sender_id.as_deref()).unwrap_or("unknown");
    info!(
        event_name = "webhook.action.received",
        correlation_id = %request.correlation_id,
        action = action.as_str(),
        sender_id,
        "running action"
    );

    let response = state.dispatcher.dispatch(request).await;
    let reply = ActionReply {
        events: response.events,
        responses: response.text.into_iter().map(|text| Utterance { text }).collect(),
    };
    (StatusCode::OK, Json(reply)).into_response()
}

async fn list_actions() -> Json<Vec<RegisteredAction>> {
    Json(ActionName::ALL.iter().map(|action| RegisteredAction { name: action.as_str() }).collect())
}

/// Session metadata comes from the session-start slot when the engine stored
/// one, otherwise from the latest message.
fn build_request(action: ActionName, call: &ActionCall) -> ActionRequest {
    let tracker = &call.tracker;
    let mut request = ActionRequest::new(action, SessionSlots::from_slot_map(&tracker.slots));

    if let Some(text) = tracker.latest_message.text.as_deref() {
        request = request.with_text(text);
    }

    let metadata = tracker
        .slots
        .get(SESSION_METADATA_SLOT)
        .filter(|value| value.is_object())
        .or(tracker.latest_message.metadata.as_ref())
        .map(SessionMetadata::from_json);
    if let Some(metadata) = metadata {
        request = request.with_metadata(metadata);
    }

    request
}
