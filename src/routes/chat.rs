use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    chat::ReplyStatus,
    models::{IntentTag, SearchCandidate},
    services::Exchange,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Wire shape of a chat reply. The transport status is always 200;
/// failure is communicated only through `status` and `error` so the
/// chat UI is never interrupted by an error page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentTag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub movie_suggestions: Vec<SearchCandidate>,
    pub status: ReplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Exchange> for ChatResponse {
    fn from(exchange: Exchange) -> Self {
        Self {
            response: exchange.response,
            intent: exchange.intent,
            movie_suggestions: exchange.candidates,
            status: exchange.status,
            error: exchange.error,
        }
    }
}

/// Handler for the chat endpoint.
///
/// A malformed or missing body is folded into the empty-message path so
/// even a broken client gets a structured, conversational payload back.
pub async fn chat(
    State(state): State<AppState>,
    payload: Option<Json<ChatRequest>>,
) -> Json<ChatResponse> {
    let message = payload.map(|Json(req)| req.message).unwrap_or_default();

    let exchange = state.chat.handle(&message).await;

    Json(ChatResponse::from(exchange))
}
