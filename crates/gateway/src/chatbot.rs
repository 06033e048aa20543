//! `POST /api/chatbot`: the energy assistant over HTTP.
//!
//! Success and failure are both `{"reply": ...}` so a chat client can show
//! whatever comes back.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use ecowatt_core::assistant::AssistantRequest;
use ecowatt_core::error::AssistantError;
use serde::Serialize;
use tracing::info;

use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

fn reply(status: StatusCode, text: &str) -> (StatusCode, Json<ChatReply>) {
    (
        status,
        Json(ChatReply {
            reply: text.to_string(),
        }),
    )
}

pub async fn chatbot_handler(
    State(state): State<SharedState>,
    payload: Result<Json<AssistantRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatReply>)> {
    let missing = || reply(StatusCode::BAD_REQUEST, "Please provide both message and userId.");
    let Ok(Json(request)) = payload else {
        return Err(missing());
    };

    info!(user_id = %request.user_id, "Chatbot request");
    match state.assistant.answer_request(&request).await {
        Ok(response) => Ok(Json(ChatReply {
            reply: response.reply,
        })),
        Err(AssistantError::InvalidInput(_)) => Err(missing()),
        Err(AssistantError::UserNotFound(_)) => Err(reply(StatusCode::NOT_FOUND, "User not found.")),
    }
}
