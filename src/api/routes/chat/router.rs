//! Router for the chat widget API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::post,
};
use http::StatusCode;

use super::public;
use crate::ai::chat::{extract_lead, render_html};
use crate::api::state::AppState;
use crate::openai::Role;

type SharedState = Arc<RwLock<AppState>>;

fn session_not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Chat session {} not found", id),
    )
        .into_response()
}

/// Open a chat session for a widget
async fn open_session(State(state): State<SharedState>) -> impl IntoResponse {
    let mut shared_state = state.write().expect("Unable to write shared state");
    let session_id = shared_state.open_session();
    tracing::debug!(
        "Opened chat session {} ({} open)",
        session_id,
        shared_state.session_count()
    );

    (
        StatusCode::CREATED,
        Json(public::OpenSessionResponse {
            session_id,
            greeting: shared_state.config.greeting(),
        }),
    )
}

/// Send the next user message in a session and get the reply
async fn chat_turn(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<public::ChatRequest>,
) -> Response {
    let session = state
        .write()
        .expect("Unable to write shared state")
        .session(&id);
    let Some(session) = session else {
        return session_not_found(&id);
    };

    let mut relay = session.lock().await;
    let Some(message) = relay.submit(&payload.message).await else {
        return (StatusCode::BAD_REQUEST, "Message must not be empty").into_response();
    };

    let html = render_html(&message);
    Json(public::ChatResponse {
        session_id: id,
        message,
        html,
    })
    .into_response()
}

/// Get the scrollback for a session as the user saw it
async fn chat_session(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let session = state
        .write()
        .expect("Unable to write shared state")
        .session(&id);
    let Some(session) = session else {
        return session_not_found(&id);
    };

    let relay = session.lock().await;
    let messages = relay
        .transcript()
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| {
            let message = match m.role {
                Role::Assistant => extract_lead(&m.content).display,
                _ => m.content.clone(),
            };
            public::ScrollbackEntry {
                role: m.role,
                html: render_html(&message),
                message,
            }
        })
        .collect();

    Json(public::ScrollbackResponse {
        session_id: id,
        messages,
    })
    .into_response()
}

/// Close a session and discard its transcript
async fn close_session(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let closed = state
        .write()
        .expect("Unable to write shared state")
        .close_session(&id);

    if !closed {
        return session_not_found(&id);
    }
    tracing::debug!("Closed chat session {}", id);
    StatusCode::NO_CONTENT.into_response()
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(open_session)).route(
        "/{id}",
        post(chat_turn).get(chat_session).delete(close_session),
    )
}
