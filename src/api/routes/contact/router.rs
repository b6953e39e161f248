//! Router for the contact form API

use std::sync::{Arc, RwLock};

use axum::{Form, Json, Router, extract::State, routing::post};
use http::StatusCode;

use super::public::{ContactRequest, ContactResponse};
use crate::api::state::AppState;
use crate::intake::IntakeForm;

type SharedState = Arc<RwLock<AppState>>;

const SENT: &str = "Message sent! I'll be in touch soon.";
const FAILED: &str = "Something went wrong. Please try emailing me directly.";
const INCOMPLETE: &str = "Please include your name, email, and a message.";

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Forward a contact form submission to the intake and wait for it,
/// unlike leads from the chat this reports failures to the visitor.
async fn contact(
    State(state): State<SharedState>,
    Form(payload): Form<ContactRequest>,
) -> (StatusCode, Json<ContactResponse>) {
    let form = IntakeForm {
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_string(),
        phone: non_empty(payload.phone),
        service: non_empty(payload.service),
        message: payload.message.trim().to_string(),
    };
    if form.name.is_empty() || form.email.is_empty() || form.message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ContactResponse::new(false, INCOMPLETE)),
        );
    }

    let intake = state.read().expect("Unable to read shared state").intake();
    match intake.submit(&form).await {
        Ok(()) => (StatusCode::OK, Json(ContactResponse::new(true, SENT))),
        Err(e) => {
            tracing::error!("Contact form submission failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ContactResponse::new(false, FAILED)),
            )
        }
    }
}

/// Create the contact router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(contact))
}
