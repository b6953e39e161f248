//! API routes module

pub mod chat;
pub mod contact;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat widget routes
        .nest("/chat", chat::router())
        // Plain contact form
        .nest("/contact", contact::router())
}
