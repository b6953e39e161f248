//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::openai::Role;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct OpenSessionResponse {
    pub session_id: String,
    pub greeting: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    /// Display text with any lead marker removed
    pub message: String,
    /// `message` escaped for HTML with `**emphasis**` applied
    pub html: String,
}

/// One line of the widget's scrollback.
#[derive(Serialize, Deserialize)]
pub struct ScrollbackEntry {
    pub role: Role,
    pub message: String,
    pub html: String,
}

#[derive(Serialize, Deserialize)]
pub struct ScrollbackResponse {
    pub session_id: String,
    pub messages: Vec<ScrollbackEntry>,
}
