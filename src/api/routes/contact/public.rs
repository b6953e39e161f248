//! Public types for the contact form API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ContactResponse {
    pub ok: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn new(ok: bool, message: &str) -> Self {
        Self {
            ok,
            message: message.into(),
        }
    }
}
