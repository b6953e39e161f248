use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ai::chat::Lead;
use crate::ai::prompt::{Prompt, templates};

/// The form-encoded body accepted by the intake endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub message: String,
}

impl IntakeForm {
    /// Build the submission for a lead collected by the assistant. The
    /// message is prefixed with the phone number and type of work so
    /// the recipient sees them in the email body.
    pub fn from_lead(lead: &Lead) -> Result<Self, Error> {
        let message = templates().render(
            &Prompt::LeadSummary.to_string(),
            &json!({
                "phone": lead.phone,
                "service": lead.work,
                "message": lead.message,
            }),
        )?;

        Ok(Self {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: Some(lead.phone.clone()),
            service: Some(lead.work.clone()),
            message,
        })
    }
}
