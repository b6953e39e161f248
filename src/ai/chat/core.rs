use std::sync::Arc;

use crate::intake::{Intake, IntakeForm};
use crate::openai::Completion;

use super::marker::{Extraction, extract_lead};
use super::models::{Lead, Transcript};

/// One chat session that relays a conversation to an LLM and hands
/// off a lead once the assistant signals that every field has been
/// collected.
///
/// Turns must not overlap: `submit` takes `&mut self` so callers
/// sharing a relay need to serialize access to it.
///
/// Use `Relay::builder()` to construct a valid `Relay`.
pub struct Relay {
    completion: Arc<dyn Completion>,
    intake: Arc<dyn Intake>,
    transcript: Transcript,
    fallback_message: String,
}

impl Relay {
    /// The fallback message replaces the reply whenever a turn fails,
    /// so it should tell the visitor where to reach a person instead.
    pub fn builder(
        completion: Arc<dyn Completion>,
        intake: Arc<dyn Intake>,
        system_message: &str,
        fallback_message: &str,
    ) -> RelayBuilder {
        RelayBuilder::new(completion, intake, system_message, fallback_message)
    }

    /// Runs one turn of the chat. Blank input is ignored and returns
    /// `None`. Otherwise the reply shown to the user is returned,
    /// which is the fallback message if the completion failed. A
    /// failed turn leaves the user message in the transcript but never
    /// adds an assistant message.
    pub async fn submit(&mut self, user_text: &str) -> Option<String> {
        let text = user_text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push_user(text);

        let reply = match self.completion.complete(self.transcript.messages()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Completion failed: {}. Root cause: {}", e, e.root_cause());
                return Some(self.fallback_message.clone());
            }
        };

        // Keep the raw reply so the model sees exactly what it said
        self.transcript.push_assistant(&reply);

        let Extraction { display, lead } = extract_lead(&reply);
        if let Some(lead) = lead {
            self.dispatch(lead);
        }

        Some(display)
    }

    /// Hand a lead to the intake without waiting for the result.
    /// Failures are logged and otherwise dropped.
    pub fn dispatch(&self, lead: Lead) {
        let form = match IntakeForm::from_lead(&lead) {
            Ok(form) => form,
            Err(e) => {
                tracing::warn!("Dropping lead from {}: {}", lead.email, e);
                return;
            }
        };

        tracing::info!("Dispatching lead from {}", form.email);
        let intake = Arc::clone(&self.intake);
        tokio::spawn(async move {
            if let Err(e) = intake.submit(&form).await {
                tracing::warn!("Lead submission for {} failed: {}", form.email, e);
            }
        });
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

pub struct RelayBuilder {
    completion: Arc<dyn Completion>,
    intake: Arc<dyn Intake>,
    system_message: String,
    fallback_message: String,
}

impl RelayBuilder {
    pub fn new(
        completion: Arc<dyn Completion>,
        intake: Arc<dyn Intake>,
        system_message: &str,
        fallback_message: &str,
    ) -> Self {
        Self {
            completion,
            intake,
            system_message: system_message.to_string(),
            fallback_message: fallback_message.to_string(),
        }
    }

    pub fn build(self) -> Relay {
        Relay {
            completion: self.completion,
            intake: self.intake,
            transcript: Transcript::new(&self.system_message),
            fallback_message: self.fallback_message,
        }
    }
}
