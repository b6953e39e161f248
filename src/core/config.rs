use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde_json::json;

use crate::ai::prompt::{Prompt, templates};
use crate::openai::CompletionOptions;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm_api_hostname: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f64,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
    pub session_idle_secs: u64,
    pub intake_url: String,
    pub contact_email: String,
    pub owner_name: String,
    pub site_name: String,
    pub system_message: String,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("Missing env var {}", name))
}

fn parsed<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid value for env var {}: {}", name, value)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Read the configuration from `CONCIERGE_*` environment
    /// variables. The persona system message is rendered from a
    /// template unless `CONCIERGE_SYSTEM_MESSAGE` overrides it.
    pub fn from_env() -> Result<Self> {
        let llm_api_hostname = env::var("CONCIERGE_LLM_HOST")
            .unwrap_or_else(|_| "https://api.groq.com/openai".to_string());
        let llm_api_key = required("CONCIERGE_LLM_API_KEY")?;
        let llm_model = env::var("CONCIERGE_LLM_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());
        let llm_temperature = parsed("CONCIERGE_LLM_TEMPERATURE", 0.65)?;
        let llm_max_tokens = parsed("CONCIERGE_LLM_MAX_TOKENS", 512)?;
        let llm_timeout_secs = parsed("CONCIERGE_LLM_TIMEOUT_SECS", 60)?;
        let session_idle_secs = parsed("CONCIERGE_SESSION_IDLE_SECS", 30 * 60)?;
        let intake_url = required("CONCIERGE_INTAKE_URL")?;
        let contact_email = required("CONCIERGE_CONTACT_EMAIL")?;
        let owner_name = required("CONCIERGE_ASSISTANT_NAME")?;
        let site_name = required("CONCIERGE_SITE_NAME")?;
        let system_message = match env::var("CONCIERGE_SYSTEM_MESSAGE") {
            Ok(msg) => msg,
            Err(_) => persona_message(&owner_name, &site_name)?,
        };

        Ok(Self {
            llm_api_hostname,
            llm_api_key,
            llm_model,
            llm_temperature,
            llm_max_tokens,
            llm_timeout_secs,
            session_idle_secs,
            intake_url,
            contact_email,
            owner_name,
            site_name,
            system_message,
        })
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.llm_model.clone(),
            temperature: self.llm_temperature,
            max_completion_tokens: self.llm_max_tokens,
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }

    /// How long a widget session may sit untouched before it is
    /// discarded.
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Shown in place of a reply whenever a turn fails.
    pub fn fallback_message(&self) -> String {
        format!(
            "Sorry, I'm having trouble connecting right now. Please email directly: {}",
            self.contact_email
        )
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hi! I'm {}'s AI assistant. Ask me about their work, services, or how to get started on a project.",
            self.owner_name
        )
    }
}

pub fn persona_message(owner_name: &str, site_name: &str) -> Result<String> {
    let msg = templates().render(
        &Prompt::Persona.to_string(),
        &json!({"owner": owner_name, "site": site_name}),
    )?;
    Ok(msg.trim().to_string())
}
