//! Client for the third-party form intake endpoint that receives
//! leads and contact form submissions.
pub mod models;
pub use models::*;

use std::time::Duration;

use anyhow::{Error, Result, bail};
use async_trait::async_trait;

/// The collaborator that receives completed submissions.
#[async_trait]
pub trait Intake: Send + Sync {
    async fn submit(&self, form: &IntakeForm) -> Result<(), Error>;
}

/// `Intake` that posts form-encoded fields to a URL.
#[derive(Clone, Debug)]
pub struct FormIntake {
    url: String,
    timeout: Duration,
}

impl FormIntake {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl Intake for FormIntake {
    async fn submit(&self, form: &IntakeForm) -> Result<(), Error> {
        let response = reqwest::Client::new()
            .post(&self.url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!("Form intake rejected submission with {}", status);
        }
        tracing::debug!("Form intake accepted submission from {}", form.email);

        Ok(())
    }
}
