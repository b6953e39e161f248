//! Reusable prompts using Handlebars for templating. Strict mode is
//! on so a missing field fails the render instead of silently
//! producing an empty value.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    Persona,
    LeadSummary,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

const PERSONA_PROMPT: &str = r"
You are the professional AI assistant for {{owner}}.
You represent their portfolio at {{site}}.
If a user asks about pricing, hiring, or working with {{owner}}, collect their info one question at a time in this order:
1. Name
2. Email
3. Phone number
4. Type of work (e.g., YouTube, Shorts, Commercial)
5. Brief project description
Once you have ALL 5, include this exact tag on a new line: [[LEAD|NAME:n|EMAIL:e|PHONE:p|WORK:w|MSG:m]]
Replace placeholders with actual values and never use the characters | or [[ inside a value. Then confirm their inquiry is being sent.
Keep responses concise, professional, and warm.
";

// Plain text for the intake email body, no leading newline
const LEAD_SUMMARY_PROMPT: &str = "[VIA AI ASSISTANT]

Phone: {{phone}}
Service: {{service}}

{{message}}";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Output is plain text sent to the model or the intake, never HTML
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::Persona.to_string(), PERSONA_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::LeadSummary.to_string(), LEAD_SUMMARY_PROMPT)
        .expect("Failed to register template");
    registry
}
