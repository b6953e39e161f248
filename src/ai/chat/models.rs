//! The core models for a lead capture chat with an LLM.
use serde::Serialize;

use crate::openai::{Message, Role};

/// Ordered messages of one chat session. Always starts with exactly
/// one system message; only user and assistant messages can be
/// appended after it.
#[derive(Clone, Debug)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn new(system_message: &str) -> Self {
        Self(vec![Message::new(Role::System, system_message)])
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn push_user(&mut self, content: &str) {
        self.0.push(Message::new(Role::User, content))
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.0.push(Message::new(Role::Assistant, content))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true, there is always a system message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count(&self, role: Role) -> usize {
        self.0.iter().filter(|m| m.role == role).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }
}

/// A fully collected inquiry extracted from an assistant reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub work: String,
    pub message: String,
}
