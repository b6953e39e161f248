use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Model and sampling parameters sent with every completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f64,
    pub max_completion_tokens: u32,
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: String::from("llama-3.3-70b-versatile"),
            temperature: 0.65,
            max_completion_tokens: 512,
            timeout: Duration::from_secs(60),
        }
    }
}

pub async fn completion(
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    options: &CompletionOptions,
) -> Result<Value, Error> {
    let payload = json!({
        "model": options.model,
        "messages": messages,
        "temperature": options.temperature,
        "max_completion_tokens": options.max_completion_tokens,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(options.timeout)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;
    if !status.is_success() {
        // Error payloads look like {"error": {"message": "..."}}
        let reason = body["error"]["message"].as_str().unwrap_or("API error");
        bail!("Completion request failed with {}: {}", status, reason);
    }

    Ok(body)
}

/// Pull the assistant's text out of a completion response.
pub fn reply_content(resp: &Value) -> Result<String, Error> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or(anyhow!("No message received. Resp:\n\n {}", resp))
}

/// The collaborator that produces the next assistant message for a
/// transcript.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, Error>;
}

/// `Completion` backed by an OpenAI compatible chat completions API.
#[derive(Clone, Debug)]
pub struct OpenAiCompletion {
    api_hostname: String,
    api_key: String,
    options: CompletionOptions,
}

impl OpenAiCompletion {
    pub fn new(api_hostname: &str, api_key: &str, options: CompletionOptions) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            options,
        }
    }
}

#[async_trait]
impl Completion for OpenAiCompletion {
    async fn complete(&self, messages: &[Message]) -> Result<String, Error> {
        let resp = completion(messages, &self.api_hostname, &self.api_key, &self.options).await?;
        reply_content(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn completion_body(content: &str) -> String {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1694268190,
            "model": "llama-3.3-70b-versatile",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    }

    #[test]
    fn test_role_deserialization() {
        let json = r#""system""#;
        assert_eq!(serde_json::from_str::<Role>(json).unwrap(), Role::System);

        let json = r#""assistant""#;
        assert_eq!(serde_json::from_str::<Role>(json).unwrap(), Role::Assistant);

        let json = r#""user""#;
        assert_eq!(serde_json::from_str::<Role>(json).unwrap(), Role::User);

        assert!(serde_json::from_str::<Role>(r#""tool""#).is_err());
    }

    #[test]
    fn test_message_new() {
        let msg = Message::new(Role::User, "Hello world");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"user","content":"Hello world"}"#
        );
    }

    #[test]
    fn test_reply_content_missing() {
        let resp = json!({"choices": []});
        assert!(reply_content(&resp).is_err());

        let resp = json!({"choices": [{"message": {"content": null}}]});
        assert!(reply_content(&resp).is_err());
    }

    #[tokio::test]
    async fn test_completion_basic() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama-3.3-70b-versatile",
                "messages": [{"role": "user", "content": "Hi"}],
                "temperature": 0.65,
                "max_completion_tokens": 512
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Hello!"))
            .create_async()
            .await;

        let messages = vec![Message::new(Role::User, "Hi")];
        let result = completion(
            &messages,
            server.url().as_str(),
            "test-key",
            &CompletionOptions::default(),
        )
        .await;

        mock.assert_async().await;
        let json = result.unwrap();
        assert_eq!(json["choices"][0]["message"]["content"], "Hello!");
    }

    #[tokio::test]
    async fn test_completion_trims_trailing_slash() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Hello!"))
            .create_async()
            .await;

        let hostname = format!("{}/", server.url());
        let client = OpenAiCompletion::new(&hostname, "test-key", CompletionOptions::default());
        let reply = client
            .complete(&[Message::new(Role::User, "Hi")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Hello!");
    }

    #[tokio::test]
    async fn test_completion_error_payload() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#)
            .create_async()
            .await;

        let client = OpenAiCompletion::new(&server.url(), "bad-key", CompletionOptions::default());
        let err = client
            .complete(&[Message::new(Role::User, "Hi")])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[tokio::test]
    async fn test_completion_error_without_message() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let client = OpenAiCompletion::new(&server.url(), "test-key", CompletionOptions::default());
        let err = client
            .complete(&[Message::new(Role::User, "Hi")])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("API error"));
    }

    #[tokio::test]
    async fn test_completion_malformed_body() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let client = OpenAiCompletion::new(&server.url(), "test-key", CompletionOptions::default());
        let result = client.complete(&[Message::new(Role::User, "Hi")]).await;

        assert!(result.is_err());
    }
}
