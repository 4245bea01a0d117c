//! Wire types and backend contract for an OpenAI-compatible chat completion API.
//!
//! The crate ships no HTTP client. Implement [`CompletionBackend`] over the
//! transport of your choice and hand it to
//! [`AssistantBuilder`](crate::AssistantBuilder).

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request body sent to the completion endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Serialize to the JSON request body.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Response body of the completion endpoint. Every field is optional on the
/// wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object some providers return instead of choices.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl CompletionResponse {
    /// Decode a JSON response body.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// A successful response carrying a single message.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(content.into()),
                }),
            }],
            error: None,
        }
    }

    /// Content of the first choice, if present and non-empty.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|content| !content.is_empty())
    }
}

/// Transport to a chat completion API.
///
/// Implementations must be `Send + Sync + 'static`. Transport failures
/// should be reported as [`DmAssistError::Completion`](crate::DmAssistError::Completion);
/// an error body returned by the API belongs in [`CompletionResponse::error`].
///
/// # Implementing a backend
///
/// ```rust,no_run
/// use dm_assist::{CompletionBackend, CompletionRequest, CompletionResponse, Result};
///
/// struct Canned;
///
/// impl CompletionBackend for Canned {
///     async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::with_content("Sounds good!"))
///     }
/// }
/// ```
pub trait CompletionBackend: Send + Sync + 'static {
    /// Send `request` and return the decoded response body.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_openai_shape() {
        let request = CompletionRequest {
            model: "google/gemini-pro".into(),
            messages: vec![ChatMessage::system("rules"), ChatMessage::user("context")],
        };
        let value: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "google/gemini-pro",
                "messages": [
                    { "role": "system", "content": "rules" },
                    { "role": "user", "content": "context" }
                ]
            })
        );
    }

    #[test]
    fn decodes_successful_response() {
        let body = r#"{"id":"gen-1","choices":[{"index":0,"message":{"role":"assistant","content":"Hi!"}}]}"#;
        let response = CompletionResponse::from_json(body).unwrap();
        assert_eq!(response.first_content(), Some("Hi!"));
        assert!(response.error.is_none());
    }

    #[test]
    fn decodes_error_response() {
        let body = r#"{"error":{"message":"No auth credentials found","code":401}}"#;
        let response = CompletionResponse::from_json(body).unwrap();
        assert!(response.choices.is_empty());
        assert_eq!(
            response.error.and_then(|e| e.message).as_deref(),
            Some("No auth credentials found")
        );
    }

    #[test]
    fn empty_content_is_not_content() {
        let response = CompletionResponse::with_content("");
        assert_eq!(response.first_content(), None);

        let response = CompletionResponse::from_json(r#"{"choices":[{"message":null}]}"#).unwrap();
        assert_eq!(response.first_content(), None);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = CompletionResponse::from_json("<html>502</html>").unwrap_err();
        assert!(matches!(err, crate::DmAssistError::Decode(_)));
    }
}
