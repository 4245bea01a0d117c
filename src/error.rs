//! Error types for the `dm_assist` crate.
//!
//! Sanitization itself never fails; every variant here comes from the flow
//! around it (locating the conversation, talking to the completion API).

/// All errors that can occur while producing a reply.
#[derive(Debug, thiserror::Error)]
pub enum DmAssistError {
    /// No locator produced a conversation container for the page.
    #[error("No conversation container found on the page")]
    RootNotFound,

    /// The located container sanitized down to nothing.
    #[error("Conversation container has no usable content")]
    EmptyConversation,

    /// The completion backend failed to deliver a response.
    #[error("Completion request failed: {0}")]
    Completion(Box<dyn std::error::Error + Send + Sync>),

    /// The completion API answered with an error body.
    #[error("Completion API error: {0}")]
    Api(String),

    /// The completion API answered without any reply text.
    #[error("Completion API returned an empty response")]
    EmptyResponse,

    /// A response body could not be decoded.
    #[error("Failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A configuration value is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

/// A type alias for `Result<T, DmAssistError>`.
pub type Result<T> = std::result::Result<T, DmAssistError>;
