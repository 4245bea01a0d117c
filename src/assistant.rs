//! The reply assistant: locate, sanitize, prompt, complete, parse.

use scraper::{ElementRef, Html};

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::config::DisplayLanguage;
use crate::error::{DmAssistError, Result};
use crate::locator::RootLocator;
use crate::prompt::{ReplyRequest, build_messages};
use crate::reply::{GeneratedReply, parse_reply};
use crate::sanitizer::{CleanedMarkup, Sanitizer};

/// Assistant returned by [`AssistantBuilder::build`](crate::AssistantBuilder::build).
///
/// Holds every setting a reply needs, so nothing is kept in global state
/// between calls. Extracting markup is synchronous; [`generate`](Self::generate)
/// awaits the completion backend.
pub struct ReplyAssistant<B: CompletionBackend> {
    backend: B,
    sanitizer: Sanitizer,
    locator: Box<dyn RootLocator>,
    model: String,
    display_language: DisplayLanguage,
}

impl<B: CompletionBackend> ReplyAssistant<B> {
    pub(crate) fn new(
        backend: B,
        sanitizer: Sanitizer,
        locator: Box<dyn RootLocator>,
        model: String,
        display_language: DisplayLanguage,
    ) -> Self {
        Self {
            backend,
            sanitizer,
            locator,
            model,
            display_language,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn display_language(&self) -> DisplayLanguage {
        self.display_language
    }

    /// Find the conversation on `document` and return its cleaned markup.
    ///
    /// Returns [`DmAssistError::RootNotFound`] when the locator finds no
    /// container and [`DmAssistError::EmptyConversation`] when the container
    /// sanitizes to nothing.
    pub fn conversation_markup(&self, document: &Html, host: &str) -> Result<CleanedMarkup> {
        let root = self
            .locator
            .locate(document, host)
            .ok_or(DmAssistError::RootNotFound)?;
        self.non_empty(self.sanitizer.sanitize(root))
    }

    /// Clean the markup of an element the user picked by hand.
    pub fn selection_markup(&self, element: ElementRef<'_>) -> Result<CleanedMarkup> {
        self.non_empty(self.sanitizer.sanitize(element))
    }

    fn non_empty(&self, markup: CleanedMarkup) -> Result<CleanedMarkup> {
        if markup.is_empty() {
            return Err(DmAssistError::EmptyConversation);
        }
        Ok(markup)
    }

    /// The request body that [`generate`](Self::generate) would send.
    pub fn build_request(&self, markup: &CleanedMarkup, request: &ReplyRequest) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: build_messages(markup, request, self.display_language),
        }
    }

    /// Ask the backend for a reply to the conversation in `markup`.
    pub async fn generate(
        &self,
        markup: &CleanedMarkup,
        request: &ReplyRequest,
    ) -> Result<GeneratedReply> {
        let completion = self.build_request(markup, request);
        tracing::info!(
            "Sending completion request (model: {}, {} bytes of markup)",
            completion.model,
            markup.as_str().len()
        );

        let response = self.backend.complete(&completion).await?;
        if let Some(error) = &response.error {
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(DmAssistError::Api(message));
        }

        let content = response.first_content().ok_or(DmAssistError::EmptyResponse)?;
        let reply = parse_reply(content);
        if reply.reply.is_empty() {
            return Err(DmAssistError::EmptyResponse);
        }

        tracing::debug!(
            "Received reply of {} bytes (translated: {})",
            reply.reply.len(),
            reply.translated_reply.is_some()
        );
        Ok(reply)
    }

    /// Locate, clean and answer the conversation on `document` in one call.
    pub async fn reply_to_page(
        &self,
        document: &Html,
        host: &str,
        request: &ReplyRequest,
    ) -> Result<GeneratedReply> {
        let markup = self.conversation_markup(document, host)?;
        self.generate(&markup, request).await
    }
}
