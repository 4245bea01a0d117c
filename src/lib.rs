//! # dm_assist
//!
//! Drafts replies to direct messages from the markup of a messaging page.
//!
//! ## Overview
//!
//! The heart of the crate is the [`Sanitizer`], which turns an untrusted,
//! deeply nested DOM subtree into compact markup that is cheap to send to a
//! language model and keeps page scripts and styling out of the prompt. It
//! copies the subtree and then strips disallowed tags, filters attributes
//! against an allowlist, collapses redundant wrapper `div`s and minifies
//! whitespace.
//!
//! Around it sit the pieces of the reply flow:
//!
//! - a [`RootLocator`] finds the conversation container on the page;
//! - [`build_messages`] turns the cleaned markup and the user's
//!   [`ReplyRequest`] into chat messages;
//! - a [`CompletionBackend`] you provide talks to the completion API;
//! - [`parse_reply`] splits the answer into reply and translation.
//!
//! [`ReplyAssistant`] wires them together.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use dm_assist::{
//!     AssistantBuilder, CompletionBackend, CompletionRequest, CompletionResponse,
//!     ReplyRequest, Result,
//! };
//! use scraper::Html;
//!
//! struct Echo;
//!
//! impl CompletionBackend for Echo {
//!     async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
//!         Ok(CompletionResponse::with_content("See you then!"))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let assistant = AssistantBuilder::new(Echo).build();
//! let page = Html::parse_document(
//!     r#"<div data-testid="conversation"><p>Lunch tomorrow?</p></div>"#,
//! );
//! let reply = assistant
//!     .reply_to_page(&page, "x.com", &ReplyRequest::new("friendly", "them"))
//!     .await?;
//! println!("{}", reply.reply);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod completion;
pub mod config;
pub mod error;
pub mod locator;
pub mod markup;
pub mod prompt;
pub mod reply;
pub mod sanitizer;

pub use assistant::ReplyAssistant;
pub use completion::{
    ApiErrorBody, ChatMessage, Choice, ChoiceMessage, CompletionBackend, CompletionRequest,
    CompletionResponse, Role,
};
pub use config::{AssistantBuilder, DEFAULT_MODEL, DisplayLanguage};
pub use error::{DmAssistError, Result};
pub use locator::{AncestorLocator, RootLocator, SelectorLocator, SiteLocator};
pub use markup::{ElementNode, MarkupNode, MarkupTree};
pub use prompt::{ReplyRequest, TRANSLATION_SEPARATOR, build_messages};
pub use reply::{GeneratedReply, parse_reply};
pub use sanitizer::{
    ALLOWED_ATTRIBUTES, AttributeAllowlistFilter, CleanedMarkup, MAX_COLLAPSE_PASSES,
    REMOVABLE_TAGS, Sanitizer, StructuralCollapser, TagStripper, TreePass, WhitespaceNormalizer,
};
