//! Builder for configuring a [`ReplyAssistant`], and the settings it carries.

use std::str::FromStr;

use crate::assistant::ReplyAssistant;
use crate::completion::CompletionBackend;
use crate::error::DmAssistError;
use crate::locator::{RootLocator, SiteLocator};
use crate::sanitizer::Sanitizer;

/// Model requested when none is configured.
pub const DEFAULT_MODEL: &str = "google/gemini-pro";

/// Language the user reads replies in.
///
/// When it is not [`Auto`](Self::Auto), the model is asked to append a
/// translation whenever its reply is written in another language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayLanguage {
    #[default]
    Auto,
    Japanese,
    English,
    Chinese,
}

impl DisplayLanguage {
    /// English name of the language, or `None` for [`Auto`](Self::Auto).
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Japanese => Some("Japanese"),
            Self::English => Some("English"),
            Self::Chinese => Some("Chinese"),
        }
    }
}

impl FromStr for DisplayLanguage {
    type Err = DmAssistError;

    /// Parse a language code: `auto`, `ja`, `en` or `zh`.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "ja" => Ok(Self::Japanese),
            "en" => Ok(Self::English),
            "zh" => Ok(Self::Chinese),
            other => Err(DmAssistError::Config(format!(
                "unknown display language code: {other}"
            ))),
        }
    }
}

/// Builder for configuring a [`ReplyAssistant`].
///
/// # Example
///
/// ```rust,no_run
/// use dm_assist::{
///     AssistantBuilder, CompletionBackend, CompletionRequest, CompletionResponse,
///     DisplayLanguage, Result, SelectorLocator,
/// };
///
/// # struct MyBackend;
/// # impl CompletionBackend for MyBackend {
/// #     async fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse> {
/// #         Ok(CompletionResponse::default())
/// #     }
/// # }
/// let assistant = AssistantBuilder::new(MyBackend)
///     .model("openai/gpt-4o-mini")
///     .display_language(DisplayLanguage::English)
///     .locator(SelectorLocator::new("main .thread"))
///     .build();
/// ```
pub struct AssistantBuilder<B: CompletionBackend> {
    backend: B,
    sanitizer: Sanitizer,
    locator: Box<dyn RootLocator>,
    model: String,
    display_language: DisplayLanguage,
}

impl<B: CompletionBackend> AssistantBuilder<B> {
    /// Create a builder around `backend`.
    ///
    /// Defaults: [`DEFAULT_MODEL`], [`DisplayLanguage::Auto`], the standard
    /// [`Sanitizer`] and [`SiteLocator::default`].
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sanitizer: Sanitizer::new(),
            locator: Box::new(SiteLocator::default()),
            model: DEFAULT_MODEL.to_string(),
            display_language: DisplayLanguage::Auto,
        }
    }

    /// Model identifier sent with every request.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn display_language(mut self, language: DisplayLanguage) -> Self {
        self.display_language = language;
        self
    }

    /// Strategy used to find the conversation container on a page.
    pub fn locator(mut self, locator: impl RootLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn build(self) -> ReplyAssistant<B> {
        ReplyAssistant::new(
            self.backend,
            self.sanitizer,
            self.locator,
            self.model,
            self.display_language,
        )
    }
}
