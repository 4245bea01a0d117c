//! Strategies for finding the element that holds the visible conversation.
//!
//! - [`SelectorLocator`] -- first element matching a CSS selector.
//! - [`AncestorLocator`] -- nearest scrollable ancestor of the reply box.
//! - [`SiteLocator`] -- per-site rules with a generic fallback.

use scraper::{ElementRef, Html, Selector};

/// Ancestors examined by [`AncestorLocator`], the start element included.
pub const MAX_ANCESTOR_DEPTH: usize = 15;

/// Elements treated as the reply box the user is typing into.
pub const DEFAULT_INPUT_SELECTOR: &str = "textarea, [contenteditable]";

/// Finds the conversation container in a parsed page.
///
/// Implementations must be `Send + Sync` so an assistant can be shared.
pub trait RootLocator: Send + Sync {
    /// Return the container element, or `None` if this strategy finds nothing.
    fn locate<'a>(&self, document: &'a Html, host: &str) -> Option<ElementRef<'a>>;
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(_) => {
            tracing::warn!("Invalid CSS selector: {selector}");
            None
        }
    }
}

/// Locator returning the first element that matches a CSS selector.
///
/// An invalid selector is logged and never matches.
#[derive(Clone, Debug)]
pub struct SelectorLocator {
    selector: String,
}

impl SelectorLocator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl RootLocator for SelectorLocator {
    fn locate<'a>(&self, document: &'a Html, _host: &str) -> Option<ElementRef<'a>> {
        let selector = parse_selector(&self.selector)?;
        document.select(&selector).next()
    }
}

/// Generic locator: starting at the reply box, walk up the ancestors and
/// return the first one whose inline style makes it a vertical scroll
/// container (`overflow-y` or `overflow` set to `auto` or `scroll`).
#[derive(Clone, Debug)]
pub struct AncestorLocator {
    input_selector: String,
    max_depth: usize,
}

impl AncestorLocator {
    /// Start from the first element matching `input_selector`.
    pub fn new(input_selector: impl Into<String>) -> Self {
        Self {
            input_selector: input_selector.into(),
            max_depth: MAX_ANCESTOR_DEPTH,
        }
    }

    /// Number of elements examined, the start element included.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for AncestorLocator {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SELECTOR)
    }
}

impl RootLocator for AncestorLocator {
    fn locate<'a>(&self, document: &'a Html, _host: &str) -> Option<ElementRef<'a>> {
        let selector = parse_selector(&self.input_selector)?;
        let start = document.select(&selector).next()?;

        std::iter::once(start)
            .chain(start.ancestors().filter_map(ElementRef::wrap))
            .take(self.max_depth)
            .find(|element| scrolls_vertically(element.value().attr("style").unwrap_or("")))
    }
}

/// Inspect an inline `style` declaration list for vertical scrolling.
fn scrolls_vertically(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let Some((property, value)) = declaration.split_once(':') else {
            return false;
        };
        let value = value.trim().to_ascii_lowercase();
        // `overflow` takes `<x> <y>`; a single value applies to both axes.
        let vertical = match property.trim().to_ascii_lowercase().as_str() {
            "overflow-y" => value.split_whitespace().next(),
            "overflow" => value.split_whitespace().last(),
            _ => None,
        };
        matches!(vertical, Some("auto" | "scroll"))
    })
}

struct SiteRule {
    hosts: Vec<String>,
    locator: Box<dyn RootLocator>,
}

impl SiteRule {
    fn matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.hosts.iter().any(|site| {
            host == *site
                || host
                    .strip_suffix(site.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Locator that dispatches on the page's host name.
///
/// Rules whose host matches (exactly or as a parent domain) are tried in the
/// order they were added; if none finds a container, the fallback runs.
///
/// # Example
///
/// ```
/// use dm_assist::{RootLocator, SelectorLocator, SiteLocator};
/// use scraper::Html;
///
/// let locator = SiteLocator::new()
///     .site(&["chat.example.com"], SelectorLocator::new("#thread"));
/// let page = Html::parse_document(r#"<div id="thread"><p>hi</p></div>"#);
/// assert!(locator.locate(&page, "chat.example.com").is_some());
/// assert!(locator.locate(&page, "example.org").is_none());
/// ```
pub struct SiteLocator {
    rules: Vec<SiteRule>,
    fallback: Option<Box<dyn RootLocator>>,
}

impl SiteLocator {
    /// An empty locator with no rules and no fallback.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: None,
        }
    }

    /// Add a rule for the given host names.
    pub fn site(mut self, hosts: &[&str], locator: impl RootLocator + 'static) -> Self {
        self.rules.push(SiteRule {
            hosts: hosts.iter().map(|h| h.to_ascii_lowercase()).collect(),
            locator: Box::new(locator),
        });
        self
    }

    /// Locator used when no site rule produces a container.
    pub fn fallback(mut self, locator: impl RootLocator + 'static) -> Self {
        self.fallback = Some(Box::new(locator));
        self
    }

    /// Built-in rules: the X/Twitter DM pane, then [`AncestorLocator::default`].
    pub fn with_builtin_sites() -> Self {
        Self::new()
            .site(
                &["twitter.com", "x.com"],
                SelectorLocator::new(r#"[data-testid="conversation"]"#),
            )
            .fallback(AncestorLocator::default())
    }
}

impl Default for SiteLocator {
    fn default() -> Self {
        Self::with_builtin_sites()
    }
}

impl RootLocator for SiteLocator {
    fn locate<'a>(&self, document: &'a Html, host: &str) -> Option<ElementRef<'a>> {
        let site_match = self
            .rules
            .iter()
            .filter(|rule| rule.matches(host))
            .find_map(|rule| rule.locator.locate(document, host));
        if site_match.is_some() {
            return site_match;
        }

        tracing::debug!("No site rule located a container for {host}, using fallback");
        self.fallback
            .as_ref()
            .and_then(|fallback| fallback.locate(document, host))
    }
}
