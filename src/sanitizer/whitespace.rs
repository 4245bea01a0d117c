//! Whitespace minification of serialized markup.

use std::sync::LazyLock;

use regex::Regex;

static BETWEEN_TAGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r">\s+<").expect("BETWEEN_TAGS_RE: hardcoded regex is valid")
});

/// Conservative whitespace minifier.
///
/// Trims every line, removes whitespace that sits directly between a `>` and
/// the next `<`, and drops the lines left empty. Runs of spaces inside text
/// content are preserved verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceNormalizer;

impl WhitespaceNormalizer {
    pub fn normalize(&self, markup: &str) -> String {
        let trimmed = markup.lines().map(str::trim).collect::<Vec<_>>().join("\n");
        let tight = BETWEEN_TAGS_RE.replace_all(&trimmed, "><");
        tight
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
