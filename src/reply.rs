//! Post-processing of raw model output into a reply and optional translation.

use std::sync::LazyLock;

use regex::Regex;

use crate::prompt::TRANSLATION_SEPARATOR;

static THINK_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<think>[\s\S]*?</think>\s*").expect("THINK_BLOCK_RE: hardcoded regex is valid")
});

/// A generated reply, ready to show to the user or insert into the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedReply {
    pub reply: String,
    /// Present only when the model judged a translation necessary.
    pub translated_reply: Option<String>,
}

/// Split raw model output into reply and translation.
///
/// A leading `<think>...</think>` block emitted by reasoning models is
/// dropped. Text before the first [`TRANSLATION_SEPARATOR`] is the reply;
/// text up to the next separator (if any) is the translation.
pub fn parse_reply(raw: &str) -> GeneratedReply {
    let text = THINK_BLOCK_RE.replace(raw.trim(), "");
    if !text.contains(TRANSLATION_SEPARATOR) {
        return GeneratedReply {
            reply: text.into_owned(),
            translated_reply: None,
        };
    }

    let mut parts = text.split(TRANSLATION_SEPARATOR);
    let reply = parts.next().unwrap_or_default().trim().to_string();
    let translated_reply = parts.next().map(|t| t.trim().to_string());
    GeneratedReply {
        reply,
        translated_reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_reply() {
        let parsed = parse_reply("  Sure, see you Saturday!\n");
        assert_eq!(parsed.reply, "Sure, see you Saturday!");
        assert_eq!(parsed.translated_reply, None);
    }

    #[test]
    fn reply_with_translation() {
        let parsed = parse_reply("ありがとうございます！\n---TRANSLATION---\nThank you very much!");
        assert_eq!(parsed.reply, "ありがとうございます！");
        assert_eq!(parsed.translated_reply.as_deref(), Some("Thank you very much!"));
    }

    #[test]
    fn think_block_is_removed() {
        let raw = "<think>\nThe user wants a short answer.\n</think>\n\nSounds great.";
        assert_eq!(parse_reply(raw).reply, "Sounds great.");
    }

    #[test]
    fn only_leading_think_block_is_removed() {
        let raw = "Answer <think>kept</think>";
        assert_eq!(parse_reply(raw).reply, raw);
    }

    #[test]
    fn extra_separators_are_ignored() {
        let parsed = parse_reply("a ---TRANSLATION--- b ---TRANSLATION--- c");
        assert_eq!(parsed.reply, "a");
        assert_eq!(parsed.translated_reply.as_deref(), Some("b"));
    }
}
