// src/utils/text.rs

//! Markup sanitization.
//!
//! Strips HTML tags and Jira wiki markup from issue text, producing
//! plain text with collapsed whitespace. Pure, no I/O.

use std::sync::OnceLock;

use regex::Regex;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn code_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{code[^}]*\}.*?\{code\}").unwrap())
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Runs of hN. markers at line start or after whitespace.
    RE.get_or_init(|| Regex::new(r"(?m)(^|\s)(?:h\d\.\s*)+").unwrap())
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*(.*?)\*").unwrap())
}

fn italic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_(.*?)_").unwrap())
}

/// Strip HTML and wiki markup from text, returning plain text.
///
/// Removes tags, `{code}` blocks including their contents, and heading
/// markers; unwraps `*bold*` and `_italic_`; collapses whitespace runs
/// to single spaces and trims the ends. Empty input yields `""`.
pub fn sanitize(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }

    let text = tag_re().replace_all(markup, "");
    let text = code_block_re().replace_all(&text, "");
    let text = heading_re().replace_all(&text, "$1");
    let text = bold_re().replace_all(&text, "$1");
    let text = italic_re().replace_all(&text, "$1");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
