//! MySword markup normalization
//!
//! Module rows embed a small, closed pseudo-HTML dialect rather than open
//! HTML. The recognized vocabulary:
//!
//! - title-bearing tags `h1`-`h6`, `title`, `b`, `s`, `h`: their contents
//!   form the section title and are removed from the body text
//! - the footnote tag `f`: tag and contents dropped from the body entirely
//! - any other tag: stripped, inner text kept
//! - entities `&nbsp;` and `&quot;`: decoded
//!
//! Malformed input degrades gracefully: an unclosed recognized tag is
//! treated like any other bare tag (stripped, text kept), and a lone `<`
//! that never forms a `<...>` pair stays in the output as a literal.

use regex_lite::Regex;
use std::sync::OnceLock;

/// Tags whose contents are a section title, not verse text.
const TITLE_TAGS: [&str; 10] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "title", "b", "s", "h",
];

/// Result of normalizing one raw markup string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Body text with all markup removed and whitespace collapsed.
    pub text: String,
    /// Section title assembled from title-bearing tags, in document order.
    pub title: Option<String>,
}

// The dialect's closing tags would need a backreference to match with one
// pattern, which regex-lite does not support, so each title tag gets its own.
fn title_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TITLE_TAGS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}>(.*?)</{tag}>"))
                    .expect("valid title tag pattern")
            })
            .collect()
    })
}

fn footnote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<f>.*?</f>").expect("valid footnote pattern"))
}

fn bare_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"))
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

fn wiki_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\[\[(.*?)\]\]").expect("valid wiki link pattern"))
}

/// Normalizes one raw markup string into body text plus optional title.
///
/// Title extraction and body production are independent passes over the same
/// input: a title-bearing span contributes to `title` and is excluded from
/// `text`. Never fails; unrecognized or malformed markup is handled
/// best-effort as documented on the module.
pub fn normalize(raw: &str) -> Normalized {
    Normalized {
        text: body_text(raw),
        title: extract_title(raw),
    }
}

/// Cleans raw annotation content (commentary / cross-reference rows).
///
/// Annotations carry `[[...]]` reference links on top of the common dialect;
/// those are unwrapped to their inner text before the body-text pass. Only
/// body text is produced, titles are not extracted for annotations.
pub fn clean_annotation(raw: &str) -> String {
    let unwrapped = wiki_link_pattern().replace_all(raw, "$1");
    body_text(&unwrapped)
}

fn extract_title(raw: &str) -> Option<String> {
    // Footnote spans are invisible to the title scan.
    let raw = footnote_pattern().replace_all(raw, "");
    // Occurrences from all title tags, reassembled in document order.
    let mut parts: Vec<(usize, String)> = Vec::new();
    for pattern in title_patterns() {
        for caps in pattern.captures_iter(&raw) {
            let whole = caps.get(0).expect("match has a whole capture");
            let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let clean = bare_tag_pattern().replace_all(inner, "").trim().to_string();
            parts.push((whole.start(), clean));
        }
    }
    if parts.is_empty() {
        return None;
    }
    parts.sort_by_key(|(start, _)| *start);
    Some(
        parts
            .into_iter()
            .map(|(_, part)| part)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn body_text(raw: &str) -> String {
    let mut text = raw.to_string();
    for pattern in title_patterns() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text = footnote_pattern().replace_all(&text, "").into_owned();
    text = bare_tag_pattern().replace_all(&text, "").into_owned();
    text = text.replace("&nbsp;", " ").replace("&quot;", "\"");
    whitespace_pattern()
        .replace_all(&text, " ")
        .trim()
        .to_string()
}
