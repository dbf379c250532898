//! Snippet sanitization for display.
//!
//! Corpus chunks carry wiki-style markup and irregular whitespace; this
//! module turns raw chunk text into a bounded, display-ready excerpt.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default character budget for a snippet.
pub const DEFAULT_SNIPPET_CHARS: usize = 450;

/// Wiki-style section headings: `== Title ==`, `=== Sub ===`, etc.
#[allow(clippy::expect_used)]
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"={1,4}[^=\n]+={1,4}").expect("valid heading pattern"));

#[allow(clippy::expect_used)]
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Clean raw chunk text into a snippet of at most `max_chars` characters.
///
/// Section headings are deleted wherever they appear, whitespace runs
/// collapse to a single space, and over-long text is truncated at the last
/// sentence boundary inside the budget. The boundary is only honored when
/// it falls past `max_chars / 2`; an earlier period would leave a
/// uselessly short snippet, so a mid-sentence cut is preferred there.
///
/// Pure and deterministic; a second pass over its own output is a no-op.
pub fn clean_snippet(raw: &str, max_chars: usize) -> String {
    let stripped = HEADING.replace_all(raw, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let text = collapsed.trim();

    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(". ") {
        // Keep the period, drop the trailing space.
        Some(pos) if pos > max_chars / 2 => truncated[..=pos].to_string(),
        _ => truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_wiki_headings() {
        let raw = "== Signs and symptoms == Fever is common. === Causes === Many.";
        assert_eq!(
            clean_snippet(raw, DEFAULT_SNIPPET_CHARS),
            "Fever is common. Many."
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        let raw = "one\t two\n\nthree   four ";
        assert_eq!(clean_snippet(raw, DEFAULT_SNIPPET_CHARS), "one two three four");
    }

    #[test]
    fn test_short_text_returned_as_is() {
        assert_eq!(clean_snippet("Short text.", 450), "Short text.");
    }

    #[test]
    fn test_truncates_at_late_sentence_boundary() {
        // ". " lands at index 430: past the midpoint, so the cut keeps the
        // period and the result is 431 characters.
        let mut text = "a".repeat(430);
        text.push_str(". ");
        text.push_str(&"b".repeat(600));

        let snippet = clean_snippet(&text, 450);
        assert_eq!(snippet.len(), 431);
        assert!(snippet.ends_with('.'));
    }

    #[test]
    fn test_early_boundary_falls_back_to_raw_prefix() {
        // ". " at index 100 is before the midpoint (225); the raw 450-char
        // prefix wins over a too-short sentence cut.
        let mut text = "a".repeat(100);
        text.push_str(". ");
        text.push_str(&"b".repeat(600));

        let snippet = clean_snippet(&text, 450);
        assert_eq!(snippet.chars().count(), 450);
        assert!(!snippet.ends_with('.'));
    }

    #[test]
    fn test_truncation_keeps_last_full_sentence() {
        // 47 nine-char sentences ("aaaaaaa. ") then a 200-char run: the
        // last ". " inside the 450-char prefix sits at index 421, past the
        // midpoint, so the cut lands right after that period.
        let mut text = "aaaaaaa. ".repeat(47);
        text.push_str(&"a".repeat(200));

        let snippet = clean_snippet(&text, 450);
        assert!(snippet.ends_with('.'));
        assert_eq!(snippet.len(), 47 * 9 - 1);
    }

    #[test]
    fn test_idempotent() {
        let raw = "== Heading == Some   text with\nnewlines. More text follows here.";
        let once = clean_snippet(raw, 40);
        let twice = clean_snippet(&once, 40);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let raw = "é".repeat(900);
        let snippet = clean_snippet(&raw, 450);
        assert_eq!(snippet.chars().count(), 450);
    }
}
