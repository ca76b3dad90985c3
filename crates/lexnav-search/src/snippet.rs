//! Safe highlighting and excerpting of matched text.
//!
//! Output is HTML. Text is always escaped before the `<mark>` element is
//! inserted, and the mark is placed around a located byte range rather than
//! by substituting into markup, so query text can never produce elements of
//! its own.

use std::ops::Range;

/// Content up to this many characters is shown whole.
pub const EXCERPT_CHARS: usize = 300;
/// Characters of context kept before a match in a windowed excerpt.
pub const LEAD_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Escape text for use in element content or a quoted attribute.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Lowercase one character without context. Final sigma folds to `σ` so a
/// word matches whatever its position.
fn fold_char(ch: char) -> impl Iterator<Item = char> {
    ch.to_lowercase().map(|c| if c == 'ς' { 'σ' } else { c })
}

/// Case-fold `text` the same way [`find_ci`] compares characters.
///
/// The index and the query engine fold with this too, so every hit the
/// engine returns can be located again by the highlighter.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`.
///
/// Comparison is on [`fold_case`]d characters, and the returned range always
/// lies on char boundaries of the original `haystack`.
pub fn find_ci(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let needle: Vec<char> = needle.chars().flat_map(fold_char).collect();
    if needle.is_empty() {
        return None;
    }

    'start: for (start, _) in haystack.char_indices() {
        let mut pending = needle.iter().peekable();
        for (offset, ch) in haystack[start..].char_indices() {
            for lower in fold_char(ch) {
                match pending.next() {
                    Some(&want) if want == lower => {}
                    _ => continue 'start,
                }
            }
            if pending.peek().is_none() {
                return Some(start..start + offset + ch.len_utf8());
            }
        }
    }
    None
}

/// Escape `text` and wrap the first occurrence of `query` in `<mark>`.
pub fn highlight(text: &str, query: &str) -> String {
    let query = query.trim();
    match find_ci(text, query) {
        Some(range) => {
            let mut out = escape_html(&text[..range.start]);
            out.push_str(MARK_OPEN);
            out.push_str(&escape_html(&text[range.clone()]));
            out.push_str(MARK_CLOSE);
            out.push_str(&escape_html(&text[range.end..]));
            out
        }
        None => escape_html(text),
    }
}

/// A window of section content, with flags for truncated ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excerpt<'a> {
    pub leading_ellipsis: bool,
    pub body: &'a str,
    pub trailing_ellipsis: bool,
}

impl Excerpt<'_> {
    /// Plain text with `...` on truncated ends.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.leading_ellipsis {
            out.push_str(ELLIPSIS);
        }
        out.push_str(self.body);
        if self.trailing_ellipsis {
            out.push_str(ELLIPSIS);
        }
        out
    }

    /// Escaped HTML with the first match marked. Ellipses sit outside the
    /// highlighted body so a query of dots cannot mark them.
    pub fn to_html(&self, query: &str) -> String {
        let mut out = String::new();
        if self.leading_ellipsis {
            out.push_str(ELLIPSIS);
        }
        out.push_str(&highlight(self.body, query));
        if self.trailing_ellipsis {
            out.push_str(ELLIPSIS);
        }
        out
    }
}

/// Pick the part of `content` to show for `query`.
///
/// Content of at most [`EXCERPT_CHARS`] characters is returned whole. Longer
/// content whose first match starts beyond [`LEAD_CHARS`] gets a window of
/// [`EXCERPT_CHARS`] characters beginning [`LEAD_CHARS`] before the match,
/// pulled back from the end of the text when it would run past it. Anything
/// else shows the leading [`EXCERPT_CHARS`] characters.
pub fn excerpt<'a>(content: &'a str, query: &str) -> Excerpt<'a> {
    let total = content.chars().count();
    if total <= EXCERPT_CHARS {
        return Excerpt {
            leading_ellipsis: false,
            body: content,
            trailing_ellipsis: false,
        };
    }

    let match_at = find_ci(content, query.trim()).map(|r| content[..r.start].chars().count());
    match match_at {
        Some(at) if at > LEAD_CHARS => {
            let start = (at - LEAD_CHARS).min(total - EXCERPT_CHARS);
            let end = start + EXCERPT_CHARS;
            Excerpt {
                leading_ellipsis: start > 0,
                body: slice_chars(content, start, end),
                trailing_ellipsis: end < total,
            }
        }
        _ => Excerpt {
            leading_ellipsis: false,
            body: slice_chars(content, 0, EXCERPT_CHARS),
            trailing_ellipsis: true,
        },
    }
}

/// Substring by character positions `[start, end)`.
fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    &s[byte_at(start)..byte_at(end)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn find_ci_ignores_case_and_returns_original_bytes() {
        let text = "Whoever commits THEFT";
        let r = find_ci(text, "theft").unwrap();
        assert_eq!(&text[r], "THEFT");
        assert!(find_ci(text, "robbery").is_none());
        assert!(find_ci(text, "").is_none());
    }

    #[test]
    fn find_ci_respects_multibyte_boundaries() {
        let text = "धारा 302: हत्या के लिए दंड";
        let r = find_ci(text, "हत्या").unwrap();
        assert_eq!(&text[r], "हत्या");
        let r = find_ci("ÉCOLE", "école").unwrap();
        assert_eq!(r, 0.."ÉCOLE".len());
    }

    #[test]
    fn final_sigma_folds_like_medial_sigma() {
        assert_eq!(fold_case("ΝΟΜΟΣ"), "νομοσ");
        assert_eq!(fold_case("νομος"), "νομοσ");
        let text = "τέλος ΝΟΜΟΣ";
        let r = find_ci(text, "νομος").unwrap();
        assert_eq!(&text[r], "ΝΟΜΟΣ");
        assert_eq!(highlight("ΝΟΜΟΣ", "νομος"), "<mark>ΝΟΜΟΣ</mark>");
    }

    #[test]
    fn highlight_marks_first_occurrence_only() {
        assert_eq!(
            highlight("Theft and theft", "THEFT"),
            "<mark>Theft</mark> and theft"
        );
    }

    #[test]
    fn highlight_without_match_is_just_escaped() {
        assert_eq!(highlight("a < b", "zzz"), "a &lt; b");
        assert_eq!(highlight("a < b", "   "), "a &lt; b");
    }

    #[test]
    fn markup_in_query_is_escaped_before_marking() {
        let out = highlight("if a <b> then", "<b>");
        assert_eq!(out, "if a <mark>&lt;b&gt;</mark> then");

        let out = highlight("plain text", "<script>");
        assert_eq!(out, "plain text");
    }

    #[test]
    fn query_cannot_target_escape_entities() {
        // "amp" appears in the escaped form of "&" but not in the raw text.
        let out = highlight("Tom & Jerry", "amp");
        assert_eq!(out, "Tom &amp; Jerry");
        let out = highlight("x < y", "lt;");
        assert_eq!(out, "x &lt; y");
    }

    #[test]
    fn short_content_is_whole() {
        let e = excerpt("Whoever commits theft.", "theft");
        assert_eq!(e.to_text(), "Whoever commits theft.");
    }

    #[test]
    fn late_match_gets_window_with_leading_ellipsis() {
        let mut content = "a".repeat(400);
        content.push_str("THEFT");
        content.push_str(&"b".repeat(95));
        assert_eq!(content.chars().count(), 500);

        let e = excerpt(&content, "theft");
        assert!(e.leading_ellipsis);
        assert!(!e.trailing_ellipsis);
        assert_eq!(e.body.chars().count(), EXCERPT_CHARS);
        assert!(e.body.contains("THEFT"));

        let html = e.to_html("theft");
        assert!(html.starts_with(ELLIPSIS));
        assert!(html.contains("<mark>THEFT</mark>"));
    }

    #[test]
    fn middle_match_is_truncated_on_both_ends() {
        let mut content = "a".repeat(200);
        content.push_str("theft");
        content.push_str(&"b".repeat(795));
        let e = excerpt(&content, "theft");
        assert!(e.leading_ellipsis);
        assert!(e.trailing_ellipsis);
        assert!(e.body.starts_with(&"a".repeat(LEAD_CHARS)));
        assert_eq!(&e.body[LEAD_CHARS..LEAD_CHARS + 5], "theft");
        assert_eq!(e.body.chars().count(), EXCERPT_CHARS);
    }

    #[test]
    fn early_or_missing_match_falls_back_to_prefix() {
        let mut early = "theft ".to_string();
        early.push_str(&"x".repeat(400));
        let e = excerpt(&early, "theft");
        assert!(!e.leading_ellipsis);
        assert!(e.trailing_ellipsis);
        assert_eq!(e.body.chars().count(), EXCERPT_CHARS);

        let missing = "y".repeat(400);
        let e = excerpt(&missing, "theft");
        assert_eq!(e.to_text(), format!("{}...", "y".repeat(EXCERPT_CHARS)));
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let mut content = "स".repeat(350);
        content.push_str("दंड");
        content.push_str(&"स".repeat(100));
        let e = excerpt(&content, "दंड");
        assert!(e.leading_ellipsis);
        assert_eq!(e.body.chars().count(), EXCERPT_CHARS);
        assert!(e.body.contains("दंड"));
    }

    #[test]
    fn ellipses_are_never_highlighted() {
        let content = "z".repeat(400);
        let e = excerpt(&content, "...");
        assert_eq!(e.to_html("..."), format!("{}...", "z".repeat(EXCERPT_CHARS)));
    }
}
