//! Token locator - finds the `#shortcode` immediately before the caret
//!
//! Offsets are character offsets (not bytes) so they line up with the caret
//! positions reported by editable fields and with the text-node walker in
//! [`crate::caret`].

use regex::Regex;
use std::sync::LazyLock;

/// `#` followed by one or more ASCII word characters or hyphens, anchored at the end.
static TRAILING_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_-]+$").expect("Invalid regex"));

/// A shortcode found before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// The matched token including its leading `#`
    pub token: String,
    /// Character offset of the `#`
    pub start: usize,
    /// Character offset just past the last token character
    pub end: usize,
    /// Length of the whitespace run skipped between the token and the caret
    pub trailing_whitespace_len: usize,
}

impl TokenMatch {
    /// Length of the token in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Find the `#token` that ends right before `cursor` in `text`.
///
/// With `allow_trailing_whitespace`, a whitespace run ending at the caret is
/// skipped first (the user typed a space or newline after the token to trigger
/// expansion). The skipped length is reported so callers can keep it.
///
/// A cursor past the end of `text` is clamped to the end.
///
/// # Examples
///
/// ```
/// use prompt_hash::token::find_token_before_cursor;
///
/// let found = find_token_before_cursor("hello #sum ", 11, true).unwrap();
/// assert_eq!(found.token, "#sum");
/// assert_eq!((found.start, found.end), (6, 10));
/// assert_eq!(found.trailing_whitespace_len, 1);
/// ```
pub fn find_token_before_cursor(
    text: &str,
    cursor: usize,
    allow_trailing_whitespace: bool,
) -> Option<TokenMatch> {
    let before = prefix_chars(text, cursor);
    let cursor = before.chars().count();

    let mut trailing_whitespace_len = 0;
    let mut adjusted = before;
    if allow_trailing_whitespace {
        let trimmed = before.trim_end_matches(char::is_whitespace);
        trailing_whitespace_len = before[trimmed.len()..].chars().count();
        adjusted = trimmed;
    }

    let found = TRAILING_TOKEN.find(adjusted)?;
    let token = found.as_str().to_string();
    let end = cursor - trailing_whitespace_len;
    // Token characters are ASCII, so byte length equals character length.
    let start = end - token.len();

    Some(TokenMatch {
        token,
        start,
        end,
        trailing_whitespace_len,
    })
}

/// Slice of `text` covering its first `count` characters (all of it if shorter).
pub(crate) fn prefix_chars(text: &str, count: usize) -> &str {
    &text[..byte_offset(text, count)]
}

/// Byte index of the character at `char_offset`, clamped to `text.len()`.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_token_at_caret() {
        let found = find_token_before_cursor("hello #sum", 10, false).unwrap();
        assert_eq!(
            found,
            TokenMatch {
                token: "#sum".to_string(),
                start: 6,
                end: 10,
                trailing_whitespace_len: 0,
            }
        );
    }

    #[test]
    fn skips_trailing_space_when_allowed() {
        let found = find_token_before_cursor("hello #sum ", 11, true).unwrap();
        assert_eq!(found.token, "#sum");
        assert_eq!(found.start, 6);
        assert_eq!(found.end, 10);
        assert_eq!(found.trailing_whitespace_len, 1);
    }

    #[test]
    fn trailing_space_blocks_match_when_not_allowed() {
        assert!(find_token_before_cursor("hello #sum ", 11, false).is_none());
    }

    #[test]
    fn skips_newline_run() {
        let found = find_token_before_cursor("#plan\n \n", 8, true).unwrap();
        assert_eq!(found.token, "#plan");
        assert_eq!(found.trailing_whitespace_len, 3);
        assert_eq!(found.end, 5);
    }

    #[test]
    fn bare_hash_is_not_a_token() {
        assert!(find_token_before_cursor("price #", 7, false).is_none());
        assert!(find_token_before_cursor("# ", 2, true).is_none());
    }

    #[test]
    fn no_hash_returns_none() {
        assert!(find_token_before_cursor("just words", 10, false).is_none());
        assert!(find_token_before_cursor("", 0, true).is_none());
    }

    #[test]
    fn only_text_before_cursor_is_considered() {
        // Caret sits between "#su" and "m"
        let found = find_token_before_cursor("hello #sum", 9, false).unwrap();
        assert_eq!(found.token, "#su");
        assert_eq!(found.end, 9);
    }

    #[test]
    fn hyphen_and_underscore_are_token_characters() {
        let found = find_token_before_cursor("go #pre-mortem_v2", 17, false).unwrap();
        assert_eq!(found.token, "#pre-mortem_v2");
        assert_eq!(found.start, 3);
    }

    #[test]
    fn takes_the_last_hash_segment() {
        let found = find_token_before_cursor("#a#b", 4, false).unwrap();
        assert_eq!(found.token, "#b");
        assert_eq!(found.start, 2);

        let found = find_token_before_cursor("##ask", 5, false).unwrap();
        assert_eq!(found.token, "#ask");
        assert_eq!(found.start, 1);
    }

    #[test]
    fn word_glued_to_hash_still_matches() {
        // Only the `#...` suffix is the token; the preceding word is ignored.
        let found = find_token_before_cursor("issue#12", 8, false).unwrap();
        assert_eq!(found.token, "#12");
        assert_eq!(found.start, 5);
    }

    #[test]
    fn offsets_are_in_characters() {
        let text = "héllo wörld #ask";
        let found = find_token_before_cursor(text, 16, false).unwrap();
        assert_eq!(found.start, 12);
        assert_eq!(found.end, 16);
    }

    #[test]
    fn non_ascii_letters_end_the_token() {
        // `é` is not an ASCII word character, so the token starts after it.
        assert!(find_token_before_cursor("#café", 5, false).is_none());
    }

    #[test]
    fn cursor_past_end_is_clamped() {
        let found = find_token_before_cursor("ask #ask", 100, false).unwrap();
        assert_eq!(found.start, 4);
        assert_eq!(found.end, 8);
    }

    #[test]
    fn invariants_hold_for_every_match() {
        let samples = ["a #b", "#x-y ", "x #long_token\t", "#1"];
        for sample in samples {
            let cursor = sample.chars().count();
            if let Some(found) = find_token_before_cursor(sample, cursor, true) {
                assert!(found.end <= cursor);
                assert_eq!(found.len(), found.token.chars().count());
                assert!(found.token.starts_with('#'));
            }
        }
    }

    /// Every string over `alphabet` with at most `max_len` characters
    fn all_strings(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut out = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|prefix| {
                    alphabet.iter().map(move |c| {
                        let mut next = prefix.clone();
                        next.push(*c);
                        next
                    })
                })
                .collect();
            out.extend(frontier.iter().cloned());
        }
        out
    }

    #[test]
    fn matches_anchored_regex_for_every_short_string_and_cursor() {
        let oracle = Regex::new(r"#[A-Za-z0-9_-]+$").unwrap();
        let alphabet = ['#', 'a', '-', ' ', '\n', 'é'];
        let mut matched = 0;

        for text in all_strings(&alphabet, 5) {
            let len = text.chars().count();
            for cursor in 0..=len + 1 {
                for allow_ws in [false, true] {
                    let before = prefix_chars(&text, cursor);
                    let searched = if allow_ws {
                        before.trim_end_matches(char::is_whitespace)
                    } else {
                        before
                    };
                    let expected = oracle.find(searched);
                    let found = find_token_before_cursor(&text, cursor, allow_ws);

                    match (expected, found) {
                        (None, None) => {}
                        (Some(m), Some(found)) => {
                            matched += 1;
                            assert_eq!(found.token, m.as_str(), "{text:?} @ {cursor}");
                            assert_eq!(found.start, searched[..m.start()].chars().count());
                            assert_eq!(found.end, searched.chars().count());
                            assert_eq!(
                                found.trailing_whitespace_len,
                                before.chars().count() - found.end
                            );
                        }
                        (expected, found) => {
                            panic!("{text:?} @ {cursor} (ws {allow_ws}): {expected:?} vs {found:?}")
                        }
                    }
                }
            }
        }
        assert!(matched > 0);
    }

    #[test]
    fn byte_offset_clamps() {
        assert_eq!(byte_offset("añb", 2), 3);
        assert_eq!(byte_offset("añb", 10), 4);
        assert_eq!(prefix_chars("añb", 2), "añ");
    }
}
