//! Inline emphasis markup.
//!
//! `*text*` renders bold and `_text_` renders italic, with the delimiters
//! removed. Matching is non-greedy and left to right, never crosses a line
//! break, and leaves unpaired delimiters as literal characters. The italic
//! pass runs over the output of the bold pass.

use std::borrow::Cow;

use colored::{ColoredString, Colorize};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref BOLD_PATTERN: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref ITALIC_PATTERN: Regex = Regex::new(r"_(.*?)_").unwrap();
}

/// Replace emphasis markup with ANSI bold/italic styling.
///
/// An empty pair (`**`, `__`) is removed without emitting escape codes.
pub fn apply_emphasis(message: &str) -> String {
    let bold = BOLD_PATTERN.replace_all(message, |caps: &Captures| styled(&caps[1], |s| s.bold()));
    ITALIC_PATTERN
        .replace_all(&bold, |caps: &Captures| styled(&caps[1], |s| s.italic()))
        .into_owned()
}

fn styled(text: &str, style: impl Fn(&str) -> ColoredString) -> String {
    if text.is_empty() {
        String::new()
    } else {
        style(text).to_string()
    }
}

/// Remove emphasis delimiters without styling.
pub fn strip_emphasis(message: &str) -> Cow<'_, str> {
    let bold = BOLD_PATTERN.replace_all(message, "$1");
    let italic = match ITALIC_PATTERN.replace_all(&bold, "$1") {
        Cow::Owned(stripped) => Some(stripped),
        Cow::Borrowed(_) => None,
    };
    match italic {
        Some(stripped) => Cow::Owned(stripped),
        None => bold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn force_color() {
        colored::control::set_override(true);
    }

    #[test]
    fn test_bold_and_italic() {
        force_color();
        let rendered = apply_emphasis("Build *done* in _2s_");
        let expected = format!("Build {} in {}", "done".bold(), "2s".italic());
        assert_eq!(rendered, expected);
        assert!(rendered.contains("\u{1b}[1mdone"));
        assert!(rendered.contains("\u{1b}[3m2s"));
    }

    #[test]
    fn test_non_greedy_left_to_right() {
        force_color();
        let rendered = apply_emphasis("*a* and *b*");
        assert_eq!(rendered, format!("{} and {}", "a".bold(), "b".bold()));
    }

    #[test]
    fn test_unpaired_delimiters_stay_literal() {
        assert_eq!(apply_emphasis("5 * 3 = 15"), "5 * 3 = 15");
        assert_eq!(apply_emphasis("snake_case"), "snake_case");
    }

    #[test]
    fn test_empty_pairs_emit_no_escape_codes() {
        force_color();
        assert_eq!(apply_emphasis("a**b"), "ab");
        assert_eq!(apply_emphasis("__"), "");
        assert!(!apply_emphasis("x ** y").contains('\u{1b}'));
    }

    #[test]
    fn test_markup_does_not_cross_lines() {
        assert_eq!(apply_emphasis("*open\nclose*"), "*open\nclose*");
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("Build *done* in _2s_"), "Build done in 2s");
        assert!(matches!(strip_emphasis("plain"), Cow::Borrowed("plain")));
        assert_eq!(strip_emphasis("**"), "");
    }

    proptest! {
        #[test]
        fn prop_text_without_delimiters_is_untouched(s in "[a-zA-Z0-9 .,:!?-]{0,64}") {
            prop_assert_eq!(apply_emphasis(&s), s.clone());
            prop_assert_eq!(strip_emphasis(&s).into_owned(), s);
        }

        #[test]
        fn prop_stripping_removes_paired_markers(word in "[a-z]{1,12}", prefix in "[a-z ]{0,12}") {
            let message = format!("{}*{}*", prefix, word);
            prop_assert_eq!(strip_emphasis(&message).into_owned(), format!("{}{}", prefix, word));
        }
    }
}
