//! Post-processing: deterministic whitespace polish of extracted text.
//!
//! ## Why is post-processing necessary?
//!
//! Raw text pulled out of PDF content streams is messy in mechanical,
//! predictable ways: Windows line endings, stray control characters from
//! odd encodings, runs of blank lines where the layout had vertical gaps,
//! and trailing spaces left by justified text. These passes fix exactly
//! that and nothing more — no reflowing, no heading detection, no attempt
//! to reconstruct structure from geometry.
//!
//! ## Rule Order
//!
//! Rules must run in this order: line endings are normalised before any
//! line-based pass, control characters are stripped before trailing-space
//! trimming (a stray `\x0c` would otherwise hide trailing spaces), and the
//! final-newline pass runs last.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all polish rules to raw extracted text.
///
/// Each pass is a pure function (`&str → String`) with no shared state,
/// making the pipeline easy to extend or re-order without side effects.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Strip control and invisible Unicode characters (form feeds,
///    zero-width spaces, BOM, soft hyphens)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 2+ consecutive blank lines down to 1
/// 5. Ensure the text ends with exactly one newline
pub fn polish_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = strip_control_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip control and invisible characters ───────────────────────────

fn strip_control_chars(input: &str) -> String {
    input
        .chars()
        .filter(|&c| {
            let invisible = matches!(
                c,
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
            );
            let control = c.is_control() && c != '\n' && c != '\t';
            !invisible && !control
        })
        .collect()
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Rule 5: Ensure text ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_becomes_lf() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn control_chars_are_stripped() {
        assert_eq!(strip_control_chars("a\u{0C}b\u{200B}c\u{FEFF}"), "abc");
        // Tabs and newlines survive.
        assert_eq!(strip_control_chars("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn soft_hyphen_is_stripped() {
        assert_eq!(strip_control_chars("hyphen\u{00AD}ated"), "hyphenated");
    }

    #[test]
    fn trailing_spaces_trimmed() {
        assert_eq!(trim_trailing_whitespace("a  \nb\t\nc"), "a\nb\nc");
    }

    #[test]
    fn blank_lines_collapse() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
        // A single blank line is left alone.
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn final_newline_enforced() {
        assert_eq!(ensure_final_newline("text"), "text\n");
        assert_eq!(ensure_final_newline("text\n\n\n"), "text\n");
        assert_eq!(ensure_final_newline(""), "\n");
    }

    #[test]
    fn polish_is_idempotent() {
        let raw = "Title\r\n\r\n\r\n\r\nBody line.   \r\nNext\u{200B} line.\u{0C}\r\n";
        let once = polish_text(raw);
        assert_eq!(polish_text(&once), once);
        assert_eq!(once, "Title\n\nBody line.\nNext line.\n");
    }
}
