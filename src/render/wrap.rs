//! 80-column text re-flow for comment content.
//!
//! Free text from the XML is semi-structured: authors break lines wherever
//! the editor wraps, and separate paragraphs with blank lines. Only the
//! blank lines are meaningful. Everything inside a paragraph is re-flowed
//! into greedily packed lines, measured against the fully decorated line
//! (indent and comment prefix included) so nothing lands past column 80.

use regex::Regex;
use std::sync::LazyLock;

/// Longest allowed decorated line.
pub const MAX_LINE_WIDTH: usize = 80;

/// A line break followed by another line break, with nothing but whitespace
/// between, separates paragraphs. A single break is just editor wrapping.
static RE_PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]\s*[\r\n]").unwrap());

/// Re-flow `input` into decorated lines of at most [`MAX_LINE_WIDTH`]
/// characters.
///
/// `decorate` turns bare content into a full output line (indent + comment
/// prefix + content); it is called with an empty string to produce the blank
/// separator line emitted between paragraphs. Trailing whitespace is
/// stripped from every returned line.
///
/// A single word too wide to fit any decorated line is emitted intact on its
/// own overlength line — words are never broken.
pub fn wrap(input: &str, decorate: impl Fn(&str) -> String) -> Vec<String> {
    let paragraphs: Vec<String> = RE_PARAGRAPH_BREAK
        .split(input.trim())
        .map(reflow)
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    let mut lines = Vec::new();
    for (index, paragraph) in paragraphs.iter().enumerate() {
        if index > 0 {
            lines.push(decorate("").trim_end().to_string());
        }
        wrap_paragraph(paragraph, &decorate, &mut lines);
    }

    lines
}

/// Collapse internal line breaks and runs of whitespace to single spaces.
fn reflow(paragraph: &str) -> String {
    paragraph.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn wrap_paragraph(paragraph: &str, decorate: &impl Fn(&str) -> String, lines: &mut Vec<String>) {
    let mut current = String::new();

    for word in paragraph.split(' ') {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if width(&decorate(&candidate)) <= MAX_LINE_WIDTH {
            current = candidate;
        } else {
            lines.push(decorate(&current).trim_end().to_string());
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(decorate(&current).trim_end().to_string());
    }
}

fn width(line: &str) -> usize {
    line.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decoration used by block docblocks at indent level 1.
    fn decorate(content: &str) -> String {
        if content.is_empty() {
            "     *".to_string()
        } else {
            format!("     * {}", content)
        }
    }

    const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
        sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim \
        ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip \
        ex ea commodo consequat.";

    #[test]
    fn all_lines_fit_within_the_limit() {
        for line in wrap(LOREM, decorate) {
            assert!(line.chars().count() <= MAX_LINE_WIDTH, "too long: {:?}", line);
        }
    }

    #[test]
    fn wrapping_is_idempotent() {
        let once = wrap(LOREM, |c| c.to_string());
        let again = wrap(&once.join("\n"), |c| c.to_string());
        assert_eq!(once, again);
    }

    #[test]
    fn hard_breaks_inside_a_paragraph_are_reflowed() {
        let lines = wrap("one\ntwo\nthree", decorate);
        assert_eq!(lines, vec!["     * one two three"]);
    }

    #[test]
    fn one_separator_line_between_paragraphs() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let lines = wrap(text, decorate);
        assert_eq!(
            lines,
            vec![
                "     * First paragraph.",
                "     *",
                "     * Second paragraph.",
                "     *",
                "     * Third paragraph.",
            ]
        );
        let separators = lines.iter().filter(|l| *l == "     *").count();
        assert_eq!(separators, 2, "paragraph count minus one");
    }

    #[test]
    fn blank_lines_with_stray_whitespace_still_separate_paragraphs() {
        let lines = wrap("First.\n   \nSecond.", decorate);
        assert_eq!(
            lines,
            vec!["     * First.", "     *", "     * Second."]
        );
    }

    #[test]
    fn no_trailing_separator_after_last_paragraph() {
        let lines = wrap("Only paragraph.\n\n", decorate);
        assert_eq!(lines, vec!["     * Only paragraph."]);
    }

    #[test]
    fn breaks_fall_on_word_boundaries() {
        for line in wrap(LOREM, decorate) {
            assert!(!line.ends_with(' '));
            assert!(line.starts_with("     * "));
        }
        // Re-joining the wrapped words reproduces the input words.
        let rejoined = wrap(LOREM, decorate)
            .join(" ")
            .split_whitespace()
            .filter(|w| *w != "*")
            .collect::<Vec<_>>()
            .join(" ");
        let expected = LOREM.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn overlength_word_is_emitted_intact() {
        let long_word = "x".repeat(100);
        let text = format!("short {} tail", long_word);
        let lines = wrap(&text, decorate);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "     * short");
        assert_eq!(lines[1], format!("     * {}", long_word));
        assert_eq!(lines[2], "     * tail");
    }

    #[test]
    fn empty_input_produces_no_lines() {
        assert!(wrap("", decorate).is_empty());
        assert!(wrap("   \n  ", decorate).is_empty());
    }

    #[test]
    fn exact_fit_line_is_not_broken() {
        // Decorated length of "     * " is 7; 73 more characters lands on 80.
        let word = "y".repeat(73);
        let lines = wrap(&word, decorate);
        assert_eq!(lines, vec![format!("     * {}", word)]);
        assert_eq!(lines[0].chars().count(), 80);
    }
}
