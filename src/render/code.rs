//! Inline-code normalization for embedded `<content>` blocks.
//!
//! Method bodies are written inside CDATA with `<?php` / `?>` markers so
//! editors highlight the XML sensibly; the markers never reach the output.
//! The block is re-indented relative to its own minimum indentation, so the
//! author's position inside the XML file doesn't leak into the generated
//! method body.

use regex::Regex;
use std::sync::LazyLock;

static RE_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<\?(php)?").unwrap());

static RE_CLOSE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?>$").unwrap());

/// Normalize a raw embedded-code block into output-ready lines.
///
/// Strips the open marker from the first line and the close marker from the
/// last, un-indents every line by the common leading whitespace, and drops a
/// first and/or last line left empty by the processing. A one-line block is
/// simply trimmed.
pub fn normalize(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = raw.split('\n').map(str::to_string).collect();

    strip_code_markers(&mut lines);

    if lines.len() == 1 {
        return vec![lines[0].trim().to_string()];
    }

    let width = smallest_indent(&lines);
    for line in lines.iter_mut() {
        *line = strip_leading_whitespace(line, width).to_string();
    }

    // Drop the trailing line, then the leading line, if blank.
    if lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    if lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }

    lines
}

fn strip_code_markers(lines: &mut [String]) {
    if let Some(first) = lines.first_mut() {
        *first = RE_OPEN_TAG.replace(first, "").into_owned();
    }
    if let Some(last) = lines.last_mut() {
        *last = RE_CLOSE_TAG.replace(last, "").into_owned();
    }
}

/// Smallest leading-whitespace width across the lines that carry content.
/// The first line is skipped — it starts where the CDATA marker ended, so
/// its indentation is positional, not real.
fn smallest_indent(lines: &[String]) -> usize {
    lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0)
}

/// Strip exactly `width` leading whitespace characters, or leave the line
/// untouched when it doesn't start with that much whitespace.
fn strip_leading_whitespace(line: &str, width: usize) -> &str {
    if width == 0 {
        return line;
    }

    let mut taken = 0;
    for (offset, ch) in line.char_indices() {
        if taken == width {
            return &line[offset..];
        }
        if !ch.is_whitespace() {
            return line;
        }
        taken += 1;
    }

    if taken == width {
        ""
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_interior_indent_is_removed() {
        let raw = "<?php\n        $a = 1;\n        $b = 2;\n    ?>";
        assert_eq!(normalize(raw), vec!["$a = 1;", "$b = 2;"]);
    }

    #[test]
    fn relative_indentation_is_preserved() {
        let raw = "<?php\n        $arr = [\n            1,\n            2\n        ];\n    ?>";
        assert_eq!(
            normalize(raw),
            vec!["$arr = [", "    1,", "    2", "];"]
        );
    }

    #[test]
    fn short_open_tag_is_stripped() {
        let raw = "<?\n        $x = 'b';\n    ?>";
        assert_eq!(normalize(raw), vec!["$x = 'b';"]);
    }

    #[test]
    fn no_tags_at_all() {
        let raw = "\n        $x = 'c';\n    ";
        assert_eq!(normalize(raw), vec!["$x = 'c';"]);
    }

    #[test]
    fn single_line_is_trimmed() {
        assert_eq!(normalize("<?php $x = 'd'; ?>"), vec!["$x = 'd';"]);
        assert_eq!(normalize("  return 1;  "), vec!["return 1;"]);
    }

    #[test]
    fn interior_blank_lines_survive() {
        let raw = "<?php\n        $a = 1;\n\n        $b = 2;\n    ?>";
        assert_eq!(normalize(raw), vec!["$a = 1;", "", "$b = 2;"]);
    }

    #[test]
    fn only_one_blank_edge_line_is_dropped_each_side() {
        let raw = "\n\n        $a = 1;\n";
        // First split produces two leading blanks; only one is dropped.
        assert_eq!(normalize(raw), vec!["", "$a = 1;"]);
    }

    #[test]
    fn mixed_indent_uses_the_minimum() {
        let raw = "\n      deep();\n  shallow();\n";
        assert_eq!(normalize(raw), vec!["    deep();", "shallow();"]);
    }

    #[test]
    fn open_tag_must_be_at_line_start() {
        let raw = "x<?php\n    $a = 1;\n";
        // The marker isn't leading, so the first line is kept as-is.
        assert_eq!(normalize(raw), vec!["x<?php", "$a = 1;"]);
    }
}
