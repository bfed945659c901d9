//! Docblock and comment rendering.
//!
//! A docblock is a required description plus an ordered list of attribute
//! entries (`@param`, `@return`, `@var`, `@author`, …), rendered under a
//! decoration profile: `/** ... */` blocks or `//` line comments. Short
//! block comments collapse to a single line unless forced vertical.

use crate::render::build_indent;
use crate::render::wrap;
use crate::render::writer::FileWriter;
use anyhow::{bail, Result};

/// Comment delimiters for one rendering session.
#[derive(Debug, Clone, Copy)]
pub struct Decorations {
    pub open: Option<&'static str>,
    pub line_prefix: &'static str,
    pub close: Option<&'static str>,
    pub single_line_eligible: bool,
}

/// `/** ... */` with ` *` continuation lines.
pub const BLOCK_COMMENT: Decorations = Decorations {
    open: Some("/**"),
    line_prefix: " *",
    close: Some(" */"),
    single_line_eligible: true,
};

/// `//` on every line; never collapses to the single-line form.
pub const LINE_COMMENT: Decorations = Decorations {
    open: None,
    line_prefix: "//",
    close: None,
    single_line_eligible: false,
};

impl Decorations {
    /// One decorated content line. Empty content renders the bare prefix.
    fn build_line(&self, indent: &str, content: &str) -> String {
        if content.is_empty() {
            format!("{}{}", indent, self.line_prefix)
        } else {
            format!("{}{} {}", indent, self.line_prefix, content)
        }
    }
}

/// A tagged line inside a docblock: the tag plus up to three data fields.
/// The third field is a long-form description, wrapped onto its own lines
/// with a one-space continuation indent. Fields past the third are ignored.
#[derive(Debug)]
struct AttributeEntry {
    tag: String,
    data: Vec<String>,
}

/// Assembles one docblock and renders it through a [`FileWriter`].
#[derive(Debug)]
pub struct DocblockBuilder {
    indent_lvl: usize,
    description: Option<String>,
    attributes: Vec<AttributeEntry>,
    decorations: Decorations,
    force_vertical: bool,
}

impl DocblockBuilder {
    pub fn new(indent_lvl: usize) -> DocblockBuilder {
        DocblockBuilder {
            indent_lvl,
            description: None,
            attributes: Vec::new(),
            decorations: BLOCK_COMMENT,
            force_vertical: false,
        }
    }

    pub fn set_description(&mut self, input: &str) {
        self.description = Some(input.to_string());
    }

    /// Add an attribute entry. `tag` is given without the `@`.
    pub fn add_attribute(&mut self, tag: &str, data: Vec<String>) {
        self.attributes.push(AttributeEntry {
            tag: tag.to_string(),
            data,
        });
    }

    /// Render as a `//` comment instead of a `/** ... */` block.
    pub fn use_line_comment_decorations(&mut self) {
        self.decorations = LINE_COMMENT;
    }

    /// Force the multi-line form even when the single-line form would fit.
    pub fn set_force_vertical(&mut self, force: bool) {
        self.force_vertical = force;
    }

    /// Render and append every line of the docblock.
    pub fn write(&self, writer: &mut FileWriter) -> Result<()> {
        for line in self.build_lines()? {
            writer.append(&line, 0)?;
        }
        Ok(())
    }

    /// Build the rendered lines. Fails when the description is missing or
    /// empty — every docblock needs one.
    pub fn build_lines(&self) -> Result<Vec<String>> {
        let description = match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => description,
            _ => bail!("missing description in docblock"),
        };

        let indent = build_indent(self.indent_lvl);

        if let Some(line) = self.single_line(&indent, description) {
            return Ok(vec![line]);
        }

        let mut lines = Vec::new();

        if let Some(open) = self.decorations.open {
            lines.push(format!("{}{}", indent, open));
        }

        let decorations = self.decorations;
        lines.extend(wrap::wrap(description, |content| {
            decorations.build_line(&indent, content)
        }));

        if !self.attributes.is_empty() {
            lines.push(decorations.build_line(&indent, ""));
            for attribute in &self.attributes {
                lines.extend(build_attribute_lines(&decorations, &indent, attribute));
            }
        }

        if let Some(close) = self.decorations.close {
            lines.push(format!("{}{}", indent, close));
        }

        Ok(lines)
    }

    /// The collapsed form, when allowed: at most one attribute carrying at
    /// most one data field, and the whole rendering under 81 characters.
    fn single_line(&self, indent: &str, description: &str) -> Option<String> {
        if !self.decorations.single_line_eligible || self.force_vertical {
            return None;
        }
        if self.attributes.len() > 1 {
            return None;
        }
        if self
            .attributes
            .first()
            .is_some_and(|attribute| attribute.data.len() > 1)
        {
            return None;
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(open) = self.decorations.open {
            parts.push(open.to_string());
        }
        if let Some(attribute) = self.attributes.first() {
            parts.push(format!("@{}", attribute.tag));
            if let Some(first) = attribute.data.first() {
                parts.push(first.clone());
            }
        }
        parts.push(wrap_flat(description));

        // The close marker carries its own leading space.
        let mut line = format!("{}{}", indent, parts.join(" "));
        if let Some(close) = self.decorations.close {
            line.push_str(close);
        }

        if line.chars().count() < 81 {
            Some(line)
        } else {
            None
        }
    }
}

/// Collapse a description to one line for the single-line form.
fn wrap_flat(description: &str) -> String {
    description.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render one attribute entry: the tag line with pseudo-tab alignment, then
/// the wrapped long-form description if a third field is present.
fn build_attribute_lines(
    decorations: &Decorations,
    indent: &str,
    attribute: &AttributeEntry,
) -> Vec<String> {
    let mut first = decorations.build_line(indent, &format!("@{}", attribute.tag));

    if let Some(field) = attribute.data.first() {
        first = pseudo_tab(first);
        first.push_str(field);
    }
    if let Some(field) = attribute.data.get(1) {
        first = pseudo_tab(first);
        first.push_str(field);
    }

    let mut lines = vec![first];

    if let Some(long_description) = attribute.data.get(2) {
        lines.extend(wrap::wrap(long_description, |content| {
            if content.is_empty() {
                decorations.build_line(indent, "")
            } else {
                decorations.build_line(indent, &format!(" {}", content))
            }
        }));
    }

    lines
}

/// Pad with spaces until the length is a multiple of 4. Always adds at
/// least one space, so adjacent fields never touch.
fn pseudo_tab(mut input: String) -> String {
    loop {
        input.push(' ');
        if input.chars().count() % 4 == 0 {
            break;
        }
    }
    input
}
