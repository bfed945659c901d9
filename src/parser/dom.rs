//! Minimal XML element tree.
//!
//! quick-xml is an event pull parser; the generator wants to walk a tree.
//! This builds just enough of one: element name, attributes, concatenated
//! text (CDATA included, verbatim), and child elements in document order.

use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// One XML element and everything under it.
#[derive(Debug, Default)]
pub struct Element {
    pub name: String,
    attributes: HashMap<String, String>,
    text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attr_or_empty(&self, name: &str) -> &str {
        self.attr(name).unwrap_or("")
    }

    /// An attribute that must be present and non-empty.
    pub fn require_attr(&self, name: &str) -> Result<&str> {
        match self.attr(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => bail!(
                "<{}> element is missing required attribute \"{}\"",
                self.name,
                name
            ),
        }
    }

    /// Text content of this element, whitespace preserved.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Immediate children with the given element name.
    pub fn children_named(&self, name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|child| child.name == name)
            .collect()
    }

    /// First immediate child with the given name, if any.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Parse an XML document into its root element.
pub fn parse(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("malformed XML near byte {}", reader.buffer_position()))?;

        match event {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let element = stack.pop().context("unbalanced closing tag")?;
                if element.name.as_bytes() != end.name().as_ref() {
                    bail!(
                        "closing tag </{}> does not match <{}>",
                        String::from_utf8_lossy(end.name().as_ref()),
                        element.name
                    );
                }
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let unescaped = text.unescape().context("invalid text content")?;
                    current.text.push_str(&unescaped);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes.
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        bail!("unclosed element <{}>", unclosed.name);
    }

    root.context("input contains no root element")
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                bail!("multiple root elements");
            }
            *root = Some(element);
        }
    }
    Ok(())
}

fn element_from(start: &BytesStart) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attributes = HashMap::new();
    for attribute in start.attributes() {
        let attribute =
            attribute.with_context(|| format!("bad attribute on <{}>", name))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .with_context(|| format!("bad attribute value on <{}>", name))?
            .into_owned();
        attributes.insert(key, value);
    }

    Ok(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let root = parse("<a><b x=\"1\"/><b x=\"2\"><c/></b></a>").unwrap();
        assert_eq!(root.name, "a");
        let bs = root.children_named("b");
        assert_eq!(bs.len(), 2);
        assert_eq!(bs[1].attr("x"), Some("2"));
        assert!(bs[1].first_child("c").is_some());
    }

    #[test]
    fn text_content_is_preserved() {
        let root = parse("<doc>\n    line one\n\n    line two\n</doc>").unwrap();
        assert_eq!(root.text(), "\n    line one\n\n    line two\n");
    }

    #[test]
    fn cdata_is_verbatim() {
        let root = parse("<v><![CDATA[<?php\n    $x = 1 && 2;\n?>]]></v>").unwrap();
        assert_eq!(root.text(), "<?php\n    $x = 1 && 2;\n?>");
    }

    #[test]
    fn entities_are_unescaped() {
        let root = parse("<d a=\"x &amp; y\">1 &lt; 2</d>").unwrap();
        assert_eq!(root.attr("a"), Some("x & y"));
        assert_eq!(root.text(), "1 < 2");
    }

    #[test]
    fn require_attr_reports_the_element() {
        let root = parse("<class name=\"\"/>").unwrap();
        let err = root.require_attr("name").unwrap_err();
        assert!(err.to_string().contains("<class>"));
        assert!(err.to_string().contains("\"name\""));
    }

    #[test]
    fn malformed_input_fails() {
        assert!(parse("<a><b></a>").is_err());
    }

    #[test]
    fn xml_declaration_is_ignored() {
        let root = parse("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root/>").unwrap();
        assert_eq!(root.name, "root");
    }
}
