//! XML document → model descriptors.
//!
//! Walks the element tree and pulls out macro definitions and class
//! descriptors. Optional elements are skipped silently; structurally
//! required attributes fail the whole run.

use crate::model::{
    ClassSpec, CommentSpec, ConstantSpec, Document, MethodSpec, ParamSpec, PropertySpec,
    Visibility,
};
use crate::parser::dom::{self, Element};
use anyhow::{bail, Context, Result};

/// Parse a complete input document.
pub fn parse_document(input: &str) -> Result<Document> {
    check_cdata_balance(input)?;

    let root = dom::parse(input)?;
    if root.name != "phpgen" {
        bail!("expected <phpgen> root element, found <{}>", root.name);
    }

    let mut document = Document {
        default_output: optional_attr(&root, "default-output"),
        ..Document::default()
    };

    if let Some(macros) = root.first_child("macros") {
        for macro_el in macros.children_named("macro") {
            let name = macro_el.require_attr("name")?;
            document
                .macros
                .push((name.to_string(), macro_el.text().to_string()));
        }
    }

    for class_el in root.children_named("class") {
        document.classes.push(parse_class(class_el)?);
    }

    Ok(document)
}

/// `]]>` inside embedded code silently truncates a CDATA section and the
/// damage surfaces far from the cause, so the raw input is checked before
/// parsing: the number of openers and closers must agree.
fn check_cdata_balance(content: &str) -> Result<()> {
    let open = content.matches("<![CDATA[").count();
    let close = content.matches("]]>").count();

    if open != close {
        bail!(
            "found {} \"<![CDATA[\" marker(s) but {} \"]]>\"; if \"]]>\" is used anywhere \
             in embedded code it must be broken up, e.g. by adding a space after the second ]",
            open,
            close
        );
    }
    Ok(())
}

fn parse_class(element: &Element) -> Result<ClassSpec> {
    let name = element.require_attr("name")?.to_string();
    let is_abstract = has_keyword(element, "abstract");

    let mut class = ClassSpec {
        namespace: element
            .require_attr("namespace")
            .with_context(|| format!("class {}", name))?
            .to_string(),
        output: optional_attr(element, "output"),
        extends: optional_attr(element, "extends"),
        author: optional_attr(element, "author"),
        is_abstract,
        doc: child_text(element, "doc"),
        name,
        ..ClassSpec::default()
    };

    if let Some(uses) = element.first_child("uses") {
        for use_el in uses.children_named("use") {
            class.uses.push(use_el.require_attr("value")?.to_string());
        }
    }

    if let Some(traits) = element.first_child("traits") {
        for trait_el in traits.children_named("trait") {
            class
                .traits
                .push(trait_el.require_attr("value")?.to_string());
        }
    }

    if let Some(superdocs) = element.first_child("superdocs") {
        for superdoc in superdocs.children_named("superdoc") {
            class.superdocs.push(superdoc.text().to_string());
        }
    }

    if let Some(properties) = element.first_child("properties") {
        for constant in properties.children_named("constant") {
            class.constants.push(parse_constant(constant)?);
        }
        for property in properties.children_named("property") {
            class.properties.push(parse_property(property)?);
        }
    }

    for comment in element.children_named("comment") {
        class.comments.push(CommentSpec {
            text: comment.text().to_string(),
            line_style: comment.attr("style") == Some("line"),
            force_vertical: comment.attr("vertical") == Some("1"),
        });
    }

    if let Some(methods) = element.first_child("methods") {
        for (group, visibility) in [
            ("public", Visibility::Public),
            ("protected", Visibility::Protected),
            ("private", Visibility::Private),
        ] {
            let Some(group_el) = methods.first_child(group) else {
                continue;
            };
            for method in group_el.children_named("method") {
                class.methods.push(parse_method(method, visibility)?);
            }
        }
    }

    Ok(class)
}

fn parse_constant(element: &Element) -> Result<ConstantSpec> {
    Ok(ConstantSpec {
        name: element.require_attr("name")?.to_string(),
        type_name: element.attr_or_empty("type").to_string(),
        value: element.require_attr("value")?.to_string(),
        doc: element.attr_or_empty("doc").to_string(),
    })
}

fn parse_property(element: &Element) -> Result<PropertySpec> {
    Ok(PropertySpec {
        name: element.require_attr("name")?.to_string(),
        type_name: element.attr_or_empty("type").to_string(),
        doc: element.attr_or_empty("doc").to_string(),
        default: optional_attr(element, "default"),
        is_static: has_keyword(element, "static"),
        // Accessors are generated unless explicitly disabled.
        getter: element.attr("getter") != Some("0"),
        setter: element.attr("setter") != Some("0"),
    })
}

fn parse_method(element: &Element, visibility: Visibility) -> Result<MethodSpec> {
    let mut method = MethodSpec {
        name: element.require_attr("name")?.to_string(),
        visibility,
        is_static: has_keyword(element, "static"),
        is_abstract: has_keyword(element, "abstract"),
        return_type: element.attr_or_empty("return").to_string(),
        doc: child_text(element, "doc"),
        body: element
            .first_child("content")
            .map(|content| content.text().to_string()),
        params: Vec::new(),
    };

    for input in element.children_named("input") {
        method.params.push(ParamSpec {
            type_name: input.attr_or_empty("type").to_string(),
            name: input.require_attr("name")?.to_string(),
            desc: optional_attr(input, "desc"),
        });
    }

    Ok(method)
}

/// Attribute value, with an absent or empty attribute mapped to `None`.
fn optional_attr(element: &Element, name: &str) -> Option<String> {
    element
        .attr(name)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Space-separated `keywords` attribute contains the given word.
fn has_keyword(element: &Element, keyword: &str) -> bool {
    element
        .attr_or_empty("keywords")
        .split_whitespace()
        .any(|word| word == keyword)
}

/// Text of the first child with the given name, or empty.
fn child_text(element: &Element, name: &str) -> String {
    element
        .first_child(name)
        .map(|child| child.text().to_string())
        .unwrap_or_default()
}
