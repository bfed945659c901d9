//! Class-file emitter.
//!
//! Walks one [`ClassSpec`] and writes the complete `.php` file through the
//! line-buffered [`FileWriter`]: namespace, imports, superdocs, class
//! docblock, declaration, traits, constants, properties with their
//! generated accessors, and the visibility-grouped methods. Every piece of
//! free text is macro-expanded on its way in; docblock types go through the
//! per-class namespace table.

use crate::macros::MacroRegistry;
use crate::model::{ClassSpec, ConstantSpec, MethodSpec, PropertySpec, Visibility};
use crate::namespace::UsedNamespaces;
use crate::render::code;
use crate::render::docblock::DocblockBuilder;
use crate::render::writer::FileWriter;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Generate `<directory>/<ClassName>.php`, creating the directory if
/// needed. Fails if the file already exists.
pub fn render_class(
    class: &ClassSpec,
    directory: &Path,
    macros: &MacroRegistry,
) -> Result<PathBuf> {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create output directory {}", directory.display()))?;

    let path = directory.join(format!("{}.php", class.name));
    let writer = FileWriter::create(&path)?;

    let renderer = ClassRenderer {
        writer,
        class,
        macros,
        namespaces: UsedNamespaces::from_uses(&class.uses),
    };
    renderer
        .render()
        .with_context(|| format!("failed to generate class {}", class.name))?;

    Ok(path)
}

struct ClassRenderer<'a> {
    writer: FileWriter,
    class: &'a ClassSpec,
    macros: &'a MacroRegistry,
    namespaces: UsedNamespaces,
}

impl ClassRenderer<'_> {
    fn render(mut self) -> Result<()> {
        self.writer.append("<?php", 0)?;
        self.append_namespace()?;
        self.append_uses()?;
        self.append_superdocs()?;
        self.append_class_docblock()?;
        self.open_class()?;
        self.append_traits()?;
        self.append_properties()?;
        self.append_comments()?;
        self.append_methods()?;
        self.close_class()?;
        self.writer.finish()
    }

    fn append_namespace(&mut self) -> Result<()> {
        self.writer
            .append(&format!("namespace {};", self.class.namespace), 0)?;
        self.writer.append("", 0)
    }

    fn append_uses(&mut self) -> Result<()> {
        if self.class.uses.is_empty() {
            return Ok(());
        }

        for import in &self.class.uses {
            self.writer.append(&format!("use {};", import), 0)?;
        }
        self.writer.append("", 0)
    }

    /// Extra docblocks rendered above the class docblock.
    fn append_superdocs(&mut self) -> Result<()> {
        for superdoc in &self.class.superdocs {
            let mut docblock = DocblockBuilder::new(0);
            docblock.set_description(&self.macros.expand(superdoc)?);
            docblock.write(&mut self.writer)?;
            self.writer.append("", 0)?;
        }
        Ok(())
    }

    fn append_class_docblock(&mut self) -> Result<()> {
        let mut docblock = DocblockBuilder::new(0);
        docblock.set_description(&self.macros.expand(&self.class.doc)?);
        docblock.set_force_vertical(true);

        if let Some(author) = &self.class.author {
            docblock.add_attribute("author", vec![author.clone()]);
        }

        docblock.write(&mut self.writer)
    }

    fn open_class(&mut self) -> Result<()> {
        let mut declaration = String::new();
        if self.class.is_abstract {
            declaration.push_str("abstract ");
        }
        declaration.push_str("class ");
        declaration.push_str(&self.class.name);
        self.writer.append(&declaration, 0)?;

        if let Some(extends) = &self.class.extends {
            self.writer
                .append_to_last_line(&format!(" extends {}", extends))?;
        }

        self.writer.append("{", 0)
    }

    fn close_class(&mut self) -> Result<()> {
        // Member sections end with a blank separator line; when the class
        // body ends on one it would leave a stray blank before the brace.
        // The line buffer still holds it, so it can be retracted here.
        if self.trailing_separator_pending() {
            self.writer.delete_last_line();
        }
        self.writer.append("}", 0)
    }

    /// True when the last thing written was a section separator: methods
    /// close with a brace, every other member section with a blank line.
    fn trailing_separator_pending(&self) -> bool {
        if !self.class.methods.is_empty() {
            return false;
        }
        self.class.has_members()
    }

    fn append_traits(&mut self) -> Result<()> {
        if self.class.traits.is_empty() {
            return Ok(());
        }

        for name in &self.class.traits {
            self.writer.append(&format!("use {};", name), 1)?;
        }
        self.writer.append("", 0)
    }

    fn append_properties(&mut self) -> Result<()> {
        if self.class.constants.is_empty() && self.class.properties.is_empty() {
            return Ok(());
        }

        for constant in &self.class.constants {
            self.append_constant(constant)?;
        }

        for property in &self.class.properties {
            self.append_property_declaration(property)?;
        }

        self.writer.append("", 0)?;
        self.writer.append("// START getters and setters.", 1)?;

        for property in &self.class.properties {
            if property.setter {
                self.write_method(&MethodSpec::setter_for(property))?;
            }
            if property.getter {
                self.write_method(&MethodSpec::getter_for(property))?;
            }
        }

        self.writer.append("", 0)?;
        self.writer.append("// END getters and setters.", 1)?;
        self.writer.append("", 0)
    }

    /// Free-standing comment blocks between the properties and the methods.
    fn append_comments(&mut self) -> Result<()> {
        for comment in &self.class.comments {
            let mut docblock = DocblockBuilder::new(1);
            docblock.set_description(&self.macros.expand(&comment.text)?);
            if comment.line_style {
                docblock.use_line_comment_decorations();
            }
            docblock.set_force_vertical(comment.force_vertical);
            docblock.write(&mut self.writer)?;
            self.writer.append("", 0)?;
        }
        Ok(())
    }

    fn append_constant(&mut self, constant: &ConstantSpec) -> Result<()> {
        let mut docblock = DocblockBuilder::new(1);
        docblock.set_description(&self.macros.expand(&constant.doc)?);
        docblock.add_attribute(
            "var",
            vec![self.namespaces.fully_qualified_name(&constant.type_name)],
        );
        docblock.write(&mut self.writer)?;

        self.writer.append(
            &format!("const {} = {};", constant.name, constant.value),
            1,
        )?;
        self.writer.append("", 0)
    }

    fn append_property_declaration(&mut self, property: &PropertySpec) -> Result<()> {
        let mut docblock = DocblockBuilder::new(1);
        docblock.set_description(&self.macros.expand(&property.doc)?);
        docblock.add_attribute(
            "var",
            vec![self.namespaces.fully_qualified_name(&property.type_name)],
        );
        docblock.write(&mut self.writer)?;

        let mut declaration = String::from("private ");
        if property.is_static {
            declaration.push_str("static ");
        }
        declaration.push('$');
        declaration.push_str(&property.name);
        if let Some(default) = &property.default {
            declaration.push_str(" = ");
            declaration.push_str(&default_value_string(property, default));
        }
        declaration.push(';');

        self.writer.append(&declaration, 1)?;
        self.writer.append("", 0)
    }

    fn append_methods(&mut self) -> Result<()> {
        for visibility in [Visibility::Public, Visibility::Protected, Visibility::Private] {
            let group: Vec<&MethodSpec> = self
                .class
                .methods
                .iter()
                .filter(|method| method.visibility == visibility)
                .collect();

            if group.is_empty() {
                continue;
            }

            if visibility == Visibility::Private {
                self.writer.append("", 0)?;
                self.writer.append("", 0)?;
                self.writer
                    .append("// Helper functions below this line.", 1)?;
            }

            for method in group {
                self.write_method(method)?;
            }
        }
        Ok(())
    }

    fn write_method(&mut self, method: &MethodSpec) -> Result<()> {
        self.writer.append("", 0)?;

        self.write_method_docblock(method)?;
        self.write_method_signature(method)?;

        if method.is_abstract {
            // Abstract methods have no body.
            return Ok(());
        }

        self.writer.append("{", 1)?;
        self.write_method_body(method)?;
        self.writer.append("}", 1)
    }

    fn write_method_docblock(&mut self, method: &MethodSpec) -> Result<()> {
        let mut docblock = DocblockBuilder::new(1);
        docblock.set_description(&self.macros.expand(&method.doc)?);
        docblock.set_force_vertical(true);

        for param in &method.params {
            let mut data = vec![
                self.namespaces.fully_qualified_name(&param.type_name),
                format!("${}", param.name),
            ];
            if let Some(desc) = &param.desc {
                data.push(self.macros.expand(desc)?);
            }
            docblock.add_attribute("param", data);
        }

        docblock.add_attribute(
            "return",
            vec![self.namespaces.fully_qualified_name(&method.return_type)],
        );

        docblock.write(&mut self.writer)
    }

    fn write_method_signature(&mut self, method: &MethodSpec) -> Result<()> {
        let arguments = method
            .params
            .iter()
            .map(|param| {
                if param.type_name.is_empty() {
                    format!("${}", param.name)
                } else {
                    format!("{} ${}", param.type_name, param.name)
                }
            })
            .collect::<Vec<_>>()
            .join(",");

        let return_hint = if method.return_type.is_empty() || method.return_type == "void" {
            String::new()
        } else {
            format!(": {}", method.return_type)
        };

        let declaration = format!(
            "{}{} function {}({}){}",
            method.visibility.as_str(),
            if method.is_static { " static" } else { "" },
            method.name,
            arguments,
            return_hint,
        );

        if method.is_abstract {
            self.writer.append(&format!("abstract {};", declaration), 1)
        } else {
            self.writer.append(&declaration, 1)
        }
    }

    fn write_method_body(&mut self, method: &MethodSpec) -> Result<()> {
        let body_indent = 2;

        match &method.body {
            None => self.writer.append("// Todo.", body_indent),
            Some(raw) => {
                let expanded = self.macros.expand(raw)?;
                for line in code::normalize(&expanded) {
                    self.writer.append(&line, body_indent)?;
                }
                Ok(())
            }
        }
    }
}

/// String-typed defaults are emitted double-quoted; everything else
/// verbatim.
fn default_value_string(property: &PropertySpec, default: &str) -> String {
    if property.type_name == "string" {
        format!("\"{}\"", default)
    } else {
        default.to_string()
    }
}
