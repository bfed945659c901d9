//! Data model for parsed class definitions — input-format-agnostic.
//!
//! Everything the renderer consumes is a plain descriptor here. In
//! particular, auto-generated getters and setters are synthesized as
//! ordinary [`MethodSpec`] values, so the renderer never distinguishes
//! hand-authored methods from generated ones.

/// Complete parsed document from a single XML input file.
#[derive(Debug, Default)]
pub struct Document {
    /// `default-output` attribute on the root element.
    pub default_output: Option<String>,
    /// Macro definitions in document order (name, template).
    pub macros: Vec<(String, String)>,
    pub classes: Vec<ClassSpec>,
}

/// A single class to generate.
#[derive(Debug, Default)]
pub struct ClassSpec {
    pub name: String,
    pub namespace: String,
    /// Per-class output directory override.
    pub output: Option<String>,
    pub extends: Option<String>,
    pub author: Option<String>,
    pub is_abstract: bool,
    /// Fully-qualified names from `<uses>`, in document order.
    pub uses: Vec<String>,
    /// Trait names from `<traits>`.
    pub traits: Vec<String>,
    /// Extra docblocks rendered above the class docblock.
    pub superdocs: Vec<String>,
    /// Class description (raw, macro expansion happens at render time).
    pub doc: String,
    pub constants: Vec<ConstantSpec>,
    pub properties: Vec<PropertySpec>,
    /// Free-standing comment blocks, rendered between the properties and
    /// the methods.
    pub comments: Vec<CommentSpec>,
    pub methods: Vec<MethodSpec>,
}

impl ClassSpec {
    /// True when the class body will contain at least one member, which in
    /// turn means a trailing separator line will be pending before the
    /// closing brace.
    pub fn has_members(&self) -> bool {
        !self.traits.is_empty()
            || !self.constants.is_empty()
            || !self.properties.is_empty()
            || !self.comments.is_empty()
            || !self.methods.is_empty()
    }
}

/// A free-standing comment inside the class body.
#[derive(Debug, Default)]
pub struct CommentSpec {
    pub text: String,
    /// Render with `//` markers instead of a `/** ... */` block.
    pub line_style: bool,
    /// Keep the multi-line form even when the text would fit on one line.
    pub force_vertical: bool,
}

/// A class constant.
#[derive(Debug, Default)]
pub struct ConstantSpec {
    pub name: String,
    pub type_name: String,
    pub value: String,
    pub doc: String,
}

/// A private property. Getters and setters are generated unless disabled.
#[derive(Debug, Default)]
pub struct PropertySpec {
    pub name: String,
    pub type_name: String,
    pub doc: String,
    /// Default value, emitted double-quoted for string-typed properties.
    pub default: Option<String>,
    pub is_static: bool,
    pub getter: bool,
    pub setter: bool,
}

/// Method visibility, in the order the groups are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// A method parameter.
#[derive(Debug, Default)]
pub struct ParamSpec {
    /// May be empty — untyped parameters render without a type hint.
    pub type_name: String,
    pub name: String,
    pub desc: Option<String>,
}

/// A method — hand-authored or synthesized from a property.
#[derive(Debug, Default)]
pub struct MethodSpec {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    /// May be empty; `void` and empty both suppress the return type hint.
    pub return_type: String,
    pub doc: String,
    pub params: Vec<ParamSpec>,
    /// Raw body text. `None` renders a `// Todo.` placeholder.
    pub body: Option<String>,
}

impl MethodSpec {
    /// Descriptor for the generated getter of a property.
    pub fn getter_for(property: &PropertySpec) -> MethodSpec {
        MethodSpec {
            name: format!("get{}", ucfirst(&property.name)),
            visibility: Visibility::Public,
            is_static: property.is_static,
            return_type: property.type_name.clone(),
            doc: format!("Getter for {}.", property.name),
            body: Some(format!("return $this->{};", property.name)),
            ..MethodSpec::default()
        }
    }

    /// Descriptor for the generated setter of a property.
    pub fn setter_for(property: &PropertySpec) -> MethodSpec {
        MethodSpec {
            name: format!("set{}", ucfirst(&property.name)),
            visibility: Visibility::Public,
            is_static: property.is_static,
            return_type: "void".to_string(),
            doc: format!("Setter for {}.", property.name),
            params: vec![ParamSpec {
                type_name: property.type_name.clone(),
                name: "input".to_string(),
                desc: None,
            }],
            body: Some(format!("$this->{} = $input;", property.name)),
            ..MethodSpec::default()
        }
    }
}

/// Uppercase the first character, leaving the rest untouched.
fn ucfirst(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop() -> PropertySpec {
        PropertySpec {
            name: "myProp".to_string(),
            type_name: "string".to_string(),
            doc: "A property.".to_string(),
            getter: true,
            setter: true,
            ..PropertySpec::default()
        }
    }

    #[test]
    fn getter_descriptor() {
        let m = MethodSpec::getter_for(&prop());
        assert_eq!(m.name, "getMyProp");
        assert_eq!(m.return_type, "string");
        assert_eq!(m.body.as_deref(), Some("return $this->myProp;"));
        assert!(m.params.is_empty());
    }

    #[test]
    fn setter_descriptor() {
        let m = MethodSpec::setter_for(&prop());
        assert_eq!(m.name, "setMyProp");
        assert_eq!(m.return_type, "void");
        assert_eq!(m.params.len(), 1);
        assert_eq!(m.params[0].name, "input");
        assert_eq!(m.body.as_deref(), Some("$this->myProp = $input;"));
    }

    #[test]
    fn static_property_makes_static_accessors() {
        let mut p = prop();
        p.is_static = true;
        assert!(MethodSpec::getter_for(&p).is_static);
        assert!(MethodSpec::setter_for(&p).is_static);
    }
}
