//! Macro registry — named text templates with positional substitution.
//!
//! Macros are defined once per document in a `<macros>` block and invoked
//! inside any free text with a double-brace call: `{{name arg1 "arg two"}}`.
//! `$1`, `$2`, … in the template are replaced by the call's arguments in
//! order. Calls are resolved against the registered templates only — macro
//! output is never re-scanned, so macros cannot expand recursively.

use anyhow::{bail, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// A macro call spans a single line and is non-greedy, so two calls on one
/// line are matched separately.
static RE_MACRO_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap());

/// Name → template table. Populated once before rendering begins; rendering
/// code only ever holds a shared reference, so late registration is
/// unrepresentable rather than merely discouraged.
#[derive(Debug, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, String>,
}

impl MacroRegistry {
    pub fn new() -> MacroRegistry {
        MacroRegistry::default()
    }

    /// Register a macro. A duplicate name overwrites the earlier template.
    pub fn register(&mut self, name: &str, template: &str) {
        self.macros.insert(name.to_string(), template.to_string());
    }

    /// Expand every `{{ ... }}` call in `text`.
    ///
    /// Fails on a call with an empty name or a name with no registered
    /// template. Text without any call comes back unchanged.
    pub fn expand(&self, text: &str) -> Result<String> {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        for caps in RE_MACRO_CALL.captures_iter(text) {
            let full = caps.get(0).unwrap();
            let call = caps.get(1).unwrap().as_str();
            output.push_str(&text[cursor..full.start()]);
            output.push_str(&self.invoke(call)?);
            cursor = full.end();
        }

        output.push_str(&text[cursor..]);
        Ok(output)
    }

    /// Resolve one call: tokenize the name and arguments, substitute the
    /// positional placeholders.
    fn invoke(&self, call: &str) -> Result<String> {
        let mut rest = call.trim();
        let name = next_token(&mut rest);

        if name.is_empty() {
            bail!("empty macro name in \"{{{{{}}}}}\"", call);
        }

        let Some(template) = self.macros.get(&name) else {
            bail!("macro \"{}\" is not defined", name);
        };

        let mut expanded = template.clone();
        let mut position = 1;
        while !rest.is_empty() {
            let argument = next_token(&mut rest);
            expanded = expanded.replace(&format!("${}", position), &argument);
            position += 1;
        }

        Ok(expanded)
    }
}

/// Pull the next token off a macro call, advancing `rest` past it.
///
/// A token starting with `"` runs to the closing quote and may contain
/// spaces (the quotes are stripped). Otherwise the token runs to the next
/// space, or to the end of the input for the final argument.
fn next_token(rest: &mut &str) -> String {
    if let Some(quoted) = rest.strip_prefix('"') {
        match quoted.find('"') {
            Some(end) => {
                let token = quoted[..end].to_string();
                *rest = quoted[end + 1..].trim_start();
                token
            }
            None => {
                // Unterminated quote — take everything that's left.
                let token = quoted.to_string();
                *rest = "";
                token
            }
        }
    } else if let Some(space) = rest.find(' ') {
        let token = rest[..space].to_string();
        *rest = rest[space + 1..].trim_start();
        token
    } else {
        let token = rest.to_string();
        *rest = "";
        token
    }
}
