// Copyright (c) 2025-2026 Bengal contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Markdown directives: fenced `:::name` blocks with typed options and an
//! optional parent/nesting contract (spec §4.2, §9).
//!
//! Directives are registered as stateless singletons, shared by reference
//! across worker threads (spec §4.2/§5: "Directive instances: All workers:
//! Stateless; zero mutation"). Option parsing is a flat `key=value` scan
//! rather than Python's type-hint-derived dataclasses — the equivalent
//! would be a per-directive `serde`-deserializable options struct, but the
//! built-ins below need nothing richer than strings and flags.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{BuildError, ErrorKind};
use crate::structure::dynamic::Dynamic;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// A registered directive kind.
///
/// Implementations must not hold per-render mutable state: the registry
/// hands out `Arc<dyn Directive>` shared across every worker for the
/// lifetime of the build (at-most-one instance per class, spec §8 property
/// 9), so any render-local state lives in the caller, not in `self`.
pub trait Directive: Send + Sync {
    /// The fence name this directive answers to, e.g. `"note"`.
    fn name(&self) -> &'static str;

    /// The set of directive names this directive may nest directly under,
    /// or `None` if it may appear anywhere. Checked against the immediate
    /// parent only (spec §8 Scenario F: `step` must be a child of `steps`).
    fn allowed_parents(&self) -> Option<&'static [&'static str]> {
        None
    }

    /// Renders this directive's already-rendered inner HTML into the
    /// directive's final HTML, using its parsed options.
    fn render(&self, options: &Options, inner_html: &str) -> String;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Parsed `key=value`/bare-flag options from a directive's fence line.
#[derive(Clone, Debug, Default)]
pub struct Options {
    values: BTreeMap<String, Dynamic>,
}

impl Options {
    /// Parses the text following a directive's name on its fence line.
    ///
    /// Supports `key="quoted value"`, `key=bare`, and bare flags (recorded
    /// as `true`). The first bare token with no `=` becomes the implicit
    /// `title` option, matching how admonitions are usually authored
    /// (`:::note My Title`).
    pub fn parse(rest: &str) -> Self {
        let mut values = BTreeMap::new();
        let mut title_parts = Vec::new();
        for token in tokenize(rest) {
            if let Some((key, value)) = token.split_once('=') {
                values.insert(key.to_string(), Dynamic::String(unquote(value)));
            } else {
                title_parts.push(token);
            }
        }
        if !title_parts.is_empty() && !values.contains_key("title") {
            values.insert("title".to_string(), Dynamic::String(title_parts.join(" ")));
        }
        Options { values }
    }

    /// Returns an option as a string, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Dynamic::as_str)
    }
}

fn tokenize(rest: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in rest.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').to_string()
}

// ----------------------------------------------------------------------------

/// An admonition (note, warning, tip, ...): a titled, kind-colored callout.
pub struct Admonition {
    kind: &'static str,
}

impl Admonition {
    /// Creates an admonition directive answering to the given fence name.
    pub fn new(kind: &'static str) -> Self {
        Admonition { kind }
    }
}

impl Directive for Admonition {
    fn name(&self) -> &'static str {
        self.kind
    }

    fn render(&self, options: &Options, inner_html: &str) -> String {
        let title = options.get("title").unwrap_or(&capitalize(self.kind)).to_string();
        format!(
            "<div class=\"admonition admonition-{kind}\">\
             <p class=\"admonition-title\">{title}</p>{inner_html}</div>",
            kind = self.kind,
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ----------------------------------------------------------------------------

/// A tabbed group container (`tabs`); each child must be a `tab`.
pub struct Tabs;

impl Directive for Tabs {
    fn name(&self) -> &'static str {
        "tabs"
    }

    fn render(&self, _options: &Options, inner_html: &str) -> String {
        format!("<div class=\"tabs\">{inner_html}</div>")
    }
}

/// A single tab within a `tabs` group.
pub struct Tab;

impl Directive for Tab {
    fn name(&self) -> &'static str {
        "tab"
    }

    fn allowed_parents(&self) -> Option<&'static [&'static str]> {
        Some(&["tabs"])
    }

    fn render(&self, options: &Options, inner_html: &str) -> String {
        let title = options.get("title").unwrap_or("Tab");
        format!(
            "<div class=\"tab\" data-title=\"{title}\">{inner_html}</div>",
        )
    }
}

// ----------------------------------------------------------------------------

/// An ordered walkthrough container (`steps`); each child must be a `step`.
pub struct Steps;

impl Directive for Steps {
    fn name(&self) -> &'static str {
        "steps"
    }

    fn render(&self, _options: &Options, inner_html: &str) -> String {
        format!("<ol class=\"steps\">{inner_html}</ol>")
    }
}

/// A single step within a `steps` walkthrough (spec §8 Scenario F).
pub struct Step;

impl Directive for Step {
    fn name(&self) -> &'static str {
        "step"
    }

    fn allowed_parents(&self) -> Option<&'static [&'static str]> {
        Some(&["steps"])
    }

    fn render(&self, options: &Options, inner_html: &str) -> String {
        let title = options.get("title").map_or(String::new(), |t| {
            format!("<p class=\"step-title\">{t}</p>")
        });
        format!("<li class=\"step\">{title}{inner_html}</li>")
    }
}

// ----------------------------------------------------------------------------

/// A code-tabs container, grouping syntax-highlighted snippets by language.
pub struct CodeTabs;

impl Directive for CodeTabs {
    fn name(&self) -> &'static str {
        "code-tabs"
    }

    fn render(&self, _options: &Options, inner_html: &str) -> String {
        format!("<div class=\"code-tabs\">{inner_html}</div>")
    }
}

// ----------------------------------------------------------------------------

/// Stateless registry of every directive class known to a build.
///
/// Built once at startup and shared by reference across the worker pool
/// (spec §5's "Directive instances" row); option-parsing has no further
/// per-class setup cost, so there is nothing to cache beyond the registry
/// itself.
#[derive(Clone)]
pub struct Registry {
    directives: BTreeMap<&'static str, Arc<dyn Directive>>,
}

impl Registry {
    /// Builds the default registry: admonitions, tabs, steps, code-tabs.
    pub fn with_builtins() -> Self {
        let mut registry = Registry { directives: BTreeMap::new() };
        for kind in ["note", "warning", "tip", "danger", "info"] {
            registry.register(Arc::new(Admonition::new(kind)));
        }
        registry.register(Arc::new(Tabs));
        registry.register(Arc::new(Tab));
        registry.register(Arc::new(Steps));
        registry.register(Arc::new(Step));
        registry.register(Arc::new(CodeTabs));
        registry
    }

    /// Registers a directive, keyed by its name.
    pub fn register(&mut self, directive: Arc<dyn Directive>) {
        self.directives.insert(directive.name(), directive);
    }

    /// Looks up a directive by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Directive>> {
        self.directives.get(name)
    }

    /// Validates that `name` is allowed to nest directly under `parent`
    /// (or under nothing, if `parent` is `None`). Returns the violation
    /// error (code `T003`) the caller should surface per the `strict`/
    /// `validate_contracts` disposition of spec §5's contract-validation
    /// mode, rather than raising it itself.
    pub fn check_contract(
        &self, name: &str, parent: Option<&str>,
    ) -> Result<(), BuildError> {
        let Some(directive) = self.get(name) else {
            return Ok(());
        };
        let Some(allowed) = directive.allowed_parents() else {
            return Ok(());
        };
        let matches = parent.is_some_and(|p| allowed.contains(&p));
        if matches {
            Ok(())
        } else {
            Err(BuildError::new(
                "T003",
                ErrorKind::Directive,
                format!(
                    "directive `{name}` must be nested directly under one of {allowed:?}, \
                     found {parent:?}"
                ),
            ))
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse_quoted_title_and_flags() {
        let options = Options::parse(r#"title="Careful now" collapsible"#);
        assert_eq!(options.get("title"), Some("Careful now"));
    }

    #[test]
    fn options_parse_bare_title_words() {
        let options = Options::parse("Watch out");
        assert_eq!(options.get("title"), Some("Watch out"));
    }

    #[test]
    fn registry_resolves_builtin_admonitions() {
        let registry = Registry::with_builtins();
        assert!(registry.get("note").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn step_outside_steps_violates_contract() {
        let registry = Registry::with_builtins();
        assert!(registry.check_contract("step", Some("steps")).is_ok());
        let err = registry.check_contract("step", None).unwrap_err();
        assert_eq!(err.code, "T003");
        let err = registry.check_contract("step", Some("tabs")).unwrap_err();
        assert_eq!(err.code, "T003");
    }

    #[test]
    fn admonition_renders_title_and_kind_class() {
        let note = Admonition::new("note");
        let html = note.render(&Options::parse(""), "<p>body</p>");
        assert!(html.contains("admonition-note"));
        assert!(html.contains("Note"));
        assert!(html.contains("<p>body</p>"));
    }
}
