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

//! Markdown rendering: variable substitution, directive-aware parsing to
//! HTML, heading/dependency extraction (spec §4.2 steps 1-4).

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options as CmarkOptions, Parser, Tag, TagEnd,
};

use crate::error::{BuildError, ErrorKind};
use crate::highlight::SyntaxHighlighter;
use crate::template::context::Context;

use super::directive::{Options as DirectiveOptions, Registry};
use super::toc::{assign_ids, Heading};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// References collected while parsing a page's markdown (spec §4.2 step 3):
/// other pages, assets, and icons the rendered output depends on. Folded
/// into the page's dependency set by the rendering pipeline (§4.4).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// Relative links resolved to other content pages.
    pub pages: BTreeSet<String>,
    /// Image/asset references.
    pub assets: BTreeSet<String>,
    /// Icon names referenced via directive `icon=` options.
    pub icons: BTreeSet<String>,
}

/// The result of parsing one page's markdown body.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    /// Rendered HTML body (before the layout template wraps it).
    pub html: String,
    /// Headings, in document order, with ids assigned.
    pub headings: Vec<Heading>,
    /// Collected cross-references.
    pub dependencies: Dependencies,
    /// Non-fatal directive contract violations (code `T003`/`T004`),
    /// already filtered for strict-mode disposition by the caller.
    pub warnings: Vec<BuildError>,
}

/// A parsed block: either a run of plain markdown, or a directive fence
/// with its parsed options and nested blocks.
enum Block {
    Markdown(String),
    Directive { name: String, options: DirectiveOptions, children: Vec<Block> },
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Substitutes `{{ ... }}` template expressions inside a markdown body
/// using the restricted per-page variable context (spec §4.2 step 1),
/// before any markdown parsing happens.
pub fn substitute(raw: &str, ctx: &Context) -> Result<String, BuildError> {
    let mut env = minijinja::Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    let map: BTreeMap<String, minijinja::Value> =
        ctx.values.clone().into_iter().map(|(k, v)| (k, v.into())).collect();
    env.render_str(raw, minijinja::Value::from(map)).map_err(|err| {
        BuildError::new("P003", ErrorKind::Content, err.to_string()).with_source(err)
    })
}

/// Parses a (already-substituted) markdown body to HTML, expanding
/// directives via `registry` and collecting headings/dependencies (spec
/// §4.2 steps 2-4). Directive contract violations are fatal in `strict`
/// mode, warnings otherwise. Fenced code blocks are rendered through
/// `highlighter`.
pub fn parse(
    markdown: &str, registry: &Registry, strict: bool, highlighter: &dyn SyntaxHighlighter,
) -> Result<ParseOutput, BuildError> {
    let blocks = split_blocks(markdown);
    let mut headings = Vec::new();
    let mut dependencies = Dependencies::default();
    let mut warnings = Vec::new();
    let html = render_blocks(
        &blocks, registry, None, strict, highlighter, &mut headings, &mut dependencies, &mut warnings,
    )?;
    assign_ids(&mut headings);
    Ok(ParseOutput { html, headings, dependencies, warnings })
}

fn split_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let (blocks, _) = split_lines(&lines, 0);
    blocks
}

fn split_lines(lines: &[&str], mut i: usize) -> (Vec<Block>, usize) {
    let mut blocks = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    while i < lines.len() {
        let trimmed = lines[i].trim_start();
        if let Some(rest) = trimmed.strip_prefix(":::") {
            let rest = rest.trim();
            if rest.is_empty() {
                // Closing fence for our caller's directive; stop without
                // consuming it, so the caller can skip past it.
                break;
            }
            if !buffer.is_empty() {
                blocks.push(Block::Markdown(buffer.join("\n")));
                buffer.clear();
            }
            let mut parts = rest.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or_default().to_string();
            let options_line = parts.next().unwrap_or_default();
            let (children, next_i) = split_lines(lines, i + 1);
            blocks.push(Block::Directive {
                name,
                options: DirectiveOptions::parse(options_line),
                children,
            });
            i = (next_i + 1).min(lines.len());
            continue;
        }
        buffer.push(lines[i]);
        i += 1;
    }
    if !buffer.is_empty() {
        blocks.push(Block::Markdown(buffer.join("\n")));
    }
    (blocks, i)
}

#[allow(clippy::too_many_arguments)]
fn render_blocks(
    blocks: &[Block], registry: &Registry, parent: Option<&str>, strict: bool,
    highlighter: &dyn SyntaxHighlighter, headings: &mut Vec<Heading>, dependencies: &mut Dependencies,
    warnings: &mut Vec<BuildError>,
) -> Result<String, BuildError> {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Markdown(text) => {
                out.push_str(&render_segment(text, highlighter, headings, dependencies));
            }
            Block::Directive { name, options, children } => {
                if let Some(icon) = options.get("icon") {
                    dependencies.icons.insert(icon.to_string());
                }
                if let Err(err) = registry.check_contract(name, parent) {
                    if strict {
                        return Err(err);
                    }
                    warnings.push(err);
                }
                let inner = render_blocks(
                    children, registry, Some(name.as_str()), strict, highlighter, headings, dependencies,
                    warnings,
                )?;
                match registry.get(name) {
                    Some(directive) => out.push_str(&directive.render(options, &inner)),
                    None => {
                        warnings.push(BuildError::new(
                            "T004",
                            ErrorKind::Directive,
                            format!("unknown directive `{name}`"),
                        ));
                        out.push_str(&inner);
                    }
                }
            }
        }
    }
    Ok(out)
}

fn render_segment(
    text: &str, highlighter: &dyn SyntaxHighlighter, headings: &mut Vec<Heading>,
    dependencies: &mut Dependencies,
) -> String {
    let options = CmarkOptions::ENABLE_TABLES
        | CmarkOptions::ENABLE_FOOTNOTES
        | CmarkOptions::ENABLE_STRIKETHROUGH
        | CmarkOptions::ENABLE_TASKLISTS;
    let events: Vec<Event> = Parser::new_ext(text, options).collect();

    let mut current_heading: Option<(u8, String)> = None;
    for event in &events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((heading_level(*level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    headings.push(Heading { level, title, id: String::new() });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = current_heading.as_mut() {
                    title.push_str(text);
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                record_reference(&mut dependencies.pages, dest_url);
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                dependencies.assets.insert(dest_url.to_string());
            }
            _ => {}
        }
    }

    let events = rewrite_code_blocks(events, highlighter);

    let mut rendered = String::new();
    html::push_html(&mut rendered, events.into_iter());
    rendered
}

/// Replaces each fenced-code event run with a single `Html` event produced
/// by `highlighter`, so the default pulldown-cmark code rendering is never
/// used for a fence (spec §4.2 step 2's "code blocks are highlighted").
fn rewrite_code_blocks<'a>(
    events: Vec<Event<'a>>, highlighter: &dyn SyntaxHighlighter,
) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter();
    while let Some(event) = iter.next() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or("").to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                let mut code = String::new();
                for inner in iter.by_ref() {
                    match inner {
                        Event::Text(text) => code.push_str(&text),
                        Event::End(TagEnd::CodeBlock) => break,
                        _ => {}
                    }
                }
                let html = highlighter.highlight(&code, &lang);
                out.push(Event::Html(CowStr::from(html)));
            }
            other => out.push(other),
        }
    }
    out
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn record_reference(pages: &mut BTreeSet<String>, dest: &str) {
    if dest.starts_with('#') || dest.starts_with("http://") || dest.starts_with("https://") {
        return;
    }
    pages.insert(dest.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainHighlighter;

    #[test]
    fn parse_renders_plain_markdown_and_collects_headings() {
        let output = parse(
            "# Title\n\nBody text with [a link](other.md).\n",
            &Registry::with_builtins(),
            false,
            &PlainHighlighter,
        )
        .unwrap();
        assert!(output.html.contains("<h1>Title</h1>"));
        assert_eq!(output.headings.len(), 1);
        assert_eq!(output.headings[0].title, "Title");
        assert!(output.dependencies.pages.contains("other.md"));
    }

    #[test]
    fn parse_expands_admonition_directive() {
        let text = ":::note Careful\nBody.\n:::\n";
        let output = parse(text, &Registry::with_builtins(), false, &PlainHighlighter).unwrap();
        assert!(output.html.contains("admonition-note"));
        assert!(output.html.contains("Careful"));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn parse_warns_on_step_outside_steps_in_lenient_mode() {
        let text = ":::step\nDo the thing.\n:::\n";
        let output = parse(text, &Registry::with_builtins(), false, &PlainHighlighter).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].code, "T003");
    }

    #[test]
    fn parse_fails_on_step_outside_steps_in_strict_mode() {
        let text = ":::step\nDo the thing.\n:::\n";
        let err = parse(text, &Registry::with_builtins(), true, &PlainHighlighter).unwrap_err();
        assert_eq!(err.code, "T003");
    }

    #[test]
    fn parse_accepts_step_nested_in_steps() {
        let text = ":::steps\n:::step\nFirst.\n:::\n:::\n";
        let output = parse(text, &Registry::with_builtins(), true, &PlainHighlighter).unwrap();
        assert!(output.warnings.is_empty());
        assert!(output.html.contains("class=\"steps\""));
        assert!(output.html.contains("class=\"step\""));
    }

    #[test]
    fn parse_highlights_fenced_code_blocks() {
        let text = "```rust\nfn main() {}\n```\n";
        let output = parse(text, &Registry::with_builtins(), false, &PlainHighlighter).unwrap();
        assert!(output.html.contains("language-rust"));
        assert!(output.html.contains("fn main() {}"));
    }

    #[test]
    fn substitute_resolves_site_variables() {
        let ctx = Context::new().with("title", "Hello");
        let out = substitute("# {{ title }}", &ctx).unwrap();
        assert_eq!(out, "# Hello");
    }
}
