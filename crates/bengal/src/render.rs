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

//! Per-page rendering pipeline (spec §4.2): substitute, directive-aware
//! markdown parse, template render, post-process, output fingerprint.
//!
//! `Page`/`Section`/`Site` are frozen after discovery (§5's resource table),
//! so a render never mutates them in place — it produces a [`RenderedPage`]
//! that the caller folds back in by URL.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::Config;
use crate::error::BuildError;
use crate::highlight::{escape_html, SyntaxHighlighter};
use crate::structure::directive::Registry;
use crate::structure::dynamic::Dynamic;
use crate::structure::markdown::{self, Dependencies};
use crate::structure::nav::{NavNode, NavTreeContext};
use crate::structure::page::Page;
use crate::structure::section::Section;
use crate::structure::site::Site;
use crate::structure::toc::Heading;
use crate::template::context::{Context, ParamsView};
use crate::template::TemplateEngine;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Layout used when a page sets no `layout` frontmatter key. Not named by
/// the spec; chosen to match the conventional single-template theme layout.
const DEFAULT_LAYOUT: &str = "page.html";

/// Matches `href="..."`/`src="..."` attributes for base-path rewriting.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<attr>href|src)="(?P<url>[^"]*)""#).unwrap()
});

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// The outcome of rendering one page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// The page's logical URL, used as the merge key back into `Site`.
    pub url: String,
    /// Final HTML, after template rendering and post-processing.
    pub html: String,
    /// Headings extracted during markdown parsing, ids assigned.
    pub toc: Vec<Heading>,
    /// Cross-references collected while parsing (spec §4.2 step 3).
    pub dependencies: Dependencies,
    /// SHA-256 of the final HTML, compared against the prior build's
    /// recorded output fingerprint to decide whether the writer rewrites
    /// the file (spec §4.2's "Output fingerprint").
    pub output_hash: String,
    /// Non-fatal warnings collected during parsing (directive contracts).
    pub warnings: Vec<BuildError>,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Renders one page through the full pipeline (spec §4.2 steps 1-7).
///
/// `section_cascades` is the stack of enclosing sections' cascade layers,
/// innermost first (the caller walks from `section` up to the site root);
/// `nav` is this version's navigation tree, already overlaid with the
/// active trail for `page.url` (spec §4.3's `NavTreeContext`).
#[allow(clippy::too_many_arguments)]
pub fn render_page(
    page: &Page, site: &Site, section: &Section, section_cascades: &[Dynamic],
    nav: &NavTreeContext<'_>, engine: &dyn TemplateEngine, registry: &Registry,
    highlighter: &dyn SyntaxHighlighter, strict: bool,
) -> Result<RenderedPage, BuildError> {
    let params = ParamsView::new(
        Dynamic::Map(page_fields(page)),
        section_cascades.to_vec(),
        site.config.params().clone(),
    );

    let pre_ctx = Context::new()
        .with("page", Dynamic::Map(page_fields(page)))
        .with("site", site_to_dynamic(site))
        .with("config", config_to_dynamic(&site.config))
        .with("params", Dynamic::Map(params.to_map()))
        .with("section", section_to_dynamic(section));

    let substituted = markdown::substitute(&page.raw, &pre_ctx)?;
    let parsed = markdown::parse(&substituted, registry, strict, highlighter)?;

    let mut page_map = page_fields(page);
    page_map.insert(
        "toc".to_string(),
        Dynamic::List(parsed.headings.iter().map(heading_to_dynamic).collect()),
    );

    let layout = page.layout.clone().unwrap_or_else(|| DEFAULT_LAYOUT.to_string());
    let ctx = Context::new()
        .with("page", Dynamic::Map(page_map))
        .with("site", site_to_dynamic(site))
        .with("config", config_to_dynamic(&site.config))
        .with("params", Dynamic::Map(params.to_map()))
        .with("section", section_to_dynamic(section))
        .with("nav", nav_to_dynamic(nav))
        .with("content", parsed.html.clone())
        .with("content_html", parsed.html.clone());

    let rendered = match engine.render_template(&layout, ctx) {
        Ok(html) => html,
        Err(err) if strict => return Err(err),
        Err(err) => error_card(&err),
    };

    let html = rewrite_links(&rendered, &site.config.get_base_path());
    let output_hash = crate::cache::fingerprint::content_hash(html.as_bytes());

    Ok(RenderedPage {
        url: page.url.clone(),
        html,
        toc: parsed.headings,
        dependencies: parsed.dependencies,
        output_hash,
        warnings: parsed.warnings,
    })
}

/// Builds the page's frontmatter fields (minus `toc`, unknown before the
/// markdown parse completes) as a template-facing map: metadata overlaid
/// with the computed fields `Page::new` derives from it.
fn page_fields(page: &Page) -> BTreeMap<String, Dynamic> {
    let mut map = page.metadata.clone();
    map.insert("title".to_string(), Dynamic::String(page.title.clone()));
    map.insert("url".to_string(), Dynamic::String(page.url.clone()));
    map.insert("weight".to_string(), Dynamic::Integer(page.weight));
    map.insert("draft".to_string(), Dynamic::Bool(page.draft));
    map.insert(
        "tags".to_string(),
        Dynamic::List(page.tags.iter().cloned().map(Dynamic::String).collect()),
    );
    map.insert(
        "aliases".to_string(),
        Dynamic::List(page.aliases.iter().cloned().map(Dynamic::String).collect()),
    );
    map.insert("is_virtual".to_string(), Dynamic::Bool(page.is_virtual));
    map.insert("is_autodoc".to_string(), Dynamic::Bool(page.is_autodoc));
    if let Some(date) = &page.date {
        map.insert("date".to_string(), Dynamic::String(date.clone()));
    }
    if let Some(version) = &page.version {
        map.insert("version".to_string(), Dynamic::String(version.clone()));
    }
    if let Some(lang) = &page.lang {
        map.insert("lang".to_string(), Dynamic::String(lang.clone()));
    }
    if let Some(layout) = &page.layout {
        map.insert("layout".to_string(), Dynamic::String(layout.clone()));
    }
    map
}

fn heading_to_dynamic(heading: &Heading) -> Dynamic {
    let mut map = BTreeMap::new();
    map.insert("level".to_string(), Dynamic::Integer(i64::from(heading.level)));
    map.insert("title".to_string(), Dynamic::String(heading.title.clone()));
    map.insert("id".to_string(), Dynamic::String(heading.id.clone()));
    Dynamic::Map(map)
}

fn site_to_dynamic(site: &Site) -> Dynamic {
    let cfg_site = site.config.site();
    let mut map = BTreeMap::new();
    map.insert("title".to_string(), Dynamic::String(cfg_site.title.clone()));
    map.insert("baseurl".to_string(), Dynamic::String(cfg_site.baseurl.clone()));
    map.insert(
        "default_language".to_string(),
        Dynamic::String(cfg_site.default_language.clone()),
    );
    map.insert(
        "description".to_string(),
        cfg_site.description.clone().map(Dynamic::String).unwrap_or(Dynamic::Null),
    );
    Dynamic::Map(map)
}

fn config_to_dynamic(config: &Config) -> Dynamic {
    let mut map = BTreeMap::new();
    map.insert("base_path".to_string(), Dynamic::String(config.get_base_path()));
    map.insert("strict".to_string(), Dynamic::Bool(config.build().strict));
    map.insert("production".to_string(), Dynamic::Bool(config.build().production));
    Dynamic::Map(map)
}

/// Builds the template-facing `section` value, including a listing of its
/// own pages and child sections so index-page templates can enumerate
/// their children without a separate context field.
fn section_to_dynamic(section: &Section) -> Dynamic {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Dynamic::String(section.name.clone()));
    map.insert(
        "path".to_string(),
        Dynamic::String(section.path.to_string_lossy().into_owned()),
    );
    let pages: Vec<Dynamic> = section.ordered_pages().iter().map(|p| page_summary(p)).collect();
    map.insert("pages".to_string(), Dynamic::List(pages));
    let subsections: Vec<Dynamic> =
        section.ordered_sections().iter().map(|s| section_summary(s)).collect();
    map.insert("subsections".to_string(), Dynamic::List(subsections));
    Dynamic::Map(map)
}

fn page_summary(page: &Page) -> Dynamic {
    let mut map = BTreeMap::new();
    map.insert("title".to_string(), Dynamic::String(page.title.clone()));
    map.insert("url".to_string(), Dynamic::String(page.url.clone()));
    map.insert("weight".to_string(), Dynamic::Integer(page.weight));
    map.insert("date".to_string(), page.date.clone().map(Dynamic::String).unwrap_or(Dynamic::Null));
    Dynamic::Map(map)
}

fn section_summary(section: &Section) -> Dynamic {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Dynamic::String(section.name.clone()));
    map.insert(
        "path".to_string(),
        Dynamic::String(section.path.to_string_lossy().into_owned()),
    );
    if let Some(index) = &section.index {
        map.insert("url".to_string(), Dynamic::String(index.url.clone()));
        map.insert("title".to_string(), Dynamic::String(index.title.clone()));
    }
    Dynamic::Map(map)
}

/// Projects the navigation tree to a template-facing value, baking
/// `active`/`in_trail` flags in fresh from `nav` on every call. The
/// underlying `NavTree`/`NavNode` stay untouched (spec §8 property 4).
fn nav_to_dynamic(nav: &NavTreeContext<'_>) -> Dynamic {
    nav_node_to_dynamic(&nav.tree().root, nav)
}

fn nav_node_to_dynamic(node: &NavNode, nav: &NavTreeContext<'_>) -> Dynamic {
    let mut map = BTreeMap::new();
    map.insert("id".to_string(), Dynamic::String(node.id.clone()));
    map.insert("title".to_string(), Dynamic::String(node.title.clone()));
    map.insert("url".to_string(), node.url.clone().map(Dynamic::String).unwrap_or(Dynamic::Null));
    map.insert("icon".to_string(), node.icon.clone().map(Dynamic::String).unwrap_or(Dynamic::Null));
    map.insert("is_index".to_string(), Dynamic::Bool(node.is_index));
    let active = node.url.as_deref().is_some_and(|url| nav.is_current(url));
    let in_trail = node.url.as_deref().is_some_and(|url| nav.is_in_trail(url));
    map.insert("active".to_string(), Dynamic::Bool(active));
    map.insert("in_trail".to_string(), Dynamic::Bool(in_trail));
    let children: Vec<Dynamic> =
        node.children.iter().map(|child| nav_node_to_dynamic(child, nav)).collect();
    map.insert("children".to_string(), Dynamic::List(children));
    Dynamic::Map(map)
}

/// Renders a lenient-mode fallback for a failed template render (spec
/// §4.2's "Missing icon/asset → ... placeholder" / "otherwise the page is
/// rendered with an error card").
fn error_card(err: &BuildError) -> String {
    format!(
        "<div class=\"bengal-error-card\"><strong>{}</strong>: {}</div>\n",
        escape_html(err.code),
        escape_html(&err.message),
    )
}

/// Rewrites root-relative `href`/`src` attributes to carry the configured
/// base path (spec §4.2 step 6's "internal-link rewriting with base-url").
/// A no-op when the site has no base path (the common, unprefixed case).
fn rewrite_links(html: &str, base_path: &str) -> String {
    if base_path.is_empty() || base_path == "/" {
        return html.to_string();
    }
    LINK_RE
        .replace_all(html, |captures: &Captures| {
            let attr = &captures["attr"];
            let url = &captures["url"];
            if url.starts_with('/') && !url.starts_with("//") {
                format!("{attr}=\"{base_path}{url}\"")
            } else {
                captures[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainHighlighter;
    use crate::structure::nav::NavTree;
    use crate::structure::page::PageMeta;
    use crate::template::minijinja_engine::MinijinjaEngine;
    use std::io::Write as _;
    use std::path::PathBuf;

    fn config(baseurl: &str) -> Config {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\ntitle = \"Example\"\nbaseurl = \"{baseurl}\"\n").unwrap();
        Config::new(file.path()).unwrap()
    }

    fn page(title: &str, url: &str, raw: &str) -> Page {
        Page::new(
            PathBuf::from(format!("{title}.md")),
            PathBuf::from(""),
            url.to_string(),
            title.to_string(),
            PageMeta::new(),
            raw.to_string(),
        )
    }

    fn engine_with_template(dir: &std::path::Path, name: &str, body: &str) -> MinijinjaEngine {
        std::fs::write(dir.join(name), body).unwrap();
        MinijinjaEngine::new(vec![dir.to_path_buf()])
    }

    #[test]
    fn render_page_builds_context_and_wraps_content() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with_template(
            dir.path(),
            "page.html",
            "<h1>{{ page.title }}</h1>{{ content_html }}",
        );
        let mut site = Site::new(PathBuf::from("content"), PathBuf::from("output"), config(""));
        let p = page("Intro", "/intro/", "hello world");
        site.root.pages.push(p.clone());
        let tree = NavTree::build(&site, None);
        let nav = NavTreeContext::new(&tree, p.url.clone());

        let rendered = render_page(
            &p, &site, &site.root, &[], &nav, &engine, &Registry::with_builtins(),
            &PlainHighlighter, false,
        )
        .unwrap();

        assert!(rendered.html.contains("<h1>Intro</h1>"));
        assert!(rendered.html.contains("hello world"));
        assert_eq!(rendered.url, "/intro/");
    }

    #[test]
    fn render_page_renders_error_card_in_lenient_mode() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MinijinjaEngine::new(vec![dir.path().to_path_buf()]);
        let site = Site::new(PathBuf::from("content"), PathBuf::from("output"), config(""));
        let p = page("Missing", "/missing/", "body");
        let tree = NavTree::build(&site, None);
        let nav = NavTreeContext::new(&tree, p.url.clone());

        let rendered = render_page(
            &p, &site, &site.root, &[], &nav, &engine, &Registry::with_builtins(),
            &PlainHighlighter, false,
        )
        .unwrap();

        assert!(rendered.html.contains("bengal-error-card"));
        assert!(rendered.html.contains("T001"));
    }

    #[test]
    fn render_page_propagates_template_error_in_strict_mode() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MinijinjaEngine::new(vec![dir.path().to_path_buf()]);
        let site = Site::new(PathBuf::from("content"), PathBuf::from("output"), config(""));
        let p = page("Missing", "/missing/", "body");
        let tree = NavTree::build(&site, None);
        let nav = NavTreeContext::new(&tree, p.url.clone());

        let err = render_page(
            &p, &site, &site.root, &[], &nav, &engine, &Registry::with_builtins(),
            &PlainHighlighter, true,
        )
        .unwrap_err();
        assert_eq!(err.code, "T001");
    }

    #[test]
    fn rewrite_links_prefixes_root_relative_urls_only() {
        let html = r#"<a href="/guide/">g</a><a href="https://x.test/">x</a><img src="//cdn/a.png">"#;
        let out = rewrite_links(html, "/docs");
        assert!(out.contains("href=\"/docs/guide/\""));
        assert!(out.contains("href=\"https://x.test/\""));
        assert!(out.contains("src=\"//cdn/a.png\""));
    }

    #[test]
    fn rewrite_links_is_noop_for_root_base_path() {
        let html = r#"<a href="/guide/">g</a>"#;
        assert_eq!(rewrite_links(html, "/"), html);
    }

    #[test]
    fn nav_to_dynamic_marks_active_and_trail_fresh_per_render() {
        let mut site = Site::new(PathBuf::from("content"), PathBuf::from("output"), config(""));
        site.root.pages.push(page("Intro", "/intro/", "x"));
        site.root.pages.push(page("About", "/about/", "x"));
        let tree = NavTree::build(&site, None);

        fn find_child<'a>(tree_dynamic: &'a Dynamic, url: &str) -> &'a Dynamic {
            let Dynamic::List(items) =
                tree_dynamic.get("children").expect("root has children")
            else {
                panic!("children is not a list");
            };
            items
                .iter()
                .find(|item| item.get("url").and_then(Dynamic::as_str) == Some(url))
                .expect("child with matching url")
        }

        let nav_intro = NavTreeContext::new(&tree, "/intro/".to_string());
        let dynamic_intro = nav_to_dynamic(&nav_intro);
        assert_eq!(find_child(&dynamic_intro, "/intro/").get("active"), Some(&Dynamic::Bool(true)));
        assert_eq!(find_child(&dynamic_intro, "/about/").get("active"), Some(&Dynamic::Bool(false)));

        let nav_about = NavTreeContext::new(&tree, "/about/".to_string());
        let dynamic_about = nav_to_dynamic(&nav_about);
        assert_eq!(find_child(&dynamic_about, "/intro/").get("active"), Some(&Dynamic::Bool(false)));
        assert_eq!(find_child(&dynamic_about, "/about/").get("active"), Some(&Dynamic::Bool(true)));
    }
}
