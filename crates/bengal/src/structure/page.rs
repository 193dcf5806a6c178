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

//! Page: the atomic unit of content (spec §3.1).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::dynamic::Dynamic;
use super::toc::Heading;

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Page frontmatter metadata, keyed by frontmatter key.
pub type PageMeta = BTreeMap<String, Dynamic>;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// The atomic unit of content.
///
/// A page's logical URL is unique within `(version, lang)` space (spec §3.1
/// invariant); discovery enforces this and raises `DuplicateURLError`
/// otherwise. `content_html` is populated exactly once per build, by the
/// rendering pipeline (§4.2) — a freshly discovered page always has it unset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    /// Source path, relative to the content root. Virtual pages use a
    /// synthetic path under their mount prefix.
    pub source_path: PathBuf,
    /// Canonical, baseurl-agnostic logical URL. Identity and routing key.
    pub url: String,
    /// Page title, resolved from frontmatter, the first `h1`, or the file
    /// name, in that order (mirrors the teacher's title-extraction order).
    pub title: String,
    /// Frontmatter metadata map (scalars/lists/maps, §6.3 recognized keys
    /// plus any free-form extras).
    pub metadata: PageMeta,
    /// Raw markdown body, before substitution or parsing.
    pub raw: String,
    /// Rendered HTML body. `None` until the rendering pipeline populates it.
    pub content_html: Option<String>,
    /// Table of contents extracted from rendered headings.
    pub toc: Vec<Heading>,
    /// Content-relative path of the owning section, a non-owning
    /// back-reference (spec §9: back-references are indices, not pointers).
    pub section_path: PathBuf,
    /// Documentation version, if versioning is enabled.
    pub version: Option<String>,
    /// Locale code.
    pub lang: Option<String>,
    /// Publish date, normalized to `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Sort weight; lower sorts first.
    pub weight: i64,
    /// Tags.
    pub tags: Vec<String>,
    /// Draft flag: included in dev builds, excluded in production.
    pub draft: bool,
    /// Layout template name override.
    pub layout: Option<String>,
    /// URL aliases that should redirect to this page.
    pub aliases: Vec<String>,
    /// Whether this page was produced by a virtual content source.
    pub is_virtual: bool,
    /// Whether this page was produced by an autodoc virtual source.
    pub is_autodoc: bool,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Page {
    /// Creates a page from a parsed source file, before rendering.
    pub fn new(
        source_path: PathBuf, section_path: PathBuf, url: String, title: String,
        metadata: PageMeta, raw: String,
    ) -> Self {
        let weight = metadata
            .get("weight")
            .and_then(|v| match v {
                Dynamic::Integer(n) => Some(*n),
                Dynamic::Float(f) => Some(f.0 as i64),
                _ => None,
            })
            .unwrap_or(0);
        let draft = matches!(metadata.get("draft"), Some(Dynamic::Bool(true)));
        let tags = metadata
            .get("tags")
            .and_then(|v| match v {
                Dynamic::List(values) => Some(
                    values.iter().filter_map(Dynamic::as_str).map(str::to_string).collect(),
                ),
                _ => None,
            })
            .unwrap_or_default();
        let aliases = metadata
            .get("aliases")
            .and_then(|v| match v {
                Dynamic::List(values) => Some(
                    values.iter().filter_map(Dynamic::as_str).map(str::to_string).collect(),
                ),
                _ => None,
            })
            .unwrap_or_default();
        let version = metadata.get("version").and_then(Dynamic::as_str).map(str::to_string);
        let lang = metadata.get("lang").and_then(Dynamic::as_str).map(str::to_string);
        let date = metadata.get("date").and_then(Dynamic::as_str).map(str::to_string);
        let layout = metadata.get("layout").and_then(Dynamic::as_str).map(str::to_string);

        Page {
            source_path,
            url,
            title,
            metadata,
            raw,
            content_html: None,
            toc: Vec::new(),
            section_path,
            version,
            lang,
            date,
            weight,
            tags,
            draft,
            layout,
            aliases,
            is_virtual: false,
            is_autodoc: false,
        }
    }

    /// Returns the determinism tie-break key for sibling ordering: weight,
    /// then `(title, path)` (spec §4.1 edge case).
    pub fn order_key(&self) -> (i64, &str, &Path) {
        (self.weight, self.title.as_str(), self.source_path.as_path())
    }

    /// Returns whether this page belongs to the given version, or has no
    /// version (i.e. is a `_shared/` page, present in every version tree).
    pub fn matches_version(&self, version: Option<&str>) -> bool {
        match (&self.version, version) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => a == b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(weight: i64, title: &str) -> Page {
        Page::new(
            PathBuf::from(format!("{title}.md")),
            PathBuf::from(""),
            format!("/{title}/"),
            title.to_string(),
            {
                let mut meta = PageMeta::new();
                meta.insert("weight".to_string(), Dynamic::Integer(weight));
                meta
            },
            String::new(),
        )
    }

    #[test]
    fn order_key_breaks_ties_by_title_then_path() {
        let mut pages = vec![page(0, "beta"), page(0, "alpha"), page(-10, "zeta")];
        pages.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn matches_version_treats_unversioned_page_as_shared() {
        let mut shared = page(0, "shared");
        shared.version = None;
        assert!(shared.matches_version(Some("v1")));
        assert!(shared.matches_version(None));

        let mut versioned = page(0, "versioned");
        versioned.version = Some("v1".to_string());
        assert!(versioned.matches_version(Some("v1")));
        assert!(!versioned.matches_version(Some("v2")));
        assert!(!versioned.matches_version(None));
    }
}
