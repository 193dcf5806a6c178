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

//! Per-version NavTree cache (spec §4.3).

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::super::site::Site;
use super::NavTree;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Caches one [`NavTree`] per version, built lazily and shared across every
/// page render in a build. `invalidate` drops every entry; the orchestrator
/// calls it whenever discovery reports a structural change (spec §4.4).
#[derive(Default)]
pub struct NavTreeCache {
    trees: RwLock<BTreeMap<Option<String>, NavTree>>,
}

impl NavTreeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        NavTreeCache::default()
    }

    /// Returns the tree for `version`, building and caching it on first use.
    pub fn get(&self, site: &Site, version: Option<&str>) -> NavTree {
        let key = version.map(str::to_string);
        if let Some(tree) = self.trees.read().expect("nav cache poisoned").get(&key) {
            return tree.clone();
        }
        let tree = NavTree::build(site, version);
        self.trees.write().expect("nav cache poisoned").insert(key, tree.clone());
        tree
    }

    /// Drops every cached tree, forcing the next [`NavTreeCache::get`] call
    /// per version to rebuild from the current section tree.
    pub fn invalidate(&self) {
        self.trees.write().expect("nav cache poisoned").clear();
    }

    /// Resolves the version-switch target URL cascade (spec §4.3): exact
    /// match in the target version, else the nearest enclosing section's
    /// index in the target version, else that version's root.
    pub fn version_switch_target(&self, site: &Site, to_version: &str, current_url: &str) -> String {
        let tail = strip_version_prefix(current_url);
        let tree = self.get(site, Some(to_version));

        let exact = format!("/{to_version}/{tail}");
        if tree.lookup(&exact).is_some() {
            return exact;
        }

        let mut tail_parent = parent_segment(tail);
        loop {
            let candidate = format!("/{to_version}/{tail_parent}");
            if tree.lookup(&candidate).is_some() {
                return candidate;
            }
            if tail_parent.is_empty() {
                break;
            }
            tail_parent = parent_segment(&tail_parent);
        }

        tree.root.url.clone().unwrap_or_else(|| format!("/{to_version}/"))
    }
}

/// Strips a leading `/<segment>/` (the source version) from a URL, leaving
/// the version-agnostic tail.
fn strip_version_prefix(url: &str) -> &str {
    let trimmed = url.trim_start_matches('/');
    match trimmed.find('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => "",
    }
}

/// Returns the parent directory of a trailing-slash path tail, e.g.
/// `"docs/advanced/"` -> `"docs/"`, `"docs/"` -> `""`.
fn parent_segment(tail: &str) -> String {
    let trimmed = tail.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => format!("{}/", &trimmed[..idx]),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::dynamic::Dynamic;
    use crate::structure::page::{Page, PageMeta};
    use std::io::Write as _;
    use std::path::PathBuf;

    fn page(path: &str, url: &str, title: &str, version: &str) -> Page {
        let mut meta = PageMeta::new();
        meta.insert("version".to_string(), Dynamic::String(version.to_string()));
        Page::new(PathBuf::from(path), PathBuf::from(""), url.to_string(), title.to_string(), meta, String::new())
    }

    fn site_with(pages: Vec<Page>) -> Site {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\ntitle = \"Example\"\n").unwrap();
        let config = crate::config::Config::new(file.path()).unwrap();
        let mut site = Site::new(PathBuf::from("content"), PathBuf::from("output"), config);
        site.root.pages = pages;
        site
    }

    #[test]
    fn falls_back_to_nearest_section_index_across_versions() {
        let mut v1_docs = crate::structure::section::Section::new("docs", PathBuf::from("docs"));
        v1_docs.index =
            Some(page("v1/docs/_index.md", "/v1/docs/", "Docs", "v1"));
        let mut v2_docs = crate::structure::section::Section::new("docs", PathBuf::from("docs"));
        v2_docs.index =
            Some(page("v2/docs/_index.md", "/v2/docs/", "Docs", "v2"));
        v2_docs.pages.push(page("v2/docs/advanced.md", "/v2/docs/advanced/", "Advanced", "v2"));

        let mut site = site_with(Vec::new());
        site.root.sections.push(v1_docs);
        // second section merges in because names differ per version root;
        // simulate by nesting directly under root for this test
        site.root.sections.push(v2_docs);

        let cache = NavTreeCache::new();
        let target = cache.version_switch_target(&site, "v1", "/v2/docs/advanced/");
        assert_eq!(target, "/v1/docs/");
    }

    #[test]
    fn exact_match_wins_when_present() {
        let page_v1 = page("v1/intro.md", "/v1/intro/", "Intro", "v1");
        let page_v2 = page("v2/intro.md", "/v2/intro/", "Intro", "v2");
        let site = site_with(vec![page_v1, page_v2]);

        let cache = NavTreeCache::new();
        let target = cache.version_switch_target(&site, "v1", "/v2/intro/");
        assert_eq!(target, "/v1/intro/");
    }
}
