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

//! Navigation tree: a pre-computed, cached, version-aware structure
//! consumed by templates (spec §3.1, §4.3).

use std::collections::BTreeMap;

use serde::Serialize;

use super::dynamic::Dynamic;
use super::section::Section;
use super::site::Site;

pub mod cache;
pub mod context;
mod iter;

pub use cache::NavTreeCache;
pub use context::NavTreeContext;
use iter::Iter;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A single navigation node.
///
/// `is_current`/`is_in_trail` deliberately do not live here: the NavTree
/// purity invariant (spec §8 property 4) requires that a cached tree's
/// nodes never carry per-render state. Those flags live exclusively in
/// [`NavTreeContext`], computed from this node's `url`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NavNode {
    /// Stable id: the owning section/page's content-relative path.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Target URL, `None` for a section with no index page.
    pub url: Option<String>,
    /// Icon name, from frontmatter `icon`.
    pub icon: Option<String>,
    /// Sort weight.
    pub weight: i64,
    /// Ordered children.
    pub children: Vec<NavNode>,
    /// Whether this node represents a section's index page.
    pub is_index: bool,
}

impl NavNode {
    /// Returns an iterator over this node and its descendants, pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(std::slice::from_ref(self))
    }
}

// ----------------------------------------------------------------------------

/// An immutable, cached navigation structure for one version.
///
/// Built lazily on first demand per `(version)` key and cached until
/// `structural_changed` invalidates it (spec §4.3). Never mutated after
/// construction — see [`NavTreeContext`] for the active-trail overlay.
#[derive(Clone, Debug)]
pub struct NavTree {
    /// Root node (synthetic; its own `url` is the site/version root).
    pub root: NavNode,
    /// The version this tree was built for, `None` if versioning is off.
    pub version: Option<String>,
    /// `url -> path of child indices from the root`, for `O(depth)` lookup.
    index: BTreeMap<String, Vec<usize>>,
}

impl NavTree {
    /// Builds a navigation tree for the given version from the site's
    /// section tree (spec §4.3's "NavTree build contract"): only pages
    /// matching `version` are included, plus unversioned/shared pages,
    /// which appear in every version's tree.
    pub fn build(site: &Site, version: Option<&str>) -> Self {
        let root = build_node(&site.root, version, "");
        let mut index = BTreeMap::new();
        index_node(&root, Vec::new(), &mut index);
        NavTree { root, version: version.map(str::to_string), index }
    }

    /// Looks up a node by its URL.
    pub fn lookup(&self, url: &str) -> Option<&NavNode> {
        let path = self.index.get(url)?;
        get_by_path(&self.root, path)
    }

    /// Returns an iterator over every node, pre-order.
    pub fn iter(&self) -> Iter<'_> {
        self.root.iter()
    }

    /// Returns the ordered list of URLs in pre-order; used by the output
    /// writer and the version-manifest (spec §4.5, §8 property 7).
    pub fn urls(&self) -> Vec<&str> {
        self.iter().filter_map(|node| node.url.as_deref()).collect()
    }
}

fn build_node(section: &Section, version: Option<&str>, root_name: &str) -> NavNode {
    let mut children = Vec::new();
    for child in section.ordered_sections() {
        if has_version(child, version) {
            children.push(build_node(child, version, &child.name));
        }
    }
    for page in section.ordered_pages() {
        if page.matches_version(version) {
            children.push(NavNode {
                id: page.source_path.to_string_lossy().into_owned(),
                title: page.title.clone(),
                url: Some(page.url.clone()),
                icon: page.metadata.get("icon").and_then(Dynamic::as_str).map(str::to_string),
                weight: page.weight,
                children: Vec::new(),
                is_index: false,
            });
        }
    }

    match &section.index {
        Some(index) if index.matches_version(version) => NavNode {
            id: section.path.to_string_lossy().into_owned(),
            title: index.title.clone(),
            url: Some(index.url.clone()),
            icon: index.metadata.get("icon").and_then(Dynamic::as_str).map(str::to_string),
            weight: index.weight,
            children,
            is_index: true,
        },
        _ => NavNode {
            id: section.path.to_string_lossy().into_owned(),
            title: title_case(if section.name.is_empty() { root_name } else { &section.name }),
            url: None,
            icon: None,
            weight: 0,
            children,
            is_index: false,
        },
    }
}

fn has_version(section: &Section, version: Option<&str>) -> bool {
    section.all_pages().iter().any(|page| page.matches_version(version))
}

fn title_case(name: &str) -> String {
    let mut chars = name.replace(['-', '_'], " ").chars().collect::<Vec<_>>();
    if let Some(first) = chars.first_mut() {
        *first = first.to_ascii_uppercase();
    }
    chars.into_iter().collect()
}

fn index_node(node: &NavNode, path: Vec<usize>, index: &mut BTreeMap<String, Vec<usize>>) {
    if let Some(url) = &node.url {
        index.insert(url.clone(), path.clone());
    }
    for (i, child) in node.children.iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(i);
        index_node(child, child_path, index);
    }
}

fn get_by_path<'a>(root: &'a NavNode, path: &[usize]) -> Option<&'a NavNode> {
    let mut node = root;
    for &i in path {
        node = node.children.get(i)?;
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::page::{Page, PageMeta};
    use std::path::PathBuf;

    fn page(path: &str, url: &str, title: &str, version: Option<&str>) -> Page {
        let mut meta = PageMeta::new();
        if let Some(v) = version {
            meta.insert("version".to_string(), Dynamic::String(v.to_string()));
        }
        Page::new(PathBuf::from(path), PathBuf::from(""), url.to_string(), title.to_string(), meta, String::new())
    }

    fn site_with(pages: Vec<Page>) -> Site {
        use std::io::Write as _;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\ntitle = \"Example\"\n").unwrap();
        let config = crate::config::Config::new(file.path()).unwrap();
        let mut site = Site::new(PathBuf::from("content"), PathBuf::from("output"), config);
        site.root.pages = pages;
        site
    }

    #[test]
    fn build_filters_pages_by_version_but_keeps_shared() {
        let site = site_with(vec![
            page("v1/intro.md", "/v1/intro/", "Intro", Some("v1")),
            page("v2/intro.md", "/v2/intro/", "Intro", Some("v2")),
            page("shared.md", "/shared/", "Shared", None),
        ]);

        let tree = NavTree::build(&site, Some("v1"));
        let urls: Vec<&str> = tree.urls();
        assert!(urls.contains(&"/v1/intro/"));
        assert!(urls.contains(&"/shared/"));
        assert!(!urls.contains(&"/v2/intro/"));
    }

    #[test]
    fn lookup_finds_node_by_url() {
        let site = site_with(vec![page("intro.md", "/intro/", "Intro", None)]);
        let tree = NavTree::build(&site, None);
        assert_eq!(tree.lookup("/intro/").unwrap().title, "Intro");
        assert!(tree.lookup("/missing/").is_none());
    }
}
