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

//! Section: a container of pages and child sections (spec §3.1).

use std::path::PathBuf;

use serde::Serialize;

use super::dynamic::Dynamic;
use super::page::Page;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A container of pages and child sections, usually mirroring a filesystem
/// directory.
///
/// The section tree is acyclic and each section has exactly one parent
/// (except root); it is built bottom-up during discovery and is immutable
/// afterwards (spec §3.1, §5's "Site config, section tree: Frozen after
/// discovery phase"). Pages and child sections are owned here; `Site`'s
/// flat page index is a read-only view computed by walking this tree, not
/// a second owning collection (spec §3.2).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    /// Section name (the directory's base name, or `""` for the root).
    pub name: String,
    /// Content-relative path of this section's directory.
    pub path: PathBuf,
    /// This section's index page (`_index.md`/`index.md`), if present.
    pub index: Option<Page>,
    /// Child sections, in no particular stored order (callers sort via
    /// [`Section::ordered_sections`]).
    pub sections: Vec<Section>,
    /// Pages directly in this section (excluding the index page).
    pub pages: Vec<Page>,
    /// This section's own metadata (from its index page's frontmatter, if
    /// any), consulted when resolving cascaded `params` (spec §4.3).
    ///
    /// The cascade declaration itself (spec §4.1's data cascade) is folded
    /// into every descendant page's metadata during discovery
    /// (`discovery::cascade::apply`), so by the time a `Section` here is
    /// handed to the render phase there is no separate cascade layer left
    /// to carry on the section itself.
    pub metadata: Dynamic,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Section {
    /// Creates an empty section at the given path.
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Section {
            name: name.into(),
            path,
            index: None,
            sections: Vec::new(),
            pages: Vec::new(),
            metadata: Dynamic::Null,
        }
    }

    /// Returns this section's pages, plus its index page if present,
    /// ordered by weight then `(title, path)` (spec §4.1 edge case).
    pub fn ordered_pages(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages.iter().collect();
        pages.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        pages
    }

    /// Returns this section's child sections, ordered by their index page's
    /// weight (sections with no index page sort last, by name).
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by(|a, b| {
            let key = |s: &Section| {
                s.index.as_ref().map_or((i64::MAX, s.name.as_str()), |p| (p.weight, p.name.as_str()))
            };
            key(a).cmp(&key(b))
        });
        sections
    }

    /// Returns every page in this section's subtree, including the index
    /// pages, in depth-first order. This is the read-only view Site's flat
    /// `pages` index is built from (spec §3.1 invariant).
    pub fn all_pages(&self) -> Vec<&Page> {
        let mut out = Vec::new();
        self.collect_pages(&mut out);
        out
    }

    fn collect_pages<'a>(&'a self, out: &mut Vec<&'a Page>) {
        if let Some(index) = &self.index {
            out.push(index);
        }
        out.extend(self.pages.iter());
        for section in &self.sections {
            section.collect_pages(out);
        }
    }

    /// Returns every page in this section's subtree matching the given
    /// version (`None` also matches unversioned/shared pages everywhere),
    /// per spec §4.3's version-filtering NavTree build contract.
    pub fn pages_for_version(&self, version: Option<&str>) -> Vec<&Page> {
        self.all_pages().into_iter().filter(|p| p.matches_version(version)).collect()
    }

    /// Finds the child section at the given single path component, if any.
    pub fn child(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Finds the child section at the given single path component, if any
    /// (mutable).
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::page::PageMeta;

    fn page_in(section: &str, weight: i64, title: &str) -> Page {
        Page::new(
            PathBuf::from(format!("{section}/{title}.md")),
            PathBuf::from(section),
            format!("/{section}/{title}/"),
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
    fn ordered_pages_sorts_by_weight_then_title() {
        let mut section = Section::new("guide", PathBuf::from("guide"));
        section.pages.push(page_in("guide", 1, "zeta"));
        section.pages.push(page_in("guide", 1, "alpha"));
        section.pages.push(page_in("guide", 0, "intro"));
        let ordered: Vec<&str> = section.ordered_pages().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(ordered, vec!["intro", "alpha", "zeta"]);
    }

    #[test]
    fn all_pages_walks_index_then_pages_then_children_depth_first() {
        let mut root = Section::new("", PathBuf::from(""));
        root.index = Some(page_in("", 0, "home"));
        root.pages.push(page_in("", 0, "about"));

        let mut child = Section::new("guide", PathBuf::from("guide"));
        child.pages.push(page_in("guide", 0, "intro"));
        root.sections.push(child);

        let titles: Vec<&str> = root.all_pages().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["home", "about", "intro"]);
    }
}
