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

//! Per-render active-trail overlay over a cached [`super::NavTree`].
//!
//! The NavTree purity invariant (spec §8 property 4) requires the cached
//! tree itself to carry no per-render state. `NavTreeContext` is the thin,
//! cheaply-constructed overlay that answers "is this node on the page being
//! rendered" without touching the tree.

use std::collections::BTreeSet;

use super::NavTree;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// An active-trail view over a [`NavTree`], computed for one page render.
pub struct NavTreeContext<'a> {
    tree: &'a NavTree,
    /// URL of the page currently being rendered.
    current_url: String,
    /// URLs of every ancestor section on the path to `current_url`.
    trail: BTreeSet<String>,
}

impl<'a> NavTreeContext<'a> {
    /// Builds the overlay for `current_url` against `tree`, walking the tree
    /// once to find the trail of ancestor section URLs.
    pub fn new(tree: &'a NavTree, current_url: impl Into<String>) -> Self {
        let current_url = current_url.into();
        let mut trail = BTreeSet::new();
        collect_trail(&tree.root, &current_url, &mut Vec::new(), &mut trail);
        NavTreeContext { tree, current_url, trail }
    }

    /// The underlying cached tree.
    pub fn tree(&self) -> &'a NavTree {
        self.tree
    }

    /// Whether `url` is the page currently being rendered.
    pub fn is_current(&self, url: &str) -> bool {
        url == self.current_url
    }

    /// Whether `url` names a node on the trail from the root to the current
    /// page (an ancestor section), inclusive of the current page itself.
    pub fn is_in_trail(&self, url: &str) -> bool {
        url == self.current_url || self.trail.contains(url)
    }
}

fn collect_trail(
    node: &super::NavNode, current_url: &str, path: &mut Vec<String>, trail: &mut BTreeSet<String>,
) -> bool {
    if let Some(url) = &node.url {
        path.push(url.clone());
        if url == current_url {
            for ancestor in path.iter() {
                trail.insert(ancestor.clone());
            }
            path.pop();
            return true;
        }
    } else {
        path.push(String::new());
    }

    for child in &node.children {
        if collect_trail(child, current_url, path, trail) {
            path.pop();
            return true;
        }
    }
    path.pop();
    false
}

#[cfg(test)]
mod tests {
    use super::super::NavNode;
    use super::*;

    fn node(url: &str, children: Vec<NavNode>) -> NavNode {
        NavNode {
            id: url.to_string(),
            title: url.to_string(),
            url: Some(url.to_string()),
            icon: None,
            weight: 0,
            children,
            is_index: false,
        }
    }

    #[test]
    fn trail_includes_ancestors_but_not_siblings() {
        let tree = NavTree {
            root: node("/", vec![node("/guide/", vec![node("/guide/intro/", vec![])]), node("/about/", vec![])]),
            version: None,
            index: {
                let mut idx = std::collections::BTreeMap::new();
                idx.insert("/".to_string(), vec![]);
                idx.insert("/guide/".to_string(), vec![0]);
                idx.insert("/guide/intro/".to_string(), vec![0, 0]);
                idx.insert("/about/".to_string(), vec![1]);
                idx
            },
        };

        let ctx = NavTreeContext::new(&tree, "/guide/intro/");
        assert!(ctx.is_current("/guide/intro/"));
        assert!(ctx.is_in_trail("/guide/"));
        assert!(ctx.is_in_trail("/"));
        assert!(!ctx.is_in_trail("/about/"));
    }
}
