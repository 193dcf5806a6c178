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

//! The cross-build dependency graph (spec §4.4, §9 design note): edges are
//! stored in an adjacency list keyed by source path string, not by object
//! reference, so invalidation is a graph traversal rather than a pointer
//! walk.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A directed graph from a dependency (template, include, asset, data file,
/// or other page) to every source that depends on it.
///
/// Edges point from dependency to dependent, the direction invalidation
/// actually walks: "this template changed, which pages used it?"
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// `dependency -> { dependents }`.
    edges: BTreeMap<String, BTreeSet<String>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `dependent` (a source path) depends on `dependency` (a
    /// template name, include path, asset path, data file, or other page's
    /// source path).
    pub fn add_edge(&mut self, dependent: &str, dependency: &str) {
        self.edges.entry(dependency.to_string()).or_default().insert(dependent.to_string());
    }

    /// Removes every edge where `dependent` is the dependent side, e.g.
    /// before re-recording a page's dependencies during a rebuild.
    pub fn clear_dependent(&mut self, dependent: &str) {
        for dependents in self.edges.values_mut() {
            dependents.remove(dependent);
        }
        self.edges.retain(|_, dependents| !dependents.is_empty());
    }

    /// Returns every source transitively affected by a change to `changed`
    /// (the changed set itself included), by walking dependency edges
    /// breadth-first.
    pub fn affected_by(&self, changed: &[String]) -> BTreeSet<String> {
        let mut affected: BTreeSet<String> = changed.iter().cloned().collect();
        let mut queue: VecDeque<String> = changed.iter().cloned().collect();
        while let Some(next) = queue.pop_front() {
            let Some(dependents) = self.edges.get(&next) else { continue };
            for dependent in dependents {
                if affected.insert(dependent.clone()) {
                    queue.push_back(dependent.clone());
                }
            }
        }
        affected
    }

    /// Returns the direct dependents of `dependency`, if any.
    pub fn direct_dependents(&self, dependency: &str) -> BTreeSet<String> {
        self.edges.get(dependency).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affected_by_walks_transitively() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("guide/index.md", "templates/page.html");
        graph.add_edge("guide/intro.md", "templates/page.html");
        graph.add_edge("tags/index.md", "guide/intro.md");

        let affected = graph.affected_by(&["templates/page.html".to_string()]);
        assert!(affected.contains("guide/index.md"));
        assert!(affected.contains("guide/intro.md"));
        assert!(affected.contains("tags/index.md"));
    }

    #[test]
    fn clear_dependent_removes_only_that_sources_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a.md", "templates/page.html");
        graph.add_edge("b.md", "templates/page.html");
        graph.clear_dependent("a.md");

        let dependents = graph.direct_dependents("templates/page.html");
        assert!(!dependents.contains("a.md"));
        assert!(dependents.contains("b.md"));
    }
}
