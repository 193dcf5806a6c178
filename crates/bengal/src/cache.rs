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

//! The incremental build cache (spec §3.1 `BuildCache`, §4.4): fingerprint
//! based change detection, a dependency graph, and structural-change
//! detection that drives NavTree/taxonomy invalidation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod depgraph;
pub mod fingerprint;
pub mod persist;

use crate::config::Config;
use crate::error::{BuildError, ErrorKind, ErrorSession};
use crate::structure::page::Page;
use depgraph::DependencyGraph;
use fingerprint::Fingerprint;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Persisted state across builds (spec §3.1's `BuildCache`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BuildCache {
    /// Per-source fingerprints, keyed by source path (relative to the
    /// content root, or a synthetic key for non-content sources).
    fingerprints: BTreeMap<String, Fingerprint>,
    /// Dependency edges: dependency -> dependents (spec §9 design note).
    dependencies: DependencyGraph,
    /// Per-page rendered-output fingerprint, keyed by logical URL — lets the
    /// writer skip rewriting a file whose rendered bytes haven't changed
    /// (spec §8 property 5: output-idempotence).
    output_fingerprints: BTreeMap<String, String>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl BuildCache {
    /// Creates an empty cache (as if no prior build had run).
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the cache from `config`'s `.bengal/` state directory, or
    /// returns an empty one if absent or corrupt (corruption is recorded on
    /// `session` as a `T020` warning, never fatal).
    pub fn load(config: &Config, session: &ErrorSession) -> Self {
        match config.get_cache_dir() {
            Ok(dir) => persist::load(&dir.join("cache.json"), session),
            Err(_) => Self::new(),
        }
    }

    /// Persists this cache into `config`'s `.bengal/` state directory.
    pub fn save(&self, config: &Config) -> Result<(), BuildError> {
        let dir = config.get_cache_dir().map_err(|source| {
            BuildError::new("T020", ErrorKind::Cache, "could not create cache directory")
                .with_source(source)
        })?;
        persist::save(&dir.join("cache.json"), self)
    }

    /// Returns the recorded fingerprint for `source_path`, if any.
    pub fn fingerprint(&self, source_path: &str) -> Option<&Fingerprint> {
        self.fingerprints.get(source_path)
    }

    /// Records (overwriting any prior value) the fingerprint for
    /// `source_path`.
    pub fn record(&mut self, source_path: impl Into<String>, fingerprint: Fingerprint) {
        self.fingerprints.insert(source_path.into(), fingerprint);
    }

    /// Returns whether `source_path`'s on-disk fingerprint is unchanged from
    /// what's recorded (spec §8 property 2: incremental soundness — an
    /// unchanged fingerprint is never re-rendered).
    pub fn is_unchanged(&self, source_path: &str, current: &Fingerprint) -> bool {
        self.fingerprints.get(source_path) == Some(current)
    }

    /// Records that `dependent` depends on `dependency`.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) {
        self.dependencies.add_edge(dependent, dependency);
    }

    /// Drops every dependency edge recorded for `dependent`, so a page that
    /// stops referencing something doesn't keep invalidating on it forever.
    pub fn clear_dependencies(&mut self, dependent: &str) {
        self.dependencies.clear_dependent(dependent);
    }

    /// Returns every source transitively affected by changes to `changed`.
    pub fn affected_by(&self, changed: &[String]) -> std::collections::BTreeSet<String> {
        self.dependencies.affected_by(changed)
    }

    /// Returns the recorded output fingerprint for a page's logical URL, if
    /// any.
    pub fn output_fingerprint(&self, url: &str) -> Option<&String> {
        self.output_fingerprints.get(url)
    }

    /// Records the rendered-output fingerprint for a page's logical URL.
    pub fn record_output(&mut self, url: impl Into<String>, hash: String) {
        self.output_fingerprints.insert(url.into(), hash);
    }
}

/// Returns whether a discovery-phase change between `before` and `after`
/// counts as "structural" (spec §4.4): a change to title, weight, icon,
/// section, version, tags, or cascade invalidates NavTree and taxonomy
/// caches, not just the page's own render.
pub fn structural_changed(before: Option<&Page>, after: &Page) -> bool {
    let Some(before) = before else { return true };
    before.title != after.title
        || before.weight != after.weight
        || before.section_path != after.section_path
        || before.version != after.version
        || before.tags != after.tags
        || before.metadata.get("icon") != after.metadata.get("icon")
        || before.metadata.get("cascade") != after.metadata.get("cascade")
}

/// Returns whether `path` is absent from `present`, i.e. was removed since
/// the prior build — also a structural change (spec §4.4: "new/removed
/// page").
pub fn page_removed(path: &Path, present: &[&Page]) -> bool {
    !present.iter().any(|page| page.source_path == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::page::PageMeta;
    use std::path::PathBuf;

    fn page(title: &str, weight: i64) -> Page {
        Page::new(
            PathBuf::from("a.md"),
            PathBuf::from(""),
            "/a/".to_string(),
            title.to_string(),
            PageMeta::new(),
            String::new(),
        )
    }

    #[test]
    fn is_unchanged_requires_an_exact_fingerprint_match() {
        let mut cache = BuildCache::new();
        let fp = Fingerprint {
            content_hash: "abc".to_string(),
            mtime: 1,
            size: 2,
            config_hash: 9,
        };
        cache.record("guide/intro.md", fp.clone());
        assert!(cache.is_unchanged("guide/intro.md", &fp));

        let mut changed = fp.clone();
        changed.content_hash = "def".to_string();
        assert!(!cache.is_unchanged("guide/intro.md", &changed));
        assert!(!cache.is_unchanged("guide/other.md", &fp));
    }

    #[test]
    fn structural_changed_detects_title_and_weight_changes() {
        let before = page("Intro", 0);
        assert!(!structural_changed(Some(&before), &page("Intro", 0)));
        assert!(structural_changed(Some(&before), &page("Intro", 5)));
        assert!(structural_changed(Some(&before), &page("Introduction", 0)));
        assert!(structural_changed(None, &before));
    }

    #[test]
    fn page_removed_detects_absence_from_the_present_set() {
        let present = page("Intro", 0);
        let others = vec![&present];
        assert!(!page_removed(Path::new("a.md"), &others));
        assert!(page_removed(Path::new("gone.md"), &others));
    }
}
